//! Bytecode generation from the script tree

use bytecode_system::{BranchKind, Call, Instruction, Program};
use core_types::{
    Argument, CommandKind, Diagnostic, Locus, Registry, SieveError, SieveResult,
};
use memory_manager::{Interner, Pool, PoolResult};

use crate::ast::{Command, Node, Script, TestExpr};
use crate::binder::bind;
use crate::error::BindError;

/// Everything a machine needs to run a compiled script.
#[derive(Debug)]
pub struct CompiledScript {
    /// Instruction stream, terminated by `HALT`
    pub program: Program,
    /// Pool owning script-lifetime data
    pub pool: Pool,
    /// Interned file and command names
    pub interner: Interner,
    /// Bound arguments referenced by `TEST`/`ACTION` windows
    pub values: Vec<Argument>,
}

/// Lowers a [`Script`] to a [`Program`].
///
/// Binding errors are collected and code generation continues, so a single
/// compile reports every broken command. Pool errors abort immediately.
pub struct CodeGenerator<'r> {
    registry: &'r Registry,
    program: Program,
    pool: Pool,
    interner: Interner,
    values: Vec<Argument>,
    diagnostics: Vec<Diagnostic>,
}

impl<'r> CodeGenerator<'r> {
    /// Create a generator emitting into `program` and allocating from `pool`
    pub fn new(registry: &'r Registry, program: Program, pool: Pool) -> Self {
        Self {
            registry,
            program,
            pool,
            interner: Interner::new(),
            values: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Generate code for `script`
    pub fn generate(mut self, script: &Script) -> SieveResult<CompiledScript> {
        self.visit_block(&script.nodes)?;

        if !self.diagnostics.is_empty() {
            for diagnostic in &self.diagnostics {
                tracing::error!(locus = %diagnostic.locus, "{}", diagnostic.message);
            }
            return Err(SieveError::Compile {
                diagnostics: self.diagnostics,
            });
        }

        self.program.finish()?;
        tracing::debug!(
            instructions = self.program.len(),
            values = self.values.len(),
            pool_bytes = self.pool.allocated_bytes(),
            "compiled script."
        );

        Ok(CompiledScript {
            program: self.program,
            pool: self.pool,
            interner: self.interner,
            values: self.values,
        })
    }

    fn visit_block(&mut self, nodes: &[Node]) -> SieveResult<()> {
        for node in nodes {
            self.visit_node(node)?;
        }
        Ok(())
    }

    fn visit_node(&mut self, node: &Node) -> SieveResult<()> {
        match node {
            Node::Command(command) => self.visit_command(CommandKind::Action, command),

            Node::If {
                branches,
                otherwise,
            } => {
                let mut end_jumps = Vec::new();

                for (index, (test, block)) in branches.iter().enumerate() {
                    self.visit_test(test)?;
                    let next = self.program.emit_branch(BranchKind::IfFalse)?;

                    self.visit_block(block)?;

                    let is_last = index + 1 == branches.len();
                    if !is_last || otherwise.is_some() {
                        end_jumps.push(self.program.emit_branch(BranchKind::Always)?);
                    }
                    self.program.patch_here(next);
                }

                if let Some(block) = otherwise {
                    self.visit_block(block)?;
                }

                for jump in end_jumps {
                    self.program.patch_here(jump);
                }
                Ok(())
            }
        }
    }

    fn visit_test(&mut self, test: &TestExpr) -> SieveResult<()> {
        match test {
            TestExpr::Test(command) => self.visit_command(CommandKind::Test, command),

            TestExpr::Not(inner) => {
                self.visit_test(inner)?;
                self.program.emit(Instruction::Not)?;
                Ok(())
            }

            // Short circuit: leave reg as set by the deciding operand
            TestExpr::AnyOf { tests, locus } => {
                self.visit_chain(tests, locus, BranchKind::IfTrue, "anyof")
            }
            TestExpr::AllOf { tests, locus } => {
                self.visit_chain(tests, locus, BranchKind::IfFalse, "allof")
            }
        }
    }

    fn visit_chain(
        &mut self,
        tests: &[TestExpr],
        locus: &Locus,
        exit: BranchKind,
        what: &'static str,
    ) -> SieveResult<()> {
        let Some((last, rest)) = tests.split_last() else {
            self.report(locus, BindError::EmptyTestList(what));
            return Ok(());
        };

        let mut exits = Vec::with_capacity(rest.len());
        for test in rest {
            self.visit_test(test)?;
            exits.push(self.program.emit_branch(exit)?);
        }
        self.visit_test(last)?;

        for jump in exits {
            self.program.patch_here(jump);
        }
        Ok(())
    }

    fn visit_command(&mut self, kind: CommandKind, command: &Command) -> SieveResult<()> {
        let Some(def) = self.registry.lookup(kind, &command.name) else {
            self.report(
                &command.locus,
                BindError::UnknownCommand {
                    kind,
                    name: command.name.clone(),
                },
            );
            return Ok(());
        };

        let bound = match bind(&def, command, &mut self.pool) {
            Ok(bound) => bound,
            Err(BindError::Pool(err)) => return Err(err.into()),
            Err(err) => {
                self.report(&command.locus, err);
                return Ok(());
            }
        };

        self.set_locus(&command.locus)?;
        let name = self.interner.intern(&mut self.pool, &def.name)?;

        let call = Call {
            command: def,
            name,
            arg_start: self.values.len(),
            arg_count: bound.arg_count,
            tag_count: bound.tag_count,
            comparator: bound.comparator,
        };
        self.values.extend(bound.args);

        let instruction = match kind {
            CommandKind::Test => Instruction::Test(call),
            CommandKind::Action => Instruction::Action(call),
        };
        self.program.emit(instruction)?;
        Ok(())
    }

    fn set_locus(&mut self, locus: &Locus) -> PoolResult<()> {
        let file = self.interner.intern(&mut self.pool, &locus.file)?;
        self.program.set_locus(file, locus.line)
    }

    fn report(&mut self, locus: &Locus, err: BindError) {
        self.diagnostics
            .push(Diagnostic::new(locus.clone(), err.to_string()));
    }
}
