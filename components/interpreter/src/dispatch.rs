//! Dispatch loop for bytecode execution
//!
//! Runs one pass over a program, either against a message or, without one,
//! as a disassembly. In disassembly mode branches follow the same path they
//! would with an initial `reg` of false, and `TEST`, `ACTION`, `NOT`,
//! `PUSH` and `POP` have no effect.

use bytecode_system::{branch_target, Call, Instruction, Program};
use core_types::{ActionRecord, Argument, Invocation, Message, SieveError, SieveResult};
use memory_manager::{Interner, Pool};

use crate::context::ExecutionContext;
use crate::options::MachineOptions;

/// Borrowed view of a compiled script, ready to execute.
#[derive(Debug, Clone, Copy)]
pub struct Dispatcher<'m> {
    program: &'m Program,
    pool: &'m Pool,
    interner: &'m Interner,
    values: &'m [Argument],
    options: &'m MachineOptions,
}

impl<'m> Dispatcher<'m> {
    /// Create a dispatcher over compiled script parts
    pub fn new(
        program: &'m Program,
        pool: &'m Pool,
        interner: &'m Interner,
        values: &'m [Argument],
        options: &'m MachineOptions,
    ) -> Self {
        Self {
            program,
            pool,
            interner,
            values,
            options,
        }
    }

    /// Execute until `HALT` or until a handler stops evaluation.
    ///
    /// Without a message only the instruction listing is collected.
    pub fn execute(
        &self,
        ctx: &mut ExecutionContext,
        mut message: Option<&mut dyn Message>,
    ) -> SieveResult<()> {
        loop {
            let pc = ctx.pc;
            let instruction = self.program.get(pc).ok_or(SieveError::InvalidJump {
                pc,
                target: pc as isize,
            })?;
            ctx.pc += 1;

            match instruction {
                Instruction::Source(id) => {
                    ctx.locus.file = self.interner.resolve(self.pool, *id)?.to_string();
                }
                Instruction::Line(line) => ctx.locus.line = *line,
                _ => {}
            }
            if let Some(listing) = ctx.listing.as_mut() {
                listing.push(format!("{}: {:4}: {}", ctx.locus, pc, self.render(instruction)?));
            }

            match instruction {
                Instruction::Source(_) | Instruction::Line(_) => {}
                Instruction::Test(call) => {
                    self.trace(ctx, instruction);
                    if let Some(message) = message.as_deref_mut() {
                        ctx.reg = self.invoke(ctx, call, message)?;
                    }
                }
                Instruction::Action(call) => {
                    self.trace(ctx, instruction);
                    if let Some(message) = message.as_deref_mut() {
                        ctx.action_count += 1;
                        if self.options.dry_run {
                            self.record_dry_run(ctx, call, message);
                        } else {
                            self.invoke(ctx, call, message)?;
                        }
                    }
                }
                Instruction::Not => {
                    if !ctx.is_disassembly() {
                        ctx.reg = !ctx.reg;
                    }
                }
                Instruction::Push => {
                    if !ctx.is_disassembly() {
                        if ctx.stack.len() >= self.options.max_stack_depth {
                            return Err(SieveError::StackOverflow { pc });
                        }
                        ctx.stack.push(ctx.reg);
                    }
                }
                Instruction::Pop => {
                    if !ctx.is_disassembly() {
                        ctx.reg = ctx.stack.pop().ok_or(SieveError::StackUnderflow { pc })?;
                    }
                }
                Instruction::Branch(offset) => self.jump(ctx, pc, *offset)?,
                Instruction::Brz(offset) => {
                    if !ctx.reg {
                        self.jump(ctx, pc, *offset)?;
                    }
                }
                Instruction::Brnz(offset) => {
                    if ctx.reg {
                        self.jump(ctx, pc, *offset)?;
                    }
                }
                Instruction::Halt => return Ok(()),
            }

            if ctx.halted {
                tracing::debug!(locus = %ctx.locus, pc, "evaluation stopped.");
                return Ok(());
            }
        }
    }

    fn jump(&self, ctx: &mut ExecutionContext, pc: usize, offset: isize) -> SieveResult<()> {
        let target = branch_target(pc, offset);
        if target < 0 || target as usize >= self.program.len() {
            return Err(SieveError::InvalidJump { pc, target });
        }
        ctx.pc = target as usize;
        Ok(())
    }

    /// Calls the handler with the command's argument window and comparator.
    fn invoke(
        &self,
        ctx: &mut ExecutionContext,
        call: &Call,
        message: &mut dyn Message,
    ) -> SieveResult<bool> {
        let window = self.values.get(call.window()).ok_or_else(|| {
            SieveError::runtime(&ctx.locus, "argument window outside the value space")
        })?;
        let mut invocation = Invocation::new(
            &call.command.name,
            &ctx.locus,
            window,
            call.tag_count,
            &call.comparator,
            self.pool,
            message,
            &mut ctx.actions,
        );
        let result = call.command.handler.call(&mut invocation);
        let halted = invocation.is_halted();

        ctx.halted |= halted;
        result
    }

    fn record_dry_run(&self, ctx: &mut ExecutionContext, call: &Call, message: &dyn Message) {
        let detail = self
            .values
            .get(call.arg_start..call.arg_start + call.arg_count)
            .unwrap_or_default()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        let record = ActionRecord {
            message: message.uid(),
            locus: ctx.locus.clone(),
            action: call.command.name.to_ascii_uppercase(),
            detail,
            dry_run: true,
        };
        tracing::info!(message = %record, "sieve action.");
        ctx.actions.push(record);
    }

    fn trace(&self, ctx: &ExecutionContext, instruction: &Instruction) {
        if self.options.trace {
            tracing::debug!(locus = %ctx.locus, pc = ctx.pc - 1, "{}", instruction);
        }
    }

    fn render(&self, instruction: &Instruction) -> SieveResult<String> {
        Ok(match instruction {
            Instruction::Source(id) => {
                format!("SOURCE {}", self.interner.resolve(self.pool, *id)?)
            }
            other => other.to_string(),
        })
    }
}
