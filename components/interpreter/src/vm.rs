//! Virtual machine
//!
//! A [`Machine`] owns one compiled script and evaluates it against any
//! number of messages. Each evaluation starts from a fresh
//! [`ExecutionContext`]; script data lives in the machine's pool until the
//! machine is dropped.

use bytecode_system::Program;
use compiler::{CompiledScript, Compiler, Script};
use core_types::{ActionRecord, Argument, Message, Registry, SieveResult};
use memory_manager::{Interner, Pool};

use crate::context::ExecutionContext;
use crate::dispatch::Dispatcher;
use crate::options::MachineOptions;

/// Outcome of evaluating one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Uid of the evaluated message
    pub message: usize,
    /// Number of `ACTION` instructions executed
    pub action_count: usize,
    /// No action ran, so the message is kept
    pub implicit_keep: bool,
    /// Actions recorded by handlers, or suppressed by dry-run mode
    pub actions: Vec<ActionRecord>,
}

/// Compiled filter script plus execution settings.
#[derive(Debug)]
pub struct Machine {
    program: Program,
    pool: Pool,
    interner: Interner,
    values: Vec<Argument>,
    options: MachineOptions,
}

impl Machine {
    /// Compile `script` against `registry`.
    ///
    /// Every binding error is reported in one [`SieveError::Compile`].
    ///
    /// [`SieveError::Compile`]: core_types::SieveError::Compile
    pub fn compile(
        registry: &Registry,
        script: &Script,
        options: MachineOptions,
    ) -> SieveResult<Self> {
        let compiled = Compiler::new(registry)
            .with_pool_limit(options.pool_limit)
            .with_max_code_size(options.max_code_size)
            .compile(script)?;
        tracing::debug!(instructions = compiled.program.len(), "script compiled.");
        Ok(Self::from_compiled(compiled, options))
    }

    /// Wrap an already compiled script
    pub fn from_compiled(compiled: CompiledScript, options: MachineOptions) -> Self {
        let CompiledScript {
            program,
            pool,
            interner,
            values,
        } = compiled;
        Self {
            program,
            pool,
            interner,
            values,
            options,
        }
    }

    /// Execution settings
    pub fn options(&self) -> &MachineOptions {
        &self.options
    }

    /// Switch dry-run mode
    pub fn set_dry_run(&mut self, enabled: bool) {
        self.options.dry_run = enabled;
    }

    /// Switch instruction tracing
    pub fn set_trace(&mut self, enabled: bool) {
        self.options.trace = enabled;
    }

    /// The compiled instruction stream
    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Evaluate the script against one message.
    ///
    /// Errors other than pool errors concern this message only; the machine
    /// stays usable for the next one.
    pub fn run(&self, message: &mut dyn Message) -> SieveResult<RunReport> {
        let uid = message.uid();
        let mut ctx = ExecutionContext::new();
        self.dispatcher().execute(&mut ctx, Some(message))?;

        let implicit_keep = ctx.action_count == 0;
        if implicit_keep {
            tracing::info!(message = uid, "no action taken, keeping message.");
        }
        Ok(RunReport {
            message: uid,
            action_count: ctx.action_count,
            implicit_keep,
            actions: ctx.actions,
        })
    }

    /// List the instructions reached from the start of the program.
    ///
    /// Handlers are not called, so every test reads as false: of an
    /// `if`/`else` only the `else` block is listed.
    pub fn disassemble(&self) -> SieveResult<Vec<String>> {
        let mut ctx = ExecutionContext::disassembly();
        self.dispatcher().execute(&mut ctx, None)?;
        Ok(ctx.listing.unwrap_or_default())
    }

    fn dispatcher(&self) -> Dispatcher<'_> {
        Dispatcher::new(
            &self.program,
            &self.pool,
            &self.interner,
            &self.values,
            &self.options,
        )
    }
}
