//! Bytecode virtual machine for filter scripts
//!
//! This crate provides:
//! - [`Machine`] - A compiled script bound to execution options
//! - [`Dispatcher`] - The instruction loop, also used for disassembly
//! - [`Machine::run_mailbox`] / [`Machine::message_arrived`] - Drivers
//!   isolating per-message failures
//!
//! # Example
//!
//! ```
//! use compiler::{Command, Node, Script, TestExpr};
//! use core_types::{Locus, MemoryMessage, Value};
//! use interpreter::{builtin_registry, Machine, MachineOptions};
//!
//! let registry = builtin_registry().unwrap();
//! let at = |line| Locus::new("rules", line);
//! let test = Command::new("header", at(1))
//!     .arg(Value::from("Subject"))
//!     .arg(Value::from("ping"));
//! let script = Script::new(vec![Node::if_then(
//!     TestExpr::from(test),
//!     vec![Command::new("fileinto", at(2)).arg(Value::from("pings")).into()],
//! )]);
//!
//! let machine = Machine::compile(&registry, &script, MachineOptions::default()).unwrap();
//! let mut message = MemoryMessage::new(1).with_header("Subject", "PING");
//! let report = machine.run(&mut message).unwrap();
//! assert_eq!(report.action_count, 1);
//! assert_eq!(report.actions[0].detail, "delivering into pings");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod context;
pub mod dispatch;
pub mod driver;
pub mod options;
pub mod vm;

// Re-export main types at crate root
pub use builtins::builtin_registry;
pub use context::ExecutionContext;
pub use dispatch::Dispatcher;
pub use driver::{MessageFailure, ScanReport};
pub use options::{MachineOptions, DEFAULT_STACK_DEPTH};
pub use vm::{Machine, RunReport};
