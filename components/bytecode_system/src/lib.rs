//! Bytecode system for the filter virtual machine
//!
//! This crate provides the instruction set and the append-only emitter the
//! compiler lowers scripts into.
//!
//! # Features
//!
//! - Closed instruction enum dispatched with `match`
//! - Branch offsets relative to the instruction after the branch
//! - Forward branches back-patched once the target is known
//! - `SOURCE`/`LINE` emitted only when the locus changes
//!
//! # Example
//!
//! ```
//! use bytecode_system::{BranchKind, Instruction, Program};
//!
//! let mut program = Program::new();
//! program.set_locus(0, 1).unwrap();
//! let skip = program.emit_branch(BranchKind::IfFalse).unwrap();
//! program.emit(Instruction::Not).unwrap();
//! program.patch_here(skip);
//! program.finish().unwrap();
//!
//! assert!(matches!(program.get(skip), Some(Instruction::Brz(1))));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod instruction;
pub mod program;

// Re-export main types at crate root
pub use instruction::{branch_offset, branch_target, Call, Instruction};
pub use program::{BranchKind, Program};
