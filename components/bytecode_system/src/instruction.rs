//! Instruction set
//!
//! Control-flow instructions carry a signed offset relative to the
//! instruction that follows the branch.

use std::fmt;
use std::sync::Arc;

use core_types::{CommandDef, Comparator};
use memory_manager::IdentId;

/// Operands shared by `ACTION` and `TEST`.
#[derive(Debug, Clone)]
pub struct Call {
    /// Registry entry holding the handler
    pub command: Arc<CommandDef>,
    /// Interned command name
    pub name: IdentId,
    /// Index of the first argument in the value space
    pub arg_start: usize,
    /// Number of positional arguments
    pub arg_count: usize,
    /// Number of tag-derived arguments following the positional ones
    pub tag_count: usize,
    /// Comparator chosen at bind time
    pub comparator: Comparator,
}

impl Call {
    /// Range of the argument window in the value space, tags included.
    pub fn window(&self) -> std::ops::Range<usize> {
        self.arg_start..self.arg_start + self.arg_count + self.tag_count
    }
}

/// One virtual machine instruction.
#[derive(Debug, Clone)]
pub enum Instruction {
    /// Switch the current locus file
    Source(IdentId),
    /// Switch the current locus line
    Line(u32),
    /// Invoke an action handler
    Action(Call),
    /// Invoke a test handler and store its result in `reg`
    Test(Call),
    /// `reg = !reg`
    Not,
    /// Save `reg` on the stack
    Push,
    /// Restore `reg` from the stack
    Pop,
    /// Unconditional relative jump
    Branch(isize),
    /// Jump if `reg` is false
    Brz(isize),
    /// Jump if `reg` is true
    Brnz(isize),
    /// End of program
    Halt,
}

impl Instruction {
    /// Assembler mnemonic.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Instruction::Source(_) => "SOURCE",
            Instruction::Line(_) => "LINE",
            Instruction::Action(_) => "ACTION",
            Instruction::Test(_) => "TEST",
            Instruction::Not => "NOT",
            Instruction::Push => "PUSH",
            Instruction::Pop => "POP",
            Instruction::Branch(_) => "BRANCH",
            Instruction::Brz(_) => "BRZ",
            Instruction::Brnz(_) => "BRNZ",
            Instruction::Halt => "HALT",
        }
    }

    /// Relative offset of a branch instruction.
    pub fn branch_offset(&self) -> Option<isize> {
        match self {
            Instruction::Branch(o) | Instruction::Brz(o) | Instruction::Brnz(o) => Some(*o),
            _ => None,
        }
    }

    /// Whether this is one of the branch instructions.
    pub fn is_branch(&self) -> bool {
        self.branch_offset().is_some()
    }
}

/// Absolute target of a branch at `pc` with relative `offset`.
///
/// Offsets count from the instruction following the branch. Returns the raw
/// signed target so callers can report where a bad jump pointed.
pub fn branch_target(pc: usize, offset: isize) -> isize {
    pc as isize + 1 + offset
}

/// Offset a branch at `from` needs to land on `target`.
pub fn branch_offset(from: usize, target: usize) -> isize {
    target as isize - (from as isize + 1)
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Source(id) => write!(f, "SOURCE #{}", id),
            Instruction::Line(n) => write!(f, "LINE {}", n),
            Instruction::Action(call) | Instruction::Test(call) => write!(
                f,
                "{} {} {} {} {} {}",
                self.mnemonic(),
                call.command.name,
                call.arg_start,
                call.arg_count,
                call.tag_count,
                call.comparator
            ),
            Instruction::Branch(o) | Instruction::Brz(o) | Instruction::Brnz(o) => {
                write!(f, "{} {:+}", self.mnemonic(), o)
            }
            _ => f.write_str(self.mnemonic()),
        }
    }
}
