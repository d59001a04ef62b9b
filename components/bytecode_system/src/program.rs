//! Program - compiled instruction stream
//!
//! Instructions are appended through the pool's growable vector. Forward
//! branches are emitted with a placeholder offset and patched once the
//! target is known.

use std::fmt;

use memory_manager::{GrowVec, IdentId, PoolResult, DEFAULT_LIMIT};

use crate::instruction::{branch_offset, Instruction};

/// Which branch instruction to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchKind {
    /// `BRANCH`
    Always,
    /// `BRZ`
    IfFalse,
    /// `BRNZ`
    IfTrue,
}

/// A compiled instruction stream.
#[derive(Debug)]
pub struct Program {
    code: GrowVec<Instruction>,
    file: Option<IdentId>,
    line: Option<u32>,
}

impl Program {
    /// Create an empty program with the default instruction limit
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_LIMIT)
    }

    /// Create an empty program holding at most `limit` instructions
    pub fn with_limit(limit: usize) -> Self {
        Self {
            code: GrowVec::with_limit(limit),
            file: None,
            line: None,
        }
    }

    /// Append an instruction and return its index
    pub fn emit(&mut self, instruction: Instruction) -> PoolResult<usize> {
        self.code.push(instruction)
    }

    /// Record the locus of the next instruction.
    ///
    /// `SOURCE` and `LINE` are only emitted when they differ from the last
    /// recorded values.
    pub fn set_locus(&mut self, file: IdentId, line: u32) -> PoolResult<()> {
        if self.file != Some(file) {
            self.emit(Instruction::Source(file))?;
            self.file = Some(file);
        }
        if self.line != Some(line) {
            self.emit(Instruction::Line(line))?;
            self.line = Some(line);
        }
        Ok(())
    }

    /// Emit a branch with a placeholder offset; patch it with
    /// [`Program::patch_branch`].
    pub fn emit_branch(&mut self, kind: BranchKind) -> PoolResult<usize> {
        self.emit(Self::branch(kind, 0))
    }

    /// Point the branch at `at` to `target`. Non-branch instructions are
    /// left untouched.
    pub fn patch_branch(&mut self, at: usize, target: usize) {
        let offset = branch_offset(at, target);
        if let Some(inst) = self.code.get_mut(at) {
            match inst {
                Instruction::Branch(o) | Instruction::Brz(o) | Instruction::Brnz(o) => {
                    *o = offset;
                }
                _ => {}
            }
        }
    }

    /// Point the branch at `at` to the next instruction to be emitted.
    pub fn patch_here(&mut self, at: usize) {
        let target = self.len();
        self.patch_branch(at, target);
    }

    /// Append the terminating `HALT`
    pub fn finish(&mut self) -> PoolResult<()> {
        self.emit(Instruction::Halt).map(|_| ())
    }

    /// Instruction at `pc`
    pub fn get(&self, pc: usize) -> Option<&Instruction> {
        self.code.get(pc)
    }

    /// Every instruction in order
    pub fn instructions(&self) -> &[Instruction] {
        self.code.as_slice()
    }

    /// Number of instructions
    pub fn len(&self) -> usize {
        self.code.len()
    }

    /// Whether nothing has been emitted
    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    fn branch(kind: BranchKind, offset: isize) -> Instruction {
        match kind {
            BranchKind::Always => Instruction::Branch(offset),
            BranchKind::IfFalse => Instruction::Brz(offset),
            BranchKind::IfTrue => Instruction::Brnz(offset),
        }
    }
}

impl Default for Program {
    fn default() -> Self {
        Self::new()
    }
}

/// Linear listing, one instruction per line.
impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (pc, inst) in self.code.iter().enumerate() {
            writeln!(f, "{:4}: {}", pc, inst)?;
        }
        Ok(())
    }
}
