//! Tests for the Program emitter

use bytecode_system::{BranchKind, Instruction, Program};

#[test]
fn test_program_creation() {
    let program = Program::new();
    assert!(program.is_empty());
    assert_eq!(program.len(), 0);
}

#[test]
fn test_if_else_shape() {
    // cond; BRZ else; A; BRANCH end; else: B; end: HALT
    let mut p = Program::new();
    p.emit(Instruction::Push).unwrap();
    let to_else = p.emit_branch(BranchKind::IfFalse).unwrap();
    p.emit(Instruction::Not).unwrap();
    let to_end = p.emit_branch(BranchKind::Always).unwrap();
    p.patch_here(to_else);
    p.emit(Instruction::Pop).unwrap();
    p.patch_here(to_end);
    p.finish().unwrap();

    assert!(matches!(p.get(1), Some(Instruction::Brz(2))));
    assert!(matches!(p.get(3), Some(Instruction::Branch(1))));
    assert!(matches!(p.get(5), Some(Instruction::Halt)));
}

#[test]
fn test_brnz_chain_patch() {
    let mut p = Program::new();
    let a = p.emit_branch(BranchKind::IfTrue).unwrap();
    let b = p.emit_branch(BranchKind::IfTrue).unwrap();
    p.patch_here(a);
    p.patch_here(b);
    assert!(matches!(p.get(0), Some(Instruction::Brnz(1))));
    assert!(matches!(p.get(1), Some(Instruction::Brnz(0))));
}

#[test]
fn test_locus_same_line_new_file() {
    let mut p = Program::new();
    p.set_locus(0, 7).unwrap();
    p.set_locus(1, 7).unwrap();
    assert_eq!(p.len(), 3);
    assert!(matches!(p.get(2), Some(Instruction::Source(1))));
}
