//! Tests for Instruction and Call

use std::sync::Arc;

use bytecode_system::{branch_offset, branch_target, Call, Instruction};
use core_types::{
    Collation, CommandDef, CommandKind, Comparator, DataType, Invocation, MatchType, SieveResult,
};

fn accept(_: &mut Invocation<'_>) -> SieveResult<bool> {
    Ok(true)
}

fn header_call() -> Call {
    Call {
        command: Arc::new(CommandDef {
            name: "header".into(),
            kind: CommandKind::Test,
            handler: Arc::new(accept),
            required: vec![DataType::StringList, DataType::StringList],
            optional: vec![],
            tag_groups: vec![],
        }),
        name: 2,
        arg_start: 4,
        arg_count: 3,
        tag_count: 1,
        comparator: Comparator::new(Collation::AsciiCasemap, MatchType::Contains),
    }
}

#[test]
fn test_call_window() {
    assert_eq!(header_call().window(), 4..8);
}

#[test]
fn test_test_instruction_display() {
    let inst = Instruction::Test(header_call());
    assert_eq!(inst.mnemonic(), "TEST");
    assert_eq!(inst.to_string(), "TEST header 4 3 1 i;ascii-casemap :contains");
}

#[test]
fn test_action_instruction_display() {
    let inst = Instruction::Action(header_call());
    assert!(inst.to_string().starts_with("ACTION header"));
    assert_eq!(inst.branch_offset(), None);
}

#[test]
fn test_offset_round_trip() {
    for (from, to) in [(0usize, 9usize), (9, 0), (4, 5)] {
        assert_eq!(branch_target(from, branch_offset(from, to)), to as isize);
    }
}
