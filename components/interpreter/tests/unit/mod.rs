//! Unit tests for interpreter components
//!
//! Programs here are assembled by hand so that instructions the code
//! generator never emits (`PUSH`, `POP`, stray branches) are covered.

use bytecode_system::{Call, Instruction, Program};
use compiler::CompiledScript;
use std::sync::{Arc, Mutex};

use core_types::{
    Collation, Comparator, Invocation, MatchType, MemoryMessage, Registry, SieveError, SieveResult,
};
use interpreter::{builtin_registry, Dispatcher, ExecutionContext, Machine, MachineOptions};
use memory_manager::{Interner, Pool};

fn call(registry: &Registry, test: bool, name: &str) -> Call {
    let command = if test {
        registry.test(name)
    } else {
        registry.action(name)
    };
    Call {
        command: command.unwrap(),
        name: 0,
        arg_start: 0,
        arg_count: 0,
        tag_count: 0,
        comparator: Comparator::default(),
    }
}

fn machine(code: Vec<Instruction>, options: MachineOptions) -> Machine {
    let mut program = Program::new();
    for instruction in code {
        program.emit(instruction).unwrap();
    }
    let compiled = CompiledScript {
        program,
        pool: Pool::new(),
        interner: Interner::new(),
        values: Vec::new(),
    };
    Machine::from_compiled(compiled, options)
}

// ============================================================================
// Stack Tests
// ============================================================================

#[test]
fn test_push_pop_restores_reg() {
    let reg = builtin_registry().unwrap();
    let vm = machine(
        vec![
            Instruction::Test(call(&reg, true, "true")),
            Instruction::Push,
            Instruction::Test(call(&reg, true, "false")),
            Instruction::Pop,
            Instruction::Brz(1),
            Instruction::Action(call(&reg, false, "keep")),
            Instruction::Halt,
        ],
        MachineOptions::default(),
    );
    let report = vm.run(&mut MemoryMessage::new(1)).unwrap();
    assert_eq!(report.action_count, 1);
    assert!(!report.implicit_keep);
}

#[test]
fn test_pop_empty_stack_underflows() {
    let vm = machine(
        vec![Instruction::Not, Instruction::Pop, Instruction::Halt],
        MachineOptions::default(),
    );
    let err = vm.run(&mut MemoryMessage::new(1)).unwrap_err();
    assert_eq!(err, SieveError::StackUnderflow { pc: 1 });
    assert!(!err.is_fatal());
}

#[test]
fn test_push_beyond_depth_overflows() {
    let vm = machine(
        vec![
            Instruction::Push,
            Instruction::Push,
            Instruction::Push,
            Instruction::Halt,
        ],
        MachineOptions::default().with_max_stack_depth(2),
    );
    let err = vm.run(&mut MemoryMessage::new(1)).unwrap_err();
    assert_eq!(err, SieveError::StackOverflow { pc: 2 });
}

// ============================================================================
// Control Flow Tests
// ============================================================================

#[test]
fn test_not_inverts_reg() {
    let reg = builtin_registry().unwrap();
    let vm = machine(
        vec![
            Instruction::Not,
            Instruction::Brz(1),
            Instruction::Action(call(&reg, false, "discard")),
            Instruction::Halt,
        ],
        MachineOptions::default(),
    );
    let mut msg = MemoryMessage::new(4);
    let report = vm.run(&mut msg).unwrap();
    assert_eq!(report.action_count, 1);
    assert!(msg.is_deleted());
}

#[test]
fn test_branch_outside_program() {
    let forward = machine(
        vec![Instruction::Branch(5), Instruction::Halt],
        MachineOptions::default(),
    );
    assert_eq!(
        forward.run(&mut MemoryMessage::new(1)).unwrap_err(),
        SieveError::InvalidJump { pc: 0, target: 6 }
    );

    let backward = machine(
        vec![Instruction::Halt, Instruction::Branch(-3)],
        MachineOptions::default(),
    );
    // Starts at HALT, so the broken branch is never reached
    assert!(backward.run(&mut MemoryMessage::new(1)).is_ok());

    let backward = machine(
        vec![Instruction::Branch(-3), Instruction::Halt],
        MachineOptions::default(),
    );
    assert_eq!(
        backward.run(&mut MemoryMessage::new(1)).unwrap_err(),
        SieveError::InvalidJump { pc: 0, target: -2 }
    );
}

#[test]
fn test_stop_ends_evaluation() {
    let reg = builtin_registry().unwrap();
    let vm = machine(
        vec![
            Instruction::Action(call(&reg, false, "stop")),
            Instruction::Action(call(&reg, false, "keep")),
            Instruction::Halt,
        ],
        MachineOptions::default(),
    );
    let report = vm.run(&mut MemoryMessage::new(1)).unwrap();
    assert_eq!(report.action_count, 1);
    assert!(report.actions.is_empty());
    assert!(!report.implicit_keep);
}

// ============================================================================
// ExecutionContext Tests
// ============================================================================

#[test]
fn test_execute_leaves_pc_past_halt() {
    let reg = builtin_registry().unwrap();
    let mut program = Program::new();
    program
        .emit(Instruction::Test(call(&reg, true, "true")))
        .unwrap();
    program.finish().unwrap();
    let pool = Pool::new();
    let interner = Interner::new();
    let options = MachineOptions::default();
    let dispatcher = Dispatcher::new(&program, &pool, &interner, &[], &options);

    let mut ctx = ExecutionContext::new();
    let mut msg = MemoryMessage::new(1);
    dispatcher.execute(&mut ctx, Some(&mut msg)).unwrap();
    assert!(ctx.reg);
    assert_eq!(ctx.pc, 2);
}

#[test]
fn test_handlers_see_their_own_comparator() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut reg = builtin_registry().unwrap();
    let log = Arc::clone(&seen);
    reg.register_test(
        "inspect",
        move |inv: &mut Invocation<'_>| -> SieveResult<bool> {
            let comparator = *inv.comparator();
            log.lock()
                .unwrap()
                .push((inv.command().to_string(), comparator.match_type));
            Ok(comparator.match_type == MatchType::Contains)
        },
        vec![],
        vec![],
        vec![],
    )
    .unwrap();

    let mut first = call(&reg, true, "inspect");
    first.comparator = Comparator::new(Collation::Octet, MatchType::Contains);
    let second = call(&reg, true, "inspect");
    let vm = machine(
        vec![
            Instruction::Test(first),
            Instruction::Push,
            Instruction::Test(second),
            Instruction::Pop,
            Instruction::Brz(1),
            Instruction::Action(call(&reg, false, "keep")),
            Instruction::Halt,
        ],
        MachineOptions::default(),
    );
    let report = vm.run(&mut MemoryMessage::new(1)).unwrap();
    assert_eq!(report.action_count, 1);
    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            ("inspect".to_string(), MatchType::Contains),
            ("inspect".to_string(), MatchType::Is),
        ]
    );
}

#[test]
fn test_disassembly_is_inert() {
    let reg = builtin_registry().unwrap();
    let vm = machine(
        vec![
            Instruction::Pop,
            Instruction::Not,
            Instruction::Action(call(&reg, false, "discard")),
            Instruction::Halt,
        ],
        MachineOptions::default(),
    );
    let listing = vm.disassemble().unwrap();
    assert_eq!(listing.len(), 4);
    assert!(listing[0].ends_with("0: POP"));
    assert!(listing[2].contains("ACTION discard"));
}
