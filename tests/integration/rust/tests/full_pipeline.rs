//! Full Pipeline Integration Tests
//!
//! Tests the complete flow: Script -> Binder -> CodeGenerator -> Program ->
//! Machine -> action log, using the built-in command library.

use compiler::{Command, Node, Script, TestExpr};
use core_types::{Mailbox, MemoryMailbox, MemoryMessage, Value};
use integration_tests::{at, list_message, script, when};
use interpreter::{builtin_registry, Machine, MachineOptions, RunReport};

fn filter() -> Script {
    script(vec![
        when(
            Command::new("header", at(1))
                .tag("contains")
                .arg("List-Id")
                .arg("rust-weekly"),
            vec![
                Command::new("fileinto", at(2)).arg("Lists/Rust"),
                Command::new("stop", at(3)),
            ],
        ),
        when(
            Command::new("envelope", at(5))
                .tag("domain")
                .arg("from")
                .arg("spam.example"),
            vec![Command::new("discard", at(6))],
        ),
        when(
            Command::new("header", at(8))
                .tag("regex")
                .tag("comparator")
                .arg("i;octet")
                .arg("Subject")
                .arg("^URGENT"),
            vec![Command::new("reject", at(9)).arg("no shouting")],
        ),
        when(
            Command::new("header", at(11))
                .tag("comparator")
                .arg("i;ascii-numeric")
                .arg("X-Priority")
                .arg("1"),
            vec![Command::new("redirect", at(12)).arg("oncall@example.net")],
        ),
    ])
}

fn run(message: &mut MemoryMessage) -> RunReport {
    let vm = Machine::compile(&builtin_registry().unwrap(), &filter(), MachineOptions::default())
        .expect("filter compiles");
    vm.run(message).expect("evaluation succeeds")
}

fn entries(report: &RunReport) -> Vec<String> {
    report.actions.iter().map(ToString::to_string).collect()
}

/// Test: list mail is filed and later rules are skipped
#[test]
fn test_pipeline_fileinto_then_stop() {
    let report = run(&mut list_message(1));
    assert_eq!(report.action_count, 2);
    assert_eq!(
        entries(&report),
        ["filter.sieve:2: FILEINTO on msg uid 1: delivering into Lists/Rust"]
    );
}

/// Test: envelope sender domain
#[test]
fn test_pipeline_envelope_discard() {
    let mut msg = MemoryMessage::new(2)
        .with_header("Subject", "hello")
        .with_envelope_sender("Mailer <promo@SPAM.example>");
    let report = run(&mut msg);
    assert_eq!(report.action_count, 1);
    assert!(msg.is_deleted());
    assert_eq!(report.actions[0].action, "DISCARD");
}

/// Test: octet regex is case-sensitive
#[test]
fn test_pipeline_octet_regex() {
    let report = run(&mut MemoryMessage::new(3).with_header("Subject", "URGENT: invoice"));
    assert_eq!(
        entries(&report),
        ["filter.sieve:9: REJECT on msg uid 3: no shouting"]
    );

    let report = run(&mut MemoryMessage::new(4).with_header("Subject", "urgent: invoice"));
    assert!(report.implicit_keep);
}

/// Test: numeric comparison ignores leading zeros and trailing text
#[test]
fn test_pipeline_numeric_comparator() {
    let report = run(&mut MemoryMessage::new(5).with_header("X-Priority", "001 (Highest)"));
    assert_eq!(report.actions.len(), 1);
    assert_eq!(report.actions[0].detail, "to oncall@example.net");

    let report = run(&mut MemoryMessage::new(6).with_header("X-Priority", "3 (Normal)"));
    assert_eq!(report.action_count, 0);
}

/// Test: wildcard match with escaped brackets in the subject
#[test]
fn test_pipeline_matches_wildcards() {
    let tests = Script::new(vec![Node::if_then(
        TestExpr::from(
            Command::new("header", at(1))
                .tag("matches")
                .arg("Subject")
                .arg(Value::from(vec!["[rust-weekly] issue ???", "*newsletter*"])),
        ),
        vec![Command::new("keep", at(1)).into()],
    )]);
    let vm = Machine::compile(&builtin_registry().unwrap(), &tests, MachineOptions::default())
        .unwrap();
    assert_eq!(vm.run(&mut list_message(1)).unwrap().action_count, 1);

    let mut other = MemoryMessage::new(2).with_header("Subject", "[rust-weekly] issue 1024");
    assert_eq!(vm.run(&mut other).unwrap().action_count, 0);
}

/// Test: one machine filters a whole mailbox
#[test]
fn test_pipeline_mailbox_scan() {
    let vm = Machine::compile(&builtin_registry().unwrap(), &filter(), MachineOptions::default())
        .unwrap();
    let mut mailbox: MemoryMailbox = vec![
        list_message(1),
        MemoryMessage::new(2).with_envelope_sender("a@spam.example"),
        MemoryMessage::new(3).with_header("Subject", "lunch?"),
    ]
    .into_iter()
    .collect();

    let report = vm.run_mailbox(&mut mailbox).unwrap();
    assert_eq!(mailbox.message_count().unwrap(), 3);
    assert_eq!(report.visited(), 3);
    assert!(report.failures.is_empty());
    assert_eq!(report.action_count(), 3);
    assert_eq!(
        report.runs.iter().map(|r| r.implicit_keep).collect::<Vec<_>>(),
        [false, false, true]
    );

    let deleted: Vec<_> = mailbox.messages().iter().map(|m| m.is_deleted()).collect();
    assert_eq!(deleted, [false, true, false]);
}
