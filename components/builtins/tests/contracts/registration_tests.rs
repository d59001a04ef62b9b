//! Registration contract tests

use builtins::{builtin_registry, register_builtins};
use core_types::{CommandKind, DataType, Invocation, Registry, SieveResult};

fn vacation(inv: &mut Invocation<'_>) -> SieveResult<bool> {
    inv.record("vacation", "");
    Ok(true)
}

#[test]
fn test_header_signature() {
    let registry = builtin_registry().unwrap();
    let def = registry.test("header").unwrap();
    assert_eq!(def.kind, CommandKind::Test);
    assert_eq!(def.required, vec![DataType::StringList, DataType::StringList]);
    assert!(def.find_tag("mime").is_some());
    assert!(def.find_tag("comparator").is_some());
    assert!(def.find_tag("domain").is_none());
}

#[test]
fn test_address_accepts_address_parts() {
    let registry = builtin_registry().unwrap();
    let def = registry.test("address").unwrap();
    for tag in ["all", "localpart", "domain", "is", "contains", "matches", "regex"] {
        assert!(def.find_tag(tag).is_some(), "address lacks :{}", tag);
    }
}

#[test]
fn test_size_signature() {
    let registry = builtin_registry().unwrap();
    let def = registry.test("size").unwrap();
    assert_eq!(def.required, vec![DataType::Number]);
    assert!(def.tag_groups[0].checker.is_some());
}

#[test]
fn test_actions_take_strings() {
    let registry = builtin_registry().unwrap();
    for name in ["fileinto", "reject", "redirect"] {
        assert_eq!(registry.action(name).unwrap().required, vec![DataType::String]);
    }
    assert!(registry.action("keep").unwrap().required.is_empty());
}

#[test]
fn test_register_into_existing_registry() {
    let mut registry = Registry::new();
    registry
        .register_action("vacation", vacation, vec![], vec![], vec![])
        .unwrap();
    register_builtins(&mut registry).unwrap();
    assert_eq!(registry.len(), 14);
}
