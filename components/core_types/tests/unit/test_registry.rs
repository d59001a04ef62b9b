//! Unit tests for Registry and CommandDef

use core_types::{
    CheckContext, CheckError, CommandKind, DataType, Invocation, Registry, SieveResult, TagDef,
    TagGroup,
};

fn accept(_: &mut Invocation<'_>) -> SieveResult<bool> {
    Ok(true)
}

fn reject_everything(_: &mut CheckContext<'_>) -> Result<(), CheckError> {
    Err("nope".into())
}

#[cfg(test)]
mod registry_tests {
    use super::*;

    #[test]
    fn test_signature_is_preserved() {
        let mut reg = Registry::new();
        reg.register_test(
            "size",
            accept,
            vec![DataType::Number],
            vec![],
            vec![TagGroup::new(vec![TagDef::flag("over"), TagDef::flag("under")])
                .with_checker(reject_everything)],
        )
        .unwrap();

        let def = reg.test("size").unwrap();
        assert_eq!(def.kind, CommandKind::Test);
        assert_eq!(def.required, vec![DataType::Number]);
        let (tag, group) = def.find_tag("over").unwrap();
        assert_eq!(tag.value_type, None);
        assert!(group.checker.is_some());
    }

    #[test]
    fn test_closure_handlers() {
        let mut reg = Registry::new();
        let threshold = 10u64;
        reg.register_test(
            "big",
            move |inv: &mut Invocation<'_>| -> SieveResult<bool> { Ok(inv.number(0)? > threshold) },
            vec![DataType::Number],
            vec![],
            vec![],
        )
        .unwrap();
        assert!(reg.lookup(CommandKind::Test, "BIG").is_some());
    }

    #[test]
    fn test_empty_registry() {
        let reg = Registry::new();
        assert!(reg.is_empty());
        assert!(reg.action("keep").is_none());
    }

    #[test]
    fn test_valued_tag_def() {
        let tag = TagDef::valued("comparator", DataType::String);
        assert_eq!(tag.value_type, Some(DataType::String));
    }
}
