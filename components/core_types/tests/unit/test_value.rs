//! Unit tests for Value, DataType and Argument

use core_types::{Argument, DataType, Value};

#[cfg(test)]
mod data_type_tests {
    use super::*;

    #[test]
    fn test_value_data_types() {
        assert_eq!(Value::Void.data_type(), DataType::Void);
        assert_eq!(Value::from("x").data_type(), DataType::String);
        assert_eq!(Value::from(vec!["x"]).data_type(), DataType::StringList);
        assert_eq!(Value::from(10u64).data_type(), DataType::Number);
        assert_eq!(Value::Tag("is".into()).data_type(), DataType::Tag);
    }

    #[test]
    fn test_data_type_display() {
        assert_eq!(DataType::StringList.to_string(), "string list");
        assert_eq!(DataType::Number.to_string(), "number");
    }
}

#[cfg(test)]
mod coercion_tests {
    use super::*;

    #[test]
    fn test_string_promotes_to_list() {
        let v = Value::from("Subject").coerce(DataType::StringList).unwrap();
        assert_eq!(v, Value::StringList(vec!["Subject".into()]));
    }

    #[test]
    fn test_list_does_not_demote_to_string() {
        let v = Value::from(vec!["a", "b"]);
        let back = v.clone().coerce(DataType::String).unwrap_err();
        assert_eq!(back, v);
    }

    #[test]
    fn test_number_rejected_for_string() {
        assert!(Value::from(3u64).coerce(DataType::String).is_err());
    }
}

#[cfg(test)]
mod display_tests {
    use super::*;

    #[test]
    fn test_value_display_script_syntax() {
        assert_eq!(Value::from("a\"b").to_string(), "\"a\\\"b\"");
        assert_eq!(Value::from(vec!["a", "b"]).to_string(), "[\"a\", \"b\"]");
        assert_eq!(Value::Tag("over".into()).to_string(), ":over");
        assert_eq!(Value::from(100u64).to_string(), "100");
    }

    #[test]
    fn test_argument_display() {
        assert_eq!(Argument::tagged("contains", Value::Void).to_string(), ":contains");
        assert_eq!(
            Argument::tagged("comparator", Value::from("i;octet")).to_string(),
            ":comparator \"i;octet\""
        );
        assert_eq!(Argument::positional(Value::from(5u64)).to_string(), "5");
    }

    #[test]
    fn test_argument_tag_queries() {
        let arg = Argument::tagged("over", Value::Void);
        assert!(arg.is_tag());
        assert!(arg.is_tag_named("over"));
        assert!(!arg.is_tag_named("under"));
        assert!(!Argument::positional(Value::Void).is_tag());
    }
}
