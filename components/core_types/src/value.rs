//! Sieve argument values.
//!
//! A [`Value`] is what the parser produces for each argument of a test or
//! action. After binding, arguments live in the machine's value space as
//! [`Argument`]s: positional ones first, tag-derived ones at the tail.

use std::fmt;
use std::slice;

/// A Sieve argument value.
///
/// # Examples
///
/// ```
/// use core_types::{DataType, Value};
///
/// let v = Value::from("Subject");
/// assert_eq!(v.data_type(), DataType::String);
/// assert_eq!(v.to_string(), "\"Subject\"");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// No value; used for tags that take no argument
    Void,
    /// A single string
    String(String),
    /// A list of strings
    StringList(Vec<String>),
    /// A non-negative number
    Number(u64),
    /// A tag as written in the source, without the leading colon
    Tag(String),
}

/// Type of a [`Value`], as declared in command and tag definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// [`Value::Void`]
    Void,
    /// [`Value::Number`]
    Number,
    /// [`Value::String`]
    String,
    /// [`Value::StringList`]
    StringList,
    /// [`Value::Tag`]
    Tag,
}

impl DataType {
    /// Whether a value of type `actual` may be bound where `self` is declared.
    ///
    /// A single string is accepted where a string list is expected.
    pub fn accepts(self, actual: DataType) -> bool {
        self == actual || (self == DataType::StringList && actual == DataType::String)
    }

    /// Human-readable name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            DataType::Void => "void",
            DataType::Number => "number",
            DataType::String => "string",
            DataType::StringList => "string list",
            DataType::Tag => "tag",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    /// Returns the type of this value.
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Void => DataType::Void,
            Value::String(_) => DataType::String,
            Value::StringList(_) => DataType::StringList,
            Value::Number(_) => DataType::Number,
            Value::Tag(_) => DataType::Tag,
        }
    }

    /// Whether this value is a syntactic tag.
    pub fn is_tag(&self) -> bool {
        matches!(self, Value::Tag(_))
    }

    /// The string payload, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The strings of this value; a single string is a one-element list.
    pub fn as_string_list(&self) -> Option<&[String]> {
        match self {
            Value::String(s) => Some(slice::from_ref(s)),
            Value::StringList(list) => Some(list),
            _ => None,
        }
    }

    /// The numeric payload, if this is a number.
    pub fn as_number(&self) -> Option<u64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Converts this value to the declared type `expected`, if compatible.
    pub fn coerce(self, expected: DataType) -> Result<Value, Value> {
        match (expected, self) {
            (DataType::StringList, Value::String(s)) => Ok(Value::StringList(vec![s])),
            (expected, value) if expected == value.data_type() => Ok(value),
            (_, value) => Err(value),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Number(n)
    }
}

impl From<Vec<String>> for Value {
    fn from(list: Vec<String>) -> Self {
        Value::StringList(list)
    }
}

impl From<Vec<&str>> for Value {
    fn from(list: Vec<&str>) -> Self {
        Value::StringList(list.into_iter().map(str::to_string).collect())
    }
}

/// Formats values the way they are written in a script.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Void => write!(f, "void"),
            Value::String(s) => write!(f, "{:?}", s),
            Value::StringList(list) => {
                write!(f, "[")?;
                for (i, s) in list.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}", s)?;
                }
                write!(f, "]")
            }
            Value::Number(n) => write!(f, "{}", n),
            Value::Tag(name) => write!(f, ":{}", name),
        }
    }
}

/// A bound argument in the machine's value space.
///
/// Positional arguments have no tag. Tag-derived entries carry the tag name
/// and either [`Value::Void`] or the value the tag consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    /// Tag name for tag-derived entries
    pub tag: Option<String>,
    /// The bound value
    pub value: Value,
}

impl Argument {
    /// A positional argument.
    pub fn positional(value: Value) -> Self {
        Self { tag: None, value }
    }

    /// A tag-derived argument.
    pub fn tagged(name: impl Into<String>, value: Value) -> Self {
        Self {
            tag: Some(name.into()),
            value,
        }
    }

    /// Whether this entry came from a tag.
    pub fn is_tag(&self) -> bool {
        self.tag.is_some()
    }

    /// Whether this entry is the tag `name`.
    pub fn is_tag_named(&self, name: &str) -> bool {
        self.tag.as_deref() == Some(name)
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.tag, &self.value) {
            (Some(tag), Value::Void) => write!(f, ":{}", tag),
            (Some(tag), value) => write!(f, ":{} {}", tag, value),
            (None, value) => write!(f, "{}", value),
        }
    }
}
