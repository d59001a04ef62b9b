//! Comparator descriptors.
//!
//! A comparator pairs a collation (RFC 4790) with a match type. The
//! descriptor is chosen at bind time and travels in the `TEST` instruction;
//! the matching itself is implemented by the built-in test library.

use std::fmt;

use memory_manager::Handle;

/// String collation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Collation {
    /// `i;octet`: exact byte comparison
    Octet,
    /// `i;ascii-casemap`: ASCII case-insensitive comparison
    #[default]
    AsciiCasemap,
    /// `i;ascii-numeric`: comparison of leading decimal digits
    AsciiNumeric,
}

impl Collation {
    /// Looks up a collation by its registered name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "i;octet" => Some(Collation::Octet),
            "i;ascii-casemap" => Some(Collation::AsciiCasemap),
            "i;ascii-numeric" => Some(Collation::AsciiNumeric),
            _ => None,
        }
    }

    /// Registered name.
    pub fn name(self) -> &'static str {
        match self {
            Collation::Octet => "i;octet",
            Collation::AsciiCasemap => "i;ascii-casemap",
            Collation::AsciiNumeric => "i;ascii-numeric",
        }
    }
}

/// Match type selected by `:is`, `:contains`, `:matches` or `:regex`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MatchType {
    /// Whole-value equality
    #[default]
    Is,
    /// Substring search
    Contains,
    /// Wildcard match with `*` and `?`
    Matches,
    /// Regular expression search
    Regex,
}

impl MatchType {
    /// Looks up a match type by its tag name.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "is" => Some(MatchType::Is),
            "contains" => Some(MatchType::Contains),
            "matches" => Some(MatchType::Matches),
            "regex" => Some(MatchType::Regex),
            _ => None,
        }
    }

    /// Tag name, without the colon.
    pub fn tag(self) -> &'static str {
        match self {
            MatchType::Is => "is",
            MatchType::Contains => "contains",
            MatchType::Matches => "matches",
            MatchType::Regex => "regex",
        }
    }

    /// Whether patterns must be compiled before matching.
    pub fn is_pattern(self) -> bool {
        matches!(self, MatchType::Matches | MatchType::Regex)
    }
}

/// Comparator bound to one test invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Comparator {
    /// Collation
    pub collation: Collation,
    /// Match type
    pub match_type: MatchType,
    /// Pool cell holding the compiled patterns for `:matches`/`:regex`
    pub patterns: Option<Handle>,
}

impl Comparator {
    /// A comparator without compiled patterns.
    pub fn new(collation: Collation, match_type: MatchType) -> Self {
        Self {
            collation,
            match_type,
            patterns: None,
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} :{}", self.collation.name(), self.match_type.tag())
    }
}
