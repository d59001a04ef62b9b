//! Source locations for diagnostics and trace output.

use std::fmt;

/// A source file name and line number.
///
/// # Examples
///
/// ```
/// use core_types::Locus;
///
/// let locus = Locus::new("filter.sieve", 12);
/// assert_eq!(locus.to_string(), "filter.sieve:12");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Locus {
    /// Source file name
    pub file: String,
    /// Line number (1-based, 0 when unknown)
    pub line: u32,
}

impl Locus {
    /// Create a new locus
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

impl fmt::Display for Locus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}
