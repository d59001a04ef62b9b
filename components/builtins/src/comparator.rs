//! Comparator matching
//!
//! Implements the `:is`, `:contains`, `:matches` and `:regex` match types
//! over the `i;octet`, `i;ascii-casemap` and `i;ascii-numeric` collations.
//! Patterns for `:matches` and `:regex` are compiled once, at bind time, and
//! kept in the script's pool. They run over bytes with Unicode case folding
//! off, so `i;ascii-casemap` folds ASCII letters only for every match type.

use std::cmp::Ordering;

use core_types::{
    CheckContext, CheckError, Collation, Comparator, DataType, Invocation, MatchType,
    SieveResult, TagDef, TagGroup,
};
use regex::bytes::{Regex, RegexBuilder};

/// Compiled patterns, one per key.
pub type Patterns = Vec<Regex>;

/// The `:is`/`:contains`/`:matches`/`:regex`/`:comparator` tag group.
pub fn match_type_group() -> TagGroup {
    TagGroup::new(vec![
        TagDef::flag("is"),
        TagDef::flag("contains"),
        TagDef::flag("matches"),
        TagDef::flag("regex"),
        TagDef::valued("comparator", DataType::String),
    ])
    .with_checker(check_match_type)
}

/// Resolves the comparator from the tags and compiles pattern keys.
///
/// The key list is the last positional argument.
pub fn check_match_type(cx: &mut CheckContext<'_>) -> Result<(), CheckError> {
    let mut match_type = None;
    for tag in cx.tags.iter().filter_map(|arg| arg.tag.as_deref()) {
        let Some(found) = MatchType::from_tag(tag) else {
            continue;
        };
        if match_type.is_some() {
            return Err(format!("match type specified twice in call to `{}`", cx.command).into());
        }
        match_type = Some(found);
    }
    let match_type = match_type.unwrap_or_default();

    let collation = match cx.tag("comparator") {
        Some(arg) => {
            let name = arg.value.as_str().unwrap_or_default();
            Collation::from_name(name)
                .ok_or_else(|| CheckError::from(format!("unknown comparator `{}`", name)))?
        }
        None => Collation::default(),
    };

    if collation == Collation::AsciiNumeric && match_type != MatchType::Is {
        return Err(format!(
            "comparator `{}` is incompatible with :{} in call to `{}`",
            collation.name(),
            match_type.tag(),
            cx.command
        )
        .into());
    }

    let mut comparator = Comparator::new(collation, match_type);
    if match_type.is_pattern() {
        let keys = cx
            .args
            .last()
            .and_then(|arg| arg.value.as_string_list())
            .ok_or_else(|| CheckError::from(format!("`{}` has no key list", cx.command)))?;
        let patterns = keys
            .iter()
            .map(|key| compile_pattern(key, match_type, collation))
            .collect::<Result<Patterns, _>>()?;
        comparator.patterns = Some(cx.pool.insert(patterns)?);
    }

    *cx.comparator = comparator;
    Ok(())
}

/// Compiles one key for `:matches` or `:regex`.
pub fn compile_pattern(
    key: &str,
    match_type: MatchType,
    collation: Collation,
) -> Result<Regex, CheckError> {
    let source = match match_type {
        MatchType::Matches => glob_to_regex(key),
        _ => key.to_string(),
    };
    RegexBuilder::new(&scope_unicode(&source))
        .unicode(false)
        .case_insensitive(collation == Collation::AsciiCasemap)
        .dot_matches_new_line(true)
        .build()
        .map_err(|e| CheckError::from(format!("invalid pattern `{}`: {}", key, e)))
}

/// Translates a `:matches` wildcard into an anchored regular expression.
///
/// `*` matches any sequence, `?` any single character and `\` quotes the
/// next character.
pub fn glob_to_regex(glob: &str) -> String {
    let mut out = String::with_capacity(glob.len() + 2);
    out.push('^');
    let mut chars = glob.chars();
    while let Some(c) = chars.next() {
        match c {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            '\\' => match chars.next() {
                Some(quoted) => out.push_str(&regex::escape(quoted.encode_utf8(&mut [0; 4]))),
                None => out.push_str(r"\\"),
            },
            c => out.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
        }
    }
    out.push('$');
    out
}

/// Rewrites a pattern for matching with Unicode mode off.
///
/// `.`, `\p` classes and bracket classes holding non-ASCII characters are
/// put back into Unicode mode; non-ASCII literals also lose case folding.
fn scope_unicode(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(p @ ('p' | 'P')) => {
                    out.push_str("(?u:\\");
                    out.push(p);
                    if chars.peek() == Some(&'{') {
                        for n in chars.by_ref() {
                            out.push(n);
                            if n == '}' {
                                break;
                            }
                        }
                    } else if let Some(n) = chars.next() {
                        out.push(n);
                    }
                    out.push(')');
                }
                Some(n) if !n.is_ascii() => push_literal(&mut out, n),
                Some(n) => {
                    out.push('\\');
                    out.push(n);
                }
                None => out.push('\\'),
            },
            '[' => {
                let class = read_class(&mut chars);
                if class.is_ascii() && !class.contains("\\p") && !class.contains("\\P") {
                    out.push_str(&class);
                } else {
                    out.push_str("(?u:");
                    out.push_str(&class);
                    out.push(')');
                }
            }
            '.' => out.push_str("(?u:.)"),
            c if !c.is_ascii() => push_literal(&mut out, c),
            c => out.push(c),
        }
    }
    out
}

fn push_literal(out: &mut String, c: char) {
    out.push_str("(?u-i:");
    out.push(c);
    out.push(')');
}

/// Reads a bracket class whose `[` was already consumed.
fn read_class(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut class = String::from("[");
    if chars.peek() == Some(&'^') {
        class.push('^');
        chars.next();
    }
    if chars.peek() == Some(&']') {
        class.push(']');
        chars.next();
    }
    let mut depth = 1usize;
    while let Some(c) = chars.next() {
        class.push(c);
        match c {
            '\\' => {
                if let Some(n) = chars.next() {
                    class.push(n);
                }
            }
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            _ => {}
        }
    }
    class
}

/// Compares one value against one key.
///
/// `pattern` is the compiled form of the key for pattern match types.
pub fn compare(comparator: &Comparator, pattern: Option<&Regex>, value: &str, key: &str) -> bool {
    match comparator.match_type {
        MatchType::Is => equals(comparator.collation, value, key),
        MatchType::Contains => contains(comparator.collation, value, key),
        MatchType::Matches | MatchType::Regex => {
            pattern.is_some_and(|re| re.is_match(value.as_bytes()))
        }
    }
}

/// Whether any value matches any key, stopping at the first match.
pub fn any_match<S: AsRef<str>>(
    invocation: &Invocation<'_>,
    values: &[S],
    keys: &[String],
) -> SieveResult<bool> {
    let comparator = invocation.comparator();
    let patterns = match comparator.patterns {
        Some(handle) => Some(invocation.pool().get::<Patterns>(handle)?),
        None => None,
    };

    for value in values {
        let value = value.as_ref();
        for (index, key) in keys.iter().enumerate() {
            let pattern = patterns.and_then(|p| p.get(index));
            if compare(comparator, pattern, value, key) {
                tracing::trace!(%value, %key, comparator = %comparator, "matched.");
                return Ok(true);
            }
        }
    }
    Ok(false)
}

fn equals(collation: Collation, value: &str, key: &str) -> bool {
    match collation {
        Collation::Octet => value == key,
        Collation::AsciiCasemap => value.eq_ignore_ascii_case(key),
        Collation::AsciiNumeric => numeric_cmp(value, key) == Ordering::Equal,
    }
}

fn contains(collation: Collation, value: &str, key: &str) -> bool {
    match collation {
        Collation::Octet => value.contains(key),
        Collation::AsciiCasemap => value
            .to_ascii_lowercase()
            .contains(&key.to_ascii_lowercase()),
        // Rejected at bind time
        Collation::AsciiNumeric => false,
    }
}

/// Orders two strings by their leading decimal digits; strings without
/// one compare as positive infinity.
fn numeric_cmp(a: &str, b: &str) -> Ordering {
    fn leading(s: &str) -> Option<&str> {
        let end = s.bytes().take_while(u8::is_ascii_digit).count();
        if end == 0 {
            return None;
        }
        let digits = s[..end].trim_start_matches('0');
        Some(digits)
    }

    match (leading(a), leading(b)) {
        (Some(x), Some(y)) => x.len().cmp(&y.len()).then_with(|| x.cmp(y)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
