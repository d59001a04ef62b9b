//! Address parsing for the `address` and `envelope` tests.

use core_types::{CheckContext, CheckError, Invocation, TagDef, TagGroup};

/// One mailbox from an address header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    /// Part before the `@`
    pub local_part: String,
    /// Part after the `@`, if any
    pub domain: Option<String>,
}

impl Address {
    /// Splits `addr-spec` at its last `@`.
    pub fn from_spec(spec: &str) -> Option<Self> {
        let spec = spec.trim();
        if spec.is_empty() {
            return None;
        }
        Some(match spec.rsplit_once('@') {
            Some((local, domain)) => Self {
                local_part: local.to_string(),
                domain: Some(domain.to_string()),
            },
            None => Self {
                local_part: spec.to_string(),
                domain: None,
            },
        })
    }

    /// The requested part, if this address has it.
    pub fn part(&self, part: AddressPart) -> Option<String> {
        match part {
            AddressPart::All => Some(match &self.domain {
                Some(domain) => format!("{}@{}", self.local_part, domain),
                None => self.local_part.clone(),
            }),
            AddressPart::LocalPart => Some(self.local_part.clone()),
            AddressPart::Domain => self.domain.clone(),
        }
    }
}

/// Which part of an address a test compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressPart {
    /// `:all`
    #[default]
    All,
    /// `:localpart`
    LocalPart,
    /// `:domain`
    Domain,
}

impl AddressPart {
    /// The part selected by the invocation's tags.
    pub fn of(invocation: &Invocation<'_>) -> Self {
        if invocation.has_tag("localpart") {
            AddressPart::LocalPart
        } else if invocation.has_tag("domain") {
            AddressPart::Domain
        } else {
            AddressPart::All
        }
    }
}

/// The `:all`/`:localpart`/`:domain` tag group.
pub fn address_part_group() -> TagGroup {
    TagGroup::new(vec![
        TagDef::flag("all"),
        TagDef::flag("localpart"),
        TagDef::flag("domain"),
    ])
    .with_checker(check_address_part)
}

fn check_address_part(cx: &mut CheckContext<'_>) -> Result<(), CheckError> {
    let given = ["all", "localpart", "domain"]
        .iter()
        .filter(|part| cx.has_tag(part))
        .count();
    if given > 1 {
        return Err(format!("address part specified twice in call to `{}`", cx.command).into());
    }
    Ok(())
}

/// Parses the mailboxes of an address header value.
///
/// Understands comma-separated lists, display names, `<...>` routes,
/// quoted strings, comments and group syntax. Anything without content is
/// skipped.
pub fn parse_address_list(field: &str) -> Vec<Address> {
    split_top_level(field)
        .iter()
        .filter_map(|item| Address::from_spec(&mailbox_spec(item)))
        .collect()
}

/// Splits at commas outside quotes, comments and angle brackets; group
/// names (`name:`) and terminators (`;`) are dropped.
fn split_top_level(field: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut depth = 0usize;
    let mut angle = false;
    let mut chars = field.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' if quoted => {
                current.push(c);
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            '\\' if depth > 0 => {
                chars.next();
            }
            '"' if depth == 0 => {
                quoted = !quoted;
                current.push(c);
            }
            '(' if !quoted => depth += 1,
            ')' if !quoted && depth > 0 => depth -= 1,
            _ if depth > 0 => {}
            '<' if !quoted => {
                angle = true;
                current.push(c);
            }
            '>' if !quoted => {
                angle = false;
                current.push(c);
            }
            ':' if !quoted && !angle => current.clear(),
            ',' | ';' if !quoted && !angle => items.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }
    items.push(current);
    items
}

/// The `addr-spec` of one mailbox: the bracketed address if present, the
/// whole item otherwise. An obsolete source route (`@relay:`) is dropped.
fn mailbox_spec(item: &str) -> String {
    if let Some(start) = item.rfind('<') {
        let inner = &item[start + 1..];
        let inner = inner.split('>').next().unwrap_or(inner).trim();
        let inner = match inner.strip_prefix('@').and_then(|r| r.split_once(':')) {
            Some((_, spec)) => spec.trim(),
            None => inner,
        };
        return inner.to_string();
    }
    item.trim().to_string()
}
