//! Argument binder
//!
//! Turns the raw argument list of a [`Command`] into a type-checked window:
//! positional arguments first, tag-derived entries after them. Tags that
//! take a value consume the following raw argument.

use std::collections::HashSet;

use core_types::{Argument, CheckContext, CommandDef, Comparator, Value};
use memory_manager::Pool;

use crate::ast::Command;
use crate::error::BindError;

/// A command whose arguments passed binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bound {
    /// Positional arguments followed by tag-derived entries
    pub args: Vec<Argument>,
    /// Number of positional arguments
    pub arg_count: usize,
    /// Number of tag-derived entries
    pub tag_count: usize,
    /// Comparator, possibly rewritten by a tag checker
    pub comparator: Comparator,
}

/// Binds `command` against its registry entry.
///
/// Stops at the first error. Tag checkers may allocate compiled data in
/// `pool`.
pub fn bind(def: &CommandDef, command: &Command, pool: &mut Pool) -> Result<Bound, BindError> {
    let mut positional = Vec::new();
    let mut tags = Vec::new();

    let mut raw = command.arguments.iter().cloned();
    while let Some(value) = raw.next() {
        let Value::Tag(name) = value else {
            positional.push(value);
            continue;
        };

        let (tag, _) = def.find_tag(&name).ok_or_else(|| BindError::InvalidTag {
            tag: name.clone(),
            command: command.name.clone(),
        })?;

        let value = match tag.value_type {
            None => Value::Void,
            Some(expected) => {
                let next = raw
                    .next()
                    .ok_or_else(|| BindError::MissingTagValue { tag: name.clone() })?;
                next.coerce(expected)
                    .map_err(|actual| BindError::TagTypeMismatch {
                        tag: name.clone(),
                        expected,
                        actual: actual.data_type(),
                    })?
            }
        };
        tags.push(Argument::tagged(name, value));
    }

    let mut args = Vec::with_capacity(positional.len() + tags.len());
    let mut slots = def.required.iter().chain(def.optional.iter());
    for (index, value) in positional.into_iter().enumerate() {
        let expected = *slots.next().ok_or_else(|| BindError::TooManyArguments {
            command: command.name.clone(),
        })?;
        let value = value
            .coerce(expected)
            .map_err(|actual| BindError::TypeMismatch {
                command: command.name.clone(),
                position: index + 1,
                expected,
                actual: actual.data_type(),
            })?;
        args.push(Argument::positional(value));
    }
    if args.len() < def.required.len() {
        return Err(BindError::TooFewArguments {
            command: command.name.clone(),
        });
    }

    let mut comparator = Comparator::default();
    run_checkers(def, command, &mut args, &mut tags, &mut comparator, pool)?;

    let arg_count = args.len();
    let tag_count = tags.len();
    args.append(&mut tags);

    Ok(Bound {
        args,
        arg_count,
        tag_count,
        comparator,
    })
}

/// Runs each checker whose group has a tag present, once per distinct
/// checker.
fn run_checkers(
    def: &CommandDef,
    command: &Command,
    args: &mut Vec<Argument>,
    tags: &mut Vec<Argument>,
    comparator: &mut Comparator,
    pool: &mut Pool,
) -> Result<(), BindError> {
    let mut seen = HashSet::new();

    for group in &def.tag_groups {
        let Some(checker) = group.checker else {
            continue;
        };
        let present = group
            .tags
            .iter()
            .any(|tag| tags.iter().any(|arg| arg.is_tag_named(&tag.name)));
        if !present || !seen.insert(checker as usize) {
            continue;
        }

        let mut cx = CheckContext {
            command: &command.name,
            args: &mut *args,
            tags: &mut *tags,
            comparator: &mut *comparator,
            pool: &mut *pool,
        };
        checker(&mut cx)?;
    }
    Ok(())
}
