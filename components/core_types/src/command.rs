//! Command definitions and the interfaces handlers and checkers see.
//!
//! A [`CommandDef`] describes one test or action: its argument types, its
//! tag groups and the [`Handler`] the virtual machine calls. Handlers receive
//! an [`Invocation`] exposing the bound arguments, the comparator and the
//! current message. Tag-group checkers receive a [`CheckContext`] at bind
//! time and may rewrite the comparator or the argument window.

use std::fmt;
use std::sync::Arc;

use memory_manager::{Pool, PoolError};

use crate::comparator::Comparator;
use crate::error::{SieveError, SieveResult};
use crate::message::Message;
use crate::value::{Argument, DataType, Value};
use crate::Locus;

/// Whether a command is a test or an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// Produces a boolean result
    Test,
    /// Acts on the message
    Action,
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandKind::Test => write!(f, "test"),
            CommandKind::Action => write!(f, "action"),
        }
    }
}

/// Code run by the virtual machine for a test or an action.
///
/// The returned boolean is the test result; actions return `true`.
pub trait Handler: Send + Sync {
    /// Run the command.
    fn call(&self, invocation: &mut Invocation<'_>) -> SieveResult<bool>;
}

impl<F> Handler for F
where
    F: Fn(&mut Invocation<'_>) -> SieveResult<bool> + Send + Sync,
{
    fn call(&self, invocation: &mut Invocation<'_>) -> SieveResult<bool> {
        self(invocation)
    }
}

/// Compile-time validation hook attached to a tag group.
///
/// A rejection is reported as a compile error at the command's locus.
pub type Checker = fn(&mut CheckContext<'_>) -> Result<(), CheckError>;

/// Failure of a tag-group checker.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckError {
    /// The tag combination is invalid
    #[error("{0}")]
    Rejected(String),

    /// Allocating compiled data failed
    #[error(transparent)]
    Pool(#[from] PoolError),
}

impl From<String> for CheckError {
    fn from(message: String) -> Self {
        CheckError::Rejected(message)
    }
}

impl From<&str> for CheckError {
    fn from(message: &str) -> Self {
        CheckError::Rejected(message.to_string())
    }
}

/// A tag accepted by a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagDef {
    /// Tag name without the colon
    pub name: String,
    /// Type of the value the tag consumes, if any
    pub value_type: Option<DataType>,
}

impl TagDef {
    /// A tag that takes no value.
    pub fn flag(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value_type: None,
        }
    }

    /// A tag that consumes the following argument.
    pub fn valued(name: impl Into<String>, value_type: DataType) -> Self {
        Self {
            name: name.into(),
            value_type: Some(value_type),
        }
    }
}

/// Related tags sharing an optional checker.
#[derive(Clone)]
pub struct TagGroup {
    /// Tags in this group
    pub tags: Vec<TagDef>,
    /// Checker run when any tag of the group is present
    pub checker: Option<Checker>,
}

impl TagGroup {
    /// A group without a checker.
    pub fn new(tags: Vec<TagDef>) -> Self {
        Self {
            tags,
            checker: None,
        }
    }

    /// Attach a checker.
    pub fn with_checker(mut self, checker: Checker) -> Self {
        self.checker = Some(checker);
        self
    }
}

impl fmt::Debug for TagGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagGroup")
            .field("tags", &self.tags)
            .field("has_checker", &self.checker.is_some())
            .finish()
    }
}

/// Registry entry for one test or action.
#[derive(Clone)]
pub struct CommandDef {
    /// Command name
    pub name: String,
    /// Test or action
    pub kind: CommandKind,
    /// Code run by the virtual machine
    pub handler: Arc<dyn Handler>,
    /// Types of the mandatory positional arguments
    pub required: Vec<DataType>,
    /// Types accepted once the required arguments are exhausted
    pub optional: Vec<DataType>,
    /// Accepted tags
    pub tag_groups: Vec<TagGroup>,
}

impl CommandDef {
    /// Finds a tag definition and the group declaring it.
    pub fn find_tag(&self, name: &str) -> Option<(&TagDef, &TagGroup)> {
        self.tag_groups.iter().find_map(|group| {
            group
                .tags
                .iter()
                .find(|tag| tag.name == name)
                .map(|tag| (tag, group))
        })
    }
}

impl fmt::Debug for CommandDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDef")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("required", &self.required)
            .field("optional", &self.optional)
            .field("tag_groups", &self.tag_groups)
            .finish()
    }
}

/// The bind-time view handed to tag-group checkers.
pub struct CheckContext<'a> {
    /// Command being bound
    pub command: &'a str,
    /// Positional arguments
    pub args: &'a mut Vec<Argument>,
    /// Tag-derived arguments
    pub tags: &'a mut Vec<Argument>,
    /// Comparator bound so far
    pub comparator: &'a mut Comparator,
    /// Pool for compiled, script-lifetime data
    pub pool: &'a mut Pool,
}

impl CheckContext<'_> {
    /// The tag-derived argument called `name`.
    pub fn tag(&self, name: &str) -> Option<&Argument> {
        self.tags.iter().find(|arg| arg.is_tag_named(name))
    }

    /// Whether the tag `name` was given.
    pub fn has_tag(&self, name: &str) -> bool {
        self.tag(name).is_some()
    }
}

/// One entry of the per-message action log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRecord {
    /// Message number
    pub message: usize,
    /// Locus of the action
    pub locus: Locus,
    /// Action name, upper-cased
    pub action: String,
    /// Action-specific detail
    pub detail: String,
    /// Whether the action was suppressed by dry-run mode
    pub dry_run: bool,
}

impl fmt::Display for ActionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} on msg uid {}", self.locus, self.action, self.message)?;
        if !self.detail.is_empty() {
            write!(f, ": {}", self.detail)?;
        }
        if self.dry_run {
            write!(f, " (dry run)")?;
        }
        Ok(())
    }
}

/// Everything a handler may look at while it runs.
pub struct Invocation<'a> {
    command: &'a str,
    locus: &'a Locus,
    args: &'a [Argument],
    tags: &'a [Argument],
    comparator: &'a Comparator,
    pool: &'a Pool,
    message: &'a mut dyn Message,
    actions: &'a mut Vec<ActionRecord>,
    halted: bool,
}

impl<'a> Invocation<'a> {
    /// Builds an invocation over an argument window whose last `tag_count`
    /// entries are tag-derived.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        command: &'a str,
        locus: &'a Locus,
        window: &'a [Argument],
        tag_count: usize,
        comparator: &'a Comparator,
        pool: &'a Pool,
        message: &'a mut dyn Message,
        actions: &'a mut Vec<ActionRecord>,
    ) -> Self {
        let (args, tags) = window.split_at(window.len().saturating_sub(tag_count));
        Self {
            command,
            locus,
            args,
            tags,
            comparator,
            pool,
            message,
            actions,
            halted: false,
        }
    }

    /// Name of the running command.
    pub fn command(&self) -> &str {
        self.command
    }

    /// Locus of the running instruction.
    pub fn locus(&self) -> &Locus {
        self.locus
    }

    /// Positional arguments.
    pub fn args(&self) -> &[Argument] {
        self.args
    }

    /// Tag-derived arguments.
    pub fn tags(&self) -> &[Argument] {
        self.tags
    }

    /// Positional argument `index`.
    pub fn arg(&self, index: usize) -> SieveResult<&Value> {
        self.args.get(index).map(|a| &a.value).ok_or_else(|| {
            SieveError::runtime(
                self.locus,
                format!("missing argument {} to `{}`", index + 1, self.command),
            )
        })
    }

    /// Positional argument `index` as a string.
    pub fn string(&self, index: usize) -> SieveResult<&str> {
        let value = self.arg(index)?;
        value.as_str().ok_or_else(|| self.wrong_type(index, DataType::String, value))
    }

    /// Positional argument `index` as a string list.
    pub fn string_list(&self, index: usize) -> SieveResult<&[String]> {
        let value = self.arg(index)?;
        value
            .as_string_list()
            .ok_or_else(|| self.wrong_type(index, DataType::StringList, value))
    }

    /// Positional argument `index` as a number.
    pub fn number(&self, index: usize) -> SieveResult<u64> {
        let value = self.arg(index)?;
        value
            .as_number()
            .ok_or_else(|| self.wrong_type(index, DataType::Number, value))
    }

    /// The tag-derived argument called `name`.
    pub fn tag(&self, name: &str) -> Option<&Argument> {
        self.tags.iter().find(|arg| arg.is_tag_named(name))
    }

    /// Whether the tag `name` was given.
    pub fn has_tag(&self, name: &str) -> bool {
        self.tag(name).is_some()
    }

    /// Comparator bound to this command.
    pub fn comparator(&self) -> &Comparator {
        self.comparator
    }

    /// The machine's memory pool.
    pub fn pool(&self) -> &Pool {
        self.pool
    }

    /// The message being evaluated.
    pub fn message(&self) -> &(dyn Message + 'a) {
        &*self.message
    }

    /// Mutable access to the message being evaluated.
    pub fn message_mut(&mut self) -> &mut (dyn Message + 'a) {
        &mut *self.message
    }

    /// Appends an entry to the action log.
    pub fn record(&mut self, action: &str, detail: impl Into<String>) {
        let record = ActionRecord {
            message: self.message.uid(),
            locus: self.locus.clone(),
            action: action.to_ascii_uppercase(),
            detail: detail.into(),
            dry_run: false,
        };
        tracing::info!(message = %record, "sieve action.");
        self.actions.push(record);
    }

    /// Stops evaluation of the current message after this command.
    pub fn halt(&mut self) {
        self.halted = true;
    }

    /// Whether [`Invocation::halt`] was called.
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    fn wrong_type(&self, index: usize, expected: DataType, actual: &Value) -> SieveError {
        SieveError::runtime(
            self.locus,
            format!(
                "argument {} to `{}` should be {}, got {}",
                index + 1,
                self.command,
                expected,
                actual.data_type()
            ),
        )
    }
}
