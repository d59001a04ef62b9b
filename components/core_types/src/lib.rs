//! Core filter types and error handling.
//!
//! This crate provides the types shared by the compiler, the built-in
//! command library and the virtual machine.
//!
//! # Overview
//!
//! - [`Value`] / [`Argument`] - Typed literal values and bound arguments
//! - [`SieveError`] / [`Diagnostic`] - Compile and runtime errors
//! - [`Locus`] - Source location
//! - [`Message`] / [`Mailbox`] - Message store capabilities
//! - [`Comparator`] - Collation and match type of a test
//! - [`Registry`] / [`CommandDef`] - Known tests and actions
//!
//! # Examples
//!
//! ```
//! use core_types::{DataType, Value};
//!
//! let list = Value::from("ping").coerce(DataType::StringList).unwrap();
//! assert_eq!(list.as_string_list().unwrap(), &["ping".to_string()]);
//! assert_eq!(list.to_string(), "[\"ping\"]");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod command;
mod comparator;
mod error;
mod locus;
mod message;
mod registry;
mod value;

pub use command::{
    ActionRecord, CheckContext, CheckError, Checker, CommandDef, CommandKind, Handler, Invocation,
    TagDef, TagGroup,
};
pub use comparator::{Collation, Comparator, MatchType};
pub use error::{Diagnostic, SieveError, SieveResult};
pub use locus::Locus;
pub use message::{Mailbox, MemoryMailbox, MemoryMessage, Message};
pub use registry::Registry;
pub use value::{Argument, DataType, Value};
