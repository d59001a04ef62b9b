//! Built-in filter commands
//!
//! This crate provides the standard tests and actions:
//! - Tests: `address`, `envelope`, `header`, `size`, `exists`, `true`, `false`
//! - Actions: `keep`, `discard`, `fileinto`, `reject`, `redirect`, `stop`
//! - Comparators: `i;octet`, `i;ascii-casemap`, `i;ascii-numeric` with
//!   `:is`, `:contains`, `:matches` and `:regex`
//!
//! # Example
//!
//! ```
//! let registry = builtins::builtin_registry().unwrap();
//!
//! assert!(registry.test("header").is_some());
//! assert!(registry.action("fileinto").is_some());
//! assert!(registry.test("fileinto").is_none());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod actions;
pub mod address;
pub mod comparator;

// Re-export main types for convenience
pub use address::{parse_address_list, Address, AddressPart};
pub use comparator::{any_match, compare, glob_to_regex, Patterns};

use core_types::{Registry, SieveResult};

/// Registers every built-in test and action.
pub fn register_builtins(registry: &mut Registry) -> SieveResult<()> {
    sieve_tests::register(registry)?;
    actions::register(registry)?;
    Ok(())
}

/// A registry holding only the built-in commands.
pub fn builtin_registry() -> SieveResult<Registry> {
    let mut registry = Registry::new();
    register_builtins(&mut registry)?;
    Ok(registry)
}
