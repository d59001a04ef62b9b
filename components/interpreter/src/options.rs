//! Machine configuration

use memory_manager::DEFAULT_LIMIT;
use serde::{Deserialize, Serialize};

/// Default bound on the `PUSH` stack.
pub const DEFAULT_STACK_DEPTH: usize = 256;

/// Options controlling compilation limits and execution mode.
///
/// Deserializes from any serde format; missing fields take their default.
///
/// # Examples
///
/// ```
/// use interpreter::MachineOptions;
///
/// let options = MachineOptions::default().with_dry_run(true).with_max_stack_depth(8);
/// assert!(options.dry_run);
/// assert!(!options.trace);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MachineOptions {
    /// Evaluate tests but skip action handlers
    pub dry_run: bool,
    /// Log every executed `TEST`/`ACTION` with its locus
    pub trace: bool,
    /// Byte limit of the script's memory pool
    pub pool_limit: Option<usize>,
    /// Maximum number of instructions
    pub max_code_size: usize,
    /// Maximum depth of the `PUSH` stack
    pub max_stack_depth: usize,
}

impl Default for MachineOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            trace: false,
            pool_limit: None,
            max_code_size: DEFAULT_LIMIT,
            max_stack_depth: DEFAULT_STACK_DEPTH,
        }
    }
}

impl MachineOptions {
    /// Enable dry-run mode
    pub fn with_dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Enable instruction tracing
    pub fn with_trace(mut self, enabled: bool) -> Self {
        self.trace = enabled;
        self
    }

    /// Limit the script's memory pool
    pub fn with_pool_limit(mut self, limit: Option<usize>) -> Self {
        self.pool_limit = limit;
        self
    }

    /// Limit the number of instructions
    pub fn with_max_code_size(mut self, max: usize) -> Self {
        self.max_code_size = max;
        self
    }

    /// Limit the `PUSH` stack
    pub fn with_max_stack_depth(mut self, depth: usize) -> Self {
        self.max_stack_depth = depth;
        self
    }
}
