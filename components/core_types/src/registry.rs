//! Table of known tests and actions.

use std::collections::HashMap;
use std::sync::Arc;

use crate::command::{CommandDef, CommandKind, Handler, TagGroup};
use crate::error::{SieveError, SieveResult};
use crate::value::DataType;

/// Registered tests and actions, keyed by lower-cased name.
///
/// Tests and actions live in separate namespaces, so a test and an action
/// may share a name.
#[derive(Debug, Default, Clone)]
pub struct Registry {
    tests: HashMap<String, Arc<CommandDef>>,
    actions: HashMap<String, Arc<CommandDef>>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a command definition.
    ///
    /// Registering the same name twice for one kind is an error.
    pub fn register(&mut self, def: CommandDef) -> SieveResult<()> {
        let name = def.name.to_ascii_lowercase();
        let table = self.table_mut(def.kind);
        if table.contains_key(&name) {
            return Err(SieveError::Registry(format!(
                "{} `{}` is already registered",
                def.kind, name
            )));
        }
        tracing::debug!(kind = %def.kind, name = %name, "registered command.");
        table.insert(name, Arc::new(def));
        Ok(())
    }

    /// Registers a test.
    pub fn register_test(
        &mut self,
        name: &str,
        handler: impl Handler + 'static,
        required: Vec<DataType>,
        optional: Vec<DataType>,
        tag_groups: Vec<TagGroup>,
    ) -> SieveResult<()> {
        self.register(CommandDef {
            name: name.to_string(),
            kind: CommandKind::Test,
            handler: Arc::new(handler),
            required,
            optional,
            tag_groups,
        })
    }

    /// Registers an action.
    pub fn register_action(
        &mut self,
        name: &str,
        handler: impl Handler + 'static,
        required: Vec<DataType>,
        optional: Vec<DataType>,
        tag_groups: Vec<TagGroup>,
    ) -> SieveResult<()> {
        self.register(CommandDef {
            name: name.to_string(),
            kind: CommandKind::Action,
            handler: Arc::new(handler),
            required,
            optional,
            tag_groups,
        })
    }

    /// Looks up a command; names are case-insensitive.
    pub fn lookup(&self, kind: CommandKind, name: &str) -> Option<Arc<CommandDef>> {
        let table = match kind {
            CommandKind::Test => &self.tests,
            CommandKind::Action => &self.actions,
        };
        table.get(&name.to_ascii_lowercase()).cloned()
    }

    /// Looks up a test.
    pub fn test(&self, name: &str) -> Option<Arc<CommandDef>> {
        self.lookup(CommandKind::Test, name)
    }

    /// Looks up an action.
    pub fn action(&self, name: &str) -> Option<Arc<CommandDef>> {
        self.lookup(CommandKind::Action, name)
    }

    /// Number of registered commands of both kinds.
    pub fn len(&self) -> usize {
        self.tests.len() + self.actions.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn table_mut(&mut self, kind: CommandKind) -> &mut HashMap<String, Arc<CommandDef>> {
        match kind {
            CommandKind::Test => &mut self.tests,
            CommandKind::Action => &mut self.actions,
        }
    }
}
