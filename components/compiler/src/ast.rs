//! Script syntax tree
//!
//! This is the boundary with the external parser: it hands the compiler a
//! [`Script`] whose commands still carry their raw, unbound arguments.

use core_types::{Locus, Value};

/// A parsed script.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Script {
    /// Top-level statements
    pub nodes: Vec<Node>,
}

impl Script {
    /// Create a script from its statements
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }
}

/// A statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Action command
    Command(Command),
    /// `if` / `elsif` / `else`
    If {
        /// Conditions with their blocks, in `if`, `elsif`... order
        branches: Vec<(TestExpr, Vec<Node>)>,
        /// `else` block
        otherwise: Option<Vec<Node>>,
    },
}

impl Node {
    /// `if <test> { <block> }`
    pub fn if_then(test: TestExpr, block: Vec<Node>) -> Self {
        Node::If {
            branches: vec![(test, block)],
            otherwise: None,
        }
    }

    /// `if <test> { <then> } else { <otherwise> }`
    pub fn if_else(test: TestExpr, then: Vec<Node>, otherwise: Vec<Node>) -> Self {
        Node::If {
            branches: vec![(test, then)],
            otherwise: Some(otherwise),
        }
    }
}

impl From<Command> for Node {
    fn from(command: Command) -> Self {
        Node::Command(command)
    }
}

/// A test expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestExpr {
    /// Test command
    Test(Command),
    /// `not <test>`
    Not(Box<TestExpr>),
    /// `anyof (<test>, ...)`
    AnyOf {
        /// Operands
        tests: Vec<TestExpr>,
        /// Source location
        locus: Locus,
    },
    /// `allof (<test>, ...)`
    AllOf {
        /// Operands
        tests: Vec<TestExpr>,
        /// Source location
        locus: Locus,
    },
}

impl TestExpr {
    /// Negate a test
    #[allow(clippy::should_implement_trait)]
    pub fn not(test: TestExpr) -> Self {
        TestExpr::Not(Box::new(test))
    }
}

impl From<Command> for TestExpr {
    fn from(command: Command) -> Self {
        TestExpr::Test(command)
    }
}

/// One test or action invocation with raw arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Command name
    pub name: String,
    /// Arguments as written; tags are [`Value::Tag`]
    pub arguments: Vec<Value>,
    /// Source location
    pub locus: Locus,
}

impl Command {
    /// Create a command without arguments
    pub fn new(name: impl Into<String>, locus: Locus) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
            locus,
        }
    }

    /// Append a tag argument
    pub fn tag(mut self, name: impl Into<String>) -> Self {
        self.arguments.push(Value::Tag(name.into()));
        self
    }

    /// Append a non-tag argument
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.arguments.push(value.into());
        self
    }
}
