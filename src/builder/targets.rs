//! Target grouping.
//!
//! Every generated command lands in the `test` target; commands whose
//! producer is not a test module or product also land in `main`.

use std::path::PathBuf;
use std::sync::Arc;

use crate::builder::command::Command;

/// Target containing every non-test command. Also the manifest default.
pub const MAIN_TARGET: &str = "main";

/// Target containing every command.
pub const TEST_TARGET: &str = "test";

/// A named, ordered bag of commands. Duplicates are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    name: &'static str,
    commands: Vec<Arc<Command>>,
}

impl Target {
    fn new(name: &'static str) -> Self {
        Target {
            name,
            commands: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        self.name
    }

    pub fn commands(&self) -> &[Arc<Command>] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Every output of every command, in command order.
    pub fn outputs(&self) -> impl Iterator<Item = &PathBuf> {
        self.commands.iter().flat_map(|c| c.outputs().iter())
    }
}

/// The `main` and `test` targets of a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetGroups {
    main: Target,
    test: Target,
}

impl Default for TargetGroups {
    fn default() -> Self {
        TargetGroups {
            main: Target::new(MAIN_TARGET),
            test: Target::new(TEST_TARGET),
        }
    }
}

impl TargetGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a command to the targets it belongs to.
    pub fn record(&mut self, command: Arc<Command>) {
        if !command.is_test() {
            self.main.commands.push(Arc::clone(&command));
        }
        self.test.commands.push(command);
    }

    pub fn main(&self) -> &Target {
        &self.main
    }

    pub fn test(&self) -> &Target {
        &self.test
    }

    /// Targets in manifest order: `test`, then `main`.
    pub fn iter(&self) -> impl Iterator<Item = &Target> {
        [&self.test, &self.main].into_iter()
    }
}
