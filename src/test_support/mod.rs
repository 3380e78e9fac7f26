//! Test utilities and mocks for Drydock unit tests.
//!
//! The planner only talks to the outside world through [`CommandBuilder`],
//! so most planning tests swap in [`MockCommandBuilder`]: it needs no files
//! on disk and records every call it receives.
//!
//! # Example
//!
//! ```rust,ignore
//! use drydock::test_support::{context, MockCommandBuilder};
//!
//! #[test]
//! fn test_example() {
//!     let builder = MockCommandBuilder::new().failing(["Broken"]);
//!     let plan = Planner::new(&graph, &context(), &builder).plan();
//!     assert!(builder.calls().contains(&"compile Broken".to_string()));
//! }
//! ```

pub mod fixtures;

use std::collections::HashSet;
use std::sync::Mutex;

use crate::builder::command::{Command, CommandError, Producer, ToolSpec};
use crate::builder::construct::{CommandBuilder, CompileRequest, LinkRequest};
use crate::core::module::Module;

// Re-export fixtures for convenience
pub use fixtures::*;

/// Mock command builder producing one command per module by default.
///
/// Compiled and native modules yield `<name>.compile` with a single
/// `<destination>/<name>.o` output. Products yield `<name>.link`.
#[derive(Debug, Default)]
pub struct MockCommandBuilder {
    failing: HashSet<String>,
    without_outputs: bool,
    /// Compile commands per module; one when unset
    command_count: Option<usize>,
    calls: Mutex<Vec<String>>,
}

impl MockCommandBuilder {
    /// Create a builder that succeeds for everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail with `NoSources` for the named modules.
    pub fn failing(mut self, modules: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.failing.extend(modules.into_iter().map(Into::into));
        self
    }

    /// Produce compile commands that declare no outputs.
    pub fn without_outputs(mut self) -> Self {
        self.without_outputs = true;
        self
    }

    /// Produce `count` compile commands per module instead of one.
    pub fn with_command_count(mut self, count: usize) -> Self {
        self.command_count = Some(count);
        self
    }

    /// Calls received so far, as `compile <module>` or `link <product>`.
    ///
    /// Generation is parallel, so order across entities is unspecified.
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    fn record(&self, call: String) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

impl CommandBuilder for MockCommandBuilder {
    fn compile_commands(&self, request: &CompileRequest<'_>) -> Result<Vec<Command>, CommandError> {
        let module = request.module;
        self.record(format!("compile {}", module.name()));

        if self.failing.contains(module.name()) {
            return Err(CommandError::NoSources {
                module: module.name().to_string(),
                patterns: module.sources().to_vec(),
            });
        }
        if let Module::HeaderOnly(_) = module {
            return Ok(Vec::new());
        }

        let count = self.command_count.unwrap_or(1);
        let commands = (0..count)
            .map(|i| {
                let stem = if count == 1 {
                    module.name().to_string()
                } else {
                    format!("{}.{}", module.name(), i)
                };
                let mut tool = ToolSpec::new(request.compiler)
                    .args(request.args.iter().cloned())
                    .description(format!("Compiling {}", stem));
                if !self.without_outputs {
                    tool = tool.output(request.destination.join(format!("{}.o", stem)));
                }
                Command::new(format!("{}.compile", stem), tool, Producer::module(module))
            })
            .collect();

        Ok(commands)
    }

    fn link_command(&self, request: &LinkRequest<'_>) -> Result<Command, CommandError> {
        let product = request.product;
        self.record(format!("link {}", product.name()));

        let tool = ToolSpec::new(request.linker)
            .args(request.args.iter().cloned())
            .inputs(
                product
                    .modules()
                    .iter()
                    .map(|m| request.destination.join(format!("{}.o", m.name()))),
            )
            .output(request.destination.join(product.name()))
            .description(format!("Linking {}", product.name()));

        Ok(Command::new(
            format!("{}.link", product.name()),
            tool,
            Producer::product(product),
        ))
    }
}
