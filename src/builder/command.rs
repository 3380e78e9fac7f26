//! Commands - single build actions in the plan.

use std::path::PathBuf;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::core::module::Module;
use crate::core::product::Product;

/// Error from a command-construction operation.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum CommandError {
    #[error("no sources found for module `{module}` (patterns: {})", .patterns.join(", "))]
    #[diagnostic(
        code(drydock::command::no_sources),
        help("check the `sources` globs of `{module}` in Drydock.toml")
    )]
    NoSources {
        module: String,
        patterns: Vec<String>,
    },

    #[error("invalid source pattern `{pattern}` in module `{module}`")]
    #[diagnostic(code(drydock::command::invalid_pattern))]
    InvalidPattern {
        module: String,
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("product `{product}` has no modules to link")]
    #[diagnostic(code(drydock::command::empty_product))]
    EmptyProduct { product: String },

    #[error("module `{module}` produced {count} compile commands, expected exactly one")]
    #[diagnostic(code(drydock::command::unexpected_command_count))]
    UnexpectedCommandCount { module: String, count: usize },

    #[error("command `{command}` declares no outputs")]
    #[diagnostic(code(drydock::command::no_outputs))]
    NoOutputs { command: String },
}

/// The executable, arguments, and declared files of one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSpec {
    /// The program to run
    pub program: PathBuf,
    /// Command arguments, excluding the program
    pub args: Vec<String>,
    /// Files read by the command
    pub inputs: Vec<PathBuf>,
    /// Files produced by the command
    pub outputs: Vec<PathBuf>,
    /// Human-readable summary shown by the executor
    pub description: String,
}

impl ToolSpec {
    /// Create a new tool spec.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        ToolSpec {
            program: program.into(),
            args: Vec::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            description: String::new(),
        }
    }

    /// Add an argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments.
    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(|a| a.into()));
        self
    }

    pub fn input(mut self, path: impl Into<PathBuf>) -> Self {
        self.inputs.push(path.into());
        self
    }

    pub fn inputs(mut self, paths: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        self.inputs.extend(paths.into_iter().map(Into::into));
        self
    }

    pub fn output(mut self, path: impl Into<PathBuf>) -> Self {
        self.outputs.push(path.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Full command line: program followed by arguments.
    pub fn command_line(&self) -> Vec<String> {
        let mut line = Vec::with_capacity(self.args.len() + 1);
        line.push(self.program.display().to_string());
        line.extend(self.args.iter().cloned());
        line
    }
}

/// The entity a command was generated for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Producer {
    Module { name: String, is_test: bool },
    Product { name: String, is_test: bool },
}

impl Producer {
    pub fn module(module: &Module) -> Self {
        Producer::Module {
            name: module.name().to_string(),
            is_test: module.is_test(),
        }
    }

    pub fn product(product: &Product) -> Self {
        Producer::Product {
            name: product.name().to_string(),
            is_test: product.is_test(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Producer::Module { name, .. } | Producer::Product { name, .. } => name,
        }
    }

    pub fn is_test(&self) -> bool {
        match self {
            Producer::Module { is_test, .. } | Producer::Product { is_test, .. } => *is_test,
        }
    }
}

/// One build action. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    name: String,
    tool: ToolSpec,
    producer: Producer,
}

impl Command {
    pub fn new(name: impl Into<String>, tool: ToolSpec, producer: Producer) -> Self {
        Command {
            name: name.into(),
            tool,
            producer,
        }
    }

    /// Unique name of the command within a plan.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tool(&self) -> &ToolSpec {
        &self.tool
    }

    pub fn producer(&self) -> &Producer {
        &self.producer
    }

    pub fn outputs(&self) -> &[PathBuf] {
        &self.tool.outputs
    }

    pub fn is_test(&self) -> bool {
        self.producer.is_test()
    }
}
