//! Build planning.
//!
//! This module turns a module graph into a command graph, groups the
//! commands into targets, and serializes the result as a manifest for the
//! external executor.

pub mod command;
pub mod construct;
pub mod context;
pub mod errors;
pub mod generator;
pub mod manifest;
pub mod plan;
pub mod targets;
pub mod toolchain;
pub mod validate;

pub use command::{Command, CommandError, Producer, ToolSpec};
pub use construct::{CommandBuilder, CompileRequest, LinkRequest, StandardCommandBuilder};
pub use context::PlanContext;
pub use errors::PlanError;
pub use generator::CommandGenerator;
pub use manifest::Manifest;
pub use plan::{BuildPlan, FailurePolicy, ModuleCommands, Planner};
pub use targets::{Target, TargetGroups, MAIN_TARGET, TEST_TARGET};
pub use toolchain::Toolchain;
