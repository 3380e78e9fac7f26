//! Drydock - a build-plan compiler
//!
//! This crate turns a module graph into a command graph, groups the commands
//! into `main` and `test` targets, and writes a manifest consumed by an
//! external incremental build executor.

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

/// Test utilities and mocks for Drydock unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides a mock command builder and plan fixtures.
#[cfg(test)]
pub mod test_support;

pub use builder::{BuildPlan, Manifest, PlanContext, PlanError, Planner, Toolchain};
pub use crate::core::{Module, ModuleGraph, Product};
pub use util::context::GlobalContext;
