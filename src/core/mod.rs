//! Core data structures for Drydock.
//!
//! This module contains the foundational types consumed by the planner:
//! - Modules and products (the resolved graph)
//! - Build configuration, flags, and tools version
//! - Graph descriptions (`Drydock.toml`)

pub mod configuration;
pub mod graph;
pub mod module;
pub mod product;

pub use configuration::{BuildConfiguration, BuildFlags, Platform, ToolsVersion, Verbosity};
pub use graph::{find_graph, GraphError, ModuleGraph, GRAPH_FILE};
pub use module::{
    CompiledModule, ExternalModule, HeaderOnlyModule, Module, ModuleKind, NativeModule,
};
pub use product::Product;
