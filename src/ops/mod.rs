//! High-level operations.
//!
//! This module contains the implementation of Drydock commands.

pub mod drydock_plan;

pub use drydock_plan::{preview, render_plan, write_plan, PlanOptions, PlanSession};
