//! Command implementations

pub mod plan;
pub mod preview;
