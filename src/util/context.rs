//! Global context for Drydock operations.
//!
//! Provides centralized access to paths and output settings.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::graph::{find_graph, GraphError};
use crate::util::config::global_config_dir;

/// Name of the project-local settings directory.
pub const PROJECT_DIR: &str = ".drydock";

/// Default build directory name, relative to the graph root.
pub const DEFAULT_BUILD_DIR: &str = ".build";

/// Global context containing paths and output settings.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Home directory for global Drydock settings (~/.drydock/)
    home: Option<PathBuf>,

    /// Whether to use verbose output
    verbose: bool,

    /// Whether to use colors in output
    color: bool,
}

impl GlobalContext {
    /// Create a new GlobalContext with defaults.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(Self::with_cwd(cwd))
    }

    /// Create a GlobalContext with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Self {
        GlobalContext {
            cwd,
            home: global_config_dir(),
            verbose: false,
            color: true,
        }
    }

    /// Replace the global settings directory.
    pub fn with_home(mut self, home: Option<PathBuf>) -> Self {
        self.home = home;
        self
    }

    /// Set verbose mode.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Set color output.
    pub fn set_color(&mut self, color: bool) {
        self.color = color;
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Get the Drydock home directory (~/.drydock/), if a home exists.
    pub fn home(&self) -> Option<&Path> {
        self.home.as_deref()
    }

    /// Global configuration file (~/.drydock/config.toml).
    pub fn global_config_path(&self) -> Option<PathBuf> {
        self.home.as_ref().map(|h| h.join("config.toml"))
    }

    /// Global toolchain file (~/.drydock/toolchain.toml).
    pub fn global_toolchain_path(&self) -> Option<PathBuf> {
        self.home.as_ref().map(|h| h.join("toolchain.toml"))
    }

    /// Project settings directory under a graph root.
    pub fn project_dir(root: &Path) -> PathBuf {
        root.join(PROJECT_DIR)
    }

    /// Project configuration file (`<root>/.drydock/config.toml`).
    pub fn project_config_path(root: &Path) -> PathBuf {
        Self::project_dir(root).join("config.toml")
    }

    /// Project toolchain file (`<root>/.drydock/toolchain.toml`).
    pub fn project_toolchain_path(root: &Path) -> PathBuf {
        Self::project_dir(root).join("toolchain.toml")
    }

    /// Default build directory under a graph root.
    pub fn default_build_path(root: &Path) -> PathBuf {
        root.join(DEFAULT_BUILD_DIR)
    }

    /// Check if verbose mode is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Check if color output is enabled.
    pub fn color(&self) -> bool {
        self.color
    }

    /// Find the graph file (Drydock.toml) starting from cwd and searching upward.
    pub fn find_graph(&self) -> Result<PathBuf, GraphError> {
        find_graph(&self.cwd)
    }
}
