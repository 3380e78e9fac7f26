//! Test fixtures for common test scenarios.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tempfile::TempDir;

use crate::builder::context::PlanContext;
use crate::builder::toolchain::Toolchain;
use crate::core::configuration::{Platform, ToolsVersion};

/// Plan context for Linux with the default toolchain and `/p/.build`.
pub fn context() -> PlanContext {
    PlanContext::new(toolchain(), "/p/.build").with_platform(Platform::Linux)
}

/// Toolchain with the default executables and tools version 5.
pub fn toolchain() -> Toolchain {
    Toolchain::new("swiftc", "clang", ToolsVersion::new(5, 0, 0))
}

/// A project on disk: a graph description plus source files.
#[derive(Debug, Clone)]
pub struct ProjectFixture {
    /// Drydock.toml content.
    pub graph: String,
    /// Files (path relative to project root -> content).
    pub files: BTreeMap<PathBuf, String>,
}

impl ProjectFixture {
    pub fn new(graph: impl Into<String>) -> Self {
        ProjectFixture {
            graph: graph.into(),
            files: BTreeMap::new(),
        }
    }

    /// A compiled module `Core` linked into the product `app`.
    pub fn core_app() -> Self {
        ProjectFixture::new(
            r#"[[module]]
name = "Core"
sources = ["Sources/Core/*.swift"]

[[product]]
name = "app"
modules = ["Core"]
"#,
        )
        .with_file("Sources/Core/Core.swift", "public func core() {}\n")
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files.insert(path.into(), content.into());
        self
    }

    /// Write the project into `root`.
    pub fn write_to(&self, root: &Path) -> Result<()> {
        std::fs::write(root.join("Drydock.toml"), &self.graph)?;
        for (path, content) in &self.files {
            let full = root.join(path);
            if let Some(parent) = full.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(full, content)?;
        }
        Ok(())
    }

    /// Write the project into a fresh temporary directory.
    pub fn create(&self) -> Result<TempDir> {
        let tmp = TempDir::new()?;
        self.write_to(tmp.path())?;
        Ok(tmp)
    }
}
