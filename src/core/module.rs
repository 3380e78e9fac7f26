//! Module definitions - the compilable units of a graph.
//!
//! A module is one of three closed kinds. Every stage that dispatches on
//! module kind matches [`Module`] exhaustively, so a new kind cannot be
//! added without updating each dispatch site.

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::configuration::ToolsVersion;

/// The kind of a module, as written in a graph description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModuleKind {
    /// Built by the high-level language compiler
    Compiled,

    /// Built by the C-family toolchain
    #[serde(alias = "c", alias = "clang")]
    Native,

    /// Headers only, never compiled
    #[serde(alias = "headers")]
    HeaderOnly,
}

impl ModuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleKind::Compiled => "compiled",
            ModuleKind::Native => "native",
            ModuleKind::HeaderOnly => "header-only",
        }
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A module built by the high-level language compiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledModule {
    pub name: String,
    pub is_test: bool,
    /// Supported language-version majors. Empty means unconstrained.
    pub supported_versions: BTreeSet<u64>,
    pub dependencies: Vec<String>,
    /// Source patterns (globs) relative to the graph root
    pub sources: Vec<String>,
}

impl CompiledModule {
    pub fn new(name: impl Into<String>) -> Self {
        CompiledModule {
            name: name.into(),
            is_test: false,
            supported_versions: BTreeSet::new(),
            dependencies: Vec::new(),
            sources: Vec::new(),
        }
    }

    pub fn with_sources(mut self, sources: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.sources.extend(sources.into_iter().map(Into::into));
        self
    }

    pub fn with_dependencies(
        mut self,
        deps: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.dependencies.extend(deps.into_iter().map(Into::into));
        self
    }

    pub fn with_supported_versions(mut self, majors: impl IntoIterator<Item = u64>) -> Self {
        self.supported_versions.extend(majors);
        self
    }

    pub fn as_test(mut self) -> Self {
        self.is_test = true;
        self
    }

    /// Check whether this module can be built with the given tools version.
    pub fn supports(&self, version: &ToolsVersion) -> bool {
        self.supported_versions.is_empty() || self.supported_versions.contains(&version.major())
    }
}

/// A module built by the C-family toolchain. Always ABI-stable, never
/// version-gated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeModule {
    pub name: String,
    pub is_test: bool,
    pub dependencies: Vec<String>,
    pub sources: Vec<String>,
}

impl NativeModule {
    pub fn new(name: impl Into<String>) -> Self {
        NativeModule {
            name: name.into(),
            is_test: false,
            dependencies: Vec::new(),
            sources: Vec::new(),
        }
    }

    pub fn with_sources(mut self, sources: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.sources.extend(sources.into_iter().map(Into::into));
        self
    }

    pub fn with_dependencies(
        mut self,
        deps: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.dependencies.extend(deps.into_iter().map(Into::into));
        self
    }

    pub fn as_test(mut self) -> Self {
        self.is_test = true;
        self
    }
}

/// A module with no compiled artifact. It exists to satisfy dependency edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderOnlyModule {
    pub name: String,
    pub is_test: bool,
    pub dependencies: Vec<String>,
}

impl HeaderOnlyModule {
    pub fn new(name: impl Into<String>) -> Self {
        HeaderOnlyModule {
            name: name.into(),
            is_test: false,
            dependencies: Vec::new(),
        }
    }

    pub fn with_dependencies(
        mut self,
        deps: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.dependencies.extend(deps.into_iter().map(Into::into));
        self
    }
}

/// A module in the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Module {
    Compiled(CompiledModule),
    Native(NativeModule),
    HeaderOnly(HeaderOnlyModule),
}

impl Module {
    pub fn name(&self) -> &str {
        match self {
            Module::Compiled(m) => &m.name,
            Module::Native(m) => &m.name,
            Module::HeaderOnly(m) => &m.name,
        }
    }

    pub fn kind(&self) -> ModuleKind {
        match self {
            Module::Compiled(_) => ModuleKind::Compiled,
            Module::Native(_) => ModuleKind::Native,
            Module::HeaderOnly(_) => ModuleKind::HeaderOnly,
        }
    }

    pub fn is_test(&self) -> bool {
        match self {
            Module::Compiled(m) => m.is_test,
            Module::Native(m) => m.is_test,
            Module::HeaderOnly(m) => m.is_test,
        }
    }

    pub fn is_native(&self) -> bool {
        matches!(self, Module::Native(_))
    }

    pub fn dependencies(&self) -> &[String] {
        match self {
            Module::Compiled(m) => &m.dependencies,
            Module::Native(m) => &m.dependencies,
            Module::HeaderOnly(m) => &m.dependencies,
        }
    }

    /// Source patterns. Header-only modules have none.
    pub fn sources(&self) -> &[String] {
        match self {
            Module::Compiled(m) => &m.sources,
            Module::Native(m) => &m.sources,
            Module::HeaderOnly(_) => &[],
        }
    }
}

impl From<CompiledModule> for Module {
    fn from(m: CompiledModule) -> Self {
        Module::Compiled(m)
    }
}

impl From<NativeModule> for Module {
    fn from(m: NativeModule) -> Self {
        Module::Native(m)
    }
}

impl From<HeaderOnlyModule> for Module {
    fn from(m: HeaderOnlyModule) -> Self {
        Module::HeaderOnly(m)
    }
}

/// Metadata for a library outside the graph that modules depend on
/// (a system library, or a prebuilt shared dependency).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ExternalModule {
    pub name: String,

    /// Header search directories exposed by the library
    #[serde(default)]
    pub include_dirs: Vec<PathBuf>,
}

impl ExternalModule {
    pub fn new(name: impl Into<String>) -> Self {
        ExternalModule {
            name: name.into(),
            include_dirs: Vec::new(),
        }
    }

    pub fn with_include_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.include_dirs.push(dir.into());
        self
    }
}
