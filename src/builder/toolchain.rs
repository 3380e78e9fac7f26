//! Resolved toolchain description.
//!
//! Drydock does not discover compilers. A [`Toolchain`] arrives fully
//! resolved (from `toolchain.toml` or the caller) and is treated as an
//! opaque set of executables plus the platform arguments each one requires.

use std::path::{Path, PathBuf};

use crate::core::configuration::ToolsVersion;
use crate::util::config::ToolchainSettings;

/// Default high-level compiler executable.
pub const DEFAULT_COMPILER: &str = "swiftc";

/// Default C-family compiler executable.
pub const DEFAULT_NATIVE_COMPILER: &str = "clang";

/// Compiler and linker executables with their mandatory platform arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    /// High-level compiler, also the driver for mixed links
    pub compiler: PathBuf,
    /// Arguments the high-level compiler always needs on this platform
    pub compiler_args: Vec<String>,
    /// C-family compiler, also the driver for native-only links
    pub native_compiler: PathBuf,
    /// Arguments the C-family compiler always needs on this platform
    pub native_args: Vec<String>,
    /// Language version the toolchain implements
    pub version: ToolsVersion,
}

impl Toolchain {
    pub fn new(
        compiler: impl Into<PathBuf>,
        native_compiler: impl Into<PathBuf>,
        version: ToolsVersion,
    ) -> Self {
        Toolchain {
            compiler: compiler.into(),
            compiler_args: Vec::new(),
            native_compiler: native_compiler.into(),
            native_args: Vec::new(),
            version,
        }
    }

    pub fn with_compiler_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.compiler_args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn with_native_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.native_args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Build a toolchain from configuration, falling back to defaults for
    /// anything left unset.
    pub fn from_settings(settings: &ToolchainSettings) -> Self {
        Toolchain {
            compiler: settings
                .compiler
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_COMPILER)),
            compiler_args: settings.compiler_args.clone(),
            native_compiler: settings
                .native_compiler
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_NATIVE_COMPILER)),
            native_args: settings.native_args.clone(),
            version: settings.version.clone().unwrap_or_default(),
        }
    }

    pub fn compiler_path(&self) -> &Path {
        &self.compiler
    }

    pub fn native_compiler_path(&self) -> &Path {
        &self.native_compiler
    }
}

impl Default for Toolchain {
    fn default() -> Self {
        Toolchain::new(
            DEFAULT_COMPILER,
            DEFAULT_NATIVE_COMPILER,
            ToolsVersion::default(),
        )
    }
}
