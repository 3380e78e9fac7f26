//! Configuration file support for Drydock.
//!
//! Drydock supports two configuration file locations:
//! - Global: `~/.drydock/config.toml` - User-wide defaults
//! - Project: `.drydock/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config.
//!
//! Toolchain overrides are stored separately:
//! - Global: `~/.drydock/toolchain.toml`
//! - Project: `.drydock/toolchain.toml`

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::configuration::{BuildFlags, Platform, ToolsVersion};

/// Drydock configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Planning settings
    pub build: BuildConfig,
}

/// Planning-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BuildConfig {
    /// Directory the manifest and outputs are placed under
    pub build_path: Option<PathBuf>,

    /// Platform to plan for (defaults to the host)
    pub platform: Option<Platform>,

    /// Build native test modules even where the platform lacks support
    #[serde(default)]
    pub force_native_tests: bool,
}

/// Toolchain configuration for compiler overrides.
///
/// This is stored in a separate file (`toolchain.toml`) from the main config
/// to allow easy toolchain switching without modifying other settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainConfig {
    /// Toolchain settings
    pub toolchain: ToolchainSettings,
}

/// Toolchain settings: executables, platform arguments, and user flags.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ToolchainSettings {
    /// Path to the high-level compiler (e.g., /usr/bin/swiftc)
    pub compiler: Option<PathBuf>,

    /// Platform arguments the high-level compiler always receives
    pub compiler_args: Vec<String>,

    /// Path to the C-family compiler (e.g., /usr/bin/clang)
    pub native_compiler: Option<PathBuf>,

    /// Platform arguments the C-family compiler always receives
    pub native_args: Vec<String>,

    /// Language version implemented by the toolchain
    pub version: Option<ToolsVersion>,

    /// Additional C compiler flags
    pub cflags: Vec<String>,

    /// Additional high-level compiler flags
    pub compiler_flags: Vec<String>,

    /// Additional linker flags
    pub ldflags: Vec<String>,
}

impl ToolchainSettings {
    /// User flags configured for this toolchain.
    pub fn flags(&self) -> BuildFlags {
        BuildFlags {
            cflags: self.cflags.clone(),
            compiler_flags: self.compiler_flags.clone(),
            ldflags: self.ldflags.clone(),
        }
    }
}

impl ToolchainConfig {
    /// Load toolchain configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read toolchain config: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse toolchain config: {}", path.display()))
    }

    /// Load toolchain configuration, or defaults if the file doesn't exist.
    ///
    /// A file that exists but cannot be read or parsed is an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Check if any toolchain settings are configured.
    pub fn has_overrides(&self) -> bool {
        let t = &self.toolchain;
        t.compiler.is_some()
            || t.native_compiler.is_some()
            || t.version.is_some()
            || !t.compiler_args.is_empty()
            || !t.native_args.is_empty()
            || !t.cflags.is_empty()
            || !t.compiler_flags.is_empty()
            || !t.ldflags.is_empty()
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: ToolchainConfig) {
        let ours = &mut self.toolchain;
        let theirs = other.toolchain;

        if theirs.compiler.is_some() {
            ours.compiler = theirs.compiler;
        }
        if theirs.native_compiler.is_some() {
            ours.native_compiler = theirs.native_compiler;
        }
        if theirs.version.is_some() {
            ours.version = theirs.version;
        }
        if !theirs.compiler_args.is_empty() {
            ours.compiler_args = theirs.compiler_args;
        }
        if !theirs.native_args.is_empty() {
            ours.native_args = theirs.native_args;
        }
        if !theirs.cflags.is_empty() {
            ours.cflags = theirs.cflags;
        }
        if !theirs.compiler_flags.is_empty() {
            ours.compiler_flags = theirs.compiler_flags;
        }
        if !theirs.ldflags.is_empty() {
            ours.ldflags = theirs.ldflags;
        }
    }
}

/// Load merged toolchain configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.drydock/toolchain.toml)
/// 2. Global config (~/.drydock/toolchain.toml)
/// 3. Defaults
pub fn load_toolchain_config(
    global_path: Option<&Path>,
    project_path: &Path,
) -> Result<ToolchainConfig> {
    let mut config = ToolchainConfig::default();

    if let Some(global_path) = global_path {
        config.merge(ToolchainConfig::load_or_default(global_path)?);
    }

    // Project config overrides global
    config.merge(ToolchainConfig::load_or_default(project_path)?);

    Ok(config)
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration, or defaults if the file doesn't exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.build.build_path.is_some() {
            self.build.build_path = other.build.build_path;
        }
        if other.build.platform.is_some() {
            self.build.platform = other.build.platform;
        }
        if other.build.force_native_tests {
            self.build.force_native_tests = true;
        }
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.drydock/config.toml)
/// 2. Global config (~/.drydock/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Result<Config> {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path)?);
    }

    config.merge(Config::load_or_default(project_path)?);

    Ok(config)
}

/// Get the global drydock config directory (~/.drydock).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".drydock"))
}
