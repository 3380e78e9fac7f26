//! Per-run build settings: configuration, flags, tools version, platform.
//!
//! These values are constructed once per planning run and read by every
//! stage of the pipeline. None of them carry process-wide state.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Build configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildConfiguration {
    #[default]
    Debug,
    Release,
}

impl BuildConfiguration {
    /// Directory name used to namespace outputs and the manifest path.
    pub fn dirname(&self) -> &'static str {
        match self {
            BuildConfiguration::Debug => "debug",
            BuildConfiguration::Release => "release",
        }
    }
}

impl fmt::Display for BuildConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dirname())
    }
}

/// User-supplied flags, kept in the order they were given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BuildFlags {
    /// Flags for the C-family compiler
    pub cflags: Vec<String>,

    /// Flags for the high-level language compiler
    pub compiler_flags: Vec<String>,

    /// Flags for the linker
    pub ldflags: Vec<String>,
}

impl BuildFlags {
    /// Append flags from `other` after the existing ones.
    pub fn extend(&mut self, other: BuildFlags) {
        self.cflags.extend(other.cflags);
        self.compiler_flags.extend(other.compiler_flags);
        self.ldflags.extend(other.ldflags);
    }
}

/// Error parsing a tools version string.
#[derive(Debug, Error)]
#[error("invalid tools version `{input}`: {source}")]
pub struct ParseToolsVersionError {
    pub input: String,
    #[source]
    pub source: semver::Error,
}

/// The active language/toolchain version.
///
/// Only the major component takes part in module compatibility checks.
/// Accepts partial versions (`4`, `4.2`) as well as full semver strings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ToolsVersion(semver::Version);

impl ToolsVersion {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        ToolsVersion(semver::Version::new(major, minor, patch))
    }

    pub fn major(&self) -> u64 {
        self.0.major
    }

    pub fn version(&self) -> &semver::Version {
        &self.0
    }
}

impl Default for ToolsVersion {
    fn default() -> Self {
        ToolsVersion::new(5, 0, 0)
    }
}

impl fmt::Display for ToolsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ToolsVersion {
    type Err = ParseToolsVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let padded = match trimmed.matches('.').count() {
            0 => format!("{}.0.0", trimmed),
            1 => format!("{}.0", trimmed),
            _ => trimmed.to_string(),
        };

        semver::Version::parse(&padded)
            .map(ToolsVersion)
            .map_err(|source| ParseToolsVersionError {
                input: s.to_string(),
                source,
            })
    }
}

impl TryFrom<String> for ToolsVersion {
    type Error = ParseToolsVersionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ToolsVersion> for String {
    fn from(value: ToolsVersion) -> Self {
        value.to_string()
    }
}

/// Target platform the plan is generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Linux,
    #[serde(alias = "darwin")]
    MacOs,
    Windows,
}

impl Platform {
    /// The platform this binary was compiled for.
    pub fn host() -> Self {
        if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else {
            Platform::Linux
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Linux => "linux",
            Platform::MacOs => "macos",
            Platform::Windows => "windows",
        }
    }

    /// Whether native (C-family) test modules can be built on this platform.
    pub fn supports_native_tests(&self) -> bool {
        !matches!(self, Platform::MacOs)
    }
}

impl Default for Platform {
    fn default() -> Self {
        Platform::host()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "linux" => Ok(Platform::Linux),
            "macos" | "darwin" => Ok(Platform::MacOs),
            "windows" => Ok(Platform::Windows),
            other => Err(format!(
                "unknown platform `{}` (expected linux, macos, or windows)",
                other
            )),
        }
    }
}

/// How chatty the generated compiler invocations are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    #[default]
    Normal,
    Verbose,
}

impl Verbosity {
    pub fn from_flag(verbose: bool) -> Self {
        if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }

    /// Arguments appended to high-level compile and link invocations.
    pub fn compiler_args(&self) -> &'static [&'static str] {
        match self {
            Verbosity::Normal => &[],
            Verbosity::Verbose => &["-v"],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_dirname() {
        assert_eq!(BuildConfiguration::Debug.dirname(), "debug");
        assert_eq!(BuildConfiguration::Release.dirname(), "release");
        assert_eq!(BuildConfiguration::default().to_string(), "debug");
    }

    #[test]
    fn test_tools_version_partial_forms() {
        let v: ToolsVersion = "4".parse().unwrap();
        assert_eq!(v, ToolsVersion::new(4, 0, 0));

        let v: ToolsVersion = "4.2".parse().unwrap();
        assert_eq!(v, ToolsVersion::new(4, 2, 0));

        let v: ToolsVersion = "5.9.1".parse().unwrap();
        assert_eq!(v.major(), 5);
        assert_eq!(v.to_string(), "5.9.1");
    }

    #[test]
    fn test_tools_version_rejects_garbage() {
        let err = "four".parse::<ToolsVersion>().unwrap_err();
        assert!(err.to_string().contains("four"));
    }

    #[test]
    fn test_platform_parse() {
        assert_eq!("darwin".parse::<Platform>().unwrap(), Platform::MacOs);
        assert_eq!("Linux".parse::<Platform>().unwrap(), Platform::Linux);
        assert!(!Platform::MacOs.supports_native_tests());
        assert!(Platform::Linux.supports_native_tests());
    }

    #[test]
    fn test_verbosity_args() {
        assert!(Verbosity::Normal.compiler_args().is_empty());
        assert_eq!(Verbosity::from_flag(true).compiler_args(), &["-v"]);
    }

    #[test]
    fn test_build_flags_extend_keeps_order() {
        let mut flags = BuildFlags {
            cflags: vec!["-DA".into()],
            ..Default::default()
        };
        flags.extend(BuildFlags {
            cflags: vec!["-DB".into()],
            ldflags: vec!["-lm".into()],
            ..Default::default()
        });
        assert_eq!(flags.cflags, vec!["-DA", "-DB"]);
        assert_eq!(flags.ldflags, vec!["-lm"]);
    }
}
