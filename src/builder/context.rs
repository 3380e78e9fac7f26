//! Plan context - toolchain, configuration, and per-run settings.

use std::path::{Path, PathBuf};

use crate::builder::manifest::Manifest;
use crate::builder::toolchain::Toolchain;
use crate::core::configuration::{BuildConfiguration, BuildFlags, Platform, ToolsVersion, Verbosity};

/// Everything the planner needs besides the graph itself.
#[derive(Debug, Clone)]
pub struct PlanContext {
    /// Resolved toolchain
    pub toolchain: Toolchain,

    /// Build configuration
    pub configuration: BuildConfiguration,

    /// User-supplied flags
    pub flags: BuildFlags,

    /// Active tools version; the toolchain's own version when unset
    pub tools_version: Option<ToolsVersion>,

    /// Platform the plan targets
    pub platform: Platform,

    /// Verbosity of generated compiler invocations
    pub verbosity: Verbosity,

    /// Skip native test modules
    pub skip_native_tests: bool,

    /// Prefix directory for the manifest and all outputs
    pub build_path: PathBuf,
}

impl PlanContext {
    /// Create a context for the host platform with default settings.
    pub fn new(toolchain: Toolchain, build_path: impl Into<PathBuf>) -> Self {
        let platform = Platform::host();
        PlanContext {
            toolchain,
            configuration: BuildConfiguration::default(),
            flags: BuildFlags::default(),
            tools_version: None,
            platform,
            verbosity: Verbosity::default(),
            skip_native_tests: !platform.supports_native_tests(),
            build_path: build_path.into(),
        }
    }

    pub fn with_configuration(mut self, configuration: BuildConfiguration) -> Self {
        self.configuration = configuration;
        self
    }

    pub fn with_flags(mut self, flags: BuildFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_tools_version(mut self, version: ToolsVersion) -> Self {
        self.tools_version = Some(version);
        self
    }

    /// Target a platform. Resets the native-test policy to that platform's default.
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self.skip_native_tests = !platform.supports_native_tests();
        self
    }

    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn with_native_tests(mut self, enabled: bool) -> Self {
        self.skip_native_tests = !enabled;
        self
    }

    /// The tools version modules are gated against.
    pub fn active_version(&self) -> &ToolsVersion {
        self.tools_version.as_ref().unwrap_or(&self.toolchain.version)
    }

    pub fn build_path(&self) -> &Path {
        &self.build_path
    }

    /// Directory outputs for this configuration are placed under.
    pub fn destination(&self) -> PathBuf {
        self.build_path.join(self.configuration.dirname())
    }

    /// `<build-path>/<configuration>.yaml`
    pub fn manifest_path(&self) -> PathBuf {
        Manifest::path(&self.build_path, self.configuration)
    }
}
