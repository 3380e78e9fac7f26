//! Implementation of `drydock plan` and `drydock preview`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::builder::{
    BuildPlan, Manifest, ModuleCommands, PlanContext, Planner, StandardCommandBuilder, Toolchain,
};
use crate::core::configuration::{BuildConfiguration, BuildFlags, Platform, ToolsVersion, Verbosity};
use crate::core::graph::ModuleGraph;
use crate::util::config::{load_config, load_toolchain_config};
use crate::util::context::GlobalContext;
use crate::util::fs::ensure_dir;

/// Options for the plan and preview commands.
#[derive(Debug, Clone, Default)]
pub struct PlanOptions {
    /// Plan the release configuration
    pub release: bool,

    /// Flags appended after the configured ones
    pub flags: BuildFlags,

    /// Active tools version (overrides the toolchain's)
    pub tools_version: Option<ToolsVersion>,

    /// Platform to plan for (overrides config)
    pub platform: Option<Platform>,

    /// Build directory (overrides config)
    pub build_path: Option<PathBuf>,

    /// Pass verbose flags to generated compiler invocations
    pub verbose: bool,

    /// Build native test modules even where the platform skips them
    pub force_native_tests: bool,
}

/// A loaded graph with everything needed to plan it.
#[derive(Debug)]
pub struct PlanSession {
    graph: ModuleGraph,
    context: PlanContext,
    builder: StandardCommandBuilder,
}

impl PlanSession {
    /// Locate and load the graph, config, and toolchain for the current directory.
    pub fn load(gctx: &GlobalContext, opts: &PlanOptions) -> Result<Self> {
        let graph_path = gctx.find_graph()?;
        let graph = ModuleGraph::load(&graph_path)
            .with_context(|| format!("failed to load graph from {}", graph_path.display()))?;
        let root = graph.root().to_path_buf();

        let config = load_config(
            gctx.global_config_path().as_deref(),
            &GlobalContext::project_config_path(&root),
        )
        .context("failed to load drydock configuration")?;
        let toolchain_config = load_toolchain_config(
            gctx.global_toolchain_path().as_deref(),
            &GlobalContext::project_toolchain_path(&root),
        )
        .context("failed to load toolchain configuration")?;
        if toolchain_config.has_overrides() {
            tracing::debug!("using configured toolchain overrides");
        }
        let settings = &toolchain_config.toolchain;

        let mut flags = settings.flags();
        flags.extend(opts.flags.clone());

        let build_path = match (&opts.build_path, &config.build.build_path) {
            (Some(path), _) => absolute(gctx.cwd(), path),
            (None, Some(path)) => absolute(&root, path),
            (None, None) => GlobalContext::default_build_path(&root),
        };

        let configuration = if opts.release {
            BuildConfiguration::Release
        } else {
            BuildConfiguration::Debug
        };

        let mut context = PlanContext::new(Toolchain::from_settings(settings), build_path)
            .with_configuration(configuration)
            .with_flags(flags)
            .with_verbosity(Verbosity::from_flag(opts.verbose));
        if let Some(platform) = opts.platform.or(config.build.platform) {
            context = context.with_platform(platform);
        }
        if let Some(version) = &opts.tools_version {
            context = context.with_tools_version(version.clone());
        }
        if opts.force_native_tests || config.build.force_native_tests {
            context = context.with_native_tests(true);
        }

        tracing::debug!(
            "loaded {} modules and {} products from {}",
            graph.module_count(),
            graph.products().len(),
            graph_path.display()
        );

        Ok(PlanSession {
            builder: StandardCommandBuilder::new(&root),
            graph,
            context,
        })
    }

    pub fn graph(&self) -> &ModuleGraph {
        &self.graph
    }

    pub fn context(&self) -> &PlanContext {
        &self.context
    }

    pub fn planner(&self) -> Planner<'_> {
        Planner::new(&self.graph, &self.context, &self.builder)
    }

    /// Build the plan without writing anything.
    pub fn plan(&self) -> Result<BuildPlan> {
        Ok(self.planner().plan()?)
    }
}

fn absolute(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Plan the graph and write the manifest. Returns the manifest path.
pub fn write_plan(session: &PlanSession) -> Result<PathBuf> {
    let plan = session.plan()?;

    let build_path = session.context().build_path();
    ensure_dir(build_path)?;

    Ok(Manifest::new(&plan).write(build_path)?)
}

/// Plan the graph and return the manifest text.
pub fn render_plan(session: &PlanSession) -> Result<String> {
    let plan = session.plan()?;
    Ok(Manifest::new(&plan).render())
}

/// Commands each non-test module would run. Never fails.
pub fn preview(session: &PlanSession) -> Vec<ModuleCommands> {
    session.planner().preview()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::PlanError;
    use crate::test_support::ProjectFixture;
    use tempfile::TempDir;

    fn gctx(dir: &Path) -> GlobalContext {
        GlobalContext::with_cwd(dir.to_path_buf()).with_home(None)
    }

    #[test]
    fn test_write_plan_creates_build_dir() {
        let tmp = ProjectFixture::core_app().create().unwrap();
        let session = PlanSession::load(&gctx(tmp.path()), &PlanOptions::default()).unwrap();

        let path = write_plan(&session).unwrap();

        assert!(path.ends_with(".build/debug.yaml"));
        assert!(path.is_file());
    }

    #[test]
    fn test_cli_options_override_config() {
        let tmp = ProjectFixture::core_app().create().unwrap();
        std::fs::create_dir_all(tmp.path().join(".drydock")).unwrap();
        std::fs::write(
            tmp.path().join(".drydock/config.toml"),
            "[build]\nbuild-path = \"out\"\nplatform = \"linux\"\n",
        )
        .unwrap();
        std::fs::write(
            tmp.path().join(".drydock/toolchain.toml"),
            "[toolchain]\nversion = \"4\"\nldflags = [\"-lm\"]\n",
        )
        .unwrap();

        let session = PlanSession::load(&gctx(tmp.path()), &PlanOptions::default()).unwrap();
        let ctx = session.context();
        assert_eq!(ctx.build_path(), tmp.path().join("out"));
        assert_eq!(ctx.platform, Platform::Linux);
        assert_eq!(ctx.active_version().major(), 4);

        let opts = PlanOptions {
            release: true,
            platform: Some(Platform::MacOs),
            tools_version: Some(ToolsVersion::new(5, 0, 0)),
            flags: BuildFlags {
                ldflags: vec!["-lz".into()],
                ..BuildFlags::default()
            },
            ..PlanOptions::default()
        };
        let session = PlanSession::load(&gctx(tmp.path()), &opts).unwrap();
        let ctx = session.context();
        assert_eq!(ctx.configuration, BuildConfiguration::Release);
        assert_eq!(ctx.platform, Platform::MacOs);
        assert_eq!(ctx.active_version().major(), 5);
        assert_eq!(ctx.flags.ldflags, vec!["-lm", "-lz"]);
    }

    #[test]
    fn test_failed_plan_writes_nothing() {
        let tmp = ProjectFixture::new(
            r#"
[[module]]
name = "Core"
sources = ["Sources/Core/*.swift"]
supported-versions = [3]
"#,
        )
        .with_file("Sources/Core/Core.swift", "")
        .create()
        .unwrap();
        let opts = PlanOptions {
            tools_version: Some(ToolsVersion::new(4, 0, 0)),
            ..PlanOptions::default()
        };
        let session = PlanSession::load(&gctx(tmp.path()), &opts).unwrap();

        let err = write_plan(&session).unwrap_err();

        assert!(err
            .downcast_ref::<PlanError>()
            .is_some_and(PlanError::is_version_mismatch));
        assert!(!tmp.path().join(".build/debug.yaml").exists());
    }

    #[test]
    fn test_render_matches_written_manifest() {
        let tmp = ProjectFixture::core_app().create().unwrap();
        let session = PlanSession::load(&gctx(tmp.path()), &PlanOptions::default()).unwrap();

        let rendered = render_plan(&session).unwrap();
        let path = write_plan(&session).unwrap();

        assert_eq!(std::fs::read_to_string(path).unwrap(), rendered);
    }

    #[test]
    fn test_malformed_toolchain_config_fails_load() {
        let tmp = ProjectFixture::core_app().create().unwrap();
        std::fs::create_dir_all(tmp.path().join(".drydock")).unwrap();
        std::fs::write(
            tmp.path().join(".drydock/toolchain.toml"),
            "[toolchain]\ncompiler = \"/opt/swift/bin/swiftc\"\nversion = 4\n",
        )
        .unwrap();

        let err = PlanSession::load(&gctx(tmp.path()), &PlanOptions::default()).unwrap_err();

        let message = format!("{:#}", err);
        assert!(message.contains("failed to load toolchain configuration"));
        assert!(message.contains("toolchain.toml"));
    }

    #[test]
    fn test_missing_graph_is_reported() {
        let tmp = TempDir::new().unwrap();
        let err = PlanSession::load(&gctx(tmp.path()), &PlanOptions::default()).unwrap_err();
        assert!(err.to_string().contains("Drydock.toml"));
    }
}
