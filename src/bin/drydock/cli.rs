//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use drydock::core::{BuildFlags, Platform, ToolsVersion};
use drydock::ops::PlanOptions;

/// Drydock - compile a module graph into a build manifest
#[derive(Parser)]
#[command(name = "drydock")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output (also passed to generated compiler invocations)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Plan the graph and write the build manifest
    Plan(PlanArgs),

    /// Show the commands each module would run, without writing anything
    Preview(PreviewArgs),
}

/// Options shared by every command that plans the graph.
#[derive(Args)]
pub struct GraphArgs {
    /// Plan the release configuration
    #[arg(short, long)]
    pub release: bool,

    /// Pass a flag to the C-family compiler
    #[arg(long = "Xcc", value_name = "FLAG", allow_hyphen_values = true)]
    pub xcc: Vec<String>,

    /// Pass a flag to the high-level compiler
    #[arg(long = "Xcompiler", value_name = "FLAG", allow_hyphen_values = true)]
    pub xcompiler: Vec<String>,

    /// Pass a flag to the linker
    #[arg(long = "Xlinker", value_name = "FLAG", allow_hyphen_values = true)]
    pub xlinker: Vec<String>,

    /// Active tools version (e.g. 4, 4.2, 5.0.1)
    #[arg(long, value_name = "VERSION")]
    pub tools_version: Option<ToolsVersion>,

    /// Platform to plan for [default: host]
    #[arg(long)]
    pub platform: Option<Platform>,

    /// Build directory [default: <graph root>/.build]
    #[arg(long, value_name = "DIR")]
    pub build_path: Option<PathBuf>,

    /// Build native test modules even where the platform skips them
    #[arg(long)]
    pub native_tests: bool,
}

impl GraphArgs {
    pub fn into_options(self, verbose: bool) -> PlanOptions {
        PlanOptions {
            release: self.release,
            flags: BuildFlags {
                cflags: self.xcc,
                compiler_flags: self.xcompiler,
                ldflags: self.xlinker,
            },
            tools_version: self.tools_version,
            platform: self.platform,
            build_path: self.build_path,
            verbose,
            force_native_tests: self.native_tests,
        }
    }
}

#[derive(Args)]
pub struct PlanArgs {
    #[command(flatten)]
    pub graph: GraphArgs,

    /// Print the manifest instead of writing it
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub graph: GraphArgs,
}
