//! Drydock CLI - compile a module graph into a build manifest

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use drydock::builder::PlanError;
use drydock::core::GraphError;
use drydock::util::diagnostic::{emit, suggestions};
use drydock::util::GlobalContext;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    // Parse CLI
    let cli = Cli::parse();
    let color = !cli.no_color;

    if let Err(e) = run(cli) {
        if let Some(err) = e.downcast_ref::<PlanError>() {
            emit(&err.to_diagnostic(), color);
        } else {
            eprintln!("error: {:#}", e);
            if matches!(e.downcast_ref::<GraphError>(), Some(GraphError::NotFound { .. })) {
                eprintln!("{}", suggestions::NO_GRAPH);
            }
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("drydock=debug")
    } else {
        EnvFilter::new("drydock=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let mut ctx = GlobalContext::new()?;
    ctx.set_verbose(cli.verbose);
    ctx.set_color(!cli.no_color);

    // Execute command
    match cli.command {
        Commands::Plan(args) => commands::plan::execute(args, &ctx),
        Commands::Preview(args) => commands::preview::execute(args, &ctx),
    }
}
