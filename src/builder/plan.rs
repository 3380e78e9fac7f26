//! Build plan generation.
//!
//! A [`BuildPlan`] holds every command needed to build a graph in one
//! configuration, grouped into the `main` and `test` targets. The
//! [`Planner`] produces it in a single pass:
//!
//! 1. validate the graph shape
//! 2. gate every planned module against the active tools version
//! 3. generate module commands, then product link commands
//! 4. group commands into targets
//!
//! [`Planner::preview`] runs the same pipeline but salvages what it can
//! instead of failing.

use std::sync::Arc;

use rayon::prelude::*;

use crate::builder::command::{Command, CommandError};
use crate::builder::construct::CommandBuilder;
use crate::builder::context::PlanContext;
use crate::builder::errors::PlanError;
use crate::builder::generator::CommandGenerator;
use crate::builder::targets::{TargetGroups, MAIN_TARGET};
use crate::builder::validate::{check_tools_version, validate_graph};
use crate::core::configuration::BuildConfiguration;
use crate::core::graph::ModuleGraph;
use crate::core::module::Module;

/// A module together with the commands generated for it.
pub type ModuleCommands = (Arc<Module>, Vec<Command>);

/// A complete build plan.
#[derive(Debug, Clone)]
pub struct BuildPlan {
    configuration: BuildConfiguration,

    /// All commands in generation order: modules first, then products
    commands: Vec<Arc<Command>>,

    targets: TargetGroups,
}

impl BuildPlan {
    pub fn configuration(&self) -> BuildConfiguration {
        self.configuration
    }

    pub fn commands(&self) -> &[Arc<Command>] {
        &self.commands
    }

    pub fn targets(&self) -> &TargetGroups {
        &self.targets
    }

    /// Target the executor builds when none is named.
    pub fn default_target(&self) -> &'static str {
        MAIN_TARGET
    }

    pub fn command_count(&self) -> usize {
        self.commands.len()
    }
}

/// What to do when a module's commands cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Abort with the first error in graph order.
    Propagate,
    /// Stop at the failing module and keep what was generated before it.
    Salvage,
}

/// Turns a module graph into a build plan.
pub struct Planner<'a> {
    graph: &'a ModuleGraph,
    ctx: &'a PlanContext,
    builder: &'a dyn CommandBuilder,
}

impl<'a> Planner<'a> {
    pub fn new(
        graph: &'a ModuleGraph,
        ctx: &'a PlanContext,
        builder: &'a dyn CommandBuilder,
    ) -> Self {
        Planner {
            graph,
            ctx,
            builder,
        }
    }

    fn generator(&self) -> CommandGenerator<'_> {
        CommandGenerator::new(self.ctx, self.builder, self.graph.externals())
    }

    /// Build the full plan.
    pub fn plan(&self) -> Result<BuildPlan, PlanError> {
        let modules = self.generate_modules(FailurePolicy::Propagate)?;
        let links = self.generate_products()?;

        let mut commands = Vec::new();
        let mut targets = TargetGroups::new();

        let generated = modules
            .into_iter()
            .flat_map(|(_, commands)| commands)
            .chain(links);
        for command in generated {
            let command = Arc::new(command);
            targets.record(Arc::clone(&command));
            commands.push(command);
        }

        tracing::info!(
            "planned {} commands ({} main, {} test) for {} configuration",
            commands.len(),
            targets.main().commands().len(),
            targets.test().commands().len(),
            self.ctx.configuration
        );

        Ok(BuildPlan {
            configuration: self.ctx.configuration,
            commands,
            targets,
        })
    }

    /// Best-effort listing of the commands each non-test module would run.
    ///
    /// Validation and version-gate failures yield an empty list. A module
    /// whose commands cannot be constructed ends the list. Products are not
    /// linked.
    pub fn preview(&self) -> Vec<ModuleCommands> {
        match self.generate_modules(FailurePolicy::Salvage) {
            Ok(modules) => modules,
            Err(err) => {
                tracing::debug!("preview unavailable: {}", err);
                Vec::new()
            }
        }
    }

    fn generate_modules(&self, policy: FailurePolicy) -> Result<Vec<ModuleCommands>, PlanError> {
        validate_graph(self.graph)?;

        // Preview never considers test modules, not even for the version gate.
        let candidates: Vec<&Arc<Module>> = self
            .graph
            .modules()
            .iter()
            .filter(|m| policy == FailurePolicy::Propagate || !m.is_test())
            .collect();

        let version = self.ctx.active_version();
        for module in &candidates {
            check_tools_version(module, version)?;
        }

        let generator = self.generator();
        let results: Vec<Result<Vec<Command>, CommandError>> = candidates
            .par_iter()
            .map(|module| generator.module_commands(module))
            .collect();

        let mut collected = Vec::with_capacity(candidates.len());
        for (module, result) in candidates.into_iter().zip(results) {
            match (result, policy) {
                (Ok(commands), _) => {
                    tracing::debug!("{}: {} command(s)", module.name(), commands.len());
                    collected.push((Arc::clone(module), commands));
                }
                (Err(err), FailurePolicy::Propagate) => return Err(err.into()),
                (Err(err), FailurePolicy::Salvage) => {
                    tracing::warn!("stopping preview at module {}: {}", module.name(), err);
                    break;
                }
            }
        }

        Ok(collected)
    }

    fn generate_products(&self) -> Result<Vec<Command>, PlanError> {
        let generator = self.generator();
        let links = self
            .graph
            .products()
            .par_iter()
            .map(|product| generator.product_command(product))
            .collect::<Vec<_>>()
            .into_iter()
            .collect::<Result<Vec<_>, _>>()?;
        Ok(links)
    }
}
