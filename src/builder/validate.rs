//! Graph validation and the tools-version gate.
//!
//! Both checks run before any command is generated.

use crate::builder::errors::PlanError;
use crate::core::configuration::ToolsVersion;
use crate::core::graph::ModuleGraph;
use crate::core::module::Module;

/// Reject graphs that cannot produce a plan.
///
/// A graph with no modules fails with [`PlanError::NoModules`]. A graph whose
/// only module is native fails with [`PlanError::DegenerateGraph`]. Graphs of
/// two or more native modules are accepted and link as native-only products.
pub fn validate_graph(graph: &ModuleGraph) -> Result<(), PlanError> {
    match graph.modules() {
        [] => Err(PlanError::NoModules),
        [only] if only.is_native() => Err(PlanError::DegenerateGraph {
            module: only.name().to_string(),
        }),
        _ => Ok(()),
    }
}

/// Check that a module can be built with the active tools version.
///
/// Native and header-only modules always pass.
pub fn check_tools_version(module: &Module, current: &ToolsVersion) -> Result<(), PlanError> {
    match module {
        Module::Compiled(compiled) if !compiled.supports(current) => {
            Err(PlanError::IncompatibleToolsVersion {
                module: compiled.name.clone(),
                required: compiled.supported_versions.clone(),
                current: current.major(),
            })
        }
        Module::Compiled(_) | Module::Native(_) | Module::HeaderOnly(_) => Ok(()),
    }
}
