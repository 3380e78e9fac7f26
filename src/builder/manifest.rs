//! Manifest serialization.
//!
//! The manifest is the executor's input: a YAML document naming the client,
//! the targets with their outputs, the default target, and every command.
//! Rendering is deterministic, so an unchanged plan renders to identical
//! bytes.
//!
//! ```yaml
//! client:
//!   name: "drydock"
//! tools: {}
//! targets:
//!   "test": ["/p/.build/debug/Core.build/Core.o", ...]
//!   "main": [...]
//! default: "main"
//! commands:
//!   "Core.compile":
//!     tool: "swiftc"
//!     description: "Compiling module Core"
//!     inputs: [...]
//!     outputs: [...]
//!     args: [...]
//! ```

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::builder::command::Command;
use crate::builder::errors::PlanError;
use crate::builder::plan::BuildPlan;
use crate::core::configuration::BuildConfiguration;
use crate::util::fs::normalize_path;

/// Client name the executor checks before reading the rest.
pub const CLIENT_NAME: &str = "drydock";

/// File extension of manifests.
pub const MANIFEST_EXTENSION: &str = "yaml";

/// Double-quoted scalar with JSON escaping, which YAML accepts verbatim.
fn quote(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

fn flow_list<S: AsRef<str>>(items: impl IntoIterator<Item = S>) -> String {
    let items: Vec<String> = items.into_iter().map(|s| quote(s.as_ref())).collect();
    format!("[{}]", items.join(", "))
}

fn path_list<'p>(paths: impl IntoIterator<Item = &'p PathBuf>) -> String {
    flow_list(paths.into_iter().map(|p| p.display().to_string()))
}

/// Renders and writes the manifest for one plan.
#[derive(Debug, Clone, Copy)]
pub struct Manifest<'a> {
    plan: &'a BuildPlan,
}

impl<'a> Manifest<'a> {
    pub fn new(plan: &'a BuildPlan) -> Self {
        Manifest { plan }
    }

    /// `<prefix>/<configuration>.yaml`
    pub fn path(prefix: &Path, configuration: BuildConfiguration) -> PathBuf {
        prefix.join(format!("{}.{}", configuration.dirname(), MANIFEST_EXTENSION))
    }

    /// Render the manifest text.
    pub fn render(&self) -> String {
        let mut out = String::new();

        out.push_str("client:\n");
        let _ = writeln!(out, "  name: {}", quote(CLIENT_NAME));
        out.push_str("tools: {}\n");

        out.push_str("targets:\n");
        for target in self.plan.targets().iter() {
            let _ = writeln!(
                out,
                "  {}: {}",
                quote(target.name()),
                path_list(target.outputs())
            );
        }

        let _ = writeln!(out, "default: {}", quote(self.plan.default_target()));

        if self.plan.commands().is_empty() {
            out.push_str("commands: {}\n");
        } else {
            out.push_str("commands:\n");
            for command in self.plan.commands() {
                render_command(&mut out, command);
            }
        }

        out
    }

    /// Write the manifest under `prefix` and return its path.
    ///
    /// `prefix` must already exist; it is never created here.
    pub fn write(&self, prefix: &Path) -> Result<PathBuf, PlanError> {
        let path = Self::path(prefix, self.plan.configuration());
        std::fs::write(&path, self.render()).map_err(|source| PlanError::ManifestWriteFailed {
            path: path.clone(),
            source,
        })?;

        tracing::info!("wrote manifest {}", path.display());
        Ok(normalize_path(&path))
    }
}

fn render_command(out: &mut String, command: &Command) {
    let tool = command.tool();
    let _ = writeln!(out, "  {}:", quote(command.name()));
    let _ = writeln!(out, "    tool: {}", quote(&tool.program.display().to_string()));
    let _ = writeln!(out, "    description: {}", quote(&tool.description));
    let _ = writeln!(out, "    inputs: {}", path_list(&tool.inputs));
    let _ = writeln!(out, "    outputs: {}", path_list(&tool.outputs));
    let _ = writeln!(out, "    args: {}", flow_list(&tool.args));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::plan::Planner;
    use crate::core::graph::ModuleGraph;
    use crate::core::module::CompiledModule;
    use crate::test_support::{context, MockCommandBuilder};
    use tempfile::TempDir;

    fn sample_plan() -> BuildPlan {
        let graph = ModuleGraph::builder("/p")
            .module(CompiledModule::new("Core"))
            .module(CompiledModule::new("CoreTests").as_test())
            .product("app", &["Core"])
            .build()
            .unwrap();
        let ctx = context();
        let builder = MockCommandBuilder::new();
        Planner::new(&graph, &ctx, &builder).plan().unwrap()
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote("plain"), "\"plain\"");
        assert_eq!(quote("a \"b\"\\c"), r#""a \"b\"\\c""#);
        assert_eq!(quote("-rpath=$ORIGIN"), "\"-rpath=$ORIGIN\"");
    }

    #[test]
    fn test_field_order() {
        let text = Manifest::new(&sample_plan()).render();
        let position = |needle: &str| text.find(needle).unwrap();

        assert!(text.starts_with("client:\n  name: \"drydock\"\ntools: {}\ntargets:\n"));
        assert!(position("  \"test\":") < position("  \"main\":"));
        assert!(position("  \"main\":") < position("default: \"main\""));
        assert!(position("default: \"main\"") < position("commands:\n"));
        assert!(position("\"Core.compile\":") < position("\"app.link\":"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let first = Manifest::new(&sample_plan()).render();
        let second = Manifest::new(&sample_plan()).render();
        assert_eq!(first, second);
    }

    #[test]
    fn test_render_is_valid_yaml() {
        let text = Manifest::new(&sample_plan()).render();
        let doc: serde_yaml::Value = serde_yaml::from_str(&text).unwrap();

        assert_eq!(doc["client"]["name"].as_str(), Some("drydock"));
        assert_eq!(doc["default"].as_str(), Some("main"));
        assert!(doc["tools"].as_mapping().unwrap().is_empty());

        let main = doc["targets"]["main"].as_sequence().unwrap();
        let test = doc["targets"]["test"].as_sequence().unwrap();
        assert!(!main.is_empty());
        assert!(test.len() > main.len());

        let commands = doc["commands"].as_mapping().unwrap();
        assert_eq!(commands.len(), 3);
        assert_eq!(
            doc["commands"]["Core.compile"]["tool"].as_str(),
            Some("swiftc")
        );
    }

    #[test]
    fn test_write_places_manifest_under_prefix() {
        let tmp = TempDir::new().unwrap();
        let plan = sample_plan();

        let path = Manifest::new(&plan).write(tmp.path()).unwrap();

        assert_eq!(path, normalize_path(&tmp.path().join("debug.yaml")));
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, Manifest::new(&plan).render());
    }

    #[test]
    fn test_write_does_not_create_prefix() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("missing");

        let err = Manifest::new(&sample_plan()).write(&missing).unwrap_err();

        assert!(matches!(err, PlanError::ManifestWriteFailed { .. }));
        assert!(!missing.exists());
    }
}
