//! Planning error types and diagnostics.

use std::collections::BTreeSet;
use std::path::PathBuf;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::builder::command::CommandError;
use crate::util::diagnostic::Diagnostic;

/// Error that aborts a planning run.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum PlanError {
    #[error("the module graph contains no modules")]
    #[diagnostic(code(drydock::plan::no_modules))]
    NoModules,

    #[error("the module graph consists of the single native module `{module}`")]
    #[diagnostic(
        code(drydock::plan::degenerate_graph),
        help("a lone native module cannot produce a product; add a compiled module")
    )]
    DegenerateGraph { module: String },

    #[error(
        "module `{module}` requires tools version {} but the active version is {current}",
        format_majors(.required)
    )]
    #[diagnostic(code(drydock::plan::incompatible_tools_version))]
    IncompatibleToolsVersion {
        module: String,
        required: BTreeSet<u64>,
        current: u64,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    CommandConstructionFailed(#[from] CommandError),

    #[error("failed to write manifest: {}", .path.display())]
    #[diagnostic(code(drydock::plan::manifest_write))]
    ManifestWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn format_majors(majors: &BTreeSet<u64>) -> String {
    majors
        .iter()
        .map(|m| m.to_string())
        .collect::<Vec<_>>()
        .join(" or ")
}

impl PlanError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            PlanError::NoModules => Diagnostic::error("the module graph contains no modules")
                .with_suggestion("Add at least one [[module]] entry to Drydock.toml"),

            PlanError::DegenerateGraph { module } => Diagnostic::error(format!(
                "cannot plan a graph made of the single native module `{}`",
                module
            ))
            .with_context("a lone native module cannot produce a product")
            .with_suggestion("Add a compiled module that depends on it"),

            PlanError::IncompatibleToolsVersion {
                module,
                required,
                current,
            } => Diagnostic::error(format!(
                "module `{}` is not compatible with tools version {}",
                module, current
            ))
            .with_context(format!(
                "`{}` supports tools version {}",
                module,
                format_majors(required)
            ))
            .with_suggestion(format!(
                "Select a matching toolchain with `--tools-version {}`",
                required.iter().next_back().copied().unwrap_or(*current)
            ))
            .with_suggestion(format!(
                "Add {} to the supported-versions of `{}`",
                current, module
            )),

            PlanError::CommandConstructionFailed(err) => {
                let diag = Diagnostic::error(err.to_string());
                match err {
                    CommandError::NoSources { module, .. } => diag.with_suggestion(format!(
                        "Check the `sources` patterns of `{}`",
                        module
                    )),
                    CommandError::EmptyProduct { product } => diag.with_suggestion(format!(
                        "List at least one module in product `{}`",
                        product
                    )),
                    _ => diag,
                }
            }

            PlanError::ManifestWriteFailed { path, source } => {
                Diagnostic::error("failed to write the build manifest")
                    .with_context(source.to_string())
                    .with_location(path)
                    .with_suggestion("Create the build directory before planning")
            }
        }
    }

    /// Whether the error came from the version gate.
    pub fn is_version_mismatch(&self) -> bool {
        matches!(self, PlanError::IncompatibleToolsVersion { .. })
    }
}
