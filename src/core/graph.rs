//! The resolved module graph handed to the planner.
//!
//! The graph is built either programmatically through [`GraphBuilder`] or
//! from a `Drydock.toml` description. Both paths enforce the same
//! invariants: module names are unique, product names are unique, and
//! every product references modules that exist.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use miette::Diagnostic as MietteDiagnostic;
use serde::Deserialize;
use thiserror::Error;

use crate::core::module::{
    CompiledModule, ExternalModule, HeaderOnlyModule, Module, ModuleKind, NativeModule,
};
use crate::core::product::Product;

/// File name of a graph description.
pub const GRAPH_FILE: &str = "Drydock.toml";

/// Error while constructing or loading a graph.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum GraphError {
    #[error("module `{name}` is defined more than once")]
    #[diagnostic(code(drydock::graph::duplicate_module))]
    DuplicateModule { name: String },

    #[error("product `{name}` is defined more than once")]
    #[diagnostic(code(drydock::graph::duplicate_product))]
    DuplicateProduct { name: String },

    #[error("product `{product}` references unknown module `{module}`")]
    #[diagnostic(
        code(drydock::graph::unknown_module),
        help("add a [[module]] entry named `{module}` or remove it from the product")
    )]
    UnknownModule { product: String, module: String },

    #[error("failed to read graph description: {}", .path.display())]
    #[diagnostic(code(drydock::graph::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse graph description: {}", .path.display())]
    #[diagnostic(code(drydock::graph::parse))]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("could not find `{}` in `{}` or any parent directory", GRAPH_FILE, .dir.display())]
    #[diagnostic(
        code(drydock::graph::not_found),
        help("create a Drydock.toml describing the modules and products to plan")
    )]
    NotFound { dir: PathBuf },
}

/// A resolved module/product graph.
#[derive(Debug, Clone)]
pub struct ModuleGraph {
    root: PathBuf,
    modules: Vec<Arc<Module>>,
    products: Vec<Product>,
    externals: Vec<ExternalModule>,
}

impl ModuleGraph {
    /// Start building a graph rooted at `root`.
    pub fn builder(root: impl Into<PathBuf>) -> GraphBuilder {
        GraphBuilder {
            root: root.into(),
            modules: Vec::new(),
            products: Vec::new(),
            externals: Vec::new(),
        }
    }

    /// Load a graph from a `Drydock.toml` file. The file's directory becomes
    /// the graph root.
    pub fn load(path: &Path) -> Result<Self, GraphError> {
        let content = std::fs::read_to_string(path).map_err(|source| GraphError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&content, path)
    }

    /// Parse graph description content.
    pub fn parse(content: &str, path: &Path) -> Result<Self, GraphError> {
        let description: GraphDescription =
            toml::from_str(content).map_err(|source| GraphError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let root = path.parent().unwrap_or(Path::new(".")).to_path_buf();
        description.into_graph(root)
    }

    /// Directory source patterns are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Modules in graph iteration order.
    pub fn modules(&self) -> &[Arc<Module>] {
        &self.modules
    }

    /// Products in graph iteration order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn externals(&self) -> &[ExternalModule] {
        &self.externals
    }

    pub fn module(&self, name: &str) -> Option<&Arc<Module>> {
        self.modules.iter().find(|m| m.name() == name)
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }
}

/// Incremental graph construction.
#[derive(Debug)]
pub struct GraphBuilder {
    root: PathBuf,
    modules: Vec<Module>,
    products: Vec<(String, bool, Vec<String>)>,
    externals: Vec<ExternalModule>,
}

impl GraphBuilder {
    pub fn module(mut self, module: impl Into<Module>) -> Self {
        self.modules.push(module.into());
        self
    }

    /// Add a product composed of the named modules, in order.
    pub fn product(self, name: impl Into<String>, modules: &[&str]) -> Self {
        self.push_product(name.into(), false, modules)
    }

    pub fn test_product(self, name: impl Into<String>, modules: &[&str]) -> Self {
        self.push_product(name.into(), true, modules)
    }

    fn push_product(mut self, name: String, is_test: bool, modules: &[&str]) -> Self {
        self.products
            .push((name, is_test, modules.iter().map(|m| m.to_string()).collect()));
        self
    }

    pub fn external(mut self, external: ExternalModule) -> Self {
        self.externals.push(external);
        self
    }

    pub fn build(self) -> Result<ModuleGraph, GraphError> {
        let mut by_name: HashMap<String, Arc<Module>> = HashMap::new();
        let mut modules = Vec::with_capacity(self.modules.len());

        for module in self.modules {
            let name = module.name().to_string();
            if by_name.contains_key(&name) {
                return Err(GraphError::DuplicateModule { name });
            }
            let module = Arc::new(module);
            by_name.insert(name, Arc::clone(&module));
            modules.push(module);
        }

        let mut product_names = BTreeSet::new();
        let mut products = Vec::with_capacity(self.products.len());

        for (name, is_test, members) in self.products {
            if !product_names.insert(name.clone()) {
                return Err(GraphError::DuplicateProduct { name });
            }

            let members = members
                .into_iter()
                .map(|member| {
                    by_name
                        .get(&member)
                        .cloned()
                        .ok_or_else(|| GraphError::UnknownModule {
                            product: name.clone(),
                            module: member,
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;

            let product = Product::new(name, members);
            products.push(if is_test { product.as_test() } else { product });
        }

        Ok(ModuleGraph {
            root: self.root,
            modules,
            products,
            externals: self.externals,
        })
    }
}

/// On-disk form of a graph (`Drydock.toml`).
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GraphDescription {
    #[serde(default, rename = "module")]
    pub modules: Vec<ModuleDescription>,

    #[serde(default, rename = "product")]
    pub products: Vec<ProductDescription>,

    #[serde(default, rename = "external")]
    pub externals: Vec<ExternalModule>,
}

impl GraphDescription {
    pub fn into_graph(self, root: PathBuf) -> Result<ModuleGraph, GraphError> {
        let mut builder = ModuleGraph::builder(root);

        for module in self.modules {
            builder = builder.module(module.into_module());
        }

        for product in self.products {
            let members: Vec<&str> = product.modules.iter().map(String::as_str).collect();
            builder = builder.push_product(product.name.clone(), product.test, &members);
        }

        for external in self.externals {
            builder = builder.external(external);
        }

        builder.build()
    }
}

/// A `[[module]]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ModuleDescription {
    pub name: String,

    #[serde(default = "default_kind")]
    pub kind: ModuleKind,

    #[serde(default)]
    pub test: bool,

    #[serde(default)]
    pub sources: Vec<String>,

    #[serde(default)]
    pub dependencies: Vec<String>,

    #[serde(default)]
    pub supported_versions: BTreeSet<u64>,
}

fn default_kind() -> ModuleKind {
    ModuleKind::Compiled
}

impl ModuleDescription {
    pub fn into_module(self) -> Module {
        if self.kind != ModuleKind::Compiled && !self.supported_versions.is_empty() {
            tracing::warn!(
                "ignoring supported-versions on {} module `{}`",
                self.kind,
                self.name
            );
        }

        match self.kind {
            ModuleKind::Compiled => Module::Compiled(CompiledModule {
                name: self.name,
                is_test: self.test,
                supported_versions: self.supported_versions,
                dependencies: self.dependencies,
                sources: self.sources,
            }),
            ModuleKind::Native => Module::Native(NativeModule {
                name: self.name,
                is_test: self.test,
                dependencies: self.dependencies,
                sources: self.sources,
            }),
            ModuleKind::HeaderOnly => {
                if !self.sources.is_empty() {
                    tracing::warn!("ignoring sources on header-only module `{}`", self.name);
                }
                Module::HeaderOnly(HeaderOnlyModule {
                    name: self.name,
                    is_test: self.test,
                    dependencies: self.dependencies,
                })
            }
        }
    }
}

/// A `[[product]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductDescription {
    pub name: String,

    #[serde(default)]
    pub test: bool,

    #[serde(default)]
    pub modules: Vec<String>,
}

/// Find a graph description in `start` or any parent directory.
pub fn find_graph(start: &Path) -> Result<PathBuf, GraphError> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(GRAPH_FILE);
        if candidate.is_file() {
            return Ok(candidate);
        }
        if !current.pop() {
            return Err(GraphError::NotFound {
                dir: start.to_path_buf(),
            });
        }
    }
}
