//! Command construction for a single module or product.
//!
//! The planner decides *which* commands exist and assembles their argument
//! lists; a [`CommandBuilder`] turns one entity plus those arguments into
//! concrete tool invocations (output naming, source expansion, flag layout).

use std::path::{Path, PathBuf};

use crate::builder::command::{Command, CommandError, Producer, ToolSpec};
use crate::core::configuration::BuildConfiguration;
use crate::core::module::{ExternalModule, Module};
use crate::core::product::Product;
use crate::util::fs::glob_pattern;

/// Input for compiling one module.
#[derive(Debug, Clone)]
pub struct CompileRequest<'a> {
    pub module: &'a Module,
    pub configuration: BuildConfiguration,
    /// Directory outputs are placed under
    pub destination: &'a Path,
    /// Arguments assembled by the planner, in order
    pub args: Vec<String>,
    pub compiler: &'a Path,
    /// Metadata of libraries outside the graph
    pub externals: &'a [ExternalModule],
}

/// Input for linking one product.
#[derive(Debug, Clone)]
pub struct LinkRequest<'a> {
    pub product: &'a Product,
    pub configuration: BuildConfiguration,
    pub destination: &'a Path,
    pub args: Vec<String>,
    pub linker: &'a Path,
}

/// Builds concrete commands for modules and products.
pub trait CommandBuilder: Send + Sync {
    /// Generate the compile commands for a module.
    ///
    /// Compiled modules yield one command; native modules may yield one per
    /// source; header-only modules yield none.
    fn compile_commands(&self, request: &CompileRequest<'_>) -> Result<Vec<Command>, CommandError>;

    /// Generate the link command for a product.
    fn link_command(&self, request: &LinkRequest<'_>) -> Result<Command, CommandError>;
}

/// Default builder: resolves source globs against the graph root and lays
/// outputs out as `<destination>/<module>.build/...`.
#[derive(Debug, Clone)]
pub struct StandardCommandBuilder {
    root: PathBuf,
}

impl StandardCommandBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        StandardCommandBuilder { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Expand a module's source patterns. At least one file must match.
    fn resolve_sources(&self, module: &Module) -> Result<Vec<PathBuf>, CommandError> {
        let mut sources = Vec::new();
        for pattern in module.sources() {
            let matched =
                glob_pattern(&self.root, pattern).map_err(|source| CommandError::InvalidPattern {
                    module: module.name().to_string(),
                    pattern: pattern.clone(),
                    source,
                })?;
            sources.extend(matched);
        }

        sources.sort();
        sources.dedup();

        if sources.is_empty() {
            return Err(CommandError::NoSources {
                module: module.name().to_string(),
                patterns: module.sources().to_vec(),
            });
        }
        Ok(sources)
    }

    fn build_dir(destination: &Path, module: &str) -> PathBuf {
        destination.join(format!("{}.build", module))
    }

    /// `<module>.build/<relative source>.o`; the source extension is kept so
    /// `x.c` and `x.cpp` in one module get distinct objects.
    fn source_object(&self, destination: &Path, module: &str, source: &Path) -> PathBuf {
        let rel = source.strip_prefix(&self.root).unwrap_or(source);
        let mut object = Self::build_dir(destination, module).join(rel).into_os_string();
        object.push(".o");
        PathBuf::from(object)
    }

    /// Object files a module contributes to a link.
    fn module_objects(
        &self,
        module: &Module,
        destination: &Path,
    ) -> Result<Vec<PathBuf>, CommandError> {
        match module {
            Module::Compiled(m) => {
                Ok(vec![Self::build_dir(destination, &m.name).join(format!("{}.o", m.name))])
            }
            Module::Native(m) => Ok(self
                .resolve_sources(module)?
                .iter()
                .map(|source| self.source_object(destination, &m.name, source))
                .collect()),
            Module::HeaderOnly(_) => Ok(Vec::new()),
        }
    }

    fn configuration_args(configuration: BuildConfiguration, native: bool) -> &'static [&'static str] {
        match (configuration, native) {
            (BuildConfiguration::Debug, false) => &["-Onone", "-g"],
            (BuildConfiguration::Release, false) => &["-O"],
            (BuildConfiguration::Debug, true) => &["-O0", "-g"],
            (BuildConfiguration::Release, true) => &["-O2"],
        }
    }

    fn compile_module(&self, request: &CompileRequest<'_>, name: &str) -> Result<Command, CommandError> {
        let sources = self.resolve_sources(request.module)?;
        let build_dir = Self::build_dir(request.destination, name);
        let object = build_dir.join(format!("{}.o", name));
        let interface = request.destination.join(format!("{}.module", name));

        let tool = ToolSpec::new(request.compiler)
            .args(request.args.iter().cloned())
            .args(Self::configuration_args(request.configuration, false).iter().copied())
            .arg("-module-name")
            .arg(name)
            .arg("-I")
            .arg(request.destination.display().to_string())
            .arg("-c")
            .args(sources.iter().map(|s| s.display().to_string()))
            .arg("-emit-module-path")
            .arg(interface.display().to_string())
            .arg("-o")
            .arg(object.display().to_string())
            .inputs(sources)
            .output(object)
            .output(interface)
            .description(format!("Compiling module {}", name));

        Ok(Command::new(
            format!("{}.compile", name),
            tool,
            Producer::module(request.module),
        ))
    }

    fn compile_native(
        &self,
        request: &CompileRequest<'_>,
        name: &str,
    ) -> Result<Vec<Command>, CommandError> {
        let sources = self.resolve_sources(request.module)?;

        let include_args: Vec<String> = request
            .externals
            .iter()
            .filter(|ext| request.module.dependencies().contains(&ext.name))
            .flat_map(|ext| ext.include_dirs.iter())
            .flat_map(|dir| ["-I".to_string(), dir.display().to_string()])
            .collect();

        let commands = sources
            .into_iter()
            .map(|source| {
                let object = self.source_object(request.destination, name, &source);
                let rel = source.strip_prefix(&self.root).unwrap_or(&source);
                let rel = rel.display().to_string();

                let tool = ToolSpec::new(request.compiler)
                    .args(request.args.iter().cloned())
                    .args(Self::configuration_args(request.configuration, true).iter().copied())
                    .args(include_args.iter().cloned())
                    .arg("-c")
                    .arg(source.display().to_string())
                    .arg("-o")
                    .arg(object.display().to_string())
                    .input(source)
                    .output(object)
                    .description(format!("Compiling {} {}", name, rel));

                Command::new(
                    format!("{}.compile.{}", name, rel),
                    tool,
                    Producer::module(request.module),
                )
            })
            .collect();

        Ok(commands)
    }
}

impl CommandBuilder for StandardCommandBuilder {
    fn compile_commands(&self, request: &CompileRequest<'_>) -> Result<Vec<Command>, CommandError> {
        match request.module {
            Module::Compiled(m) => Ok(vec![self.compile_module(request, &m.name)?]),
            Module::Native(m) => self.compile_native(request, &m.name),
            Module::HeaderOnly(_) => Ok(Vec::new()),
        }
    }

    fn link_command(&self, request: &LinkRequest<'_>) -> Result<Command, CommandError> {
        let product = request.product;
        if product.modules().is_empty() {
            return Err(CommandError::EmptyProduct {
                product: product.name().to_string(),
            });
        }

        let mut objects = Vec::new();
        for module in product.modules() {
            objects.extend(self.module_objects(module, request.destination)?);
        }

        let output = request.destination.join(product.name());

        let tool = ToolSpec::new(request.linker)
            .args(request.args.iter().cloned())
            .args(objects.iter().map(|o| o.display().to_string()))
            .arg("-o")
            .arg(output.display().to_string())
            .inputs(objects)
            .output(output)
            .description(format!("Linking {}", product.name()));

        Ok(Command::new(
            format!("{}.link", product.name()),
            tool,
            Producer::product(product),
        ))
    }
}
