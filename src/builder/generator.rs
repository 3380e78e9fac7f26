//! Command generation: argument assembly and dispatch by entity kind.
//!
//! Argument order is part of the output contract and must not change
//! between runs:
//!
//! - compiled module: compiler platform args, `-Xcc`-wrapped C flags,
//!   compiler flags, verbosity args
//! - native module: native platform args, C flags
//! - native-only product: native platform args, `-Xlinker`-wrapped linker flags
//! - other product: the compiled-module set, wrapped linker flags, and on
//!   Linux the `$ORIGIN` runtime path

use std::path::PathBuf;

use crate::builder::command::{Command, CommandError};
use crate::builder::construct::{CommandBuilder, CompileRequest, LinkRequest};
use crate::builder::context::PlanContext;
use crate::core::configuration::Platform;
use crate::core::module::{ExternalModule, Module};
use crate::core::product::Product;

/// Marker passing the next argument through to the C-family compiler.
pub const CC_PASSTHROUGH: &str = "-Xcc";

/// Marker passing the next argument through to the linker.
pub const LINKER_PASSTHROUGH: &str = "-Xlinker";

/// Makes the dynamic loader search the binary's own directory.
pub const ORIGIN_RPATH: &str = "-rpath=$ORIGIN";

fn wrapped<'f>(marker: &'static str, flags: &'f [String]) -> impl Iterator<Item = String> + 'f {
    flags
        .iter()
        .flat_map(move |flag| [marker.to_string(), flag.clone()])
}

/// Generates commands for modules and products of one graph.
pub struct CommandGenerator<'a> {
    ctx: &'a PlanContext,
    builder: &'a dyn CommandBuilder,
    externals: &'a [ExternalModule],
    destination: PathBuf,
}

impl<'a> CommandGenerator<'a> {
    pub fn new(
        ctx: &'a PlanContext,
        builder: &'a dyn CommandBuilder,
        externals: &'a [ExternalModule],
    ) -> Self {
        CommandGenerator {
            ctx,
            builder,
            externals,
            destination: ctx.destination(),
        }
    }

    /// Arguments for compiling a high-level module.
    pub fn compiled_args(&self) -> Vec<String> {
        let mut args = self.ctx.toolchain.compiler_args.clone();
        args.extend(wrapped(CC_PASSTHROUGH, &self.ctx.flags.cflags));
        args.extend(self.ctx.flags.compiler_flags.iter().cloned());
        args.extend(
            self.ctx
                .verbosity
                .compiler_args()
                .iter()
                .map(|a| a.to_string()),
        );
        args
    }

    /// Arguments for compiling a native module.
    pub fn native_compile_args(&self) -> Vec<String> {
        let mut args = self.ctx.toolchain.native_args.clone();
        args.extend(self.ctx.flags.cflags.iter().cloned());
        args
    }

    /// Arguments for linking a native-only product.
    pub fn native_link_args(&self) -> Vec<String> {
        let mut args = self.ctx.toolchain.native_args.clone();
        args.extend(wrapped(LINKER_PASSTHROUGH, &self.ctx.flags.ldflags));
        args
    }

    /// Arguments for linking a product containing high-level modules.
    pub fn link_args(&self) -> Vec<String> {
        let mut args = self.compiled_args();
        args.extend(wrapped(LINKER_PASSTHROUGH, &self.ctx.flags.ldflags));
        if self.ctx.platform == Platform::Linux {
            args.push(LINKER_PASSTHROUGH.to_string());
            args.push(ORIGIN_RPATH.to_string());
        }
        args
    }

    /// Generate the commands for one module.
    pub fn module_commands(&self, module: &Module) -> Result<Vec<Command>, CommandError> {
        match module {
            Module::Compiled(m) => {
                let commands = self.builder.compile_commands(&CompileRequest {
                    module,
                    configuration: self.ctx.configuration,
                    destination: &self.destination,
                    args: self.compiled_args(),
                    compiler: self.ctx.toolchain.compiler_path(),
                    externals: self.externals,
                })?;

                if commands.len() != 1 {
                    return Err(CommandError::UnexpectedCommandCount {
                        module: m.name.clone(),
                        count: commands.len(),
                    });
                }
                if let Some(empty) = commands.iter().find(|c| c.outputs().is_empty()) {
                    return Err(CommandError::NoOutputs {
                        command: empty.name().to_string(),
                    });
                }
                Ok(commands)
            }
            Module::Native(m) => {
                if m.is_test && self.ctx.skip_native_tests {
                    tracing::debug!(
                        "skipping native test module {} on {}",
                        m.name,
                        self.ctx.platform
                    );
                    return Ok(Vec::new());
                }

                self.builder.compile_commands(&CompileRequest {
                    module,
                    configuration: self.ctx.configuration,
                    destination: &self.destination,
                    args: self.native_compile_args(),
                    compiler: self.ctx.toolchain.native_compiler_path(),
                    externals: self.externals,
                })
            }
            Module::HeaderOnly(m) => {
                tracing::debug!("skipping header-only module {}", m.name);
                Ok(Vec::new())
            }
        }
    }

    /// Generate the link command for one product.
    pub fn product_command(&self, product: &Product) -> Result<Command, CommandError> {
        let (args, linker) = if product.is_native_only() {
            (
                self.native_link_args(),
                self.ctx.toolchain.native_compiler_path(),
            )
        } else {
            (self.link_args(), self.ctx.toolchain.compiler_path())
        };

        self.builder.link_command(&LinkRequest {
            product,
            configuration: self.ctx.configuration,
            destination: &self.destination,
            args,
            linker,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::toolchain::Toolchain;
    use crate::core::configuration::{BuildFlags, ToolsVersion, Verbosity};
    use crate::core::module::{CompiledModule, HeaderOnlyModule, NativeModule};
    use crate::test_support::MockCommandBuilder;
    use std::sync::Arc;

    fn context(platform: Platform) -> PlanContext {
        let toolchain = Toolchain::new("swiftc", "clang", ToolsVersion::new(5, 0, 0))
            .with_compiler_args(["-sdk", "/sdk"])
            .with_native_args(["--sysroot=/sdk"]);
        PlanContext::new(toolchain, "/b")
            .with_platform(platform)
            .with_flags(BuildFlags {
                cflags: vec!["-DFOO".into(), "-I/opt".into()],
                compiler_flags: vec!["-enable-testing".into()],
                ldflags: vec!["-lz".into()],
            })
    }

    #[test]
    fn test_compiled_args_order() {
        let ctx = context(Platform::Linux).with_verbosity(Verbosity::Verbose);
        let builder = MockCommandBuilder::new();
        let generator = CommandGenerator::new(&ctx, &builder, &[]);

        assert_eq!(
            generator.compiled_args(),
            vec![
                "-sdk",
                "/sdk",
                "-Xcc",
                "-DFOO",
                "-Xcc",
                "-I/opt",
                "-enable-testing",
                "-v"
            ]
        );
    }

    #[test]
    fn test_native_args_are_unwrapped() {
        let ctx = context(Platform::Linux);
        let builder = MockCommandBuilder::new();
        let generator = CommandGenerator::new(&ctx, &builder, &[]);

        assert_eq!(
            generator.native_compile_args(),
            vec!["--sysroot=/sdk", "-DFOO", "-I/opt"]
        );
        assert_eq!(
            generator.native_link_args(),
            vec!["--sysroot=/sdk", "-Xlinker", "-lz"]
        );
    }

    #[test]
    fn test_link_args_add_rpath_on_linux_only() {
        let ctx = context(Platform::Linux);
        let builder = MockCommandBuilder::new();
        let linux = CommandGenerator::new(&ctx, &builder, &[]).link_args();
        assert_eq!(&linux[linux.len() - 2..], &["-Xlinker", "-rpath=$ORIGIN"]);
        assert_eq!(
            &linux[..8],
            &["-sdk", "/sdk", "-Xcc", "-DFOO", "-Xcc", "-I/opt", "-enable-testing", "-Xlinker"]
        );

        let ctx = context(Platform::MacOs);
        let mac = CommandGenerator::new(&ctx, &builder, &[]).link_args();
        assert!(!mac.contains(&ORIGIN_RPATH.to_string()));
        assert_eq!(mac.last().map(String::as_str), Some("-lz"));
    }

    #[test]
    fn test_native_only_product_uses_native_driver_without_rpath() {
        let ctx = context(Platform::Linux);
        let builder = MockCommandBuilder::new();
        let generator = CommandGenerator::new(&ctx, &builder, &[]);

        let product = Product::new(
            "tool",
            vec![Arc::new(NativeModule::new("a").into()), Arc::new(NativeModule::new("b").into())],
        );
        let command = generator.product_command(&product).unwrap();

        assert_eq!(command.tool().program, PathBuf::from("clang"));
        assert!(!command.tool().args.contains(&ORIGIN_RPATH.to_string()));
    }

    #[test]
    fn test_mixed_product_uses_compiler_driver_with_rpath() {
        let ctx = context(Platform::Linux);
        let builder = MockCommandBuilder::new();
        let generator = CommandGenerator::new(&ctx, &builder, &[]);

        let product = Product::new(
            "app",
            vec![
                Arc::new(NativeModule::new("clib").into()),
                Arc::new(CompiledModule::new("Core").into()),
            ],
        );
        let command = generator.product_command(&product).unwrap();

        assert_eq!(command.tool().program, PathBuf::from("swiftc"));
        assert!(command.tool().args.contains(&ORIGIN_RPATH.to_string()));
    }

    #[test]
    fn test_header_only_module_generates_nothing() {
        let ctx = context(Platform::Linux);
        let builder = MockCommandBuilder::new();
        let generator = CommandGenerator::new(&ctx, &builder, &[]);

        let module: Module = HeaderOnlyModule::new("shims").into();
        assert!(generator.module_commands(&module).unwrap().is_empty());
        assert!(builder.calls().is_empty());
    }

    #[test]
    fn test_native_test_module_skipped_on_macos() {
        let builder = MockCommandBuilder::new();
        let module: Module = NativeModule::new("clibTests").as_test().into();

        let ctx = context(Platform::MacOs);
        let generator = CommandGenerator::new(&ctx, &builder, &[]);
        assert!(generator.module_commands(&module).unwrap().is_empty());

        let ctx = context(Platform::Linux);
        let generator = CommandGenerator::new(&ctx, &builder, &[]);
        assert_eq!(generator.module_commands(&module).unwrap().len(), 1);
    }

    #[test]
    fn test_compiled_module_without_outputs_fails() {
        let ctx = context(Platform::Linux);
        let builder = MockCommandBuilder::new().without_outputs();
        let generator = CommandGenerator::new(&ctx, &builder, &[]);

        let module: Module = CompiledModule::new("Core").into();
        let err = generator.module_commands(&module).unwrap_err();
        assert!(matches!(err, CommandError::NoOutputs { command } if command == "Core.compile"));
    }

    #[test]
    fn test_compiled_module_needs_exactly_one_command() {
        let ctx = context(Platform::Linux);
        let module: Module = CompiledModule::new("Core").into();

        for count in [0, 2] {
            let builder = MockCommandBuilder::new().with_command_count(count);
            let generator = CommandGenerator::new(&ctx, &builder, &[]);
            let err = generator.module_commands(&module).unwrap_err();
            assert!(matches!(
                err,
                CommandError::UnexpectedCommandCount { module, count: n } if module == "Core" && n == count
            ));
        }

        let builder = MockCommandBuilder::new().with_command_count(2);
        let generator = CommandGenerator::new(&ctx, &builder, &[]);
        let native: Module = NativeModule::new("clib").into();
        assert_eq!(generator.module_commands(&native).unwrap().len(), 2);
    }

    #[test]
    fn test_compiled_module_gets_compiler_and_args() {
        let ctx = context(Platform::Linux);
        let builder = MockCommandBuilder::new();
        let generator = CommandGenerator::new(&ctx, &builder, &[]);

        let module: Module = CompiledModule::new("Core").into();
        let commands = generator.module_commands(&module).unwrap();

        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].tool().program, PathBuf::from("swiftc"));
        assert_eq!(commands[0].tool().args, generator.compiled_args());
        assert_eq!(builder.calls(), vec!["compile Core"]);
    }
}
