//! `drydock preview` command

use anyhow::Result;

use crate::cli::PreviewArgs;
use drydock::ops::{preview, PlanSession};
use drydock::util::diagnostic::suggestions;
use drydock::util::GlobalContext;

pub fn execute(args: PreviewArgs, ctx: &GlobalContext) -> Result<()> {
    let opts = args.graph.into_options(ctx.is_verbose());
    let session = PlanSession::load(ctx, &opts)?;

    let modules = preview(&session);
    if modules.is_empty() {
        eprintln!("No modules to preview");
        eprintln!("{}", suggestions::EMPTY_PREVIEW);
        return Ok(());
    }

    for (module, commands) in &modules {
        println!("{} ({})", module.name(), module.kind());
        if commands.is_empty() {
            println!("  (no commands)");
        }
        for command in commands {
            println!("  {}", command.name());
            println!("    {}", command.tool().command_line().join(" "));
        }
    }

    Ok(())
}
