//! `drydock plan` command

use anyhow::Result;

use crate::cli::PlanArgs;
use drydock::ops::{render_plan, write_plan, PlanSession};
use drydock::util::GlobalContext;

pub fn execute(args: PlanArgs, ctx: &GlobalContext) -> Result<()> {
    let opts = args.graph.into_options(ctx.is_verbose());
    let session = PlanSession::load(ctx, &opts)?;

    if args.dry_run {
        print!("{}", render_plan(&session)?);
        return Ok(());
    }

    let path = write_plan(&session)?;
    eprintln!(
        "     Planned {} ({})",
        path.display(),
        session.context().configuration
    );
    println!("{}", path.display());

    Ok(())
}
