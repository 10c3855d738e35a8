use anyhow::Result;
use leadgrid_runtime::DeleteOutcome;

use super::HandlerContext;
use crate::console::PromptConfirmer;

pub fn handle(ctx: &HandlerContext, id: &str, yes: bool) -> Result<()> {
    let mut board = ctx.board()?;
    let gateway = ctx.leads();
    let confirmer = PromptConfirmer::new(yes);
    let outcome = ctx.block_on(board.delete(id, &confirmer, &gateway, ctx.relay()))?;
    ctx.flush();

    match outcome {
        DeleteOutcome::Deleted => Ok(()),
        DeleteOutcome::Cancelled => {
            ctx.console.line("Cancelled.");
            Ok(())
        }
        DeleteOutcome::Busy => anyhow::bail!("A delete is already in progress"),
        DeleteOutcome::Failed(err) => {
            anyhow::bail!("Delete failed: {}", err.user_message("Failed to delete lead"))
        }
    }
}
