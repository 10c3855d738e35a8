use anyhow::Result;
use leadgrid_runtime::EditOutcome;
use leadgrid_types::Classification;

use super::HandlerContext;

pub fn handle(
    ctx: &HandlerContext,
    id: &str,
    classification: Classification,
    value: &str,
) -> Result<()> {
    let mut board = ctx.board()?;
    let gateway = ctx.leads();
    let outcome = ctx.block_on(board.change(id, classification, value, &gateway, ctx.relay()))?;
    ctx.flush();

    match outcome {
        EditOutcome::Updated(lead) => {
            if ctx.console.is_json() {
                ctx.console.json(&lead)?;
            }
            Ok(())
        }
        EditOutcome::Unchanged => {
            ctx.console.line(&format!(
                "{} is already \"{}\"",
                classification.title(),
                value
            ));
            Ok(())
        }
        EditOutcome::Busy => {
            anyhow::bail!("Another {} change is in progress", classification.noun())
        }
        EditOutcome::Failed(err) => anyhow::bail!(
            "{} update failed: {}",
            classification.title(),
            err.user_message(&format!("Failed to update {}", classification.noun()))
        ),
    }
}
