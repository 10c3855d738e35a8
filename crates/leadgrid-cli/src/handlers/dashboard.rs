use anyhow::Result;
use leadgrid_runtime::{Dashboard, StatsState};

use super::HandlerContext;

pub fn handle(ctx: &HandlerContext) -> Result<()> {
    let mut dashboard = Dashboard::new(ctx.user.clone());
    ctx.block_on(dashboard.refresh(ctx.client()));
    ctx.console.dashboard(&dashboard)?;

    if let StatsState::Failed(reason) = dashboard.state() {
        anyhow::bail!("Unable to load statistics: {}", reason);
    }
    Ok(())
}
