use anyhow::{Result, anyhow};
use leadgrid_engine::{Predicate, SortDirective};
use tracing::warn;

use super::HandlerContext;
use crate::args::GridArgs;

pub fn handle(ctx: &HandlerContext, args: &GridArgs) -> Result<()> {
    let mut board = ctx.board()?;
    let grid = board.grid_mut();

    if let Some(page_size) = args.page_size {
        grid.set_page_size(page_size)?;
    }
    if let Some(search) = &args.search {
        grid.set_search(search.as_str());
    }
    for (column_id, value) in [
        ("stage", &args.stage),
        ("status", &args.status),
        ("source", &args.source),
        ("department", &args.department),
    ] {
        if let Some(value) = value {
            grid.set_predicate(column_id, Predicate::equals(value.as_str()))?;
        }
    }
    if let Some(sort) = &args.sort {
        let directive: SortDirective = sort.parse().map_err(|e: String| anyhow!(e))?;
        grid.set_sort(Some(directive))?;
    }
    for column_id in &args.hidden {
        if !grid.set_column_visible(column_id, false)? {
            warn!(column = %column_id, "column cannot be hidden");
        }
    }
    grid.set_page_index(args.page.saturating_sub(1));

    ctx.console.grid(&board.render())
}
