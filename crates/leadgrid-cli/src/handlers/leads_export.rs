use std::path::PathBuf;

use anyhow::{Context, Result};

use super::HandlerContext;

pub fn handle(ctx: &HandlerContext, out: Option<PathBuf>) -> Result<()> {
    let board = ctx.board()?;
    let download = board.grid().export_csv()?;
    let path = out.unwrap_or_else(|| PathBuf::from(&download.file_name));

    std::fs::write(&path, &download.content)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    if ctx.console.is_json() {
        return ctx.console.json(&serde_json::json!({
            "path": path,
            "rows": board.grid().rows().len(),
            "mimeType": download.mime_type,
        }));
    }
    ctx.console.line(&format!(
        "Exported {} leads to {}",
        board.grid().rows().len(),
        path.display()
    ));
    Ok(())
}
