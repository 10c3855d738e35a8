use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use leadgrid_engine::SortDirective;
use leadgrid_runtime::{CreateOutcome, DeleteOutcome, DepartmentAdmin};
use leadgrid_types::DepartmentDraft;

use super::HandlerContext;
use crate::console::PromptConfirmer;

fn load(ctx: &HandlerContext) -> Result<DepartmentAdmin> {
    let mut admin = DepartmentAdmin::new();
    let gateway = ctx.departments();
    let loaded = ctx.block_on(admin.refresh(&gateway, ctx.relay()));
    if !loaded {
        ctx.flush();
        anyhow::bail!("Failed to load departments");
    }
    Ok(admin)
}

pub fn list(
    ctx: &HandlerContext,
    search: Option<String>,
    sort: Option<String>,
    page: usize,
) -> Result<()> {
    let admin = load(ctx)?;
    let mut grid = admin.grid()?;
    if let Some(search) = search {
        grid.set_search(search);
    }
    if let Some(sort) = &sort {
        let directive: SortDirective = sort.parse().map_err(|e: String| anyhow!(e))?;
        grid.set_sort(Some(directive))?;
    }
    grid.set_page_index(page.saturating_sub(1));

    ctx.console.departments(&admin.summary(), &grid.render())
}

pub fn export(ctx: &HandlerContext, out: Option<PathBuf>) -> Result<()> {
    let admin = load(ctx)?;
    let grid = admin.grid()?;
    let download = grid.export_csv()?;
    let path = out.unwrap_or_else(|| PathBuf::from(&download.file_name));

    std::fs::write(&path, &download.content)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    if ctx.console.is_json() {
        return ctx.console.json(&serde_json::json!({
            "path": path,
            "rows": grid.rows().len(),
            "mimeType": download.mime_type,
        }));
    }
    ctx.console.line(&format!(
        "Exported {} departments to {}",
        grid.rows().len(),
        path.display()
    ));
    Ok(())
}

pub fn create(
    ctx: &HandlerContext,
    name: String,
    description: String,
    is_active: bool,
) -> Result<()> {
    let mut admin = load(ctx)?;
    let draft = DepartmentDraft {
        name,
        description,
        is_active,
    };
    let gateway = ctx.departments();
    let outcome = ctx.block_on(admin.create(draft, &gateway, ctx.relay()));
    ctx.flush();

    match outcome {
        CreateOutcome::Created(department) => {
            if ctx.console.is_json() {
                ctx.console.json(&department)?;
            }
            Ok(())
        }
        CreateOutcome::Invalid(errors) => {
            let fields: Vec<&str> = errors.keys().copied().collect();
            anyhow::bail!("Invalid department: {}", fields.join(", "))
        }
        CreateOutcome::Failed(err) => {
            anyhow::bail!("Create failed: {}", err.user_message("Failed to create department"))
        }
    }
}

pub fn delete(ctx: &HandlerContext, id: &str, yes: bool) -> Result<()> {
    let mut admin = load(ctx)?;
    let department = admin
        .departments()
        .iter()
        .find(|d| d.id == id)
        .cloned()
        .ok_or_else(|| anyhow!("Department not found: {}", id))?;

    let confirmer = PromptConfirmer::new(yes);
    let gateway = ctx.departments();
    let outcome = ctx.block_on(admin.delete(&department, &confirmer, &gateway, ctx.relay()));
    ctx.flush();

    match outcome {
        DeleteOutcome::Deleted => Ok(()),
        DeleteOutcome::Cancelled if department.is_predefined => {
            anyhow::bail!("Department {} was not deleted", department.name)
        }
        DeleteOutcome::Cancelled => {
            ctx.console.line("Cancelled.");
            Ok(())
        }
        DeleteOutcome::Busy => anyhow::bail!("A delete is already in progress"),
        DeleteOutcome::Failed(err) => {
            anyhow::bail!("Delete failed: {}", err.user_message("Failed to delete department"))
        }
    }
}
