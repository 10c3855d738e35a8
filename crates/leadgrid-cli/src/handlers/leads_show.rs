use anyhow::{Result, anyhow};
use leadgrid_runtime::{DetailState, DetailTab, DetailView, MutationResult, TabLoader};
use serde_json::{Value, json};

use super::HandlerContext;

/// Tab payloads built from the lead record itself; the file backend has no
/// separate task or document stores.
struct RecordTabs<'a> {
    ctx: &'a HandlerContext,
}

#[async_trait::async_trait]
impl TabLoader for RecordTabs<'_> {
    async fn load_tab(&self, tab: DetailTab, entity_id: &str) -> MutationResult<Value> {
        let lead = self.ctx.leads().get(entity_id).await?;
        Ok(match tab {
            DetailTab::Notes => json!({ "notes": lead.note_lines() }),
            DetailTab::Contacts => json!({
                "email": lead.email,
                "phone": lead.reachable_phone(),
            }),
            DetailTab::Timeline => json!({
                "createdAt": lead.created_at,
                "lastContacted": lead.last_contacted,
            }),
            DetailTab::Tasks | DetailTab::Documents | DetailTab::Activity => json!([]),
        })
    }
}

pub fn handle(ctx: &HandlerContext, id: &str, tab: Option<&str>) -> Result<()> {
    let tab = tab
        .map(|raw| DetailTab::parse(raw).ok_or_else(|| anyhow!("Unknown tab: {}", raw)))
        .transpose()?;

    let mut view = DetailView::new();
    let gateway = ctx.leads();
    let tab_state = ctx.block_on(async {
        view.open(id, &gateway).await;
        match tab {
            Some(tab) => Some(view.select_tab(tab, &RecordTabs { ctx }).await),
            None => None,
        }
    });

    match view.state() {
        DetailState::Ready(_) => {}
        DetailState::NotFound => anyhow::bail!("Lead not found: {}", id),
        DetailState::Failed(message) => anyhow::bail!("{}", message),
        DetailState::Idle | DetailState::Loading => anyhow::bail!("Lead {} did not load", id),
    }
    let overview = view
        .overview()
        .ok_or_else(|| anyhow!("Lead {} did not load", id))?;
    ctx.console.overview(id, &overview, tab_state.as_ref())
}
