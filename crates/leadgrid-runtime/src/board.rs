//! The "My Leads" screen: grid, cached snapshot, reference options and the
//! per-row cell behaviors wired together.

use std::collections::HashMap;
use std::sync::Arc;

use leadgrid_engine::{BodyCell, CellContent, ControlKind, DataGrid, FilterChip, GridView, Predicate};
use leadgrid_types::{Classification, ClassificationOption, Lead, LeadPatch, display_name_for};
use tracing::debug;

use crate::api::ApiClient;
use crate::cells::{ActionMenu, ClassificationEditor, DeleteOutcome, EditOutcome, EditorView};
use crate::columns::lead_columns;
use crate::config::Config;
use crate::gateway::RowGateway;
use crate::interaction::Confirmer;
use crate::notify::NotificationRelay;
use crate::rest::{LeadGateway, fetch_options};
use crate::snapshot::SnapshotCache;
use crate::store::{Action, LeadFilters, LeadsUiState};
use crate::store::selectors::grid_filter;
use crate::{Error, Result};

pub struct LeadBoard {
    grid: DataGrid<Lead>,
    cache: SnapshotCache<Lead>,
    options: HashMap<Classification, Vec<ClassificationOption>>,
    editors: HashMap<(Classification, String), Arc<ClassificationEditor>>,
    menus: HashMap<String, Arc<ActionMenu>>,
    /// Store filters last pushed into the grid
    applied_filters: Option<LeadFilters>,
}

impl LeadBoard {
    pub fn new(config: &Config) -> Result<Self> {
        let grid = DataGrid::new(config.table_title.clone(), lead_columns()?)
            .noun("leads")
            .with_page_size(config.page_size)?;
        Ok(Self {
            grid,
            cache: SnapshotCache::new(),
            options: HashMap::new(),
            editors: HashMap::new(),
            menus: HashMap::new(),
            applied_filters: None,
        })
    }

    pub fn grid(&self) -> &DataGrid<Lead> {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut DataGrid<Lead> {
        &mut self.grid
    }

    pub fn cache(&self) -> &SnapshotCache<Lead> {
        &self.cache
    }

    pub fn lead(&self, id: &str) -> Option<&Lead> {
        self.cache.get(id)
    }

    /// Replace the snapshot with a fetched list.
    pub fn load(&mut self, leads: Vec<Lead>) {
        let ticket = self.cache.begin_fetch();
        if self.cache.resolve(ticket, leads) {
            self.sync_grid();
        }
    }

    pub async fn refresh<C: ApiClient>(&mut self, gateway: &LeadGateway<C>) -> Result<()> {
        let ticket = self.cache.begin_fetch();
        let leads = gateway.list().await?;
        if self.cache.resolve(ticket, leads) {
            self.sync_grid();
        }
        Ok(())
    }

    pub fn set_options(
        &mut self,
        classification: Classification,
        options: Vec<ClassificationOption>,
    ) {
        self.options.insert(classification, options);
    }

    pub async fn load_options<C: ApiClient + ?Sized>(&mut self, client: &C) -> Result<()> {
        for classification in [Classification::Stage, Classification::Status] {
            let options = fetch_options(client, classification).await?;
            self.set_options(classification, options);
        }
        Ok(())
    }

    pub fn options(&self, classification: Classification) -> Option<&[ClassificationOption]> {
        self.options.get(&classification).map(Vec::as_slice)
    }

    pub fn apply_filters(&mut self, filters: &LeadFilters) -> Result<()> {
        let state = grid_filter(filters);
        self.grid.set_search(state.global_text.clone());
        for column_id in ["stage", "department", "source", "assignedTo"] {
            let predicate = state.predicates.get(column_id).cloned().unwrap_or_default();
            self.grid.set_predicate(column_id, predicate)?;
        }
        self.applied_filters = Some(filters.clone());
        Ok(())
    }

    /// Mirror the store's lead slice into the grid. The store owns the
    /// selection; the grid's copy is overwritten on every sync. Filters are
    /// reapplied only when they changed, so the page survives a sync.
    pub fn sync_ui(&mut self, ui: &LeadsUiState) -> Result<()> {
        if self.applied_filters.as_ref() != Some(&ui.filters) {
            self.apply_filters(&ui.filters)?;
        }
        self.grid.set_selection(ui.selected.iter().map(String::as_str));
        Ok(())
    }

    /// Store action for the header checkbox: add or remove the current
    /// page's rows while keeping selections made on other pages.
    pub fn page_selection_action(&self, ui: &LeadsUiState, selected: bool) -> Action {
        let page: Vec<String> = self.grid.visible_rows().iter().map(|l| l.id.clone()).collect();
        let mut ids = ui.selected.clone();
        if selected {
            ids.extend(page);
        } else {
            for id in &page {
                ids.remove(id);
            }
        }
        Action::SelectAllLeads(ids.into_iter().collect())
    }

    fn editor(&mut self, classification: Classification, id: &str) -> Arc<ClassificationEditor> {
        self.editors
            .entry((classification, id.to_string()))
            .or_insert_with(|| Arc::new(ClassificationEditor::new(classification)))
            .clone()
    }

    fn menu(&mut self, id: &str) -> Arc<ActionMenu> {
        self.menus
            .entry(id.to_string())
            .or_insert_with(|| Arc::new(ActionMenu::new()))
            .clone()
    }

    pub fn editor_view(&self, classification: Classification, id: &str) -> Option<EditorView> {
        let lead = self.cache.get(id)?;
        let view = match self.editors.get(&(classification, id.to_string())) {
            Some(editor) => editor.view(lead, self.options(classification)),
            None => {
                ClassificationEditor::new(classification).view(lead, self.options(classification))
            }
        };
        Some(view)
    }

    /// Change a lead's stage or status and reconcile the snapshot.
    pub async fn change<G, R>(
        &mut self,
        id: &str,
        classification: Classification,
        value: &str,
        gateway: &G,
        relay: &R,
    ) -> Result<EditOutcome>
    where
        G: RowGateway<Row = Lead, Patch = LeadPatch> + ?Sized,
        R: NotificationRelay + ?Sized,
    {
        let lead = self
            .cache
            .get(id)
            .cloned()
            .ok_or_else(|| Error::InvalidOperation(format!("Lead not found: {}", id)))?;
        let options = self.options(classification).map(<[_]>::to_vec).unwrap_or_default();
        let editor = self.editor(classification, id);

        let outcome = editor.commit(&lead, value, &options, gateway, relay).await;
        if let EditOutcome::Updated(updated) = &outcome {
            self.cache.apply_update(updated.clone());
            self.sync_grid();
        }
        Ok(outcome)
    }

    pub async fn delete<K, G, R>(
        &mut self,
        id: &str,
        confirmer: &K,
        gateway: &G,
        relay: &R,
    ) -> Result<DeleteOutcome>
    where
        K: Confirmer + ?Sized,
        G: RowGateway<Row = Lead> + ?Sized,
        R: NotificationRelay + ?Sized,
    {
        let lead = self
            .cache
            .get(id)
            .cloned()
            .ok_or_else(|| Error::InvalidOperation(format!("Lead not found: {}", id)))?;
        let menu = self.menu(id);

        let outcome = menu.delete(&lead, confirmer, gateway, relay).await;
        if outcome == DeleteOutcome::Deleted {
            self.cache.apply_delete(id);
            self.menus.remove(id);
            self.editors.retain(|(_, lead_id), _| lead_id != id);
            self.sync_grid();
        }
        Ok(outcome)
    }

    /// Grid view with editor cells showing option display names, or
    /// "Loading..." until the options resolve.
    pub fn render(&self) -> GridView {
        let mut view = self.grid.render();
        for row in &mut view.rows {
            for cell in &mut row.cells {
                self.resolve_control(cell);
            }
        }
        for chip in &mut view.filters {
            self.resolve_chip(chip);
        }
        view
    }

    fn resolve_chip(&self, chip: &mut FilterChip) {
        let classification = match chip.column_id.as_str() {
            "stage" => Classification::Stage,
            "status" => Classification::Status,
            _ => return,
        };
        let Some(options) = self.options(classification) else {
            return;
        };
        let predicate = self
            .grid
            .filter()
            .active()
            .find_map(|(column_id, predicate)| (column_id == chip.column_id).then_some(predicate));
        chip.value = match predicate {
            Some(Predicate::Equals(value)) => display_name_for(options, value).to_string(),
            Some(Predicate::OneOf(values)) => values
                .iter()
                .map(|v| display_name_for(options, v))
                .collect::<Vec<_>>()
                .join(", "),
            _ => return,
        };
    }

    fn resolve_control(&self, cell: &mut BodyCell) {
        let CellContent::Control { control, value } = &mut cell.content else {
            return;
        };
        let classification = match control {
            ControlKind::StageEditor => Classification::Stage,
            ControlKind::StatusEditor => Classification::Status,
            ControlKind::ContactActions | ControlKind::ActionMenu => return,
        };
        *value = match self.options(classification) {
            Some(options) => display_name_for(options, value).to_string(),
            None => "Loading...".to_string(),
        };
    }

    fn sync_grid(&mut self) {
        debug!(
            rows = self.cache.snapshot().len(),
            stale = self.cache.is_stale(),
            "grid synced"
        );
        self.grid.set_rows(self.cache.snapshot());
    }
}
