use leadgrid_engine::{FilterState, Predicate};
use leadgrid_types::UserProfile;

use super::{AppState, LeadFilters};

pub fn is_authenticated(state: &AppState) -> bool {
    state.auth.is_authenticated()
}

pub fn current_user(state: &AppState) -> Option<&UserProfile> {
    state.auth.user.as_ref()
}

pub fn selected_count(state: &AppState) -> usize {
    state.leads.selected.len()
}

pub fn is_edit_modal_open(state: &AppState) -> bool {
    state.leads.editing.is_some()
}

/// Number of non-empty filter inputs, including the name search.
pub fn active_filter_count(filters: &LeadFilters) -> usize {
    [
        &filters.name,
        &filters.stage,
        &filters.department,
        &filters.source,
        &filters.assigned_to,
    ]
    .iter()
    .filter(|v| !v.trim().is_empty())
    .count()
}

/// Translate the leads screen filter inputs into grid filter state.
///
/// The name input drives the global search; the rest become equality
/// predicates on the matching lead columns.
pub fn grid_filter(filters: &LeadFilters) -> FilterState {
    let mut state = FilterState::new().search(filters.name.trim());
    for (column_id, value) in [
        ("stage", &filters.stage),
        ("department", &filters.department),
        ("source", &filters.source),
        ("assignedTo", &filters.assigned_to),
    ] {
        state.set(column_id, Predicate::equals(value.trim()));
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_filter_skips_blank_inputs() {
        let filters = LeadFilters {
            name: " asha ".into(),
            stage: "initial".into(),
            source: "  ".into(),
            ..Default::default()
        };
        let state = grid_filter(&filters);
        assert_eq!(state.global_text, "asha");
        assert_eq!(state.active_count(), 1);
        assert_eq!(active_filter_count(&filters), 2);
    }
}
