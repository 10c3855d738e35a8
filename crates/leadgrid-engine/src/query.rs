use leadgrid_types::CellValue;
use serde::Serialize;
use tracing::debug;

use crate::column::ColumnModel;
use crate::filter::FilterState;
use crate::pagination::PaginationState;
use crate::sort::{SortState, compare_directed};

/// Derived window of a snapshot.
///
/// `ordered` holds every filtered row index in sort order; `visible` is the
/// current page slice of it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueryResult {
    pub ordered: Vec<usize>,
    pub visible: Vec<usize>,
    pub total_filtered: usize,
    pub page_count: usize,
}

/// Filter, sort and paginate `rows`.
///
/// The page index is used as given; callers clamp it against
/// `page_count` before rendering.
pub fn compute<T>(
    rows: &[T],
    columns: &ColumnModel<T>,
    filter: &FilterState,
    sort: &SortState,
    pagination: &PaginationState,
) -> QueryResult {
    let ordered = filter_and_sort(rows, columns, filter, sort);
    let total_filtered = ordered.len();
    let page_count = pagination.page_count(total_filtered);
    let visible = ordered
        .iter()
        .skip(pagination.offset())
        .take(pagination.page_size)
        .copied()
        .collect();

    QueryResult {
        ordered,
        visible,
        total_filtered,
        page_count,
    }
}

pub(crate) fn filter_and_sort<T>(
    rows: &[T],
    columns: &ColumnModel<T>,
    filter: &FilterState,
    sort: &SortState,
) -> Vec<usize> {
    let needle = filter.global_text.trim().to_lowercase();

    let predicates: Vec<_> = filter
        .active()
        .filter_map(|(column_id, predicate)| match columns.get(column_id) {
            Some(column) if column.accessor.is_some() => Some((column, predicate)),
            _ => {
                debug!(column_id, "ignoring predicate on unknown column");
                None
            }
        })
        .collect();

    let mut ordered: Vec<usize> = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| needle.is_empty() || matches_search(*row, columns, &needle))
        .filter(|(_, row)| {
            predicates.iter().all(|(column, predicate)| {
                column
                    .value(row)
                    .is_some_and(|value| predicate.matches(&value))
            })
        })
        .map(|(index, _)| index)
        .collect();

    if let Some(directive) = &sort.directive {
        match columns.get(&directive.column_id) {
            Some(column) if column.sortable && column.accessor.is_some() => {
                let mut keyed: Vec<(usize, CellValue)> = ordered
                    .iter()
                    .map(|&i| (i, column.value(&rows[i]).unwrap_or_default()))
                    .collect();
                // stable: equal keys keep input order
                keyed.sort_by(|(_, a), (_, b)| compare_directed(a, b, directive.descending));
                ordered = keyed.into_iter().map(|(i, _)| i).collect();
            }
            _ => debug!(column_id = %directive.column_id, "sort column not sortable"),
        }
    }

    ordered
}

fn matches_search<T>(row: &T, columns: &ColumnModel<T>, needle: &str) -> bool {
    columns.iter().any(|column| match column.value(row) {
        Some(CellValue::Text(text)) => text.to_lowercase().contains(needle),
        _ => false,
    })
}
