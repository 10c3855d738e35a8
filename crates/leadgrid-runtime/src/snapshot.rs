use std::sync::Arc;

use leadgrid_types::GridRow;
use tracing::{debug, warn};

/// Identifies one list fetch; later tickets supersede earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FetchTicket(u64);

/// Latest entity list plus the bookkeeping to reconcile it.
///
/// Snapshots are immutable: every change swaps in a new `Arc<Vec<T>>`.
/// Local patches mark the cache stale until the next applied fetch.
#[derive(Debug)]
pub struct SnapshotCache<T> {
    snapshot: Arc<Vec<T>>,
    stale: bool,
    loaded: bool,
    issued: u64,
    applied: u64,
}

impl<T> Default for SnapshotCache<T> {
    fn default() -> Self {
        Self {
            snapshot: Arc::new(Vec::new()),
            stale: true,
            loaded: false,
            issued: 0,
            applied: 0,
        }
    }
}

impl<T: GridRow + Clone> SnapshotCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Arc<Vec<T>> {
        self.snapshot.clone()
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// True once any fetch has been applied.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.snapshot.iter().find(|row| row.row_id() == id)
    }

    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.issued += 1;
        FetchTicket(self.issued)
    }

    /// Apply a fetch result unless a newer one has already been applied.
    pub fn resolve(&mut self, ticket: FetchTicket, rows: Vec<T>) -> bool {
        if ticket.0 <= self.applied {
            warn!(
                ticket = ticket.0,
                applied = self.applied,
                "discarding stale fetch result"
            );
            return false;
        }
        debug!(ticket = ticket.0, rows = rows.len(), "snapshot applied");
        self.applied = ticket.0;
        self.snapshot = Arc::new(rows);
        self.stale = ticket.0 < self.issued;
        self.loaded = true;
        true
    }

    /// Replace the row with the same id in a new snapshot.
    pub fn apply_update(&mut self, row: T) -> bool {
        let id = row.row_id().to_string();
        let Some(index) = self.snapshot.iter().position(|r| r.row_id() == id) else {
            return false;
        };
        let mut next = self.snapshot.as_ref().clone();
        next[index] = row;
        self.snapshot = Arc::new(next);
        self.stale = true;
        true
    }

    pub fn apply_insert(&mut self, row: T) {
        let mut next = self.snapshot.as_ref().clone();
        next.insert(0, row);
        self.snapshot = Arc::new(next);
        self.stale = true;
    }

    pub fn apply_delete(&mut self, id: &str) -> bool {
        if !self.snapshot.iter().any(|r| r.row_id() == id) {
            return false;
        }
        let next: Vec<T> = self
            .snapshot
            .iter()
            .filter(|r| r.row_id() != id)
            .cloned()
            .collect();
        self.snapshot = Arc::new(next);
        self.stale = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Debug, Clone, PartialEq, Serialize)]
    struct Row {
        id: &'static str,
        v: u32,
    }

    impl GridRow for Row {
        fn row_id(&self) -> &str {
            self.id
        }
    }

    #[test]
    fn test_late_response_is_discarded() {
        let mut cache = SnapshotCache::new();
        let first = cache.begin_fetch();
        let second = cache.begin_fetch();

        assert!(cache.resolve(second, vec![Row { id: "b", v: 2 }]));
        assert!(!cache.resolve(first, vec![Row { id: "a", v: 1 }]));
        assert_eq!(cache.snapshot().as_slice(), &[Row { id: "b", v: 2 }]);
        assert!(!cache.is_stale());
    }

    #[test]
    fn test_update_swaps_snapshot_and_marks_stale() {
        let mut cache = SnapshotCache::new();
        let t = cache.begin_fetch();
        cache.resolve(t, vec![Row { id: "a", v: 1 }, Row { id: "b", v: 1 }]);
        let before = cache.snapshot();

        assert!(cache.apply_update(Row { id: "b", v: 9 }));
        assert_eq!(before[1].v, 1);
        assert_eq!(cache.get("b").map(|r| r.v), Some(9));
        assert!(cache.is_stale());

        assert!(cache.apply_delete("a"));
        assert!(!cache.apply_delete("a"));
        assert_eq!(cache.snapshot().len(), 1);
    }
}
