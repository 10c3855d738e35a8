use std::collections::BTreeSet;

/// Selected row ids. Survives filtering and paging; pruning is explicit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    ids: BTreeSet<String>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Flip one row; returns the new selected flag.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    pub fn set(&mut self, id: &str, selected: bool) {
        if selected {
            self.ids.insert(id.to_string());
        } else {
            self.ids.remove(id);
        }
    }

    pub fn set_many<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>, selected: bool) {
        for id in ids {
            self.set(id, selected);
        }
    }

    /// Drop every id not in `keep`; returns how many were removed.
    pub fn retain<'a>(&mut self, keep: impl IntoIterator<Item = &'a str>) -> usize {
        let keep: BTreeSet<&str> = keep.into_iter().collect();
        let before = self.ids.len();
        self.ids.retain(|id| keep.contains(id.as_str()));
        before - self.ids.len()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn replace<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) {
        self.ids = ids.into_iter().map(str::to_string).collect();
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_and_retain() {
        let mut selection = SelectionState::new();
        assert!(selection.toggle("a"));
        selection.set_many(["b", "c"], true);
        assert!(!selection.toggle("a"));

        let removed = selection.retain(["c", "z"]);
        assert_eq!(removed, 1);
        assert_eq!(selection.ids().collect::<Vec<_>>(), vec!["c"]);
    }
}
