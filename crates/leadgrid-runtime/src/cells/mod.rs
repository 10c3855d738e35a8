//! Interactive cell behaviors of the leads grid.
//!
//! The engine renders these cells as controls; each behavior here owns its
//! own busy flag and reports its outcome through a [`crate::NotificationRelay`].

mod actions;
mod contact;
mod editor;

use std::sync::atomic::{AtomicBool, Ordering};

pub use actions::{ActionMenu, DeleteOutcome};
pub use contact::ContactActions;
pub use editor::{ClassificationEditor, EditOutcome, EditorView, OptionView};

/// Clears the busy flag when dropped.
pub(crate) struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    /// Set the flag, or `None` if it is already set.
    pub(crate) fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_is_exclusive_and_released_on_drop() {
        let flag = AtomicBool::new(false);
        let guard = InFlightGuard::acquire(&flag);
        assert!(guard.is_some());
        assert!(InFlightGuard::acquire(&flag).is_none());
        drop(guard);
        assert!(InFlightGuard::acquire(&flag).is_some());
    }
}
