//! Sequence-guarded snapshot replacement.
//!
//! A page of derived state is rebuilt wholesale on every refresh. When
//! refreshes overlap, a slow older rebuild must not overwrite a newer one,
//! so every rebuild takes a ticket up front and `install` discards any
//! ticket older than the last one applied.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoadTicket(u64);

#[derive(Debug)]
pub struct SnapshotCell<T> {
    next_seq: AtomicU64,
    current: RwLock<(u64, Arc<T>)>,
}

impl<T> SnapshotCell<T> {
    pub fn new(initial: T) -> Self {
        Self {
            next_seq: AtomicU64::new(1),
            current: RwLock::new((0, Arc::new(initial))),
        }
    }

    /// Claims the sequence number for a refresh about to start.
    pub fn begin(&self) -> LoadTicket {
        LoadTicket(self.next_seq.fetch_add(1, Ordering::SeqCst))
    }

    /// Installs a rebuilt snapshot. Returns false (and drops the value)
    /// when a newer snapshot was installed while this one was being
    /// computed.
    pub fn install(&self, ticket: LoadTicket, value: T) -> bool {
        let mut guard = self.current.write().expect("snapshot lock poisoned");
        if ticket.0 <= guard.0 {
            return false;
        }
        *guard = (ticket.0, Arc::new(value));
        true
    }

    /// The current snapshot. Cheap to clone, immutable once installed.
    pub fn read(&self) -> Arc<T> {
        self.current.read().expect("snapshot lock poisoned").1.clone()
    }
}

impl<T: Default> Default for SnapshotCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_install_wins() {
        let cell = SnapshotCell::new(0u32);
        let first = cell.begin();
        let second = cell.begin();
        assert!(cell.install(second, 2));
        assert_eq!(*cell.read(), 2);
        // The older rebuild finishes late and is discarded.
        assert!(!cell.install(first, 1));
        assert_eq!(*cell.read(), 2);
    }

    #[test]
    fn in_order_installs_apply() {
        let cell = SnapshotCell::new(String::new());
        let t1 = cell.begin();
        assert!(cell.install(t1, "first".to_string()));
        let t2 = cell.begin();
        assert!(cell.install(t2, "second".to_string()));
        assert_eq!(*cell.read(), "second");
    }

    #[test]
    fn tickets_are_single_use() {
        let cell = SnapshotCell::new(0u32);
        let ticket = cell.begin();
        assert!(cell.install(ticket, 1));
        assert!(!cell.install(ticket, 9));
        assert_eq!(*cell.read(), 1);
    }
}
