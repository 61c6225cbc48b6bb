use std::sync::{Arc, Mutex};

/// Shared teardown record for a texture's backing storage.
///
/// Every view over the same storage holds a clone of the same record; the
/// registered callback fires exactly once, when the last clone is dropped.
/// The record carries teardown, it does not perform backend work itself —
/// the callback is whatever the backend registered at allocation time.
#[derive(Clone)]
pub struct DisposalRecord {
    inner: Arc<RecordInner>,
}

struct RecordInner {
    callback: Mutex<Option<Box<dyn FnOnce() + Send>>>,
}

impl Drop for RecordInner {
    fn drop(&mut self) {
        let callback = self
            .callback
            .lock()
            .map(|mut slot| slot.take())
            .unwrap_or(None);
        if let Some(f) = callback {
            f();
        }
    }
}

impl DisposalRecord {
    /// Registers a teardown callback to fire when the last view is released.
    pub fn new(f: impl FnOnce() + Send + 'static) -> Self {
        Self {
            inner: Arc::new(RecordInner {
                callback: Mutex::new(Some(Box::new(f))),
            }),
        }
    }

    /// A record with no teardown work (storage freed by normal Drop order).
    pub fn noop() -> Self {
        Self {
            inner: Arc::new(RecordInner {
                callback: Mutex::new(None),
            }),
        }
    }

    /// True when both records guard the same underlying storage.
    #[inline]
    pub fn same_storage(&self, other: &DisposalRecord) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl std::fmt::Debug for DisposalRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DisposalRecord")
            .field("views", &Arc::strong_count(&self.inner))
            .finish()
    }
}
