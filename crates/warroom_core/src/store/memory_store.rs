//! In-process document store.
//!
//! Keeps the last saved document in memory. Used by tests and by embedders
//! that persist through their own channel.

use super::{DocumentStore, StoreError, StoreResult};
use crate::model::document::Document;
use std::cell::{Cell, RefCell};
use std::io;
use std::path::PathBuf;

/// Document store holding its state in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    document: RefCell<Option<Document>>,
    save_count: Cell<usize>,
    fail_saves: Cell<bool>,
}

impl MemoryStore {
    /// Empty store; the first `load()` yields the default document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `document`.
    pub fn with_document(document: Document) -> Self {
        Self {
            document: RefCell::new(Some(document)),
            ..Self::default()
        }
    }

    /// Last successfully saved (or seeded) document.
    pub fn snapshot(&self) -> Option<Document> {
        self.document.borrow().clone()
    }

    /// Number of successful `save()` calls.
    pub fn save_count(&self) -> usize {
        self.save_count.get()
    }

    /// Makes subsequent saves fail with an I/O error.
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.set(fail);
    }
}

impl DocumentStore for MemoryStore {
    fn load(&self) -> StoreResult<Document> {
        let mut slot = self.document.borrow_mut();
        Ok(slot.get_or_insert_with(Document::default).clone())
    }

    fn save(&self, document: &Document) -> StoreResult<()> {
        if self.fail_saves.get() {
            return Err(StoreError::io(
                "write",
                PathBuf::from("memory"),
                io::Error::other("memory store configured to fail saves"),
            ));
        }
        *self.document.borrow_mut() = Some(document.clone());
        self.save_count.set(self.save_count.get() + 1);
        Ok(())
    }
}
