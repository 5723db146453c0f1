#![forbid(unsafe_code)]

//! Ordered record of open overlays.
//!
//! # Invariants
//!
//! - Ids are unique within the stack.
//! - The last entry is the topmost overlay.
//! - Removal by id searches from the top and removes one entry.

/// One open overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OverlayStackEntry {
    pub id: String,
    pub z_index: u32,
    /// Extra backdrop classes, whitespace separated.
    pub modal_class: Option<String>,
}

impl OverlayStackEntry {
    /// The extra backdrop classes.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.modal_class
            .as_deref()
            .unwrap_or_default()
            .split_whitespace()
    }
}

/// LIFO stack of open overlays.
#[derive(Debug, Clone, Default)]
pub struct OverlayStack {
    entries: Vec<OverlayStackEntry>,
}

impl OverlayStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The topmost entry.
    #[must_use]
    pub fn top(&self) -> Option<&OverlayStackEntry> {
        self.entries.last()
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Push on top. Returns `false` without pushing when the id is present.
    pub fn push(&mut self, entry: OverlayStackEntry) -> bool {
        if self.contains(&entry.id) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Remove the topmost entry.
    pub fn pop(&mut self) -> Option<OverlayStackEntry> {
        self.entries.pop()
    }

    /// Remove the entry with `id` wherever it sits.
    pub fn remove(&mut self, id: &str) -> Option<OverlayStackEntry> {
        let index = self.entries.iter().rposition(|e| e.id == id)?;
        Some(self.entries.remove(index))
    }

    /// Entries from bottom to top.
    #[must_use]
    pub fn entries(&self) -> &[OverlayStackEntry] {
        &self.entries
    }
}
