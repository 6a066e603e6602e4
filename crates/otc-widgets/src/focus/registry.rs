#![forbid(unsafe_code)]

//! Cell index to focus handle registry.
//!
//! # Failure Modes
//!
//! - Requests for an index with no registered handle (not mounted yet, or
//!   already unmounted) are skipped and reported as `false`. They never
//!   panic; a trace event records the miss.

use super::Focusable;

/// Registry mapping cell indices to focusable handles.
#[derive(Debug)]
pub struct FocusRegistry<H> {
    handles: Vec<Option<H>>,
}

impl<H> Default for FocusRegistry<H> {
    fn default() -> Self {
        Self {
            handles: Vec::new(),
        }
    }
}

impl<H> FocusRegistry<H> {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handle` for `index`, returning the handle it replaces.
    pub fn register(&mut self, index: usize, handle: H) -> Option<H> {
        if index >= self.handles.len() {
            self.handles.resize_with(index + 1, || None);
        }
        self.handles[index].replace(handle)
    }

    /// Remove and return the handle for `index`.
    pub fn unregister(&mut self, index: usize) -> Option<H> {
        let handle = self.handles.get_mut(index)?.take();
        while matches!(self.handles.last(), Some(None)) {
            self.handles.pop();
        }
        handle
    }

    /// Handle registered for `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&H> {
        self.handles.get(index)?.as_ref()
    }

    /// Whether `index` has a handle.
    #[must_use]
    pub fn is_registered(&self, index: usize) -> bool {
        self.get(index).is_some()
    }

    /// Number of registered handles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.iter().flatten().count()
    }

    /// True when no handle is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registered `(index, handle)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &H)> + '_ {
        self.handles
            .iter()
            .enumerate()
            .filter_map(|(index, handle)| handle.as_ref().map(|h| (index, h)))
    }

    /// Drop every handle.
    pub fn clear(&mut self) {
        self.handles.clear();
    }
}

impl<H: Focusable> FocusRegistry<H> {
    /// Focus the handle at `index`. Returns false if none is registered.
    pub fn focus(&self, index: usize) -> bool {
        match self.get(index) {
            Some(handle) => {
                handle.focus();
                true
            }
            None => {
                tracing::trace!(index, "focus target not registered");
                false
            }
        }
    }

    /// Select the content of the handle at `index`. Returns false if none is
    /// registered.
    pub fn select_content(&self, index: usize) -> bool {
        match self.get(index) {
            Some(handle) => {
                handle.select_content();
                true
            }
            None => {
                tracing::trace!(index, "select target not registered");
                false
            }
        }
    }
}
