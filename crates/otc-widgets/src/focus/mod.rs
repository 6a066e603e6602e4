#![forbid(unsafe_code)]

//! Focus handles for segmented inputs.
//!
//! The UI layer owns the real focusable elements (DOM inputs, terminal
//! cells, test doubles). It registers one handle per cell when the cell
//! mounts and removes it on unmount. The controller only ever talks to the
//! [`Focusable`] capability through a [`FocusRegistry`].

mod registry;

pub use registry::FocusRegistry;

use std::rc::Rc;

/// Something that can take input focus and select its own content.
pub trait Focusable {
    /// Move input focus to this element.
    fn focus(&self);

    /// Select the element's current content so the next keystroke replaces it.
    fn select_content(&self);
}

impl<T: Focusable + ?Sized> Focusable for &T {
    fn focus(&self) {
        (**self).focus();
    }

    fn select_content(&self) {
        (**self).select_content();
    }
}

impl<T: Focusable + ?Sized> Focusable for Rc<T> {
    fn focus(&self) {
        (**self).focus();
    }

    fn select_content(&self) {
        (**self).select_content();
    }
}

impl<T: Focusable + ?Sized> Focusable for Box<T> {
    fn focus(&self) {
        (**self).focus();
    }

    fn select_content(&self) {
        (**self).select_content();
    }
}
