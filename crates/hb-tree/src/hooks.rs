//! Formatting lifecycle hooks.
//!
//! The host fires three notifications while rendering: page-formatting
//! (before a page's HTML is serialized), page-written (after its output
//! file lands on disk) and build-finished (once, after the whole tree).
//! Listeners are dispatched synchronously in registration order; the first
//! error aborts the build.

use std::error::Error;
use std::path::Path;

use crate::tree::{DocTree, Page};

/// Error returned by a hook listener.
///
/// Wraps the listener's own error type; the host reports it through its
/// error channel and aborts the build.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct HookError(Box<dyn Error + Send + Sync>);

impl HookError {
    /// Wrap a listener error.
    pub fn new(source: impl Error + Send + Sync + 'static) -> Self {
        Self(Box::new(source))
    }
}

/// Listener for formatting lifecycle notifications.
///
/// All methods default to no-ops so listeners only override the
/// notifications they consume.
pub trait FormatListener {
    /// Fired once per page before its HTML is serialized.
    ///
    /// The page's [`output_attrs`](Page::output_attrs) may still be changed
    /// here; they are read-only once the page is written.
    fn page_formatting(&mut self, page: &mut Page) -> Result<(), HookError> {
        let _ = page;
        Ok(())
    }

    /// Fired once per page after its output file has been written.
    ///
    /// `path` is the absolute output path of the rendered page.
    fn page_written(&mut self, page: &Page, path: &Path) -> Result<(), HookError> {
        let _ = (page, path);
        Ok(())
    }

    /// Fired exactly once after the whole tree has been rendered.
    fn build_finished(&mut self, tree: &DocTree) -> Result<(), HookError> {
        let _ = tree;
        Ok(())
    }
}

/// Ordered registry of format listeners.
#[derive(Default)]
pub struct HookRegistry {
    listeners: Vec<Box<dyn FormatListener>>,
}

impl HookRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. Listeners are notified in registration order.
    pub fn register(&mut self, listener: Box<dyn FormatListener>) {
        self.listeners.push(listener);
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// True if no listeners are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Dispatch the page-formatting notification.
    pub fn page_formatting(&mut self, page: &mut Page) -> Result<(), HookError> {
        for listener in &mut self.listeners {
            listener.page_formatting(page)?;
        }
        Ok(())
    }

    /// Dispatch the page-written notification.
    pub fn page_written(&mut self, page: &Page, path: &Path) -> Result<(), HookError> {
        for listener in &mut self.listeners {
            listener.page_written(page, path)?;
        }
        Ok(())
    }

    /// Dispatch the build-finished notification.
    pub fn build_finished(&mut self, tree: &DocTree) -> Result<(), HookError> {
        for listener in &mut self.listeners {
            listener.build_finished(tree)?;
        }
        Ok(())
    }
}
