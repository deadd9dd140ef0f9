//! Opaque draw-context capability
//!
//! The platform owns the actual graphics object (a native window, an EGL
//! surface, a GPU context). Application code only ever sees it through a
//! [`DrawContext`]: a cheap clonable handle with an explicit validity
//! window. The application loop acquires the handle on an upward visibility
//! crossing and invalidates it on the downward crossing; after that,
//! [`DrawContext::downcast`] refuses to hand the payload out instead of
//! trusting callers to respect the window.

use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Capability to draw into the current visible surface.
///
/// Clones share the payload and the validity flag: invalidating any clone
/// invalidates all of them.
#[derive(Clone)]
pub struct DrawContext {
    payload: Arc<dyn Any + Send + Sync>,
    valid: Arc<AtomicBool>,
}

impl DrawContext {
    /// Wrap a platform graphics object in a fresh, valid handle.
    pub fn new<T: Any + Send + Sync>(payload: T) -> Self {
        Self {
            payload: Arc::new(payload),
            valid: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Access the platform payload as its concrete type.
    ///
    /// Returns `None` if `T` is not the payload type or if the handle has
    /// been invalidated by a downward visibility crossing.
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        if !self.is_valid() {
            return None;
        }
        Arc::clone(&self.payload).downcast::<T>().ok()
    }

    /// Whether the handle is still inside its validity window.
    pub fn is_valid(&self) -> bool {
        self.valid.load(Ordering::Acquire)
    }

    /// Mark the handle (and all clones) invalid. Idempotent.
    ///
    /// Called by the application loop when the surface goes away; the
    /// platform layer is free to release the underlying resource afterwards.
    pub fn invalidate(&self) {
        if self.valid.swap(false, Ordering::AcqRel) {
            tracing::debug!("draw context invalidated");
        }
    }
}

impl std::fmt::Debug for DrawContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawContext")
            .field("valid", &self.is_valid())
            .finish_non_exhaustive()
    }
}
