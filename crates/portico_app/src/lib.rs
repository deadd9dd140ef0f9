//! Portico Application Loop
//!
//! Turns asynchronous, thread-affine native platform callbacks into one
//! ordered, pull-based event stream. The platform glue (an `extensions/`
//! crate) holds the [`EventSender`] and feeds lifecycle, size, paint, and
//! touch events from the native UI thread; application code drains the
//! [`App`] on its own thread and may inject events of its own, for example
//! a repaint request after input changed some state.
//!
//! # Example
//!
//! ```ignore
//! use portico_app::{App, LoopConfig};
//! use portico_core::{Event, TouchPhase};
//!
//! let (mut app, sender) = App::new(LoopConfig::default());
//! app.on_draw(|ctx| { /* paint into the platform context */ });
//!
//! // `sender` goes to the platform glue; the app thread just iterates.
//! while let Some(event) = app.next_event() {
//!     if let Event::Touch(touch) = event {
//!         if touch.phase == TouchPhase::End {
//!             app.request_paint();
//!         }
//!     }
//! }
//! ```

mod app;
mod sender;

pub use app::{App, LoopConfig};
pub use sender::{EventSender, QueueClosed};

// Re-export the event model so app code can depend on this crate alone.
pub use portico_core::{
    Crossing, DrawContext, Event, LifecycleEvent, Orientation, PaintEvent, SizeEvent, Stage,
    TouchEvent, TouchPhase,
};
