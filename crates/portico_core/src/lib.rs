//! Portico Core
//!
//! Foundational types for the Portico mobile bridge:
//!
//! - **Lifecycle stages**: how "alive" the app instance currently is, with a
//!   crossing predicate for edge-transition detection
//! - **Event model**: the closed set of events a platform delivers to the
//!   application loop
//! - **Draw context**: an opaque capability for drawing into the current
//!   surface, valid only between visibility crossings
//!
//! # Example
//!
//! ```rust
//! use portico_core::{Crossing, Stage};
//!
//! // Dead -> Focused skips Visible entirely, but still reports the crossing.
//! assert_eq!(Stage::Dead.crosses(Stage::Focused, Stage::Visible), Crossing::Up);
//! ```

pub mod draw_context;
pub mod event;
pub mod stage;

pub use draw_context::DrawContext;
pub use event::{Event, LifecycleEvent, Orientation, PaintEvent, SizeEvent, TouchEvent, TouchPhase};
pub use stage::{Crossing, Stage};
