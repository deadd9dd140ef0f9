//! Platform event model
//!
//! The closed set of events the platform glue delivers into the application
//! loop. Events are immutable once constructed and consumed exactly once by
//! the loop's dispatch step.

use crate::draw_context::DrawContext;
use crate::stage::{Crossing, Stage};

/// A platform or application-originated event.
#[derive(Clone, Debug)]
pub enum Event {
    /// Lifecycle stage transition.
    Lifecycle(LifecycleEvent),
    /// Display size / density / orientation change.
    Size(SizeEvent),
    /// Request to repaint the surface.
    Paint(PaintEvent),
    /// Touch input.
    Touch(TouchEvent),
}

/// A transition between lifecycle stages.
///
/// An upward crossing of the loop's visibility threshold carries the draw
/// context for the newly created surface; other transitions carry `None`.
#[derive(Clone, Debug)]
pub struct LifecycleEvent {
    pub from: Stage,
    pub to: Stage,
    pub draw_context: Option<DrawContext>,
}

impl LifecycleEvent {
    /// Reports whether this transition crosses `threshold`.
    ///
    /// See [`Stage::crosses`]; multi-step transitions that skip the
    /// threshold still report the crossing.
    pub fn crosses(&self, threshold: Stage) -> Crossing {
        self.from.crosses(self.to, threshold)
    }
}

/// Screen orientation as reported by the platform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Orientation {
    #[default]
    Unknown,
    Portrait,
    Landscape,
}

/// Display geometry change. Informational; the loop records it and performs
/// no further side effects.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SizeEvent {
    /// Physical pixels per density-independent point.
    pub pixels_per_point: f32,
    pub orientation: Orientation,
}

/// Request to repaint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PaintEvent {
    /// True for repaints injected by application code (for example after a
    /// state change triggered by input), false for platform-generated paints.
    pub external: bool,
}

/// Phase of a touch sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchPhase {
    Begin,
    Move,
    End,
    /// The platform took over the gesture (for example a system edge swipe).
    Cancel,
}

/// A single touch sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchEvent {
    /// Identifies the touch sequence a sample belongs to; stable from
    /// `Begin` through `End`/`Cancel` for one finger.
    pub sequence: u64,
    pub phase: TouchPhase,
    /// Window-space coordinates in physical pixels.
    pub x: f32,
    pub y: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_crossing_delegates_to_stage() {
        let up = LifecycleEvent {
            from: Stage::Dead,
            to: Stage::Visible,
            draw_context: Some(DrawContext::new(())),
        };
        assert_eq!(up.crosses(Stage::Visible), Crossing::Up);

        let down = LifecycleEvent {
            from: Stage::Focused,
            to: Stage::Alive,
            draw_context: None,
        };
        assert_eq!(down.crosses(Stage::Visible), Crossing::Down);
    }
}
