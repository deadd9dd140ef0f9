//! Lifecycle stages and the crossing predicate
//!
//! The host platform tracks how "alive" an app instance is as a coarse,
//! totally ordered stage. Transitions may skip stages (a backgrounded app
//! can go straight from `Focused` to `Dead`), so consumers detect edges
//! with [`Stage::crosses`] rather than comparing adjacent stages.

/// Coarse lifecycle stage of the app instance, ordered from least to most
/// alive. The derived `Ord` follows declaration order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    /// The instance is not running or is about to be torn down.
    #[default]
    Dead,
    /// Running, but not drawable (no surface).
    Alive,
    /// Drawable: a surface exists and paint events may be delivered.
    Visible,
    /// Visible and receiving input focus.
    Focused,
}

/// Result of testing a stage transition against a threshold stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Crossing {
    /// The transition rose from below the threshold to at-or-above it.
    Up,
    /// The transition fell from at-or-above the threshold to below it.
    Down,
    /// The threshold was not crossed in either direction.
    None,
}

impl Stage {
    /// Reports whether a transition from `self` to `to` crosses `threshold`.
    ///
    /// `Up` iff `self < threshold <= to`; `Down` iff
    /// `self >= threshold > to`. Holds regardless of how many intermediate
    /// stages the transition skips.
    pub fn crosses(self, to: Stage, threshold: Stage) -> Crossing {
        if self < threshold && threshold <= to {
            Crossing::Up
        } else if self >= threshold && threshold > to {
            Crossing::Down
        } else {
            Crossing::None
        }
    }
}
