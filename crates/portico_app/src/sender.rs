//! Producer-side handle for the event queue
//!
//! The platform glue runs on the native UI thread and pushes events through
//! an [`EventSender`] into the bounded queue the application loop drains.
//! Backpressure policy is per event kind: lifecycle, size, and paint events
//! block the native thread until the queue has room (they must not be
//! lost), while high-frequency touch events are dropped under pressure.

use std::sync::mpsc::{SyncSender, TrySendError};

use portico_core::Event;
use thiserror::Error;

/// The consumer side of the queue is gone; producers should stop.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Event queue closed: the application loop has shut down")]
pub struct QueueClosed;

/// Clonable producer handle feeding the application loop.
///
/// Dropping every `EventSender` ends the loop's event sequence, which is
/// how a severed native bridge is signalled to application code.
#[derive(Clone)]
pub struct EventSender {
    tx: SyncSender<Event>,
}

impl EventSender {
    pub(crate) fn new(tx: SyncSender<Event>) -> Self {
        Self { tx }
    }

    /// Enqueue an event for the application loop.
    ///
    /// Blocks while the queue is full, except for touch events, which are
    /// dropped instead so a slow consumer cannot stall the native input
    /// pipeline. Returns [`QueueClosed`] once the loop has shut down.
    pub fn send(&self, event: Event) -> Result<(), QueueClosed> {
        match event {
            Event::Touch(_) => match self.tx.try_send(event) {
                Ok(()) => Ok(()),
                Err(TrySendError::Full(ev)) => {
                    tracing::trace!(?ev, "event queue full, dropping touch event");
                    Ok(())
                }
                Err(TrySendError::Disconnected(_)) => Err(QueueClosed),
            },
            _ => self.tx.send(event).map_err(|_| QueueClosed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{App, LoopConfig};
    use portico_core::{PaintEvent, Stage, TouchEvent, TouchPhase};

    fn touch(sequence: u64) -> Event {
        Event::Touch(TouchEvent {
            sequence,
            phase: TouchPhase::Move,
            x: 0.0,
            y: 0.0,
        })
    }

    #[test]
    fn test_touch_dropped_when_queue_full() {
        let (mut app, sender) = App::new(LoopConfig {
            threshold: Stage::Visible,
            queue_capacity: 4,
        });

        // Nobody is draining: the first four fill the queue, the rest are
        // dropped, and none of the sends block or error.
        for sequence in 0..10 {
            sender.send(touch(sequence)).unwrap();
        }
        drop(sender);

        let delivered: Vec<Event> = app.by_ref().collect();
        assert_eq!(delivered.len(), 4);
        for (i, event) in delivered.iter().enumerate() {
            match event {
                Event::Touch(t) => assert_eq!(t.sequence, i as u64),
                other => panic!("expected touch, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_send_after_loop_dropped_is_queue_closed() {
        let (app, sender) = App::new(LoopConfig::default());
        drop(app);

        assert_eq!(sender.send(touch(0)), Err(QueueClosed));
        assert_eq!(
            sender.send(Event::Paint(PaintEvent::default())),
            Err(QueueClosed)
        );
    }
}
