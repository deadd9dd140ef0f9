//! The application loop
//!
//! Native platform callbacks (lifecycle, size, paint, touch) arrive
//! asynchronously on the platform's UI thread. [`App`] serializes them into
//! one ordered, pull-based event stream and owns the state those events
//! mutate: the current lifecycle stage, the draw-context handle, and the
//! display geometry. Application code drains the stream from a single
//! thread:
//!
//! ```ignore
//! let (mut app, sender) = App::new(LoopConfig::default());
//! app.on_draw(|ctx| { /* paint into ctx */ });
//! while let Some(event) = app.next_event() {
//!     if let Event::Touch(touch) = event {
//!         if touch.phase == TouchPhase::End {
//!             app.request_paint();
//!         }
//!     }
//! }
//! ```
//!
//! The stream ends when every producer handle is gone (the native bridge
//! was severed) or after a lifecycle transition to [`Stage::Dead`]. It is
//! not restartable.

use std::collections::VecDeque;
use std::sync::mpsc::{sync_channel, Receiver};

use portico_core::{Crossing, DrawContext, Event, Orientation, PaintEvent, Stage};

use crate::sender::EventSender;

/// Configuration for an application loop.
#[derive(Clone, Copy, Debug)]
pub struct LoopConfig {
    /// Stage whose crossings acquire and release the draw context.
    pub threshold: Stage,
    /// Capacity of the inbound event queue. Non-touch producers block when
    /// it fills; touch events are dropped instead.
    pub queue_capacity: usize,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            threshold: Stage::Visible,
            queue_capacity: 64,
        }
    }
}

type FilterHook = Box<dyn FnMut(Event) -> Event + Send>;
type DrawHook = Box<dyn FnMut(&DrawContext) + Send>;
type FrameCompleteHook = Box<dyn FnMut() + Send>;

/// Single-threaded application loop over platform events.
///
/// The loop alone mutates the lifecycle stage and the cached draw context;
/// application code reads them through the accessors and must not hold the
/// draw context past a downward crossing (the handle fails its downcast
/// after invalidation).
pub struct App {
    rx: Receiver<Event>,
    /// Injected events plus any producer events drained ahead of them to
    /// preserve queue order.
    pending: VecDeque<Event>,
    threshold: Stage,
    stage: Stage,
    visible: bool,
    draw_context: Option<DrawContext>,
    pixels_per_point: f32,
    orientation: Orientation,
    done: bool,
    filter: Option<FilterHook>,
    draw: Option<DrawHook>,
    frame_complete: Option<FrameCompleteHook>,
}

impl App {
    /// Create a loop and the producer handle the platform glue feeds.
    pub fn new(config: LoopConfig) -> (App, EventSender) {
        let (tx, rx) = sync_channel(config.queue_capacity.max(1));
        let app = App {
            rx,
            pending: VecDeque::new(),
            threshold: config.threshold,
            stage: Stage::Dead,
            visible: false,
            draw_context: None,
            pixels_per_point: 1.0,
            orientation: Orientation::Unknown,
            done: false,
            filter: None,
            draw: None,
            frame_complete: None,
        };
        (app, EventSender::new(tx))
    }

    /// Observe or transform each raw event before the dispatch step commits
    /// any state change tied to it.
    pub fn set_filter(&mut self, filter: impl FnMut(Event) -> Event + Send + 'static) {
        self.filter = Some(Box::new(filter));
    }

    /// Draw callback, invoked during paint dispatch only while visible.
    ///
    /// Must not block indefinitely; the loop signals frame completion on
    /// its behalf after it returns.
    pub fn on_draw(&mut self, draw: impl FnMut(&DrawContext) + Send + 'static) {
        self.draw = Some(Box::new(draw));
    }

    /// Publish/swap acknowledgement to the native layer, invoked exactly
    /// once per performed draw.
    pub fn on_frame_complete(&mut self, hook: impl FnMut() + Send + 'static) {
        self.frame_complete = Some(Box::new(hook));
    }

    /// Pull the next event: receive, filter, dispatch, yield.
    ///
    /// Returns `None` once the stream has ended; no partial dispatch is
    /// observable.
    pub fn next_event(&mut self) -> Option<Event> {
        if self.done {
            return None;
        }
        let raw = match self.pending.pop_front() {
            Some(ev) => ev,
            None => match self.rx.recv() {
                Ok(ev) => ev,
                Err(_) => {
                    tracing::debug!("all event producers gone, ending event stream");
                    self.done = true;
                    return None;
                }
            },
        };
        let event = match self.filter.as_mut() {
            Some(filter) => filter(raw),
            None => raw,
        };
        self.dispatch(&event);
        Some(event)
    }

    /// Inject an application-originated event into the stream.
    ///
    /// The event is ordered after everything producers had enqueued before
    /// this call, and injections stay FIFO among themselves. Only
    /// meaningful from the thread iterating the loop (enforced by `&mut`).
    pub fn send(&mut self, event: Event) {
        self.inject(event);
    }

    /// Inject an external repaint request ([`PaintEvent`] with
    /// `external: true`), typically after input changed application state.
    pub fn request_paint(&mut self) {
        self.send(Event::Paint(PaintEvent { external: true }));
    }

    /// Current lifecycle stage.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Whether the surface is on the visible side of the threshold.
    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Physical pixels per density-independent point, from the last size
    /// event (1.0 before any).
    pub fn pixels_per_point(&self) -> f32 {
        self.pixels_per_point
    }

    /// Orientation from the last size event.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// The draw context cached by the last upward crossing, while valid.
    pub fn draw_context(&self) -> Option<&DrawContext> {
        self.draw_context.as_ref()
    }

    fn inject(&mut self, event: Event) {
        // Drain what producers have queued so far, so the injected event
        // lands behind it.
        while let Ok(ev) = self.rx.try_recv() {
            self.pending.push_back(ev);
        }
        self.pending.push_back(event);
    }

    fn dispatch(&mut self, event: &Event) {
        match event {
            Event::Lifecycle(lc) => {
                match lc.crosses(self.threshold) {
                    Crossing::Up => {
                        tracing::debug!(from = ?lc.from, to = ?lc.to, "surface became visible");
                        self.draw_context = lc.draw_context.clone();
                        self.visible = true;
                        // Fresh surface contents are undefined until painted.
                        self.inject(Event::Paint(PaintEvent { external: false }));
                    }
                    Crossing::Down => {
                        tracing::debug!(from = ?lc.from, to = ?lc.to, "surface no longer visible");
                        if let Some(ctx) = self.draw_context.take() {
                            ctx.invalidate();
                        }
                        self.visible = false;
                    }
                    Crossing::None => {}
                }
                self.stage = lc.to;
                if lc.to == Stage::Dead {
                    tracing::debug!("lifecycle reached Dead, ending event stream");
                    self.done = true;
                }
            }
            Event::Size(size) => {
                self.pixels_per_point = size.pixels_per_point;
                self.orientation = size.orientation;
            }
            Event::Paint(_) => {
                if self.visible {
                    if let (Some(draw), Some(ctx)) = (self.draw.as_mut(), self.draw_context.as_ref())
                    {
                        draw(ctx);
                    }
                    if let Some(done) = self.frame_complete.as_mut() {
                        done();
                    }
                } else {
                    tracing::trace!("paint request while not visible, dropped");
                }
            }
            // Touch is delivered to application code unmodified; visibility
            // does not gate input.
            Event::Touch(_) => {}
        }
    }
}

impl Iterator for App {
    type Item = Event;

    fn next(&mut self) -> Option<Event> {
        self.next_event()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portico_core::{LifecycleEvent, SizeEvent, TouchEvent, TouchPhase};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn lifecycle(from: Stage, to: Stage, ctx: Option<DrawContext>) -> Event {
        Event::Lifecycle(LifecycleEvent {
            from,
            to,
            draw_context: ctx,
        })
    }

    fn touch(phase: TouchPhase) -> Event {
        Event::Touch(TouchEvent {
            sequence: 0,
            phase,
            x: 10.0,
            y: 10.0,
        })
    }

    fn counting_app() -> (App, EventSender, Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let (mut app, sender) = App::new(LoopConfig::default());
        let draws = Arc::new(AtomicUsize::new(0));
        let frames = Arc::new(AtomicUsize::new(0));
        let d = Arc::clone(&draws);
        app.on_draw(move |_| {
            d.fetch_add(1, Ordering::SeqCst);
        });
        let f = Arc::clone(&frames);
        app.on_frame_complete(move || {
            f.fetch_add(1, Ordering::SeqCst);
        });
        (app, sender, draws, frames)
    }

    #[test]
    fn test_paint_while_not_visible_is_dropped() {
        let (mut app, sender, draws, frames) = counting_app();
        sender.send(Event::Paint(PaintEvent::default())).unwrap();
        drop(sender);
        while app.next_event().is_some() {}
        assert_eq!(draws.load(Ordering::SeqCst), 0);
        assert_eq!(frames.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_paint_while_visible_draws_once() {
        let (mut app, sender, draws, frames) = counting_app();
        sender
            .send(lifecycle(
                Stage::Dead,
                Stage::Visible,
                Some(DrawContext::new(())),
            ))
            .unwrap();
        drop(sender);
        // The upward crossing injects exactly one paint.
        while app.next_event().is_some() {}
        assert_eq!(draws.load(Ordering::SeqCst), 1);
        assert_eq!(frames.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_down_crossing_invalidates_context_and_touch_still_delivered() {
        let (mut app, sender, _draws, _frames) = counting_app();
        let ctx = DrawContext::new(7u8);
        sender
            .send(lifecycle(Stage::Dead, Stage::Visible, Some(ctx.clone())))
            .unwrap();
        sender
            .send(lifecycle(Stage::Visible, Stage::Alive, None))
            .unwrap();
        sender.send(touch(TouchPhase::Begin)).unwrap();
        drop(sender);

        let mut saw_touch = false;
        while let Some(event) = app.next_event() {
            if matches!(event, Event::Touch(_)) {
                saw_touch = true;
                assert!(!app.visible());
            }
        }
        assert!(saw_touch, "touch delivery is independent of visibility");
        assert!(!ctx.is_valid());
        assert!(ctx.downcast::<u8>().is_none());
        assert!(app.draw_context().is_none());
    }

    #[test]
    fn test_size_event_records_density_and_orientation() {
        let (mut app, sender) = App::new(LoopConfig::default());
        sender
            .send(Event::Size(SizeEvent {
                pixels_per_point: 2.5,
                orientation: Orientation::Landscape,
            }))
            .unwrap();
        drop(sender);
        while app.next_event().is_some() {}
        assert_eq!(app.pixels_per_point(), 2.5);
        assert_eq!(app.orientation(), Orientation::Landscape);
    }

    #[test]
    fn test_injected_events_come_after_prior_producer_events() {
        let (mut app, sender) = App::new(LoopConfig::default());
        sender.send(touch(TouchPhase::Begin)).unwrap();
        sender.send(touch(TouchPhase::Move)).unwrap();

        // First event consumed, then two injections while a producer event
        // is still queued.
        let first = app.next_event().unwrap();
        assert!(matches!(
            first,
            Event::Touch(TouchEvent {
                phase: TouchPhase::Begin,
                ..
            })
        ));
        app.send(Event::Paint(PaintEvent { external: true }));
        app.request_paint();
        drop(sender);

        let order: Vec<Event> = app.collect();
        assert!(matches!(order[0], Event::Touch(_)), "producer event first");
        assert!(matches!(order[1], Event::Paint(_)));
        assert!(matches!(order[2], Event::Paint(_)));
        assert_eq!(order.len(), 3);
    }

    #[test]
    fn test_stream_ends_when_producers_gone() {
        let (mut app, sender) = App::new(LoopConfig::default());
        drop(sender);
        assert!(app.next_event().is_none());
        // Not restartable.
        assert!(app.next_event().is_none());
    }

    #[test]
    fn test_stream_ends_after_dead_transition() {
        let (mut app, sender) = App::new(LoopConfig::default());
        sender
            .send(lifecycle(Stage::Visible, Stage::Dead, None))
            .unwrap();
        let last = app.next_event().unwrap();
        assert!(matches!(last, Event::Lifecycle(_)));
        assert_eq!(app.stage(), Stage::Dead);
        assert!(app.next_event().is_none());
        drop(sender);
    }

    #[test]
    fn test_filter_runs_before_dispatch() {
        let (mut app, sender) = App::new(LoopConfig {
            threshold: Stage::Visible,
            queue_capacity: 8,
        });
        // Rewrite every touch to a Cancel before dispatch sees it.
        app.set_filter(|event| match event {
            Event::Touch(mut t) => {
                t.phase = TouchPhase::Cancel;
                Event::Touch(t)
            }
            other => other,
        });
        sender.send(touch(TouchPhase::Begin)).unwrap();
        drop(sender);
        let event = app.next_event().unwrap();
        assert!(matches!(
            event,
            Event::Touch(TouchEvent {
                phase: TouchPhase::Cancel,
                ..
            })
        ));
    }

    #[test]
    fn test_custom_threshold_uses_focused_crossing() {
        let (mut app, sender, draws, _frames) = {
            let (mut app, sender) = App::new(LoopConfig {
                threshold: Stage::Focused,
                queue_capacity: 8,
            });
            let draws = Arc::new(AtomicUsize::new(0));
            let d = Arc::clone(&draws);
            app.on_draw(move |_| {
                d.fetch_add(1, Ordering::SeqCst);
            });
            (app, sender, draws, ())
        };
        // Visible is below the Focused threshold: no acquisition yet.
        sender
            .send(lifecycle(
                Stage::Dead,
                Stage::Visible,
                Some(DrawContext::new(())),
            ))
            .unwrap();
        sender
            .send(lifecycle(
                Stage::Visible,
                Stage::Focused,
                Some(DrawContext::new(())),
            ))
            .unwrap();
        drop(sender);
        while app.next_event().is_some() {}
        assert_eq!(draws.load(Ordering::SeqCst), 1);
    }
}
