//! End-to-end loop scenario: surface comes up, a touch toggles the clear
//! color, and the app injects a repaint for it.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use portico_app::{App, LoopConfig};
use portico_core::{
    DrawContext, Event, LifecycleEvent, Orientation, SizeEvent, Stage, TouchEvent, TouchPhase,
};

/// Stand-in for a platform graphics context: records every clear color.
#[derive(Default)]
struct FakeGl {
    clears: Mutex<Vec<[f32; 4]>>,
}

impl FakeGl {
    fn clear_color(&self, color: [f32; 4]) {
        self.clears.lock().unwrap().push(color);
    }
}

const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
const GREEN: [f32; 4] = [0.0, 1.0, 0.0, 1.0];

#[test]
fn test_touch_toggles_color_and_triggers_redraw() {
    let (mut app, sender) = App::new(LoopConfig::default());

    let frames = Arc::new(AtomicUsize::new(0));
    let frame_counter = Arc::clone(&frames);
    app.on_frame_complete(move || {
        frame_counter.fetch_add(1, Ordering::SeqCst);
    });

    // Color state shared between the draw callback and the touch handler.
    let color = Arc::new(Mutex::new(RED));
    let draw_color = Arc::clone(&color);
    app.on_draw(move |ctx| {
        let gl = ctx
            .downcast::<FakeGl>()
            .expect("draw context valid while visible");
        gl.clear_color(*draw_color.lock().unwrap());
    });

    let gl = DrawContext::new(FakeGl::default());

    // The platform delivers the surface and a size report first.
    sender
        .send(Event::Lifecycle(LifecycleEvent {
            from: Stage::Dead,
            to: Stage::Visible,
            draw_context: Some(gl.clone()),
        }))
        .unwrap();
    sender
        .send(Event::Size(SizeEvent {
            pixels_per_point: 2.0,
            orientation: Orientation::Portrait,
        }))
        .unwrap();

    // Lifecycle, size, then the repaint requested by the upward crossing.
    let mut observed = Vec::new();
    for _ in 0..3 {
        observed.push(label(&app.next_event().unwrap()));
    }

    // A tap arrives after the first frame was published.
    for phase in [TouchPhase::Begin, TouchPhase::End] {
        sender
            .send(Event::Touch(TouchEvent {
                sequence: 1,
                phase,
                x: 10.0,
                y: 10.0,
            }))
            .unwrap();
    }
    drop(sender);

    while let Some(event) = app.next_event() {
        observed.push(label(&event));
        if let Event::Touch(touch) = &event {
            if touch.phase == TouchPhase::End {
                *color.lock().unwrap() = GREEN;
                // Redraw with the new color.
                app.request_paint();
            }
        }
    }

    // Loop-requested paint lands after the already-queued size event; the
    // app-injected paint comes last.
    assert_eq!(
        observed,
        vec!["lifecycle", "size", "paint", "touch", "touch", "paint"]
    );
    assert_eq!(app.pixels_per_point(), 2.0);
    assert_eq!(app.orientation(), Orientation::Portrait);

    let clears = gl.downcast::<FakeGl>().unwrap();
    assert_eq!(*clears.clears.lock().unwrap(), vec![RED, GREEN]);
    assert_eq!(frames.load(Ordering::SeqCst), 2);
}

#[test]
fn test_paint_after_surface_teardown_is_dropped() {
    let (mut app, sender) = App::new(LoopConfig::default());

    let draws = Arc::new(AtomicUsize::new(0));
    let draw_counter = Arc::clone(&draws);
    app.on_draw(move |_| {
        draw_counter.fetch_add(1, Ordering::SeqCst);
    });

    let gl = DrawContext::new(FakeGl::default());
    sender
        .send(Event::Lifecycle(LifecycleEvent {
            from: Stage::Dead,
            to: Stage::Focused,
            draw_context: Some(gl.clone()),
        }))
        .unwrap();

    // Consume the transition and the repaint it requested.
    app.next_event().unwrap();
    app.next_event().unwrap();
    assert_eq!(draws.load(Ordering::SeqCst), 1);

    // Surface goes away, then a stale paint request trickles in.
    sender
        .send(Event::Lifecycle(LifecycleEvent {
            from: Stage::Focused,
            to: Stage::Alive,
            draw_context: None,
        }))
        .unwrap();
    sender.send(Event::Paint(Default::default())).unwrap();
    drop(sender);

    while app.next_event().is_some() {}

    // One draw from the upward crossing, none after teardown.
    assert_eq!(draws.load(Ordering::SeqCst), 1);
    assert!(!gl.is_valid());
}

fn label(event: &Event) -> &'static str {
    match event {
        Event::Lifecycle(_) => "lifecycle",
        Event::Size(_) => "size",
        Event::Paint(_) => "paint",
        Event::Touch(_) => "touch",
    }
}
