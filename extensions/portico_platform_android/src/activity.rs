//! Android activity event glue
//!
//! Runs on the activity's native thread: initializes logging, the JNI
//! bridge, and the global asset source, spawns the application thread, and
//! translates `android-activity` callbacks into the ordered event stream
//! the application loop consumes.
//!
//! # Example
//!
//! ```ignore
//! #[no_mangle]
//! fn android_main(android: android_activity::AndroidApp) {
//!     portico_platform_android::run(android, |mut app| {
//!         app.on_draw(|ctx| { /* paint */ });
//!         while let Some(event) = app.next_event() {
//!             // handle touch, size, lifecycle...
//!         }
//!     })
//!     .unwrap();
//! }
//! ```

use std::thread;
use std::time::Duration;

use android_activity::input::{InputEvent, MotionAction, MotionEvent};
use android_activity::{AndroidApp, InputStatus, MainEvent, PollEvent};
use jni::objects::JObject;
use jni::JavaVM;

use portico_app::{App, EventSender, LoopConfig};
use portico_core::{
    DrawContext, Event, LifecycleEvent, Orientation, PaintEvent, SizeEvent, Stage, TouchEvent,
    TouchPhase,
};
use portico_platform::{set_global_asset_source, PlatformError, Result};

use crate::assets::AndroidAssetSource;
use crate::bridge;

/// Run a Portico application inside an Android native activity.
///
/// Spawns `main` on its own thread with the consuming end of the event
/// stream, then pumps platform callbacks until the activity is destroyed.
/// Called from `android_main`.
pub fn run<F>(android: AndroidApp, main: F) -> Result<()>
where
    F: FnOnce(App) + Send + 'static,
{
    crate::logging::init();
    tracing::info!("portico activity starting");

    init_bridge(&android)?;
    if let Err(err) = set_global_asset_source(Box::new(AndroidAssetSource::new(android.clone()))) {
        // Tolerated so an activity restart within one process keeps working.
        tracing::warn!("asset source already installed: {err}");
    }

    let (app, sender) = App::new(LoopConfig::default());
    let app_thread = thread::Builder::new()
        .name("portico-app".into())
        .spawn(move || main(app))
        .map_err(|err| PlatformError::InitFailed(format!("app thread spawn: {err}")))?;

    let mut pump = EventPump {
        sender,
        stage: Stage::Dead,
        running: true,
    };

    while pump.running {
        android.poll_events(Some(Duration::from_millis(16)), |event| {
            pump.handle(&android, event);
        });
        pump.forward_input(&android);
    }

    // Dropping the sender ends the app's event stream.
    drop(pump);
    if app_thread.join().is_err() {
        tracing::error!("application thread panicked");
    }
    tracing::info!("portico activity exiting");
    Ok(())
}

fn init_bridge(android: &AndroidApp) -> Result<()> {
    // Two independent JavaVM handles over the same VM pointer: one is
    // consumed by the bridge thread, the other attaches this thread so the
    // activity object can be pinned with a global reference.
    let vm = unsafe { JavaVM::from_raw(android.vm_as_ptr() as *mut jni::sys::JavaVM) }
        .map_err(|err| PlatformError::InitFailed(format!("JavaVM: {err}")))?;
    let bridge_vm = unsafe { JavaVM::from_raw(android.vm_as_ptr() as *mut jni::sys::JavaVM) }
        .map_err(|err| PlatformError::InitFailed(format!("JavaVM: {err}")))?;

    let env = vm
        .attach_current_thread_permanently()
        .map_err(bridge::jni_err)?;
    let activity = unsafe { JObject::from_raw(android.activity_as_ptr() as jni::sys::jobject) };
    let context = env.new_global_ref(&activity).map_err(bridge::jni_err)?;

    bridge::init(bridge_vm, context)
}

/// Translates platform callbacks into loop events and tracks the stage the
/// platform side believes the app is in.
struct EventPump {
    sender: EventSender,
    stage: Stage,
    running: bool,
}

impl EventPump {
    fn handle(&mut self, android: &AndroidApp, event: PollEvent<'_>) {
        let PollEvent::Main(main_event) = event else {
            return;
        };
        match main_event {
            MainEvent::Start | MainEvent::Resume { .. } => {
                if self.stage < Stage::Alive {
                    self.transition(Stage::Alive, None);
                }
            }
            MainEvent::InitWindow { .. } => {
                if let Some(window) = android.native_window() {
                    tracing::info!(
                        width = window.width(),
                        height = window.height(),
                        "native window initialized"
                    );
                    self.transition(Stage::Visible, Some(DrawContext::new(window)));
                    self.send(Event::Size(size_event(android)));
                } else {
                    tracing::warn!("InitWindow without a native window");
                }
            }
            MainEvent::GainedFocus => self.transition(Stage::Focused, None),
            MainEvent::LostFocus => {
                if self.stage > Stage::Visible {
                    self.transition(Stage::Visible, None);
                }
            }
            MainEvent::Pause => {
                if self.stage > Stage::Visible {
                    self.transition(Stage::Visible, None);
                }
            }
            MainEvent::WindowResized { .. } | MainEvent::ConfigChanged { .. } => {
                self.send(Event::Size(size_event(android)));
            }
            MainEvent::RedrawNeeded { .. } => {
                self.send(Event::Paint(PaintEvent { external: false }));
            }
            MainEvent::TerminateWindow { .. } | MainEvent::Stop => {
                // The surface is gone; the downward crossing invalidates the
                // draw context on the consumer side.
                if self.stage > Stage::Alive {
                    self.transition(Stage::Alive, None);
                }
            }
            MainEvent::Destroy => {
                tracing::info!("activity destroyed");
                self.transition(Stage::Dead, None);
                self.running = false;
            }
            MainEvent::LowMemory => {
                tracing::warn!("low memory warning");
            }
            _ => {}
        }
    }

    fn forward_input(&mut self, android: &AndroidApp) {
        match android.input_events_iter() {
            Ok(mut input_iter) => {
                while input_iter.next(|event| match event {
                    InputEvent::MotionEvent(motion) => {
                        self.forward_motion(motion);
                        InputStatus::Handled
                    }
                    _ => InputStatus::Unhandled,
                }) {}
            }
            Err(err) => {
                tracing::warn!("failed to get input events iterator: {err:?}");
            }
        }
    }

    fn forward_motion(&mut self, motion: &MotionEvent<'_>) {
        let action = motion.action();
        let phase = match action {
            MotionAction::Down | MotionAction::PointerDown => TouchPhase::Begin,
            MotionAction::Move => TouchPhase::Move,
            MotionAction::Up | MotionAction::PointerUp => TouchPhase::End,
            MotionAction::Cancel => TouchPhase::Cancel,
            _ => return,
        };

        if phase == TouchPhase::Move {
            // Move samples cover every active pointer.
            for pointer in motion.pointers() {
                self.send(Event::Touch(TouchEvent {
                    sequence: pointer.pointer_id() as u64,
                    phase,
                    x: pointer.x(),
                    y: pointer.y(),
                }));
            }
            return;
        }

        let index = match action {
            MotionAction::PointerDown | MotionAction::PointerUp => motion.pointer_index(),
            _ => 0,
        };
        if motion.pointer_count() == 0 {
            return;
        }
        let pointer = motion.pointer_at_index(index);
        self.send(Event::Touch(TouchEvent {
            sequence: pointer.pointer_id() as u64,
            phase,
            x: pointer.x(),
            y: pointer.y(),
        }));
    }

    fn transition(&mut self, to: Stage, draw_context: Option<DrawContext>) {
        let from = self.stage;
        self.stage = to;
        self.send(Event::Lifecycle(LifecycleEvent {
            from,
            to,
            draw_context,
        }));
    }

    fn send(&mut self, event: Event) {
        if self.sender.send(event).is_err() {
            tracing::debug!("application loop gone, stopping event pump");
            self.running = false;
        }
    }
}

fn size_event(android: &AndroidApp) -> SizeEvent {
    let config = android.config();
    let pixels_per_point = config
        .density()
        .map(|dpi| dpi as f32 / 160.0)
        .unwrap_or(1.0);
    let orientation = match config.orientation() {
        ndk::configuration::Orientation::Port => Orientation::Portrait,
        ndk::configuration::Orientation::Land => Orientation::Landscape,
        _ => Orientation::Unknown,
    };
    SizeEvent {
        pixels_per_point,
        orientation,
    }
}
