//! JNI thread-hop bridge
//!
//! JNI environment handles are thread-affine: every call into the Java
//! runtime must happen on a thread attached to the JVM, with an env that is
//! only valid on that thread. The bridge owns one dedicated, permanently
//! attached thread plus a global reference to the activity context, and
//! marshals closures onto it.
//!
//! Initialized once at startup by [`crate::activity::run`]; there is no
//! teardown. Callers should budget for [`run_on_native_thread`] being
//! synchronous and potentially slow, since it blocks on a cross-thread
//! round trip into the Java runtime.

#[cfg(target_os = "android")]
mod imp {
    use std::sync::mpsc;
    use std::sync::OnceLock;
    use std::thread;

    use jni::objects::{GlobalRef, JObject};
    use jni::{JNIEnv, JavaVM};
    use portico_platform::{PlatformError, Result};

    type Job = Box<dyn for<'a> FnOnce(&mut JNIEnv<'a>, &JObject<'a>) + Send>;

    struct Bridge {
        tx: mpsc::Sender<Job>,
    }

    static BRIDGE: OnceLock<Bridge> = OnceLock::new();

    /// Start the bridge thread. Process-wide; fails if already initialized.
    ///
    /// `context` is a global reference to the Android `Context` (the
    /// activity) that bridged closures receive.
    pub fn init(vm: JavaVM, context: GlobalRef) -> Result<()> {
        let (tx, rx) = mpsc::channel::<Job>();

        thread::Builder::new()
            .name("portico-jni-bridge".into())
            .spawn(move || {
                let mut env = match vm.attach_current_thread_permanently() {
                    Ok(env) => env,
                    Err(err) => {
                        tracing::error!("failed to attach bridge thread to JVM: {err}");
                        return;
                    }
                };
                tracing::debug!("JNI bridge thread attached");
                for job in rx {
                    job(&mut env, context.as_obj());
                }
                tracing::debug!("JNI bridge thread exiting");
            })
            .map_err(|err| PlatformError::InitFailed(format!("bridge thread spawn: {err}")))?;

        BRIDGE
            .set(Bridge { tx })
            .map_err(|_| PlatformError::InitFailed("JNI bridge already initialized".into()))
    }

    /// Run `work` on the JVM-attached bridge thread and wait for its result.
    ///
    /// The env and context handles passed to `work` are valid only for that
    /// single invocation and must not be retained. Returns
    /// [`PlatformError::BridgeUnavailable`] if the bridge was never
    /// initialized or its thread has shut down.
    pub fn run_on_native_thread<T, F>(work: F) -> Result<T>
    where
        T: Send + 'static,
        F: for<'a> FnOnce(&mut JNIEnv<'a>, &JObject<'a>) -> Result<T> + Send + 'static,
    {
        let bridge = BRIDGE
            .get()
            .ok_or_else(|| PlatformError::BridgeUnavailable("bridge not initialized".into()))?;

        let (reply_tx, reply_rx) = mpsc::channel();
        let job: Job = Box::new(move |env, context| {
            let _ = reply_tx.send(work(env, context));
        });
        bridge
            .tx
            .send(job)
            .map_err(|_| PlatformError::BridgeUnavailable("bridge thread gone".into()))?;
        reply_rx
            .recv()
            .map_err(|_| PlatformError::BridgeUnavailable("bridge thread gone".into()))?
    }

    /// Map a JNI error into the platform taxonomy.
    pub(crate) fn jni_err(err: jni::errors::Error) -> PlatformError {
        PlatformError::Io(format!("JNI: {err}"))
    }
}

#[cfg(target_os = "android")]
pub use imp::*;

// Stub for non-Android builds (cross-compilation checks).
#[cfg(not(target_os = "android"))]
mod imp {
    use portico_platform::{PlatformError, Result};

    /// Host stub: the bridge only exists on Android.
    pub fn run_on_native_thread<T, F>(_work: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        Err(PlatformError::Unsupported(
            "JNI bridge only available on Android".into(),
        ))
    }
}

#[cfg(not(target_os = "android"))]
pub use imp::*;
