//! Portico Android Platform
//!
//! Glue between Android's native activity model and the Portico application
//! loop:
//!
//! - [`bridge`]: thread-hop onto a JVM-attached thread for JNI calls
//! - [`assets`]: bundled asset access through the NDK asset manager
//! - [`activity`]: translates `android-activity` callbacks into Portico
//!   events and runs the application thread
//!
//! On non-Android targets the bridge and asset source compile as stubs that
//! report [`portico_platform::PlatformError::Unsupported`], so dependent
//! crates still type-check on host builds.

pub mod assets;
pub mod bridge;

#[cfg(target_os = "android")]
pub mod activity;
#[cfg(target_os = "android")]
mod logging;

pub use assets::AndroidAssetSource;

#[cfg(target_os = "android")]
pub use activity::run;
