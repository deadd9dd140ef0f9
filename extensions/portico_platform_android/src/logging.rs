//! Android log output for the `log` and `tracing` facades
//!
//! Routes everything to logcat under the "Portico" tag. Safe to call more
//! than once; only the first call installs anything.

use std::sync::Once;

static INIT: Once = Once::new();

pub(crate) fn init() {
    INIT.call_once(|| {
        // log facade -> logcat
        android_logger::init_once(
            android_logger::Config::default()
                .with_max_level(log::LevelFilter::Debug)
                .with_tag("Portico"),
        );

        // tracing -> logcat
        use tracing_subscriber::layer::SubscriberExt;
        match tracing_android::layer("Portico") {
            Ok(layer) => {
                let subscriber = tracing_subscriber::registry().with(layer);
                let _ = tracing::subscriber::set_global_default(subscriber);
            }
            Err(err) => log::warn!("tracing-android layer unavailable: {err}"),
        }
    });
}
