//! Portico Platform Abstraction
//!
//! The narrow synchronous contract each platform backend implements for
//! Portico apps: open/read/seek bundled assets, enumerate names under a
//! virtual path, and resolve the private writable directory. Backends live
//! in the `extensions/` crates; host builds and tests use
//! [`MemoryAssetSource`].

pub mod assets;
pub mod error;

pub use assets::{
    global_asset_source, set_global_asset_source, Asset, AssetSource, MemoryAssetSource,
};
pub use error::{PlatformError, Result};
