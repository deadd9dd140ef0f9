//! Bundled asset access
//!
//! Apps ship read-only resources inside their platform bundle (the APK's
//! `assets/` folder on Android). This module defines the narrow synchronous
//! contract every platform implements: open a named byte stream, enumerate
//! names under a virtual path, and resolve the app's private writable
//! directory.
//!
//! Asset names are opaque, path-like strings interpreted by the platform's
//! bundling mechanism. Nothing here caches: every `open` is a fresh stream,
//! and closing is dropping.

use std::collections::BTreeMap;
use std::io::{Cursor, Read, Seek};
use std::path::PathBuf;
use std::sync::OnceLock;

use crate::error::{PlatformError, Result};

/// An open, read-only asset stream.
///
/// End of stream is `Ok(0)` from [`Read::read`], Rust's usual EOF sentinel,
/// never an error. Closing is dropping the box; a read after close is
/// unrepresentable.
pub trait Asset: Read + Seek + Send {}

impl<T: Read + Seek + Send> Asset for T {}

impl std::fmt::Debug for dyn Asset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Asset")
    }
}

/// Source of bundled assets for one platform.
pub trait AssetSource: Send + Sync {
    /// Open the named asset. Returns [`PlatformError::NotFound`] when the
    /// bundle has no such entry.
    fn open(&self, name: &str) -> Result<Box<dyn Asset>>;

    /// Names directly under the given virtual path, in sorted order.
    /// Empty when the path matches nothing.
    fn list(&self, path: &str) -> Result<Vec<String>>;

    /// Absolute path of the app's private writable directory.
    fn files_dir(&self) -> Result<PathBuf>;
}

static GLOBAL_SOURCE: OnceLock<Box<dyn AssetSource>> = OnceLock::new();

/// Install the process-wide asset source.
///
/// Called once by the platform glue during startup, before application code
/// runs, so that a missing source is a deterministic init-order bug rather
/// than a latent lazy-init failure. Fails if a source is already installed.
pub fn set_global_asset_source(source: Box<dyn AssetSource>) -> Result<()> {
    GLOBAL_SOURCE
        .set(source)
        .map_err(|_| PlatformError::InitFailed("asset source already installed".into()))
}

/// The process-wide asset source, if one has been installed.
pub fn global_asset_source() -> Option<&'static dyn AssetSource> {
    GLOBAL_SOURCE.get().map(|boxed| boxed.as_ref())
}

fn require_global() -> Result<&'static dyn AssetSource> {
    global_asset_source()
        .ok_or_else(|| PlatformError::InitFailed("no asset source installed".into()))
}

/// Open a named asset from the process-wide source.
pub fn open(name: &str) -> Result<Box<dyn Asset>> {
    require_global()?.open(name)
}

/// List asset names under a virtual path from the process-wide source.
pub fn list(path: &str) -> Result<Vec<String>> {
    require_global()?.list(path)
}

/// The app's private writable directory from the process-wide source.
pub fn files_dir() -> Result<PathBuf> {
    require_global()?.files_dir()
}

/// In-memory asset source for host builds and tests.
///
/// Holds name -> bytes pairs; `list` treats `/` as the path separator.
#[derive(Default)]
pub struct MemoryAssetSource {
    entries: BTreeMap<String, Vec<u8>>,
    files_dir: PathBuf,
}

impl MemoryAssetSource {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            files_dir: std::env::temp_dir(),
        }
    }

    /// Add or replace an entry.
    pub fn insert(&mut self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> &mut Self {
        self.entries.insert(name.into(), bytes.into());
        self
    }

    /// Override the reported writable directory.
    pub fn with_files_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.files_dir = dir.into();
        self
    }
}

impl AssetSource for MemoryAssetSource {
    fn open(&self, name: &str) -> Result<Box<dyn Asset>> {
        let bytes = self
            .entries
            .get(name)
            .ok_or_else(|| PlatformError::NotFound(name.to_string()))?;
        Ok(Box::new(Cursor::new(bytes.clone())))
    }

    fn list(&self, path: &str) -> Result<Vec<String>> {
        let prefix = if path.is_empty() || path.ends_with('/') {
            path.to_string()
        } else {
            format!("{path}/")
        };
        // BTreeMap iteration keeps the result sorted.
        let mut names: Vec<String> = self
            .entries
            .keys()
            .filter_map(|name| name.strip_prefix(&prefix))
            .map(|rest| match rest.split_once('/') {
                // Direct children only; deeper entries surface as their
                // containing directory name.
                Some((dir, _)) => dir.to_string(),
                None => rest.to_string(),
            })
            .collect();
        names.dedup();
        Ok(names)
    }

    fn files_dir(&self) -> Result<PathBuf> {
        Ok(self.files_dir.clone())
    }
}
