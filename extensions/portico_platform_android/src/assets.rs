//! Android asset access via the NDK AssetManager
//!
//! On Android, bundled assets live inside the APK and are reached through
//! the AssetManager API. Opening and reading go straight through the NDK;
//! directory listing and the writable files directory need Java-side calls
//! and go through the JNI [`bridge`](crate::bridge).

use portico_platform::assets::{Asset, AssetSource};
use portico_platform::{PlatformError, Result};

#[cfg(target_os = "android")]
use android_activity::AndroidApp;

#[cfg(target_os = "android")]
use std::ffi::CString;
use std::path::PathBuf;

/// Asset source backed by the NDK AssetManager.
///
/// Reads from the APK's `assets/` folder. Streams are plain file-backed
/// reads; nothing is cached.
pub struct AndroidAssetSource {
    #[cfg(target_os = "android")]
    app: AndroidApp,
}

#[cfg(target_os = "android")]
impl AndroidAssetSource {
    /// Create an asset source for the given activity.
    pub fn new(app: AndroidApp) -> Self {
        Self { app }
    }
}

/// An open NDK asset stream.
///
/// The NDK maps negative byte counts from `AAsset_read` to an
/// `io::Error`, which satisfies the read contract of
/// [`portico_platform::assets::Asset`]; end of stream is `Ok(0)`.
#[cfg(target_os = "android")]
struct AndroidAsset(ndk::asset::Asset);

// SAFETY: an AAsset is a plain cursor over APK data with no thread
// affinity; the NDK only requires that it is not used from two threads at
// once, which moving the exclusive owner preserves.
#[cfg(target_os = "android")]
unsafe impl Send for AndroidAsset {}

#[cfg(target_os = "android")]
impl std::io::Read for AndroidAsset {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        std::io::Read::read(&mut self.0, buf)
    }
}

#[cfg(target_os = "android")]
impl std::io::Seek for AndroidAsset {
    fn seek(&mut self, pos: std::io::SeekFrom) -> std::io::Result<u64> {
        std::io::Seek::seek(&mut self.0, pos)
    }
}

#[cfg(target_os = "android")]
impl AssetSource for AndroidAssetSource {
    fn open(&self, name: &str) -> Result<Box<dyn Asset>> {
        let c_name = CString::new(name)
            .map_err(|err| PlatformError::Io(format!("invalid asset name: {err}")))?;
        let asset = self
            .app
            .asset_manager()
            .open(&c_name)
            .ok_or_else(|| PlatformError::NotFound(name.to_string()))?;
        Ok(Box::new(AndroidAsset(asset)))
    }

    fn list(&self, path: &str) -> Result<Vec<String>> {
        // AAssetDir only reports files; AssetManager.list on the Java side
        // also reports subdirectories, so the listing goes through JNI.
        let path = path.to_string();
        crate::bridge::run_on_native_thread(move |env, context| {
            use jni::objects::{JObjectArray, JString, JValue};

            let resources = env
                .call_method(
                    context,
                    "getResources",
                    "()Landroid/content/res/Resources;",
                    &[],
                )
                .and_then(|v| v.l())
                .map_err(crate::bridge::jni_err)?;
            let manager = env
                .call_method(
                    &resources,
                    "getAssets",
                    "()Landroid/content/res/AssetManager;",
                    &[],
                )
                .and_then(|v| v.l())
                .map_err(crate::bridge::jni_err)?;
            let j_path = env.new_string(&path).map_err(crate::bridge::jni_err)?;
            let array: JObjectArray = env
                .call_method(
                    &manager,
                    "list",
                    "(Ljava/lang/String;)[Ljava/lang/String;",
                    &[JValue::Object(&j_path)],
                )
                .and_then(|v| v.l())
                .map_err(crate::bridge::jni_err)?
                .into();

            let len = env.get_array_length(&array).map_err(crate::bridge::jni_err)?;
            let mut names = Vec::with_capacity(len as usize);
            for i in 0..len {
                let element = env
                    .get_object_array_element(&array, i)
                    .map_err(crate::bridge::jni_err)?;
                let name: String = env
                    .get_string(&JString::from(element))
                    .map_err(crate::bridge::jni_err)?
                    .into();
                names.push(name);
            }
            names.sort();
            Ok(names)
        })
    }

    fn files_dir(&self) -> Result<PathBuf> {
        // Context.getFilesDir().getAbsolutePath()
        crate::bridge::run_on_native_thread(|env, context| {
            use jni::objects::JString;

            let file = env
                .call_method(context, "getFilesDir", "()Ljava/io/File;", &[])
                .and_then(|v| v.l())
                .map_err(crate::bridge::jni_err)?;
            let j_path = env
                .call_method(&file, "getAbsolutePath", "()Ljava/lang/String;", &[])
                .and_then(|v| v.l())
                .map_err(crate::bridge::jni_err)?;
            let path: String = env
                .get_string(&JString::from(j_path))
                .map_err(crate::bridge::jni_err)?
                .into();
            Ok(PathBuf::from(path))
        })
    }
}

// Stub implementation for non-Android builds (for cross-compilation checks)
#[cfg(not(target_os = "android"))]
impl AndroidAssetSource {
    /// Create a placeholder source (fails on non-Android).
    pub fn new() -> Self {
        Self {}
    }
}

#[cfg(not(target_os = "android"))]
impl Default for AndroidAssetSource {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(target_os = "android"))]
impl AssetSource for AndroidAssetSource {
    fn open(&self, _name: &str) -> Result<Box<dyn Asset>> {
        Err(PlatformError::Unsupported(
            "Android asset access only available on Android".into(),
        ))
    }

    fn list(&self, _path: &str) -> Result<Vec<String>> {
        Err(PlatformError::Unsupported(
            "Android asset access only available on Android".into(),
        ))
    }

    fn files_dir(&self) -> Result<PathBuf> {
        Err(PlatformError::Unsupported(
            "Android asset access only available on Android".into(),
        ))
    }
}
