//! FFI (Foreign Function Interface) for C/Go interoperability

use crate::error::ErrorCode;
use crate::{available, AssemblyConfig, AssemblyJob, Codec, Error, Pipeline, Result};
use libc::c_char;
use std::ffi::{CStr, CString};
use std::path::{Path, PathBuf};
use std::ptr;

/// FFI result structure
///
/// On success `message` holds the final video's path, on failure the error
/// text. Release it with [`newsreel_free_result`].
#[repr(C)]
pub struct FfiResult {
    pub code: ErrorCode,
    pub message: *mut c_char,
}

impl FfiResult {
    fn ok(message: Option<&str>) -> Self {
        Self {
            code: ErrorCode::Ok,
            message: message.map(into_c_string).unwrap_or(ptr::null_mut()),
        }
    }

    fn error(code: ErrorCode, message: &str) -> Self {
        Self {
            code,
            message: into_c_string(message),
        }
    }

    fn from_error(err: &Error) -> Self {
        Self::error(ErrorCode::from(err), &err.to_string())
    }
}

fn into_c_string(message: &str) -> *mut c_char {
    // Interior NULs would truncate the message anyway
    let cleaned = message.replace('\0', " ");
    CString::new(cleaned)
        .map(CString::into_raw)
        .unwrap_or(ptr::null_mut())
}

/// Borrow an optional C string as a path
///
/// # Safety
/// `ptr` must be null or a valid null-terminated string.
unsafe fn optional_path(
    ptr: *const c_char,
    what: &str,
) -> std::result::Result<Option<PathBuf>, FfiResult> {
    if ptr.is_null() {
        return Ok(None);
    }
    match CStr::from_ptr(ptr).to_str() {
        Ok(s) => Ok(Some(PathBuf::from(s))),
        Err(_) => Err(FfiResult::error(
            ErrorCode::InvalidInput,
            &format!("Invalid {}", what),
        )),
    }
}

/// Check if a codec is available
///
/// # Safety
/// - `ffmpeg_path` must be a valid null-terminated string or null
#[no_mangle]
pub unsafe extern "C" fn newsreel_available(
    codec: Codec,
    ffmpeg_path: *const c_char,
) -> FfiResult {
    let ffmpeg_path = match optional_path(ffmpeg_path, "ffmpeg path") {
        Ok(path) => path,
        Err(result) => return result,
    };

    match available(codec, ffmpeg_path.as_deref()) {
        Ok(_) => FfiResult::ok(None),
        Err(e) => FfiResult::from_error(&e),
    }
}

fn assemble(manifest_path: &Path, config_path: Option<&Path>) -> Result<PathBuf> {
    let config = match config_path {
        Some(path) => AssemblyConfig::load(path)?,
        None => AssemblyConfig::default(),
    };
    let job = AssemblyJob::load(manifest_path, &config)?;
    let report = Pipeline::new(config)?.run(&job)?;
    Ok(report.artifact.path)
}

/// Assemble the video described by a job manifest
///
/// # Safety
/// - `manifest_path` must be a valid null-terminated string
/// - `config_path` must be a valid null-terminated string or null (defaults)
#[no_mangle]
pub unsafe extern "C" fn newsreel_assemble(
    manifest_path: *const c_char,
    config_path: *const c_char,
) -> FfiResult {
    let manifest_path = match optional_path(manifest_path, "manifest path") {
        Ok(Some(path)) => path,
        Ok(None) => return FfiResult::error(ErrorCode::InvalidInput, "Manifest path is null"),
        Err(result) => return result,
    };

    let config_path = match optional_path(config_path, "config path") {
        Ok(path) => path,
        Err(result) => return result,
    };

    match assemble(&manifest_path, config_path.as_deref()) {
        Ok(output) => FfiResult::ok(Some(output.to_string_lossy().as_ref())),
        Err(e) => FfiResult::from_error(&e),
    }
}

/// Free a result's message string
///
/// # Safety
/// - `result` must point to a valid `FfiResult` that was returned by a newsreel function
#[no_mangle]
pub unsafe extern "C" fn newsreel_free_result(result: *mut FfiResult) {
    if result.is_null() {
        return;
    }

    let result = &mut *result;
    if !result.message.is_null() {
        // Reclaim the CString and let it drop
        let _ = CString::from_raw(result.message);
        result.message = ptr::null_mut();
    }
}

/// Get version string
#[no_mangle]
pub extern "C" fn newsreel_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
