//! FFI ABI definitions for dynamic plugins.
//!
//! Defines the C-compatible interface that plugin libraries must export.
//! Libraries built with [`export_plugin!`](crate::export_plugin) get all of
//! this for free.

use std::os::raw::{c_char, c_void};

/// Current ABI version. Plugins must report this version to be loaded.
pub const IMAGEDIT_ABI_VERSION: u32 = 2;

/// Name of the symbol every plugin library exports.
pub const DESCRIPTOR_SYMBOL: &[u8] = b"imagedit_plugin_descriptor\0";

/// Row-major 8-bit pixel buffer shared across the plugin boundary.
///
/// `channels == 3` is truecolor, `channels == 1` is indexed/greyscale.
/// `data` holds `len` bytes, of which the first `rows * stride` are
/// meaningful (the last row may omit padding).
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct FfiImage {
    /// Pixel bytes.
    pub data: *mut u8,
    /// Length of `data` in bytes.
    pub len: usize,
    /// Number of rows (image height).
    pub rows: u32,
    /// Number of columns (image width).
    pub cols: u32,
    /// Samples per pixel.
    pub channels: u32,
    /// Bytes per row.
    pub stride: usize,
    /// Opaque host context; only meaningful to `reshape`.
    pub host: *mut c_void,
    /// Reallocates the buffer to a new shape. Null for read-only inputs.
    pub reshape: Option<FfiReshapeFn>,
}

/// Host callback that reallocates an output buffer.
///
/// On success the buffer is zero-filled, tightly packed, and every field of
/// the `FfiImage` is updated. Returns an [`FfiEditStatus`] code.
pub type FfiReshapeFn =
    unsafe extern "C" fn(image: *mut FfiImage, rows: u32, cols: u32, channels: u32) -> i32;

/// Returns the plugin display name as a null-terminated string with
/// static lifetime.
pub type FfiPluginNameFn = unsafe extern "C" fn() -> *const c_char;

/// Runs the transform. `input` is read-only; `output` starts as a copy of
/// `input` and may be edited in place or reshaped. Returns an
/// [`FfiEditStatus`] code.
pub type FfiPluginEditFn = unsafe extern "C" fn(input: *const FfiImage, output: *mut FfiImage) -> i32;

/// Returns the message behind the last non-zero edit status on the calling
/// thread, or null. The string is owned by the plugin and valid until its
/// next edit call on that thread.
pub type FfiPluginLastErrorFn = unsafe extern "C" fn() -> *const c_char;

/// Descriptor returned by the plugin entry point.
///
/// ```c
/// extern const FfiPluginDescriptor* imagedit_plugin_descriptor();
/// ```
#[repr(C)]
pub struct FfiPluginDescriptor {
    /// ABI version, must match [`IMAGEDIT_ABI_VERSION`].
    pub abi_version: u32,
    /// Display name accessor.
    pub name: FfiPluginNameFn,
    /// Transform entry point.
    pub edit: FfiPluginEditFn,
    /// Failure message accessor (since ABI version 2).
    pub last_error: FfiPluginLastErrorFn,
}

/// Type signature of the exported entry point.
pub type FfiPluginDescriptorFn = unsafe extern "C" fn() -> *const FfiPluginDescriptor;

/// Status codes exchanged through the ABI.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiEditStatus {
    /// The call succeeded.
    Ok = 0,
    /// The plugin reported an error.
    Failed = 1,
    /// The plugin panicked; the panic was caught at the boundary.
    Panicked = 2,
    /// A pointer or dimension was invalid.
    InvalidArgument = 3,
}

impl FfiEditStatus {
    /// Decodes a raw status code; unknown codes are treated as failures.
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => Self::Ok,
            2 => Self::Panicked,
            3 => Self::InvalidArgument,
            _ => Self::Failed,
        }
    }

    /// Raw code for the ABI.
    pub fn code(self) -> i32 {
        self as i32
    }
}
