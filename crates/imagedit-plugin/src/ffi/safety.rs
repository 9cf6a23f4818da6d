//! FFI safety wrappers: conversions and layout checks for raw ABI types.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use super::abi::FfiImage;

/// Safely converts a C string pointer to a Rust `String`.
///
/// Returns `None` if the pointer is null or the bytes are not UTF-8.
///
/// # Safety
/// A non-null `ptr` must point to a null-terminated string that stays
/// valid for the duration of the call.
pub unsafe fn c_str_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string()) }
}

/// Converts a display name to a `CString`, dropping interior null bytes.
pub fn name_to_c_string(name: &str) -> CString {
    let bytes: Vec<u8> = name.bytes().filter(|b| *b != 0).collect();
    CString::new(bytes).unwrap_or_default()
}

/// Number of bytes a `rows x stride` layout needs; the last row may omit
/// its padding.
pub fn required_len(rows: u32, cols: u32, channels: u32, stride: usize) -> Option<usize> {
    let row_bytes = (cols as usize).checked_mul(channels as usize)?;
    if rows == 0 {
        return Some(0);
    }
    (rows as usize - 1)
        .checked_mul(stride)?
        .checked_add(row_bytes)
}

/// Checks that a raw image describes a readable layout.
pub fn check_layout(image: &FfiImage) -> Result<(), String> {
    if image.data.is_null() {
        return Err("null data pointer".to_string());
    }
    if image.rows == 0 || image.cols == 0 {
        return Err(format!("empty image {}x{}", image.cols, image.rows));
    }
    if image.channels == 0 {
        return Err("zero channels".to_string());
    }

    let row_bytes = image.cols as usize * image.channels as usize;
    if image.stride < row_bytes {
        return Err(format!(
            "stride {} smaller than row size {row_bytes}",
            image.stride
        ));
    }

    match required_len(image.rows, image.cols, image.channels, image.stride) {
        Some(needed) if needed <= image.len => Ok(()),
        Some(needed) => Err(format!(
            "buffer holds {} bytes, layout needs {needed}",
            image.len
        )),
        None => Err("layout overflows addressable memory".to_string()),
    }
}
