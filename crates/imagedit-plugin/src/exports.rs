//! Plugin-side glue behind [`export_plugin!`](crate::export_plugin).
//!
//! These functions run inside the plugin library. They turn raw ABI
//! descriptors back into safe views and keep panics from crossing the
//! `extern "C"` boundary.

use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::panic::{self, AssertUnwindSafe};
use std::ptr;

use tracing::error;

use crate::buffer::{ImageMut, ImageRef};
use crate::ffi::abi::{FfiEditStatus, FfiImage};
use crate::ffi::safety::name_to_c_string;
use crate::traits::EditPlugin;

thread_local! {
    /// Message behind the last non-zero status returned on this thread.
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

fn set_last_error(message: Option<&str>) {
    LAST_ERROR.with(|slot| *slot.borrow_mut() = message.map(name_to_c_string));
}

/// Returns the message recorded by the last failed edit on this thread, or
/// null.
///
/// The pointer stays valid until the next edit call on the same thread.
pub unsafe extern "C" fn last_error() -> *const c_char {
    LAST_ERROR.with(|slot| {
        slot.borrow()
            .as_ref()
            .map_or(ptr::null(), |message| message.as_ptr())
    })
}

/// Runs `plugin.edit` on raw descriptors and returns an ABI status code.
///
/// # Safety
/// `input` and `output` must be null or valid descriptors as described by
/// [`ImageRef::from_raw`] and [`ImageMut::from_raw`].
pub unsafe fn invoke_edit(
    plugin: &dyn EditPlugin,
    input: *const FfiImage,
    output: *mut FfiImage,
) -> i32 {
    set_last_error(None);

    // SAFETY: forwarded caller guarantees.
    let views = unsafe { (ImageRef::from_raw(input), ImageMut::from_raw(output)) };
    let (input, mut output) = match views {
        (Ok(input), Ok(output)) => (input, output),
        (Err(e), _) | (_, Err(e)) => {
            error!(plugin = %plugin.name(), error = %e, "Rejected edit call");
            set_last_error(Some(e.as_str()));
            return FfiEditStatus::InvalidArgument.code();
        }
    };

    match panic::catch_unwind(AssertUnwindSafe(|| plugin.edit(&input, &mut output))) {
        Ok(Ok(())) => FfiEditStatus::Ok.code(),
        Ok(Err(e)) => {
            error!(plugin = %plugin.name(), error = %e, "Edit failed");
            set_last_error(Some(e.as_str()));
            FfiEditStatus::Failed.code()
        }
        Err(_) => {
            error!(plugin = %plugin.name(), "Edit panicked");
            FfiEditStatus::Panicked.code()
        }
    }
}
