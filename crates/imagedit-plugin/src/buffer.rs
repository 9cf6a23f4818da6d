//! Pixel buffers exchanged with plugins.
//!
//! [`PluginImage`] is the host-owned interchange buffer. Plugins never see it
//! directly: they receive an [`ImageRef`] (read-only input) and an
//! [`ImageMut`] (output), both thin views over an [`FfiImage`] so that the
//! same types work for compiled-in and dynamically loaded plugins.

use std::marker::PhantomData;
use std::os::raw::c_void;
use std::ptr;
use std::slice;

use crate::error::PluginError;
use crate::ffi::abi::{FfiEditStatus, FfiImage};
use crate::ffi::safety::{check_layout, required_len};

/// Upper bound for a single reshape allocation.
const MAX_BUFFER_BYTES: usize = 1 << 30;

/// Host-owned row-major pixel buffer in the layout plugins expect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginImage {
    data: Vec<u8>,
    rows: u32,
    cols: u32,
    channels: u32,
    stride: usize,
}

impl PluginImage {
    /// Builds a buffer from raw parts, validating the layout.
    pub fn new(
        rows: u32,
        cols: u32,
        channels: u32,
        stride: usize,
        mut data: Vec<u8>,
    ) -> Result<Self, PluginError> {
        let raw = FfiImage {
            data: data.as_mut_ptr(),
            len: data.len(),
            rows,
            cols,
            channels,
            stride,
            host: ptr::null_mut(),
            reshape: None,
        };
        check_layout(&raw).map_err(PluginError::InvalidImage)?;

        Ok(Self {
            data,
            rows,
            cols,
            channels,
            stride,
        })
    }

    /// Builds a buffer with tightly packed rows.
    pub fn packed(rows: u32, cols: u32, channels: u32, data: Vec<u8>) -> Result<Self, PluginError> {
        let stride = cols as usize * channels as usize;
        Self::new(rows, cols, channels, stride, data)
    }

    /// Number of rows.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Samples per pixel.
    pub fn channels(&self) -> u32 {
        self.channels
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Backing bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the buffer, returning the backing bytes.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Read-only view for use as plugin input.
    pub fn as_image_ref(&self) -> ImageRef<'_> {
        ImageRef {
            raw: FfiImage {
                // Never written through: ImageRef only hands out shared slices.
                data: self.data.as_ptr() as *mut u8,
                len: self.data.len(),
                rows: self.rows,
                cols: self.cols,
                channels: self.channels,
                stride: self.stride,
                host: ptr::null_mut(),
                reshape: None,
            },
            _marker: PhantomData,
        }
    }

    /// Runs `f` with this buffer as input and a copy of it as output, then
    /// reads the output shape back from its descriptor.
    ///
    /// Fails if the output descriptor was left inconsistent.
    pub(crate) fn edit_with<R>(
        &self,
        f: impl FnOnce(&ImageRef<'_>, &mut ImageMut<'_>) -> R,
    ) -> Result<(PluginImage, R), String> {
        let input = self.as_image_ref();

        let mut data = self.data.clone();
        let host: *mut Vec<u8> = &mut data;
        // SAFETY: `host` points at the live local `data`.
        let data_ptr = unsafe { (*host).as_mut_ptr() };

        let mut raw = FfiImage {
            data: data_ptr,
            len: self.data.len(),
            rows: self.rows,
            cols: self.cols,
            channels: self.channels,
            stride: self.stride,
            host: host as *mut c_void,
            reshape: Some(host_reshape),
        };

        let result = {
            let mut output = ImageMut { raw: &mut raw };
            f(&input, &mut output)
        };

        // SAFETY: `raw` is no longer borrowed; `host` still points at `data`.
        let (actual_ptr, actual_len) = unsafe { ((*host).as_mut_ptr(), (*host).len()) };
        if raw.data != actual_ptr || raw.len != actual_len {
            return Err("output descriptor no longer matches its buffer".to_string());
        }
        check_layout(&raw)?;

        let image = PluginImage {
            data,
            rows: raw.rows,
            cols: raw.cols,
            channels: raw.channels,
            stride: raw.stride,
        };
        Ok((image, result))
    }
}

/// Reallocates a host-owned output buffer.
unsafe extern "C" fn host_reshape(image: *mut FfiImage, rows: u32, cols: u32, channels: u32) -> i32 {
    if image.is_null() {
        return FfiEditStatus::InvalidArgument.code();
    }
    // SAFETY: checked non-null; the host passes a descriptor it owns.
    let image = unsafe { &mut *image };
    if image.host.is_null() || rows == 0 || cols == 0 || channels == 0 || channels > 4 {
        return FfiEditStatus::InvalidArgument.code();
    }

    let stride = cols as usize * channels as usize;
    let len = match required_len(rows, cols, channels, stride) {
        Some(len) if len <= MAX_BUFFER_BYTES => len,
        _ => return FfiEditStatus::InvalidArgument.code(),
    };

    // SAFETY: `host` is only ever set by `edit_with` to its local Vec<u8>.
    let buffer = unsafe { &mut *(image.host as *mut Vec<u8>) };
    buffer.clear();
    buffer.resize(len, 0);

    image.data = buffer.as_mut_ptr();
    image.len = buffer.len();
    image.rows = rows;
    image.cols = cols;
    image.channels = channels;
    image.stride = stride;

    FfiEditStatus::Ok.code()
}

/// Read-only view of a plugin input image.
#[derive(Debug)]
pub struct ImageRef<'a> {
    raw: FfiImage,
    _marker: PhantomData<&'a [u8]>,
}

impl<'a> ImageRef<'a> {
    /// Wraps a raw descriptor received through the ABI.
    ///
    /// # Safety
    /// `raw` must be null or point to a descriptor whose `data` is valid for
    /// reads of `len` bytes for the lifetime `'a`.
    pub unsafe fn from_raw(raw: *const FfiImage) -> Result<Self, String> {
        if raw.is_null() {
            return Err("null input descriptor".to_string());
        }
        // SAFETY: checked non-null above; caller guarantees validity.
        let raw = unsafe { *raw };
        check_layout(&raw)?;
        Ok(Self {
            raw,
            _marker: PhantomData,
        })
    }

    /// Number of rows.
    pub fn rows(&self) -> u32 {
        self.raw.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> u32 {
        self.raw.cols
    }

    /// Samples per pixel.
    pub fn channels(&self) -> u32 {
        self.raw.channels
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.raw.stride
    }

    /// All bytes, padding included.
    pub fn as_bytes(&self) -> &[u8] {
        // SAFETY: layout checked at construction; data outlives 'a.
        unsafe { slice::from_raw_parts(self.raw.data, self.raw.len) }
    }

    /// Pixel bytes of row `y`, without padding.
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.raw.rows {
            return None;
        }
        let start = y as usize * self.raw.stride;
        let row_bytes = self.raw.cols as usize * self.raw.channels as usize;
        self.as_bytes().get(start..start + row_bytes)
    }

    /// Samples of the pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.raw.cols {
            return None;
        }
        let channels = self.raw.channels as usize;
        let offset = x as usize * channels;
        self.row(y).map(|row| &row[offset..offset + channels])
    }

    pub(crate) fn as_raw(&self) -> *const FfiImage {
        &self.raw
    }
}

/// Writable view of a plugin output image.
///
/// Starts with the same shape and bytes as the input. Call
/// [`reshape`](Self::reshape) to change dimensions or channel count.
#[derive(Debug)]
pub struct ImageMut<'a> {
    raw: &'a mut FfiImage,
}

impl<'a> ImageMut<'a> {
    /// Wraps a raw descriptor received through the ABI.
    ///
    /// # Safety
    /// `raw` must be null or point to a descriptor, exclusively borrowed for
    /// `'a`, whose `data` is valid for reads and writes of `len` bytes.
    pub unsafe fn from_raw(raw: *mut FfiImage) -> Result<Self, String> {
        if raw.is_null() {
            return Err("null output descriptor".to_string());
        }
        // SAFETY: checked non-null above; caller guarantees exclusivity.
        let raw = unsafe { &mut *raw };
        check_layout(raw)?;
        Ok(Self { raw })
    }

    /// Number of rows.
    pub fn rows(&self) -> u32 {
        self.raw.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> u32 {
        self.raw.cols
    }

    /// Samples per pixel.
    pub fn channels(&self) -> u32 {
        self.raw.channels
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.raw.stride
    }

    /// All bytes, padding included.
    pub fn as_bytes(&self) -> &[u8] {
        // SAFETY: layout checked at construction and after every reshape.
        unsafe { slice::from_raw_parts(self.raw.data, self.raw.len) }
    }

    /// All bytes, padding included, writable.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        // SAFETY: exclusive borrow of the descriptor; layout checked.
        unsafe { slice::from_raw_parts_mut(self.raw.data, self.raw.len) }
    }

    /// Writable pixel bytes of row `y`, without padding.
    pub fn row_mut(&mut self, y: u32) -> Option<&mut [u8]> {
        if y >= self.raw.rows {
            return None;
        }
        let start = y as usize * self.raw.stride;
        let row_bytes = self.raw.cols as usize * self.raw.channels as usize;
        self.as_bytes_mut().get_mut(start..start + row_bytes)
    }

    /// Writable samples of the pixel at `(x, y)`.
    pub fn pixel_mut(&mut self, x: u32, y: u32) -> Option<&mut [u8]> {
        if x >= self.raw.cols {
            return None;
        }
        let channels = self.raw.channels as usize;
        let offset = x as usize * channels;
        self.row_mut(y).map(|row| &mut row[offset..offset + channels])
    }

    /// Reallocates the output as a zero-filled, tightly packed
    /// `rows x cols x channels` buffer.
    pub fn reshape(&mut self, rows: u32, cols: u32, channels: u32) -> Result<(), String> {
        let Some(reshape) = self.raw.reshape else {
            return Err("output buffer cannot be reshaped".to_string());
        };
        // SAFETY: the callback was installed by the host that owns `raw`.
        let status = unsafe { reshape(&mut *self.raw, rows, cols, channels) };
        match FfiEditStatus::from_code(status) {
            FfiEditStatus::Ok => Ok(()),
            other => Err(format!(
                "reshape to {cols}x{rows}x{channels} rejected ({other:?})"
            )),
        }
    }

    pub(crate) fn as_raw_mut(&mut self) -> *mut FfiImage {
        &mut *self.raw
    }
}
