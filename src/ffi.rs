// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! C ABI for hosts that are not JVM based.
//!
//! Every entry point catches panics so none unwinds into the caller.

use crate::{
    bridge::{self, RawFrame, RawPlane, PROCESSING_MODE},
    edges::detect_edges,
    error::Error,
};
use libc::{c_int, size_t};
use std::{
    panic::{catch_unwind, AssertUnwindSafe},
    slice::{from_raw_parts, from_raw_parts_mut},
};
use tracing::warn;

/// Error codes
pub const EDGE_OK: c_int = 0;
pub const EDGE_ERROR_NULL_POINTER: c_int = -1;
pub const EDGE_ERROR_INVALID_ARGUMENT: c_int = -2;
pub const EDGE_ERROR_BUFFER_TOO_SMALL: c_int = -3;
pub const EDGE_ERROR_PROCESSING: c_int = -4;
pub const EDGE_ERROR_PANIC: c_int = -5;

fn error_code(err: &Error) -> c_int {
    match err {
        Error::MissingPlane(_) => EDGE_ERROR_NULL_POINTER,
        Error::InvalidDimensions { .. }
        | Error::InvalidStride { .. }
        | Error::NegativeStride { .. }
        | Error::OverlappingPlanes(..)
        | Error::ImageMismatch(_) => EDGE_ERROR_INVALID_ARGUMENT,
        Error::PlaneTooSmall { .. } => EDGE_ERROR_BUFFER_TOO_SMALL,
        Error::Filter(_) | Error::Png(_) => EDGE_ERROR_PROCESSING,
    }
}

/// Initialize logging and report readiness
/// Returns: true
#[no_mangle]
pub extern "C" fn edge_detector_initialize() -> bool {
    catch_unwind(bridge::initialize_detector).unwrap_or(false)
}

/// Enable or disable the edge filter for subsequent frames
/// Returns: true on success
#[no_mangle]
pub extern "C" fn edge_detector_set_processing_mode(enabled: bool) -> bool {
    catch_unwind(|| bridge::set_processing_mode(enabled)).unwrap_or(false)
}

/// Query the current processing mode
#[no_mangle]
pub extern "C" fn edge_detector_processing_mode() -> bool {
    PROCESSING_MODE.is_enabled()
}

/// Process one YUV 4:2:0 frame in place
/// y, u, v: plane base pointers with their capacities in bytes
/// width, height: logical frame size
/// y_stride, uv_stride: row strides of the luma and chroma planes
/// uv_pixel_stride: byte distance between chroma samples (1 planar, 2 semi-planar)
/// Returns: EDGE_OK on success, a negative error code otherwise; the planes
/// are left untouched on error
///
/// # Safety
///
/// Each plane pointer must reference `len` bytes valid for reads and writes
/// for the duration of the call. U and V may only share memory as
/// interleaved chroma (one byte apart, pixel stride 2).
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn edge_detector_process_frame(
    y: *mut u8,
    y_len: size_t,
    u: *mut u8,
    u_len: size_t,
    v: *mut u8,
    v_len: size_t,
    width: c_int,
    height: c_int,
    y_stride: c_int,
    uv_stride: c_int,
    uv_pixel_stride: c_int,
) -> c_int {
    let frame = RawFrame {
        y: RawPlane::new(y, y_len),
        u: RawPlane::new(u, u_len),
        v: RawPlane::new(v, v_len),
        width,
        height,
        y_stride,
        uv_stride,
        uv_pixel_stride,
    };
    let res = catch_unwind(AssertUnwindSafe(|| unsafe { frame.process_with_mode() }));
    match res {
        Ok(Ok(())) => EDGE_OK,
        Ok(Err(e)) => {
            warn!("process_frame rejected: {}", e);
            error_code(&e)
        }
        Err(_) => EDGE_ERROR_PANIC,
    }
}

/// Run the placeholder edge detector
/// image: packed image bytes (may be NULL when image_len is 0)
/// out: destination for width * height values (may be NULL when that is 0)
/// Returns: number of values written, or a negative error code
///
/// # Safety
///
/// `image` must reference `image_len` readable bytes and `out` must reference
/// `out_len` writable `i32` values.
#[no_mangle]
pub unsafe extern "C" fn edge_detector_detect_edges(
    image: *const u8,
    image_len: size_t,
    width: c_int,
    height: c_int,
    out: *mut i32,
    out_len: size_t,
) -> c_int {
    if image.is_null() && image_len != 0 {
        return EDGE_ERROR_NULL_POINTER;
    }
    let image = if image_len == 0 {
        &[][..]
    } else {
        unsafe { from_raw_parts(image, image_len) }
    };
    let res = catch_unwind(|| detect_edges(image, width, height));
    let edges = match res {
        Ok(Ok(edges)) => edges,
        Ok(Err(e)) => {
            warn!("detect_edges rejected: {}", e);
            return error_code(&e);
        }
        Err(_) => return EDGE_ERROR_PANIC,
    };
    if edges.is_empty() {
        return 0;
    }
    if out.is_null() {
        return EDGE_ERROR_NULL_POINTER;
    }
    if out_len < edges.len() {
        return EDGE_ERROR_BUFFER_TOO_SMALL;
    }
    unsafe { from_raw_parts_mut(out, edges.len()) }.copy_from_slice(&edges);
    edges.len() as c_int
}
