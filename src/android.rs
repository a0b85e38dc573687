// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! JNI exports for `com.example.edgedetection.NativeBridge`.
//!
//! `NativeBridge` is a Kotlin `object`, so every native method receives the
//! singleton instance as its second argument. Failures are logged and
//! reported as `false` or `null`; no Java exception is raised and no panic
//! crosses into the JVM.

use crate::{
    bridge::{self, RawFrame, RawPlane},
    edges::detect_edges,
    error::{Error, Result},
};
use jni::{
    objects::{JByteArray, JByteBuffer, JObject},
    sys::{jboolean, jint, jintArray, JNI_FALSE, JNI_TRUE},
    JNIEnv,
};
use std::{
    panic::{catch_unwind, AssertUnwindSafe},
    ptr::null_mut,
};
use tracing::warn;

fn to_jboolean(value: bool) -> jboolean {
    if value {
        JNI_TRUE
    } else {
        JNI_FALSE
    }
}

fn direct_plane(env: &JNIEnv, buf: &JByteBuffer, name: &'static str) -> Result<RawPlane> {
    if buf.is_null() {
        return Err(Error::MissingPlane(name));
    }
    let ptr = env
        .get_direct_buffer_address(buf)
        .map_err(|_| Error::MissingPlane(name))?;
    let len = env
        .get_direct_buffer_capacity(buf)
        .map_err(|_| Error::MissingPlane(name))?;
    Ok(RawPlane::new(ptr, len))
}

#[no_mangle]
pub extern "system" fn Java_com_example_edgedetection_NativeBridge_initializeDetector(
    _env: JNIEnv,
    _this: JObject,
) -> jboolean {
    to_jboolean(catch_unwind(bridge::initialize_detector).unwrap_or(false))
}

#[no_mangle]
pub extern "system" fn Java_com_example_edgedetection_NativeBridge_setProcessingMode(
    _env: JNIEnv,
    _this: JObject,
    enabled: jboolean,
) -> jboolean {
    let enabled = enabled != JNI_FALSE;
    to_jboolean(catch_unwind(|| bridge::set_processing_mode(enabled)).unwrap_or(false))
}

#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub extern "system" fn Java_com_example_edgedetection_NativeBridge_processFrame(
    env: JNIEnv,
    _this: JObject,
    y_buffer: JByteBuffer,
    u_buffer: JByteBuffer,
    v_buffer: JByteBuffer,
    width: jint,
    height: jint,
    y_row_stride: jint,
    uv_row_stride: jint,
    uv_pixel_stride: jint,
) {
    let res = catch_unwind(AssertUnwindSafe(|| -> Result<()> {
        let frame = RawFrame {
            y: direct_plane(&env, &y_buffer, "y")?,
            u: direct_plane(&env, &u_buffer, "u")?,
            v: direct_plane(&env, &v_buffer, "v")?,
            width,
            height,
            y_stride: y_row_stride,
            uv_stride: uv_row_stride,
            uv_pixel_stride,
        };
        // SAFETY: direct buffers stay pinned while the Java caller holds them
        // for the duration of this native call.
        unsafe { frame.process_with_mode() }
    }));
    match res {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!("processFrame rejected: {}", e),
        Err(_) => warn!("processFrame panicked"),
    }
}

#[no_mangle]
pub extern "system" fn Java_com_example_edgedetection_NativeBridge_detectEdges(
    env: JNIEnv,
    _this: JObject,
    image_data: JByteArray,
    width: jint,
    height: jint,
) -> jintArray {
    let res = catch_unwind(AssertUnwindSafe(|| -> Option<jintArray> {
        let image = if image_data.is_null() {
            Vec::new()
        } else {
            env.convert_byte_array(&image_data).ok()?
        };
        let edges = match detect_edges(&image, width, height) {
            Ok(edges) => edges,
            Err(e) => {
                warn!("detectEdges rejected: {}", e);
                return None;
            }
        };
        let array = env.new_int_array(edges.len() as jint).ok()?;
        env.set_int_array_region(&array, 0, &edges).ok()?;
        Some(array.into_raw())
    }));
    match res {
        Ok(Some(array)) => array,
        _ => null_mut(),
    }
}
