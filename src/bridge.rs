// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Host boundary shared by the C and JNI entry points.
//!
//! Hosts hand over plane memory as raw pointers with a capacity. This module
//! validates those regions, works out whether U and V are separate planes or
//! one interleaved chroma plane, and only then builds the borrowed slices the
//! frame pipeline runs on.

use crate::{
    edges::{EdgeFilter, ProcessingMode},
    error::{Error, Result},
    frame::{process_frame, ChromaOrder, YuvFrame},
};
use std::{slice::from_raw_parts_mut, sync::Once};
use tracing::info;

/// Edge filter switch shared by every host call in the process.
pub static PROCESSING_MODE: ProcessingMode = ProcessingMode::new(true);

static LOGGING: Once = Once::new();

/// Tag the lifecycle lines carry in logcat.
#[cfg(target_os = "android")]
pub const LOG_TAG: &str = "EdgeDetector";

/// Logcat on Android, where stderr of an app process is discarded.
#[cfg(target_os = "android")]
fn subscriber() -> impl tracing::Subscriber + Send + Sync {
    use tracing_subscriber::layer::SubscriberExt;
    tracing_subscriber::registry().with(paranoid_android::layer(LOG_TAG))
}

#[cfg(not(target_os = "android"))]
fn subscriber() -> impl tracing::Subscriber + Send + Sync {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish()
}

/// Installs a `tracing` subscriber (logcat on Android, stderr elsewhere) and
/// forwards `log` records to it.
///
/// Does nothing if the host already installed a global subscriber.
pub fn init_logging() {
    LOGGING.call_once(|| {
        if tracing::subscriber::set_global_default(subscriber()).is_ok() {
            let _ = tracing_log::LogTracer::init();
        }
    });
}

/// Readiness check for hosts. Safe to call any number of times.
pub fn initialize_detector() -> bool {
    init_logging();
    info!("Native edge detector initialized");
    true
}

/// Sets the process-wide processing mode. Always succeeds.
pub fn set_processing_mode(enabled: bool) -> bool {
    PROCESSING_MODE.set(enabled);
    info!(
        "Processing mode set to: {}",
        if enabled { "enabled" } else { "disabled" }
    );
    true
}

/// A plane region supplied by the host.
#[derive(Copy, Clone, Debug)]
pub struct RawPlane {
    pub ptr: *mut u8,
    pub len: usize,
}

impl RawPlane {
    pub fn new(ptr: *mut u8, len: usize) -> Self {
        Self { ptr, len }
    }

    fn start(&self) -> usize {
        self.ptr as usize
    }

    fn end(&self) -> usize {
        self.start() + self.len
    }

    fn overlaps(&self, other: &RawPlane) -> bool {
        self.start() < other.end() && other.start() < self.end()
    }
}

/// Arguments of one host `processFrame` call.
#[derive(Copy, Clone, Debug)]
pub struct RawFrame {
    pub y: RawPlane,
    pub u: RawPlane,
    pub v: RawPlane,
    pub width: i32,
    pub height: i32,
    pub y_stride: i32,
    pub uv_stride: i32,
    pub uv_pixel_stride: i32,
}

fn checked_stride(value: i32, plane: &'static str) -> Result<usize> {
    usize::try_from(value).map_err(|_| Error::NegativeStride {
        plane,
        stride: value as i64,
    })
}

impl RawFrame {
    /// Interleaved chroma is reported by Android as two planes starting one
    /// byte apart with a pixel stride of 2.
    fn interleaved_order(&self) -> Option<ChromaOrder> {
        if self.uv_pixel_stride != 2 {
            return None;
        }
        if self.u.start() + 1 == self.v.start() {
            Some(ChromaOrder::Uv)
        } else if self.v.start() + 1 == self.u.start() {
            Some(ChromaOrder::Vu)
        } else {
            None
        }
    }

    fn check(&self) -> Result<()> {
        for (name, plane) in [("y", &self.y), ("u", &self.u), ("v", &self.v)] {
            if plane.ptr.is_null() {
                return Err(Error::MissingPlane(name));
            }
            plane.start().checked_add(plane.len).ok_or(Error::PlaneTooSmall {
                plane: name,
                len: plane.len,
                required: usize::MAX,
            })?;
        }
        if self.width <= 0 || self.height <= 0 {
            return Err(Error::InvalidDimensions {
                width: self.width as i64,
                height: self.height as i64,
            });
        }
        if self.y.overlaps(&self.u) {
            return Err(Error::OverlappingPlanes("y", "u"));
        }
        if self.y.overlaps(&self.v) {
            return Err(Error::OverlappingPlanes("y", "v"));
        }
        if self.interleaved_order().is_none() && self.u.overlaps(&self.v) {
            return Err(Error::OverlappingPlanes("u", "v"));
        }
        Ok(())
    }

    /// Validates the host buffers and runs the frame pipeline in place.
    ///
    /// Nothing is written unless every check passes.
    ///
    /// # Safety
    ///
    /// Each of `y`, `u` and `v` must point to `len` bytes that are valid for
    /// reads and writes for the duration of the call and are not accessed by
    /// anything else meanwhile. U and V may share memory only as interleaved
    /// chroma (starting one byte apart with a pixel stride of 2).
    pub unsafe fn process(&self, enabled: bool, filter: &EdgeFilter) -> Result<()> {
        self.check()?;
        let width = self.width as usize;
        let height = self.height as usize;
        let y_stride = checked_stride(self.y_stride, "y")?;
        let uv_stride = checked_stride(self.uv_stride, "uv")?;
        let uv_pixel_stride = checked_stride(self.uv_pixel_stride, "uv")?;

        let y = from_raw_parts_mut(self.y.ptr, self.y.len);
        let mut frame = match self.interleaved_order() {
            Some(order) => {
                let (first, second) = match order {
                    ChromaOrder::Uv => (self.u, self.v),
                    ChromaOrder::Vu => (self.v, self.u),
                };
                let len = first.end().max(second.end()) - first.start();
                let uv = from_raw_parts_mut(first.ptr, len);
                YuvFrame::semi_planar(width, height, y, uv, y_stride, uv_stride, order)?
            }
            None => {
                let u = from_raw_parts_mut(self.u.ptr, self.u.len);
                let v = from_raw_parts_mut(self.v.ptr, self.v.len);
                YuvFrame::planar(
                    width,
                    height,
                    y,
                    u,
                    v,
                    y_stride,
                    uv_stride,
                    uv_pixel_stride,
                )?
            }
        };
        process_frame(&mut frame, enabled, filter)
    }

    /// Runs [`RawFrame::process`] with the default filter, gated by
    /// [`PROCESSING_MODE`] as it stands when the call starts.
    ///
    /// # Safety
    ///
    /// Same contract as [`RawFrame::process`].
    pub unsafe fn process_with_mode(&self) -> Result<()> {
        self.process(PROCESSING_MODE.is_enabled(), &EdgeFilter::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashSet;

    fn raw(buf: &mut [u8]) -> RawPlane {
        RawPlane::new(buf.as_mut_ptr(), buf.len())
    }

    #[test]
    fn test_null_plane_rejected() {
        let mut y = vec![0u8; 4];
        let mut u = vec![128u8; 1];
        let frame = RawFrame {
            y: raw(&mut y),
            u: raw(&mut u),
            v: RawPlane::new(std::ptr::null_mut(), 0),
            width: 2,
            height: 2,
            y_stride: 2,
            uv_stride: 1,
            uv_pixel_stride: 1,
        };
        let res = unsafe { frame.process(false, &EdgeFilter::default()) };
        assert!(matches!(res, Err(Error::MissingPlane("v"))));
    }

    #[test]
    fn test_non_positive_dimensions() {
        let mut y = vec![0u8; 4];
        let mut u = vec![128u8; 1];
        let mut v = vec![128u8; 1];
        for (w, h) in [(0, 2), (2, 0), (-2, 2)] {
            let frame = RawFrame {
                y: raw(&mut y),
                u: raw(&mut u),
                v: raw(&mut v),
                width: w,
                height: h,
                y_stride: 2,
                uv_stride: 1,
                uv_pixel_stride: 1,
            };
            let res = unsafe { frame.process(false, &EdgeFilter::default()) };
            assert!(matches!(res, Err(Error::InvalidDimensions { .. })));
        }
    }

    #[test]
    fn test_overlapping_planes_rejected() {
        let mut buf = vec![128u8; 8];
        let base = buf.as_mut_ptr();
        let frame = RawFrame {
            y: RawPlane::new(base, 4),
            u: RawPlane::new(unsafe { base.add(3) }, 1),
            v: RawPlane::new(unsafe { base.add(6) }, 1),
            width: 2,
            height: 2,
            y_stride: 2,
            uv_stride: 1,
            uv_pixel_stride: 1,
        };
        let res = unsafe { frame.process(false, &EdgeFilter::default()) };
        assert!(matches!(res, Err(Error::OverlappingPlanes("y", "u"))));
        assert!(buf.iter().all(|&b| b == 128));
    }

    #[test]
    fn test_interleaved_detection() {
        let mut y = vec![0u8; 4];
        let mut vu = vec![0u8; 2];
        let base = vu.as_mut_ptr();
        let frame = RawFrame {
            y: raw(&mut y),
            u: RawPlane::new(unsafe { base.add(1) }, 1),
            v: RawPlane::new(base, 1),
            width: 2,
            height: 2,
            y_stride: 2,
            uv_stride: 2,
            uv_pixel_stride: 2,
        };
        assert_eq!(frame.interleaved_order(), Some(ChromaOrder::Vu));
        assert!(frame.check().is_ok());
    }

    #[test]
    fn test_negative_stride_reported() {
        let mut y = vec![0u8; 4];
        let mut u = vec![128u8; 1];
        let mut v = vec![128u8; 1];
        let frame = RawFrame {
            y: raw(&mut y),
            u: raw(&mut u),
            v: raw(&mut v),
            width: 2,
            height: 2,
            y_stride: 2,
            uv_stride: -7,
            uv_pixel_stride: 1,
        };
        let res = unsafe { frame.process(false, &EdgeFilter::default()) };
        assert!(matches!(
            res,
            Err(Error::NegativeStride {
                plane: "uv",
                stride: -7
            })
        ));
    }

    /// Runs a dark/bright split I420 frame through the global mode gate and
    /// returns the distinct luma values left behind.
    fn split_frame_tones(enabled: bool) -> HashSet<u8> {
        let (width, height) = (32usize, 16usize);
        let mut y = vec![0u8; width * height];
        for (i, px) in y.iter_mut().enumerate() {
            let (row, col) = (i / width, i % width);
            *px = (if col < width / 2 { 30 } else { 200 }) + row as u8;
        }
        let mut u = vec![128u8; width * height / 4];
        let mut v = vec![128u8; width * height / 4];
        let frame = RawFrame {
            y: raw(&mut y),
            u: raw(&mut u),
            v: raw(&mut v),
            width: width as i32,
            height: height as i32,
            y_stride: width as i32,
            uv_stride: width as i32 / 2,
            uv_pixel_stride: 1,
        };
        assert!(set_processing_mode(enabled));
        let res = unsafe { frame.process_with_mode() };
        set_processing_mode(true);
        assert!(res.is_ok());
        y.into_iter().collect()
    }

    #[test]
    #[serial]
    fn test_global_mode_gates_filter() {
        let plain = split_frame_tones(false);
        let edges = split_frame_tones(true);
        assert_eq!(plain.len(), 32);
        assert!(edges.len() < plain.len());
        assert!(edges.iter().all(|&v| v == 0 || v == 255));
    }

    #[test]
    fn test_init_logging_repeatable() {
        init_logging();
        init_logging();
        assert!(initialize_detector());
        assert!(initialize_detector());
    }
}
