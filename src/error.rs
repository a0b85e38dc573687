// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Error type shared by the frame pipeline and the host boundaries.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures raised before or during frame processing.
///
/// Every variant except [`Error::Filter`] and [`Error::Png`] is a
/// precondition failure detected before any caller buffer is touched.
#[derive(Debug, Error)]
pub enum Error {
    /// A plane pointer or buffer was not provided by the host.
    #[error("{0} plane is unavailable")]
    MissingPlane(&'static str),

    /// Frame or image dimensions are zero, negative, or overflow.
    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: i64, height: i64 },

    /// A stride does not leave room for one row of samples.
    #[error("{plane} plane: row stride {row_stride} with pixel stride {pixel_stride} cannot hold {width} samples")]
    InvalidStride {
        plane: &'static str,
        width: usize,
        row_stride: usize,
        pixel_stride: usize,
    },

    /// The host passed a negative row or pixel stride.
    #[error("{plane} plane: negative stride {stride}")]
    NegativeStride { plane: &'static str, stride: i64 },

    /// The plane slice ends before the last sample of its declared layout.
    #[error("{plane} plane: buffer holds {len} bytes but layout needs {required}")]
    PlaneTooSmall {
        plane: &'static str,
        len: usize,
        required: usize,
    },

    /// Two planes share memory in a way that is not interleaved chroma.
    #[error("{0} and {1} planes overlap")]
    OverlappingPlanes(&'static str, &'static str),

    /// The image does not have the format or size expected by the operation.
    #[error("image mismatch: {0}")]
    ImageMismatch(String),

    /// The external vision primitive rejected the image.
    #[error("edge filter failed: {0}")]
    Filter(String),

    /// PNG preview could not be written.
    #[error("failed to write png: {0}")]
    Png(#[from] image::ImageError),
}
