// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! # Edge Detector Bridge
//!
//! This library exposes a camera edge-detection stage to managed hosts such
//! as an Android application. It borrows the YUV 4:2:0 planes of a camera
//! frame, reassembles them into an RGB image, optionally runs the
//! grayscale / Gaussian blur / Canny chain from `imageproc`, and writes the
//! result back into the original planes in their original layout.
//!
//! ## Features
//!
//! - **Stride-aware planes**: Row padding and chroma pixel strides are
//!   honoured on read and write; padding bytes are never touched.
//! - **Planar and semi-planar chroma**: I420 style separate planes as well as
//!   NV12/NV21 interleaved chroma.
//! - **Filter gate**: A process-wide [`edges::ProcessingMode`] switches the
//!   edge filter per frame.
//! - **Host boundaries**: C ABI in [`ffi`], JNI exports in `android` (with the
//!   `jni` feature).
//!
//! ## Example
//!
//! ```
//! use edge_detector::{
//!     edges::EdgeFilter,
//!     frame::{packed_len, process_frame, YuvFrame},
//!     image::NV21,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut data = vec![128; packed_len(64, 48, NV21, 0).unwrap()];
//! let mut frame = YuvFrame::from_packed(&mut data, 64, 48, NV21, 0)?;
//!
//! // Run the edge filter and store the edge map back into the planes
//! process_frame(&mut frame, true, &EdgeFilter::default())?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Safety
//!
//! Raw host pointers are only turned into slices in [`bridge`], after null,
//! size and overlap checks. The rest of the crate works on borrowed slices.

pub mod bridge;
pub mod color;
pub mod edges;
pub mod error;
pub mod ffi;
pub mod frame;
pub mod image;
pub mod plane;

#[cfg(feature = "jni")]
pub mod android;

pub use bridge::{initialize_detector, set_processing_mode, PROCESSING_MODE};
pub use error::{Error, Result};
