// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use clap::Parser;
use edge_detector::image::{FourCC, I420, NV12, NV21};
use std::path::PathBuf;

/// Layout of the raw frame file.
#[derive(clap::ValueEnum, Clone, Debug, PartialEq, Copy)]
pub enum FrameFormat {
    /// Fully planar Y, U, V
    I420,
    /// Y plane followed by interleaved UV
    Nv12,
    /// Y plane followed by interleaved VU (Android default)
    Nv21,
}

impl From<FrameFormat> for FourCC {
    fn from(format: FrameFormat) -> Self {
        match format {
            FrameFormat::I420 => I420,
            FrameFormat::Nv12 => NV12,
            FrameFormat::Nv21 => NV21,
        }
    }
}

/// Command-line arguments for the edge detector tool.
///
/// Runs a raw YUV 4:2:0 frame through the same pipeline the host bridge
/// uses and writes the processed frame back out in the same layout.
///
/// # Example
///
/// ```bash
/// edge-detector --input frame.nv21 --output edges.nv21 --size 640 480 --png edges.png
///
/// # Via environment variables
/// export FRAME_FORMAT=i420
/// export ROW_PADDING=64
/// edge-detector --input frame.yuv --output out.yuv
/// ```
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Raw input frame
    #[arg(short, long, env = "INPUT")]
    pub input: PathBuf,

    /// Processed output frame, written in the input layout
    #[arg(short, long, env = "OUTPUT")]
    pub output: PathBuf,

    /// Frame resolution in pixels (width height)
    #[arg(
        long,
        env = "FRAME_SIZE",
        default_value = "640 480",
        value_delimiter = ' ',
        num_args = 2
    )]
    pub size: Vec<usize>,

    /// Layout of the raw frame
    #[arg(long, env = "FRAME_FORMAT", default_value = "nv21", value_enum)]
    pub format: FrameFormat,

    /// Padding bytes at the end of every luma row (half for I420 chroma rows)
    #[arg(long, env = "ROW_PADDING", default_value = "0")]
    pub row_padding: usize,

    /// Pass frames through without the edge filter
    #[arg(long, env = "DISABLE")]
    pub disable: bool,

    /// Gaussian blur standard deviation
    #[arg(long, env = "SIGMA", default_value = "1.5")]
    pub sigma: f32,

    /// Canny hysteresis thresholds (low high)
    #[arg(
        long,
        env = "THRESHOLDS",
        default_value = "50 150",
        value_delimiter = ' ',
        num_args = 2
    )]
    pub thresholds: Vec<f32>,

    /// Also save the processed frame as an RGB PNG
    #[arg(long, env = "PNG")]
    pub png: Option<PathBuf>,

    /// Print a JSON summary of the run to stdout
    #[arg(long)]
    pub json: bool,

    /// Enable verbose debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Enable Tracy profiler for performance analysis
    #[arg(long, env = "TRACY")]
    pub tracy: bool,
}
