// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use crate::error::{Error, Result};
use core::fmt;
use image::{GrayImage, ImageBuffer, Rgb, RgbImage};
use std::path::Path;

/// Four character code identifying a pixel layout.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FourCC(pub [u8; 4]);

impl fmt::Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

/// RGB 24-bit pixel format (8 bits per channel, no alpha)
pub const RGB3: FourCC = FourCC(*b"RGB3");

/// 8-bit single channel format (luma or edge map)
pub const GREY: FourCC = FourCC(*b"GREY");

/// I420 4:2:0 YUV fully planar format (Y, then U, then V)
pub const I420: FourCC = FourCC(*b"I420");

/// NV12 4:2:0 YUV semi-planar format (Y, then interleaved UV)
pub const NV12: FourCC = FourCC(*b"NV12");

/// NV21 4:2:0 YUV semi-planar format (Y, then interleaved VU), the default
/// Android camera preview layout
pub const NV21: FourCC = FourCC(*b"NV21");

/// Size of one chroma dimension for a 4:2:0 frame.
///
/// Odd luma sizes round up so the last luma column/row keeps a chroma sample.
pub const fn chroma_size(luma: usize) -> usize {
    luma.div_ceil(2)
}

const fn format_row_stride(format: FourCC, width: usize) -> Option<usize> {
    match format {
        RGB3 => width.checked_mul(3),
        GREY => Some(width),
        _ => None,
    }
}

/// Logical image with exact dimensions and no row padding.
///
/// An `Image` is the in-memory form a frame takes between reassembly and
/// writeback. It owns its pixels and lives only for one processing call.
///
/// # Example
///
/// ```
/// use edge_detector::image::{Image, RGB3};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let img = Image::new(640, 480, RGB3)?;
/// assert_eq!(img.size(), 640 * 480 * 3);
/// assert_eq!(img.format(), RGB3);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    data: Vec<u8>,
    width: usize,
    height: usize,
    format: FourCC,
}

impl Image {
    /// Allocates a zeroed image.
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero or the format is not a
    /// logical (RGB3 or GREY) format.
    pub fn new(width: usize, height: usize, format: FourCC) -> Result<Self> {
        let size = Self::checked_size(width, height, format)?;
        Ok(Self {
            data: vec![0; size],
            width,
            height,
            format,
        })
    }

    /// Wraps existing pixel data, which must match the dimensions exactly.
    pub fn from_vec(width: usize, height: usize, format: FourCC, data: Vec<u8>) -> Result<Self> {
        let size = Self::checked_size(width, height, format)?;
        if data.len() != size {
            return Err(Error::ImageMismatch(format!(
                "{}x{} {} needs {} bytes, got {}",
                width,
                height,
                format,
                size,
                data.len()
            )));
        }
        Ok(Self {
            data,
            width,
            height,
            format,
        })
    }

    fn checked_size(width: usize, height: usize, format: FourCC) -> Result<usize> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions {
                width: width as i64,
                height: height as i64,
            });
        }
        match format {
            RGB3 | GREY => format_row_stride(format, width)
                .and_then(|stride| stride.checked_mul(height))
                .ok_or(Error::InvalidDimensions {
                    width: width as i64,
                    height: height as i64,
                }),
            _ => Err(Error::ImageMismatch(format!(
                "{} is not a logical image format",
                format
            ))),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn format(&self) -> FourCC {
        self.format
    }

    pub fn channels(&self) -> usize {
        match self.format {
            RGB3 => 3,
            _ => 1,
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Returns the RGB triple at `(x, y)` for RGB3 images, or the grey value
    /// repeated for GREY images.
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let ch = self.channels();
        let idx = (y * self.width + x) * ch;
        match ch {
            3 => Some([self.data[idx], self.data[idx + 1], self.data[idx + 2]]),
            _ => Some([self.data[idx]; 3]),
        }
    }

    /// Converts an RGB3 image into an `image` crate buffer for the vision
    /// primitives.
    pub fn to_rgb_image(&self) -> Result<RgbImage> {
        if self.format != RGB3 {
            return Err(Error::ImageMismatch(format!(
                "expected RGB3 image, got {}",
                self.format
            )));
        }
        ImageBuffer::<Rgb<u8>, _>::from_raw(
            self.width as u32,
            self.height as u32,
            self.data.clone(),
        )
        .ok_or_else(|| Error::ImageMismatch("failed to create rgb buffer".to_string()))
    }

    /// Builds a GREY image from an `image` crate luma buffer.
    pub fn from_gray_image(gray: GrayImage) -> Result<Self> {
        let (width, height) = gray.dimensions();
        Self::from_vec(width as usize, height as usize, GREY, gray.into_raw())
    }

    /// Replicates a GREY image into three identical RGB channels.
    pub fn grey_to_rgb(&self) -> Result<Self> {
        if self.format != GREY {
            return Err(Error::ImageMismatch(format!(
                "expected GREY image, got {}",
                self.format
            )));
        }
        let data = self.data.iter().flat_map(|&v| [v, v, v]).collect();
        Self::from_vec(self.width, self.height, RGB3, data)
    }

    /// Saves the image as PNG for inspection.
    pub fn save_png(&self, path: &Path) -> Result<()> {
        match self.format {
            RGB3 => self.to_rgb_image()?.save(path)?,
            _ => GrayImage::from_raw(self.width as u32, self.height as u32, self.data.clone())
                .ok_or_else(|| Error::ImageMismatch("failed to create grey buffer".to_string()))?
                .save(path)?,
        }
        Ok(())
    }
}

impl fmt::Display for Image {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}x{} {}", self.width, self.height, self.format)
    }
}
