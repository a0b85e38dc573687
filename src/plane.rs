// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Borrowed views of camera planes with explicit row and pixel strides.
//!
//! Camera hardware pads rows to an alignment boundary and semi-planar chroma
//! stores U and V samples interleaved, so a plane is addressed as
//! `row * row_stride + col * pixel_stride`. Every view is validated against
//! the length of its slice when it is created; after that, reads and writes
//! only ever touch logical sample positions.

use crate::error::{Error, Result};

/// Geometry of one plane: logical size plus physical strides.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PlaneLayout {
    /// Logical samples per row
    pub width: usize,
    /// Logical rows
    pub height: usize,
    /// Bytes between the start of consecutive rows
    pub row_stride: usize,
    /// Bytes between consecutive samples in a row
    pub pixel_stride: usize,
}

impl PlaneLayout {
    pub fn new(width: usize, height: usize, row_stride: usize, pixel_stride: usize) -> Self {
        Self {
            width,
            height,
            row_stride,
            pixel_stride,
        }
    }

    /// Tightly packed single channel layout.
    pub fn packed(width: usize, height: usize) -> Self {
        Self::new(width, height, width, 1)
    }

    /// Byte offset of the sample at `(x, y)`.
    #[inline(always)]
    pub fn offset(&self, x: usize, y: usize) -> usize {
        y * self.row_stride + x * self.pixel_stride
    }

    /// Number of logical samples.
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    /// Bytes one row of samples spans, from the first byte of its first
    /// sample to the last byte of its last sample. `None` on overflow or an
    /// empty layout.
    fn row_span(&self, channels: usize) -> Option<usize> {
        self.width
            .checked_sub(1)?
            .checked_mul(self.pixel_stride)?
            .checked_add(channels)
    }

    /// Smallest slice length that holds every logical sample of `channels`
    /// bytes, or `None` if the layout is empty or overflows.
    ///
    /// Padding after the final sample of the last row is not required, as
    /// Android camera buffers routinely omit it.
    pub fn required_len(&self, channels: usize) -> Option<usize> {
        self.height
            .checked_sub(1)?
            .checked_mul(self.row_stride)?
            .checked_add(self.row_span(channels)?)
    }

    /// Checks the layout is addressable and fits in `len` bytes.
    pub fn validate(&self, name: &'static str, len: usize) -> Result<()> {
        self.validate_channels(name, len, 1)
    }

    /// Same as [`PlaneLayout::validate`] for a plane whose samples carry
    /// `channels` interleaved bytes each, such as semi-planar chroma.
    pub fn validate_channels(&self, name: &'static str, len: usize, channels: usize) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidDimensions {
                width: self.width as i64,
                height: self.height as i64,
            });
        }
        match self.row_span(channels) {
            Some(span)
                if channels > 0 && self.pixel_stride >= channels && self.row_stride >= span => {}
            _ => {
                return Err(Error::InvalidStride {
                    plane: name,
                    width: self.width,
                    row_stride: self.row_stride,
                    pixel_stride: self.pixel_stride,
                })
            }
        }
        let required = self.required_len(channels).ok_or(Error::PlaneTooSmall {
            plane: name,
            len,
            required: usize::MAX,
        })?;
        if len < required {
            return Err(Error::PlaneTooSmall {
                plane: name,
                len,
                required,
            });
        }
        Ok(())
    }
}

/// A caller-owned plane borrowed for the duration of one call.
#[derive(Debug)]
pub struct Plane<'a> {
    name: &'static str,
    data: &'a mut [u8],
    layout: PlaneLayout,
    channels: usize,
}

impl<'a> Plane<'a> {
    /// Wraps `data` after validating `layout` against its length.
    pub fn new(name: &'static str, data: &'a mut [u8], layout: PlaneLayout) -> Result<Self> {
        Self::interleaved(name, data, layout, 1)
    }

    /// Wraps a plane whose samples hold `channels` consecutive bytes, e.g.
    /// the VU pairs of NV21 chroma.
    pub fn interleaved(
        name: &'static str,
        data: &'a mut [u8],
        layout: PlaneLayout,
        channels: usize,
    ) -> Result<Self> {
        layout.validate_channels(name, data.len(), channels)?;
        Ok(Self {
            name,
            data,
            layout,
            channels,
        })
    }

    pub fn layout(&self) -> PlaneLayout {
        self.layout
    }

    /// Copies the logical samples into a tightly packed buffer, dropping
    /// row padding and interleaved neighbours.
    pub fn read_cropped(&self) -> Vec<u8> {
        self.read_channel(0)
    }

    /// Writes a tightly packed buffer back to the logical sample positions.
    ///
    /// Padding bytes and interleaved neighbours are left untouched.
    pub fn write_cropped(&mut self, samples: &[u8]) -> Result<()> {
        self.write_channel(0, samples)
    }

    /// Copies one channel of the logical samples into a packed buffer.
    ///
    /// # Panics
    ///
    /// Panics if `channel` is not below the channel count the plane was
    /// created with.
    pub fn read_channel(&self, channel: usize) -> Vec<u8> {
        assert!(channel < self.channels, "channel {} out of range", channel);
        let PlaneLayout { width, height, .. } = self.layout;
        let mut out = Vec::with_capacity(self.layout.area());
        for row in 0..height {
            if self.layout.pixel_stride == 1 {
                let start = self.layout.offset(0, row);
                out.extend_from_slice(&self.data[start..start + width]);
            } else {
                out.extend(
                    (0..width).map(|col| self.data[self.layout.offset(col, row) + channel]),
                );
            }
        }
        out
    }

    /// Writes one channel of packed samples back to the logical positions.
    pub fn write_channel(&mut self, channel: usize, samples: &[u8]) -> Result<()> {
        assert!(channel < self.channels, "channel {} out of range", channel);
        let width = self.layout.width;
        if samples.len() != self.layout.area() {
            return Err(Error::ImageMismatch(format!(
                "{} plane expects {} samples, got {}",
                self.name,
                self.layout.area(),
                samples.len()
            )));
        }
        for (row, src) in samples.chunks_exact(width).enumerate() {
            if self.layout.pixel_stride == 1 {
                let start = self.layout.offset(0, row);
                self.data[start..start + width].copy_from_slice(src);
            } else {
                for (col, &v) in src.iter().enumerate() {
                    let idx = self.layout.offset(col, row) + channel;
                    self.data[idx] = v;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_len() {
        let layout = PlaneLayout::new(4, 3, 8, 1);
        assert_eq!(layout.required_len(1), Some(2 * 8 + 4));

        let chroma = PlaneLayout::new(2, 2, 4, 2);
        assert_eq!(chroma.required_len(1), Some(4 + 2 + 1));
        assert_eq!(chroma.required_len(2), Some(4 + 2 + 2));

        assert_eq!(PlaneLayout::packed(0, 4).required_len(1), None);
        assert_eq!(PlaneLayout::new(2, 3, usize::MAX, 1).required_len(1), None);
    }

    #[test]
    fn test_validate_matches_required_len() {
        let layout = PlaneLayout::new(3, 2, 8, 2);
        let required = layout.required_len(2).unwrap();
        assert!(layout.validate_channels("uv", required, 2).is_ok());
        assert!(matches!(
            layout.validate_channels("uv", required - 1, 2),
            Err(Error::PlaneTooSmall { required: r, .. }) if r == required
        ));
    }

    #[test]
    fn test_validate_rejects_narrow_stride() {
        let layout = PlaneLayout::new(4, 2, 3, 1);
        assert!(matches!(
            layout.validate("y", 64),
            Err(Error::InvalidStride { plane: "y", .. })
        ));

        let layout = PlaneLayout::new(4, 2, 6, 2);
        assert!(layout.validate("u", 64).is_err());

        let layout = PlaneLayout::new(4, 2, 8, 0);
        assert!(layout.validate("u", 64).is_err());
    }

    #[test]
    fn test_validate_rejects_short_slice() {
        let layout = PlaneLayout::new(4, 2, 8, 1);
        assert!(matches!(
            layout.validate("y", 11),
            Err(Error::PlaneTooSmall { required: 12, .. })
        ));
        assert!(layout.validate("y", 12).is_ok());
    }

    #[test]
    fn test_crop_skips_padding() {
        let mut data = vec![
            1, 2, 3, 0xEE, //
            4, 5, 6, 0xEE, //
        ];
        let mut plane = Plane::new("y", &mut data, PlaneLayout::new(3, 2, 4, 1)).unwrap();
        assert_eq!(plane.read_cropped(), vec![1, 2, 3, 4, 5, 6]);

        plane.write_cropped(&[9, 8, 7, 6, 5, 4]).unwrap();
        assert_eq!(data, vec![9, 8, 7, 0xEE, 6, 5, 4, 0xEE]);
    }

    #[test]
    fn test_pixel_stride_keeps_neighbours() {
        // V samples at even offsets, U samples interleaved at odd offsets
        let mut data = vec![10, 20, 11, 21, 12, 22, 13, 23];
        let mut plane = Plane::new("v", &mut data, PlaneLayout::new(2, 2, 4, 2)).unwrap();
        assert_eq!(plane.read_cropped(), vec![10, 11, 12, 13]);

        plane.write_cropped(&[0, 1, 2, 3]).unwrap();
        assert_eq!(data, vec![0, 20, 1, 21, 2, 22, 3, 23]);
    }

    #[test]
    fn test_interleaved_channels() {
        let mut data = vec![10, 20, 11, 21, 0xEE, 0xEE, 12, 22, 13, 23];
        let layout = PlaneLayout::new(2, 2, 6, 2);
        let mut plane = Plane::interleaved("vu", &mut data, layout, 2).unwrap();
        assert_eq!(plane.read_channel(0), vec![10, 11, 12, 13]);
        assert_eq!(plane.read_channel(1), vec![20, 21, 22, 23]);

        plane.write_channel(1, &[1, 2, 3, 4]).unwrap();
        assert_eq!(data, vec![10, 1, 11, 2, 0xEE, 0xEE, 12, 3, 13, 4]);
    }

    #[test]
    fn test_interleaved_needs_trailing_byte() {
        let layout = PlaneLayout::new(2, 2, 4, 2);
        assert!(layout.validate_channels("vu", 7, 2).is_err());
        assert!(layout.validate_channels("vu", 8, 2).is_ok());
        assert!(PlaneLayout::new(2, 2, 4, 1)
            .validate_channels("vu", 8, 2)
            .is_err());
    }

    #[test]
    fn test_write_wrong_length() {
        let mut data = vec![0; 4];
        let mut plane = Plane::new("y", &mut data, PlaneLayout::packed(2, 2)).unwrap();
        assert!(plane.write_cropped(&[1, 2, 3]).is_err());
        assert_eq!(data, vec![0; 4]);
    }
}
