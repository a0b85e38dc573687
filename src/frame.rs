// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! YUV 4:2:0 camera frames borrowed in place.
//!
//! A [`YuvFrame`] ties a luma plane and its chroma planes to the logical frame
//! size. [`YuvFrame::reassemble`] produces an RGB [`Image`] and
//! [`YuvFrame::write_back`] stores an RGB image into the original planes,
//! honouring each plane's strides. [`process_frame`] chains both through the
//! optional edge filter.

use crate::{
    color::{chroma_from_fixed_sum, rgb_to_uv_fixed, rgb_to_y, yuv_to_rgb},
    edges::EdgeFilter,
    error::{Error, Result},
    image::{chroma_size, FourCC, Image, I420, NV12, NV21, RGB3},
    plane::{Plane, PlaneLayout},
};
use tracing::{debug, info_span};

/// Byte order of interleaved chroma samples.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChromaOrder {
    /// U first, as in NV12
    Uv,
    /// V first, as in NV21
    Vu,
}

/// Chroma storage of a 4:2:0 frame.
#[derive(Debug)]
pub enum Chroma<'a> {
    /// Separate U and V planes, each possibly with a pixel stride.
    Planar { u: Plane<'a>, v: Plane<'a> },
    /// One plane holding U/V pairs.
    Interleaved { uv: Plane<'a>, order: ChromaOrder },
}

impl Chroma<'_> {
    fn layout(&self) -> PlaneLayout {
        match self {
            Chroma::Planar { u, .. } => u.layout(),
            Chroma::Interleaved { uv, .. } => uv.layout(),
        }
    }

    fn read(&self) -> (Vec<u8>, Vec<u8>) {
        match self {
            Chroma::Planar { u, v } => (u.read_cropped(), v.read_cropped()),
            Chroma::Interleaved { uv, order } => {
                let (u, v) = match order {
                    ChromaOrder::Uv => (0, 1),
                    ChromaOrder::Vu => (1, 0),
                };
                (uv.read_channel(u), uv.read_channel(v))
            }
        }
    }

    fn write(&mut self, u_samples: &[u8], v_samples: &[u8]) -> Result<()> {
        match self {
            Chroma::Planar { u, v } => {
                u.write_cropped(u_samples)?;
                v.write_cropped(v_samples)
            }
            Chroma::Interleaved { uv, order } => {
                let (u, v) = match order {
                    ChromaOrder::Uv => (0, 1),
                    ChromaOrder::Vu => (1, 0),
                };
                uv.write_channel(u, u_samples)?;
                uv.write_channel(v, v_samples)
            }
        }
    }
}

/// Bytes needed for a packed frame whose rows carry `row_padding` extra
/// bytes. Chroma rows of I420 carry half the padding.
pub fn packed_len(
    width: usize,
    height: usize,
    format: FourCC,
    row_padding: usize,
) -> Option<usize> {
    let (cw, ch) = (chroma_size(width), chroma_size(height));
    let luma = (width + row_padding).checked_mul(height)?;
    let chroma = match format {
        I420 => 2 * (cw + row_padding / 2).checked_mul(ch)?,
        NV12 | NV21 => (2 * cw + row_padding).checked_mul(ch)?,
        _ => return None,
    };
    luma.checked_add(chroma)
}

/// A 4:2:0 frame whose planes are borrowed from the caller.
#[derive(Debug)]
pub struct YuvFrame<'a> {
    width: usize,
    height: usize,
    y: Plane<'a>,
    chroma: Chroma<'a>,
}

impl<'a> YuvFrame<'a> {
    /// Builds a frame from validated planes.
    ///
    /// # Errors
    ///
    /// Returns an error if the luma plane is not `width x height` or the
    /// chroma planes are not half that size (rounded up).
    pub fn new(width: usize, height: usize, y: Plane<'a>, chroma: Chroma<'a>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions {
                width: width as i64,
                height: height as i64,
            });
        }
        let luma = y.layout();
        if luma.width != width || luma.height != height {
            return Err(Error::ImageMismatch(format!(
                "luma plane is {}x{}, frame is {}x{}",
                luma.width, luma.height, width, height
            )));
        }
        if let Chroma::Planar { u, v } = &chroma {
            if u.layout() != v.layout() {
                return Err(Error::ImageMismatch(
                    "u and v planes differ in layout".to_string(),
                ));
            }
        }
        let c = chroma.layout();
        if c.width != chroma_size(width) || c.height != chroma_size(height) {
            return Err(Error::ImageMismatch(format!(
                "chroma plane is {}x{}, frame {}x{} needs {}x{}",
                c.width,
                c.height,
                width,
                height,
                chroma_size(width),
                chroma_size(height)
            )));
        }
        Ok(Self {
            width,
            height,
            y,
            chroma,
        })
    }

    /// Builds a frame from three separate plane buffers, as delivered by an
    /// Android `Image` in `YUV_420_888` when U and V do not share memory.
    #[allow(clippy::too_many_arguments)]
    pub fn planar(
        width: usize,
        height: usize,
        y: &'a mut [u8],
        u: &'a mut [u8],
        v: &'a mut [u8],
        y_stride: usize,
        uv_stride: usize,
        uv_pixel_stride: usize,
    ) -> Result<Self> {
        let (cw, ch) = (chroma_size(width), chroma_size(height));
        let y = Plane::new("y", y, PlaneLayout::new(width, height, y_stride, 1))?;
        let u = Plane::new("u", u, PlaneLayout::new(cw, ch, uv_stride, uv_pixel_stride))?;
        let v = Plane::new("v", v, PlaneLayout::new(cw, ch, uv_stride, uv_pixel_stride))?;
        Self::new(width, height, y, Chroma::Planar { u, v })
    }

    /// Builds a frame from a luma buffer and one interleaved chroma buffer.
    pub fn semi_planar(
        width: usize,
        height: usize,
        y: &'a mut [u8],
        uv: &'a mut [u8],
        y_stride: usize,
        uv_stride: usize,
        order: ChromaOrder,
    ) -> Result<Self> {
        let (cw, ch) = (chroma_size(width), chroma_size(height));
        let y = Plane::new("y", y, PlaneLayout::new(width, height, y_stride, 1))?;
        let uv = Plane::interleaved("uv", uv, PlaneLayout::new(cw, ch, uv_stride, 2), 2)?;
        Self::new(width, height, y, Chroma::Interleaved { uv, order })
    }

    /// Splits a packed I420, NV12 or NV21 buffer into frame planes.
    ///
    /// Each row may carry `row_padding` trailing bytes (half of that for the
    /// separate I420 chroma planes), mimicking hardware-aligned buffers.
    pub fn from_packed(
        data: &'a mut [u8],
        width: usize,
        height: usize,
        format: FourCC,
        row_padding: usize,
    ) -> Result<Self> {
        let required = packed_len(width, height, format, row_padding).ok_or_else(|| {
            Error::ImageMismatch(format!("{} is not a 4:2:0 frame format", format))
        })?;
        if data.len() < required {
            return Err(Error::PlaneTooSmall {
                plane: "frame",
                len: data.len(),
                required,
            });
        }
        let (cw, ch) = (chroma_size(width), chroma_size(height));
        let y_stride = width + row_padding;
        let (y, chroma) = data.split_at_mut(y_stride * height);
        match format {
            I420 => {
                let uv_stride = cw + row_padding / 2;
                let (u, v) = chroma.split_at_mut(uv_stride * ch);
                Self::planar(width, height, y, u, v, y_stride, uv_stride, 1)
            }
            NV12 => Self::semi_planar(
                width,
                height,
                y,
                chroma,
                y_stride,
                2 * cw + row_padding,
                ChromaOrder::Uv,
            ),
            _ => Self::semi_planar(
                width,
                height,
                y,
                chroma,
                y_stride,
                2 * cw + row_padding,
                ChromaOrder::Vu,
            ),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Converts the frame into an interleaved RGB image of exactly
    /// `width x height` pixels.
    ///
    /// Each chroma sample is shared by the 2x2 luma block it covers.
    pub fn reassemble(&self) -> Result<Image> {
        let (w, h) = (self.width, self.height);
        let cw = chroma_size(w);
        let y = self.y.read_cropped();
        let (u, v) = self.chroma.read();

        let mut rgb = Vec::with_capacity(w * h * 3);
        for (row, luma) in y.chunks_exact(w).enumerate() {
            let crow = (row / 2) * cw;
            for (col, &yv) in luma.iter().enumerate() {
                let c = crow + col / 2;
                rgb.extend_from_slice(&yuv_to_rgb(yv, u[c], v[c]));
            }
        }
        Image::from_vec(w, h, RGB3, rgb)
    }

    /// Converts `img` back to YUV 4:2:0 and stores it in the frame planes.
    ///
    /// Chroma is the rounded average of each 2x2 block. All planes are
    /// computed before the first byte is written, so an error leaves the
    /// frame untouched.
    pub fn write_back(&mut self, img: &Image) -> Result<()> {
        if img.format() != RGB3 || img.width() != self.width || img.height() != self.height {
            return Err(Error::ImageMismatch(format!(
                "cannot write {} into a {}x{} frame",
                img, self.width, self.height
            )));
        }
        let (w, h) = (self.width, self.height);
        let (cw, ch) = (chroma_size(w), chroma_size(h));

        let mut y = Vec::with_capacity(w * h);
        let mut u_sum = vec![0i32; cw * ch];
        let mut v_sum = vec![0i32; cw * ch];
        let mut count = vec![0i32; cw * ch];

        for (i, px) in img.as_slice().chunks_exact(3).enumerate() {
            let px = [px[0], px[1], px[2]];
            let (row, col) = (i / w, i % w);
            let c = (row / 2) * cw + col / 2;
            let (u, v) = rgb_to_uv_fixed(px);
            y.push(rgb_to_y(px));
            u_sum[c] += u;
            v_sum[c] += v;
            count[c] += 1;
        }

        let u: Vec<u8> = u_sum
            .iter()
            .zip(&count)
            .map(|(&s, &n)| chroma_from_fixed_sum(s, n))
            .collect();
        let v: Vec<u8> = v_sum
            .iter()
            .zip(&count)
            .map(|(&s, &n)| chroma_from_fixed_sum(s, n))
            .collect();

        self.y.write_cropped(&y)?;
        self.chroma.write(&u, &v)
    }
}

/// Runs one frame through reassembly, the optional edge filter, and
/// writeback, modifying the frame planes in place.
pub fn process_frame(frame: &mut YuvFrame<'_>, enabled: bool, filter: &EdgeFilter) -> Result<()> {
    let _span = info_span!(
        "process_frame",
        width = frame.width(),
        height = frame.height(),
        enabled
    )
    .entered();

    let rgb = frame.reassemble()?;
    let out = if enabled { filter.apply(&rgb)? } else { rgb };
    frame.write_back(&out)?;

    debug!("processed frame {}x{}", frame.width(), frame.height());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packed_len() {
        assert_eq!(packed_len(4, 4, I420, 0), Some(16 + 8));
        assert_eq!(packed_len(4, 4, NV21, 0), Some(16 + 8));
        assert_eq!(packed_len(4, 4, NV21, 4), Some(32 + 16));
        assert_eq!(packed_len(4, 4, I420, 4), Some(32 + 16));
        assert_eq!(packed_len(4, 4, RGB3, 0), None);
    }

    #[test]
    fn test_chroma_size_mismatch() {
        let mut y = vec![0; 16];
        let mut u = vec![0; 16];
        let mut v = vec![0; 16];
        let y = Plane::new("y", &mut y, PlaneLayout::packed(4, 4)).unwrap();
        let u = Plane::new("u", &mut u, PlaneLayout::packed(4, 4)).unwrap();
        let v = Plane::new("v", &mut v, PlaneLayout::packed(4, 4)).unwrap();
        assert!(matches!(
            YuvFrame::new(4, 4, y, Chroma::Planar { u, v }),
            Err(Error::ImageMismatch(_))
        ));
    }

    #[test]
    fn test_reassemble_shares_chroma() {
        let mut data = vec![
            10, 20, 30, 40, //
            50, 60, 70, 80, //
            128, 128, //
            128, 200, //
        ];
        let frame = YuvFrame::from_packed(&mut data, 4, 2, I420, 0).unwrap();
        let img = frame.reassemble().unwrap();
        assert_eq!(img.width(), 4);
        assert_eq!(img.height(), 2);
        assert_eq!(img.pixel(0, 0), Some([10, 10, 10]));
        assert_eq!(img.pixel(1, 1), Some([60, 60, 60]));
        // second chroma block carries V = 200, so red is lifted
        let [r, g, b] = img.pixel(2, 0).unwrap();
        assert!(r > 30 && g < 30 && b == 30);
        assert_eq!(img.pixel(3, 1).map(|p| p[2]), Some(80));
    }

    #[test]
    fn test_odd_dimensions() {
        let mut data = vec![100; packed_len(3, 3, NV12, 0).unwrap()];
        let mut frame = YuvFrame::from_packed(&mut data, 3, 3, NV12, 0).unwrap();
        let img = frame.reassemble().unwrap();
        assert_eq!(img.size(), 27);
        frame.write_back(&img).unwrap();
        assert!(data.iter().all(|&b| b.abs_diff(100) <= 1));
    }

    #[test]
    fn test_write_back_rejects_wrong_size() {
        let mut data = vec![128; packed_len(4, 4, NV21, 0).unwrap()];
        let mut frame = YuvFrame::from_packed(&mut data, 4, 4, NV21, 0).unwrap();
        let img = Image::new(2, 2, RGB3).unwrap();
        assert!(frame.write_back(&img).is_err());
        assert!(data.iter().all(|&b| b == 128));
    }
}
