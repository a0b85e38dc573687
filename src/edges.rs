// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Edge filter gate.
//!
//! The blur and Canny stages come from `imageproc`; this module only
//! configures them and switches them on or off per frame.

use crate::{
    error::{Error, Result},
    image::Image,
};
use image::imageops;
use imageproc::{edges::canny, filter::gaussian_blur_f32};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

/// Process-wide switch for the edge filter.
///
/// Reads and writes use [`Ordering::Relaxed`]: a frame processed while
/// another thread toggles the mode sees either the old or the new value, and
/// the change takes effect no later than the next frame. No other memory is
/// published through this flag.
#[derive(Debug)]
pub struct ProcessingMode(AtomicBool);

impl ProcessingMode {
    pub const fn new(enabled: bool) -> Self {
        Self(AtomicBool::new(enabled))
    }

    pub fn set(&self, enabled: bool) {
        self.0.store(enabled, Ordering::Relaxed);
    }

    pub fn is_enabled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

impl Default for ProcessingMode {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Grayscale, Gaussian blur, and Canny thresholds applied when the gate is
/// enabled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeFilter {
    /// Standard deviation of the Gaussian blur
    pub sigma: f32,
    /// Canny hysteresis low threshold
    pub low_threshold: f32,
    /// Canny hysteresis high threshold
    pub high_threshold: f32,
}

impl Default for EdgeFilter {
    fn default() -> Self {
        Self {
            sigma: 1.5,
            low_threshold: 50.0,
            high_threshold: 150.0,
        }
    }
}

impl EdgeFilter {
    /// Creates a filter, rejecting parameters the vision primitives would
    /// panic on.
    pub fn new(sigma: f32, low_threshold: f32, high_threshold: f32) -> Result<Self> {
        if !(sigma.is_finite() && sigma > 0.0) {
            return Err(Error::Filter(format!("sigma must be positive, got {}", sigma)));
        }
        if !(low_threshold.is_finite() && high_threshold.is_finite())
            || low_threshold < 0.0
            || low_threshold > high_threshold
        {
            return Err(Error::Filter(format!(
                "thresholds must satisfy 0 <= low <= high, got {} and {}",
                low_threshold, high_threshold
            )));
        }
        Ok(Self {
            sigma,
            low_threshold,
            high_threshold,
        })
    }

    /// Single channel edge map (0 or 255 per pixel) of an RGB3 image.
    pub fn edge_map(&self, img: &Image) -> Result<Image> {
        let rgb = img.to_rgb_image()?;
        let gray = imageops::grayscale(&rgb);
        let blurred = gaussian_blur_f32(&gray, self.sigma);
        let edges = canny(&blurred, self.low_threshold, self.high_threshold);
        Image::from_gray_image(edges)
    }

    /// Edge map replicated to three channels, the same size as `img`.
    pub fn apply(&self, img: &Image) -> Result<Image> {
        let out = self.edge_map(img)?.grey_to_rgb()?;
        debug!("edge filter applied to {}", img);
        Ok(out)
    }
}

/// Placeholder edge detector for packed images.
///
/// Returns `width * height` zeros. The shape is the only contract: hosts size
/// their result buffers from it while the detector itself is not
/// implemented.
///
/// # Errors
///
/// Returns [`Error::InvalidDimensions`] if either dimension is negative or
/// their product overflows.
pub fn detect_edges(image: &[u8], width: i32, height: i32) -> Result<Vec<i32>> {
    let invalid = Error::InvalidDimensions {
        width: width as i64,
        height: height as i64,
    };
    let (Ok(w), Ok(h)) = (usize::try_from(width), usize::try_from(height)) else {
        return Err(invalid);
    };
    let len = w
        .checked_mul(h)
        .filter(|&n| i32::try_from(n).is_ok())
        .ok_or(invalid)?;
    debug!(
        "detecting edges for {}x{} image of {} bytes",
        width,
        height,
        image.len()
    );
    Ok(vec![0; len])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{GREY, RGB3};

    #[test]
    fn test_mode_toggle() {
        let mode = ProcessingMode::default();
        assert!(mode.is_enabled());
        mode.set(false);
        assert!(!mode.is_enabled());
        mode.set(true);
        assert!(mode.is_enabled());
    }

    #[test]
    fn test_filter_validation() {
        assert!(EdgeFilter::new(0.0, 50.0, 150.0).is_err());
        assert!(EdgeFilter::new(1.5, 150.0, 50.0).is_err());
        assert!(EdgeFilter::new(1.5, f32::NAN, 50.0).is_err());
        assert_eq!(
            EdgeFilter::new(1.5, 50.0, 150.0).unwrap(),
            EdgeFilter::default()
        );
    }

    #[test]
    fn test_flat_image_has_no_edges() {
        let img = Image::from_vec(16, 16, RGB3, vec![90; 16 * 16 * 3]).unwrap();
        let map = EdgeFilter::default().edge_map(&img).unwrap();
        assert_eq!(map.format(), GREY);
        assert!(map.as_slice().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_step_edge_is_found() {
        let mut data = Vec::with_capacity(32 * 16 * 3);
        for _ in 0..16 {
            for x in 0..32 {
                let v = if x < 16 { 0 } else { 255 };
                data.extend_from_slice(&[v, v, v]);
            }
        }
        let img = Image::from_vec(32, 16, RGB3, data).unwrap();
        let out = EdgeFilter::default().apply(&img).unwrap();
        assert_eq!(out.format(), RGB3);
        assert_eq!(out.size(), img.size());
        assert!(out.as_slice().iter().all(|&v| v == 0 || v == 255));
        assert_eq!(out.pixel(0, 8), Some([0, 0, 0]));
        assert!((14..18).any(|x| out.pixel(x, 8) == Some([255, 255, 255])));
    }

    #[test]
    fn test_detect_edges_shape() {
        assert_eq!(detect_edges(&[], 0, 0).unwrap().len(), 0);
        assert_eq!(detect_edges(&[], 7, 0).unwrap().len(), 0);
        let out = detect_edges(&[0; 12], 4, 3).unwrap();
        assert_eq!(out, vec![0; 12]);
        assert!(detect_edges(&[], -1, 4).is_err());
        assert!(detect_edges(&[], i32::MAX, i32::MAX).is_err());
    }
}
