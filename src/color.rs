// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! BT.601 full range (JFIF) YUV <-> RGB conversion in 16.16 fixed point.
//!
//! Camera YUV_420_888 frames use full range samples, so Y spans 0..=255 and
//! chroma is centred on 128. Coefficient pairs are chosen so grey input maps
//! to grey output exactly in both directions.

const SHIFT: u32 = 16;
const HALF: i32 = 1 << (SHIFT - 1);

// YUV -> RGB
const V_TO_R: i32 = 91881; // 1.402
const U_TO_G: i32 = 22554; // 0.344136
const V_TO_G: i32 = 46802; // 0.714136
const U_TO_B: i32 = 116130; // 1.772

// RGB -> Y
const R_TO_Y: i32 = 19595; // 0.299
const G_TO_Y: i32 = 38470; // 0.587
const B_TO_Y: i32 = 7471; // 0.114

// RGB -> U
const R_TO_U: i32 = -11059; // -0.168736
const G_TO_U: i32 = -21709; // -0.331264
const B_TO_U: i32 = 32768; // 0.5

// RGB -> V
const R_TO_V: i32 = 32768; // 0.5
const G_TO_V: i32 = -27439; // -0.418688
const B_TO_V: i32 = -5329; // -0.081312

#[inline(always)]
fn clamp_u8(v: i32) -> u8 {
    v.clamp(0, 255) as u8
}

/// Converts one full range YUV sample to RGB.
#[inline(always)]
pub fn yuv_to_rgb(y: u8, u: u8, v: u8) -> [u8; 3] {
    let y = y as i32;
    let u = u as i32 - 128;
    let v = v as i32 - 128;
    let r = y + ((V_TO_R * v + HALF) >> SHIFT);
    let g = y + ((-U_TO_G * u - V_TO_G * v + HALF) >> SHIFT);
    let b = y + ((U_TO_B * u + HALF) >> SHIFT);
    [clamp_u8(r), clamp_u8(g), clamp_u8(b)]
}

/// Luma of one RGB pixel.
#[inline(always)]
pub fn rgb_to_y(rgb: [u8; 3]) -> u8 {
    let [r, g, b] = rgb.map(i32::from);
    clamp_u8((R_TO_Y * r + G_TO_Y * g + B_TO_Y * b + HALF) >> SHIFT)
}

/// Unrounded chroma of one RGB pixel, in 16.16 fixed point centred on zero.
///
/// Kept at full precision so a 2x2 block can be averaged before rounding.
#[inline(always)]
pub fn rgb_to_uv_fixed(rgb: [u8; 3]) -> (i32, i32) {
    let [r, g, b] = rgb.map(i32::from);
    (
        R_TO_U * r + G_TO_U * g + B_TO_U * b,
        R_TO_V * r + G_TO_V * g + B_TO_V * b,
    )
}

/// Rounds the sum of `count` fixed point chroma values to one 8-bit sample.
#[inline(always)]
pub fn chroma_from_fixed_sum(sum: i32, count: i32) -> u8 {
    let divisor = count << SHIFT;
    clamp_u8((sum + divisor / 2).div_euclid(divisor) + 128)
}

/// Converts one RGB pixel to full range YUV.
pub fn rgb_to_yuv(rgb: [u8; 3]) -> [u8; 3] {
    let (u, v) = rgb_to_uv_fixed(rgb);
    [
        rgb_to_y(rgb),
        chroma_from_fixed_sum(u, 1),
        chroma_from_fixed_sum(v, 1),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grey_is_exact() {
        for y in 0..=255u8 {
            assert_eq!(yuv_to_rgb(y, 128, 128), [y, y, y]);
            assert_eq!(rgb_to_yuv([y, y, y]), [y, 128, 128]);
        }
    }

    #[test]
    fn test_primaries() {
        assert_eq!(rgb_to_yuv([255, 0, 0]), [76, 85, 255]);
        assert_eq!(rgb_to_yuv([0, 0, 255]), [29, 255, 107]);
        assert_eq!(yuv_to_rgb(0, 128, 255), [178, 0, 0]);
    }

    #[test]
    fn test_in_gamut_round_trip() {
        for y in (64..=192u8).step_by(8) {
            for u in (112..=144u8).step_by(4) {
                for v in (112..=144u8).step_by(4) {
                    let back = rgb_to_yuv(yuv_to_rgb(y, u, v));
                    for (a, b) in back.iter().zip([y, u, v]) {
                        assert!(a.abs_diff(b) <= 1, "{:?} -> {:?}", [y, u, v], back);
                    }
                }
            }
        }
    }

    #[test]
    fn test_chroma_average_rounds_once() {
        // two samples of +0.5 and two of 0 average to 0.25 -> rounds to 128
        let half = 1 << 15;
        assert_eq!(chroma_from_fixed_sum(2 * half, 4), 128);
        // negative sums floor correctly
        assert_eq!(chroma_from_fixed_sum(-4 * 65536, 4), 127);
        assert_eq!(chroma_from_fixed_sum(i32::MIN / 2, 1), 0);
    }
}
