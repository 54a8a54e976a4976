//! Color correction and pixel packing.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use glam::Vec3;

use crate::error::ConfigError;

/// Number of entries in the row-major 4×5 host representation.
pub const COLOR_MATRIX_LEN: usize = 20;

/// Rec. 709 luminance weights used by the hue rotation.
const LUM: Vec3 = Vec3::new(0.213, 0.715, 0.072);

/// Affine color transform applied to palette output.
///
/// Works in the 0..255 intensity scale. The host supplies a 4×5 row-major
/// matrix whose fourth column multiplies an implicit opaque alpha (255) and
/// whose fifth column is a constant offset; only the first three rows are used.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ColorMatrix {
    /// Output rows of the linear part.
    pub rows: [Vec3; 3],
    /// Per-channel constant added after the linear part.
    pub offset: Vec3,
}

impl Default for ColorMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ColorMatrix {
    /// Leaves colors unchanged.
    pub const IDENTITY: Self = Self {
        rows: [Vec3::X, Vec3::Y, Vec3::Z],
        offset: Vec3::ZERO,
    };

    /// Parses the 20-entry row-major host form.
    pub fn from_slice(m: &[f32]) -> Result<Self, ConfigError> {
        if m.len() != COLOR_MATRIX_LEN {
            return Err(ConfigError::ColorMatrixLength(m.len()));
        }
        let row = |r: usize| Vec3::new(m[r * 5], m[r * 5 + 1], m[r * 5 + 2]);
        let off = |r: usize| m[r * 5 + 3] * 255.0 + m[r * 5 + 4];
        Ok(Self {
            rows: [row(0), row(1), row(2)],
            offset: Vec3::new(off(0), off(1), off(2)),
        })
    }

    /// Returns the 20-entry row-major host form.
    pub fn to_array(&self) -> [f32; COLOR_MATRIX_LEN] {
        let mut out = [0.0; COLOR_MATRIX_LEN];
        for (r, row) in self.rows.iter().enumerate() {
            out[r * 5..r * 5 + 3].copy_from_slice(&row.to_array());
            out[r * 5 + 4] = self.offset[r];
        }
        out[18] = 1.0;
        out
    }

    /// Luminance-preserving hue rotation by `radians`.
    pub fn hue_rotation(radians: f32) -> Self {
        let (s, c) = radians.sin_cos();
        let rows = [
            Vec3::new(
                LUM.x + c * (1.0 - LUM.x) - s * LUM.x,
                LUM.y - c * LUM.y - s * LUM.y,
                LUM.z - c * LUM.z + s * (1.0 - LUM.z),
            ),
            Vec3::new(
                LUM.x - c * LUM.x + s * 0.143,
                LUM.y + c * (1.0 - LUM.y) + s * 0.140,
                LUM.z - c * LUM.z - s * 0.283,
            ),
            Vec3::new(
                LUM.x - c * LUM.x - s * (1.0 - LUM.x),
                LUM.y - c * LUM.y + s * LUM.y,
                LUM.z + c * (1.0 - LUM.z) + s * LUM.z,
            ),
        ];
        Self {
            rows,
            offset: Vec3::ZERO,
        }
    }

    /// Applies the transform to an RGB intensity triple.
    #[inline]
    pub fn apply(&self, rgb: Vec3) -> Vec3 {
        Vec3::new(
            self.rows[0].dot(rgb),
            self.rows[1].dot(rgb),
            self.rows[2].dot(rgb),
        ) + self.offset
    }
}

/// Byte layout of one output pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PixelFormat {
    /// Red, green, blue.
    #[default]
    Rgb8,
    /// Red, green, blue, opaque alpha.
    Rgba8,
}

impl PixelFormat {
    /// Bytes per pixel.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgb8 => 3,
            PixelFormat::Rgba8 => 4,
        }
    }

    /// Saturates `rgb` to 8 bits and writes one pixel into `out`.
    #[inline]
    pub fn pack(self, rgb: Vec3, out: &mut [u8]) {
        out[0] = to_u8(rgb.x);
        out[1] = to_u8(rgb.y);
        out[2] = to_u8(rgb.z);
        if self == PixelFormat::Rgba8 {
            out[3] = u8::MAX;
        }
    }
}

/// Saturating conversion; NaN maps to 0.
#[inline]
pub fn to_u8(v: f32) -> u8 {
    v.clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec3_eq(a: Vec3, b: Vec3) {
        assert!((a - b).abs().max_element() < 1e-4, "{a} != {b}");
    }

    #[test]
    fn test_identity_from_slice() {
        let mut m = [0.0; 20];
        m[0] = 1.0;
        m[6] = 1.0;
        m[12] = 1.0;
        m[18] = 1.0;
        assert_eq!(ColorMatrix::from_slice(&m), Ok(ColorMatrix::IDENTITY));
        assert_eq!(ColorMatrix::IDENTITY.to_array(), m);
    }

    #[test]
    fn test_wrong_length() {
        assert_eq!(
            ColorMatrix::from_slice(&[1.0; 12]),
            Err(ConfigError::ColorMatrixLength(12))
        );
    }

    #[test]
    fn test_offset_columns() {
        let mut m = ColorMatrix::IDENTITY.to_array();
        m[3] = 0.5; // alpha column of red
        m[9] = 10.0; // constant of green
        let cm = ColorMatrix::from_slice(&m).unwrap();
        assert_vec3_eq(cm.offset, Vec3::new(127.5, 10.0, 0.0));
        assert_vec3_eq(cm.apply(Vec3::ZERO), Vec3::new(127.5, 10.0, 0.0));
    }

    #[test]
    fn test_hue_rotation_zero_is_identity() {
        let cm = ColorMatrix::hue_rotation(0.0);
        for (a, b) in cm.rows.iter().zip(ColorMatrix::IDENTITY.rows) {
            assert_vec3_eq(*a, b);
        }
    }

    #[test]
    fn test_hue_rotation_preserves_gray() {
        for angle in [0.3f32, 1.0, 2.5, -1.2] {
            let cm = ColorMatrix::hue_rotation(angle);
            assert_vec3_eq(cm.apply(Vec3::splat(100.0)), Vec3::splat(100.0));
        }
    }

    #[test]
    fn test_hue_rotation_changes_color() {
        let red = Vec3::new(200.0, 0.0, 0.0);
        let rotated = ColorMatrix::hue_rotation(2.0).apply(red);
        assert!((rotated - red).length() > 10.0);
    }

    #[test]
    fn test_pack() {
        let mut px = [0u8; 4];
        PixelFormat::Rgba8.pack(Vec3::new(-5.0, 127.9, 300.0), &mut px);
        assert_eq!(px, [0, 127, 255, 255]);

        let mut px = [9u8; 4];
        PixelFormat::Rgb8.pack(Vec3::new(f32::NAN, 1.0, 2.0), &mut px);
        assert_eq!(px, [0, 1, 2, 9]);
    }
}
