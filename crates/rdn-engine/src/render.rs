//! Frame rendering from a grid into a pixel buffer.

use glam::Vec3;

use rdn_core::GridSet;

use crate::color::{ColorMatrix, PixelFormat};
use crate::palette::{CellSample, Palette};

/// Output target of one frame.
#[derive(Debug)]
pub struct FrameTarget<'a> {
    /// Pixel bytes, row-major.
    pub pixels: &'a mut [u8],
    /// Bytes between row starts.
    pub row_stride: usize,
    /// Byte layout of one pixel.
    pub format: PixelFormat,
}

/// Writes one pixel per grid cell.
///
/// With `mirrored`, output column `x` shows grid column `w - 1 - x` and the
/// horizontal light component is negated, which lights the flipped surface
/// as if its gradients had been flipped.
///
/// Expects a buffer already checked against the frame size and derivative
/// fields that are current for the state.
pub fn render_frame(
    grids: &GridSet<2>,
    palette: &mut Palette,
    color: &ColorMatrix,
    light: Vec3,
    mirrored: bool,
    target: FrameTarget<'_>,
) {
    let (w, h) = grids.shape();
    let bpp = target.format.bytes_per_pixel();
    let light = if mirrored {
        Vec3::new(-light.x, light.y, light.z)
    } else {
        light
    };

    for y in 0..h {
        palette.begin_row(y);
        let state = grids.state.row(y);
        let lap = grids.laplacian.row(y);
        let gx = grids.grad_x.row(y);
        let gy = grids.grad_y.row(y);
        let out = &mut target.pixels[y * target.row_stride..];
        for px in 0..w {
            let x = if mirrored { w - 1 - px } else { px };
            let sample = CellSample {
                value: state[x],
                laplacian: lap[x],
                grad_x: gx[x],
                grad_y: gy[x],
            };
            let rgb = color.apply(palette.shade(&sample, light));
            target.format.pack(rgb, &mut out[px * bpp..(px + 1) * bpp]);
        }
    }
}
