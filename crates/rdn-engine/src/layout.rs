//! Grid sizing for tiled display.
//!
//! The grid is coarser than the screen by `resolution` and repeated
//! `repeat_x` × `repeat_y` times across it. Every other tile row is drawn
//! mirrored so the mirrored-row boundary lines up across tile seams.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Screen pixels per grid cell by default.
pub const DEFAULT_RESOLUTION: usize = 4;

/// Smallest grid side.
pub const MIN_GRID_SIDE: usize = 4;

/// How a grid maps onto a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Layout {
    /// Screen pixels per grid cell.
    pub resolution: usize,
    /// Tiles across the short screen side.
    pub repeat_x: usize,
    /// Tiles along the long screen side.
    pub repeat_y: usize,
}

impl Layout {
    /// Default layout for a screen, one tile per 500 pixels or part thereof.
    pub fn for_screen(width: usize, height: usize) -> Self {
        let (short, long) = portrait(width, height);
        Self {
            resolution: DEFAULT_RESOLUTION,
            repeat_x: short / 500 + 1,
            repeat_y: long / 500 + 1,
        }
    }

    /// Sets the resolution.
    pub fn with_resolution(mut self, resolution: usize) -> Self {
        self.resolution = resolution;
        self
    }

    /// Grid `(width, height)` for a screen, portrait-normalized.
    ///
    /// Width is rounded down to a multiple of 4.
    pub fn grid_size(&self, screen_width: usize, screen_height: usize) -> (usize, usize) {
        let (short, long) = portrait(screen_width, screen_height);
        let res = self.resolution.max(1);
        let w = (short / res / self.repeat_x.max(1)).max(MIN_GRID_SIDE);
        let h = (long / res / self.repeat_y.max(1)).max(MIN_GRID_SIDE);
        (w - w % 4, h)
    }

    /// Whether the tile in `tile_row` is drawn mirrored.
    pub fn is_mirrored(&self, tile_row: usize) -> bool {
        tile_row % 2 == 1
    }
}

fn portrait(width: usize, height: usize) -> (usize, usize) {
    if width > height {
        (height, width)
    } else {
        (width, height)
    }
}
