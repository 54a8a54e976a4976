//! Palettes turning field samples into colors.
//!
//! Output is an unclamped RGB triple in the 0..255 scale; color correction
//! and saturation happen afterwards. Lighting palettes build a surface normal
//! from the gradient of a per-palette height function and light it with the
//! host's direction.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use glam::{Vec2, Vec3};

use crate::model::State;

/// Height-to-slope scale used to build surface normals.
pub const RELIEF: f32 = 4.0;

/// Lighting level above which the highlight curve kicks in.
pub const HIGHLIGHT_THRESHOLD: f32 = 0.9;

/// Every available palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PaletteKind {
    /// Amplitude minus curvature, unlit.
    Glow,
    /// Amplitude normalized by the previous frame's mean, lit.
    Lumen,
    /// Concentration map, unlit.
    Ink,
    /// Lit relief of the B concentration.
    Coral,
    /// Activator heat map, unlit.
    Heat,
    /// Lit relief of the activator, normalized by the previous frame.
    Relief,
}

impl PaletteKind {
    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            PaletteKind::Glow => "glow",
            PaletteKind::Lumen => "lumen",
            PaletteKind::Ink => "ink",
            PaletteKind::Coral => "coral",
            PaletteKind::Heat => "heat",
            PaletteKind::Relief => "relief",
        }
    }

    /// Whether the palette reads the light direction and gradients.
    pub fn uses_lighting(self) -> bool {
        matches!(
            self,
            PaletteKind::Lumen | PaletteKind::Coral | PaletteKind::Relief
        )
    }
}

/// What a palette sees at one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellSample {
    /// State.
    pub value: State,
    /// Laplacian of the state.
    pub laplacian: State,
    /// Horizontal gradient of the state.
    pub grad_x: State,
    /// Vertical gradient of the state.
    pub grad_y: State,
}

/// Running mean of `|value|²`, published once per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    sum: f64,
    count: u64,
    mean: f32,
}

impl Default for FrameStats {
    fn default() -> Self {
        Self {
            sum: 0.0,
            count: 0,
            mean: 1.0,
        }
    }
}

impl FrameStats {
    /// Mean published at the start of the current frame.
    pub fn mean(&self) -> f32 {
        self.mean
    }

    fn record(&mut self, value: State) {
        let r2 = value.length_squared();
        if r2.is_finite() {
            self.sum += f64::from(r2);
            self.count += 1;
        }
    }

    fn roll(&mut self) {
        if self.count > 0 {
            self.mean = ((self.sum / self.count as f64) as f32).max(1e-6);
        }
        self.sum = 0.0;
        self.count = 0;
    }
}

/// A palette with its per-frame statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    kind: PaletteKind,
    stats: FrameStats,
}

impl Palette {
    /// Creates a palette with fresh statistics.
    pub fn new(kind: PaletteKind) -> Self {
        Self {
            kind,
            stats: FrameStats::default(),
        }
    }

    /// Which palette this is.
    pub fn kind(&self) -> PaletteKind {
        self.kind
    }

    /// Current statistics.
    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    /// Must be called before shading each row; row 0 publishes last frame's mean.
    pub fn begin_row(&mut self, y: usize) {
        if y == 0 {
            self.stats.roll();
        }
    }

    /// Shades one cell. `light` must be a unit vector.
    pub fn shade(&mut self, s: &CellSample, light: Vec3) -> Vec3 {
        self.stats.record(s.value);
        let [u, v] = s.value.0;
        match self.kind {
            PaletteKind::Glow => {
                let rv = u * u + v * v;
                let rk = s.laplacian.length_squared();
                let r = (rv - rk / 4.0) * 200.0;
                let g = (rv - rk / 2.0) * 200.0;
                Vec3::new(r, g, g + u * 30.0)
            }
            PaletteKind::Ink => Vec3::new(
                (1.0 - u) * 200.0,
                s.laplacian[0] * 20_000.0,
                v * 1000.0,
            ),
            PaletteKind::Heat => {
                let t = ((u + 1.0) * 0.5).clamp(0.0, 1.0) * 3.0;
                Vec3::new(t, t - 1.0, t - 2.0).clamp(Vec3::ZERO, Vec3::ONE) * 255.0
            }
            PaletteKind::Lumen => {
                let slope = Vec2::new(
                    2.0 * s.value.dot(s.grad_x),
                    2.0 * s.value.dot(s.grad_y),
                );
                let lit = lambert(slope, light);
                let hl = highlight(lit) * 255.0;
                let i = (u * u + v * v) / self.stats.mean * (0.25 + 0.75 * lit);
                Vec3::new(180.0 * i + hl, 120.0 * i + 40.0 * u + hl, 230.0 * i + hl)
            }
            PaletteKind::Coral => {
                let lit = lambert(Vec2::new(s.grad_x[1], s.grad_y[1]), light);
                let hl = highlight(lit) * 255.0;
                let shade = 0.3 + 0.7 * lit;
                Vec3::new(
                    (1.0 - u) * 230.0 * shade + hl,
                    v * 700.0 * shade + hl,
                    (u * 90.0 + v * 400.0) * shade + hl,
                )
            }
            PaletteKind::Relief => {
                let lit = lambert(Vec2::new(s.grad_x[0], s.grad_y[0]), light);
                let hl = highlight(lit) * 255.0;
                let h = (u / self.stats.mean.sqrt()).clamp(-1.0, 1.0);
                let shade = 0.4 + 0.6 * lit;
                Vec3::new(
                    (150.0 + 100.0 * h) * shade + hl,
                    (110.0 + 60.0 * h) * shade + hl,
                    (140.0 - 100.0 * h) * shade + hl,
                )
            }
        }
    }
}

/// Diffuse term of a surface with the given height slope.
#[inline]
fn lambert(slope: Vec2, light: Vec3) -> f32 {
    let normal = Vec3::new(-slope.x * RELIEF, -slope.y * RELIEF, 1.0).normalize_or_zero();
    normal.dot(light).max(0.0)
}

/// Specular-like boost: zero below the threshold, then `t^16`.
#[inline]
fn highlight(lit: f32) -> f32 {
    if lit <= HIGHLIGHT_THRESHOLD {
        return 0.0;
    }
    let mut t = ((lit - HIGHLIGHT_THRESHOLD) / (1.0 - HIGHLIGHT_THRESHOLD)).min(1.0);
    for _ in 0..4 {
        t *= t;
    }
    t
}
