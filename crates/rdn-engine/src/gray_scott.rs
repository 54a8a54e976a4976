//! Gray-Scott autocatalytic reaction.
//!
//! Chemical A is fed into the system and converted to B by `A + 2B → 3B`;
//! B is removed at the kill rate. Produces spots, stripes, coral and mazes
//! depending on feed and kill.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use rdn_core::{FixedVector, Matrix};

use crate::model::{Preset, Reaction, State, assign_positional};

/// Preset parameters for common Gray-Scott patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GrayScottPreset {
    /// Mitosis-like dividing cells.
    Mitosis,
    /// Coral-like branching patterns.
    Coral,
    /// Maze-like patterns.
    Maze,
    /// Soliton spots.
    Solitons,
    /// Worm-like patterns.
    Worms,
    /// Spots pattern.
    Spots,
    /// Unstable chaotic pattern.
    Chaos,
    /// Moving spots.
    MovingSpots,
}

impl GrayScottPreset {
    /// Every preset, in display order.
    pub const ALL: [GrayScottPreset; 8] = [
        GrayScottPreset::Mitosis,
        GrayScottPreset::Coral,
        GrayScottPreset::Maze,
        GrayScottPreset::Solitons,
        GrayScottPreset::Worms,
        GrayScottPreset::Spots,
        GrayScottPreset::Chaos,
        GrayScottPreset::MovingSpots,
    ];

    /// Returns (feed, kill) parameters for this preset.
    pub fn parameters(&self) -> (f32, f32) {
        match self {
            GrayScottPreset::Mitosis => (0.028, 0.062),
            GrayScottPreset::Coral => (0.037, 0.060),
            GrayScottPreset::Maze => (0.029, 0.057),
            GrayScottPreset::Solitons => (0.030, 0.062),
            GrayScottPreset::Worms => (0.078, 0.061),
            GrayScottPreset::Spots => (0.035, 0.065),
            GrayScottPreset::Chaos => (0.026, 0.051),
            GrayScottPreset::MovingSpots => (0.014, 0.054),
        }
    }

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            GrayScottPreset::Mitosis => "mitosis",
            GrayScottPreset::Coral => "coral",
            GrayScottPreset::Maze => "maze",
            GrayScottPreset::Solitons => "solitons",
            GrayScottPreset::Worms => "worms",
            GrayScottPreset::Spots => "spots",
            GrayScottPreset::Chaos => "chaos",
            GrayScottPreset::MovingSpots => "moving spots",
        }
    }
}

/// Gray-Scott coefficients.
///
/// A diffuses at `2 · d`, B at `d`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GrayScott {
    /// Diffusion rate of B.
    pub d: f32,
    /// Feed rate.
    pub feed: f32,
    /// Kill rate.
    pub kill: f32,
}

impl Default for GrayScott {
    fn default() -> Self {
        Self {
            d: 0.08,
            feed: 0.037,
            kill: 0.060,
        }
    }
}

impl GrayScott {
    /// Creates coefficients from a preset with the default diffusion rate.
    pub fn from_preset(preset: GrayScottPreset) -> Self {
        let mut gs = Self::default();
        gs.set_preset(preset);
        gs
    }

    /// Sets feed and kill from a preset.
    pub fn set_preset(&mut self, preset: GrayScottPreset) {
        let (feed, kill) = preset.parameters();
        self.feed = feed;
        self.kill = kill;
    }
}

impl Reaction for GrayScott {
    fn param_names(&self) -> &'static [&'static str] {
        &["D", "F", "k"]
    }

    fn params(&self) -> Vec<f32> {
        vec![self.d, self.feed, self.kill]
    }

    fn assign_params(&mut self, values: &[f32]) {
        assign_positional([&mut self.d, &mut self.feed, &mut self.kill], values);
    }

    fn diffusion_matrix(&self) -> Matrix<2> {
        Matrix::diagonal([2.0, 1.0]).scale(self.d)
    }

    fn diffusion_norm(&self) -> f32 {
        2.0 * self.d.abs()
    }

    fn dt(&self) -> f32 {
        1.0
    }

    #[inline]
    fn reaction(&self, value: State) -> State {
        let [a, b] = value.0;
        let abb = a * b * b;
        FixedVector::new([
            -abb + self.feed * (1.0 - a),
            abb - (self.feed + self.kill) * b,
        ])
    }

    fn background(&self) -> State {
        FixedVector::new([1.0, 0.0])
    }

    fn seed_value(&self, index: usize) -> State {
        FixedVector::new([
            ((index * 5) % 7) as f32 / 7.0,
            ((index * 9) % 13) as f32 / 13.0,
        ])
    }

    fn presets(&self) -> Vec<Preset> {
        GrayScottPreset::ALL
            .iter()
            .map(|p| {
                let (feed, kill) = p.parameters();
                Preset::new(p.name(), &[self.d, feed, kill])
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset() {
        let gs = GrayScott::from_preset(GrayScottPreset::Coral);
        assert_eq!(gs.feed, 0.037);
        assert_eq!(gs.kill, 0.060);
    }

    #[test]
    fn test_preset_parameters() {
        assert_eq!(GrayScottPreset::Mitosis.parameters(), (0.028, 0.062));
        assert_eq!(GrayScottPreset::Coral.parameters(), (0.037, 0.060));
        assert_eq!(GrayScottPreset::Spots.parameters(), (0.035, 0.065));
    }

    #[test]
    fn test_presets_list() {
        let gs = GrayScott::default();
        let presets = gs.presets();
        assert_eq!(presets.len(), GrayScottPreset::ALL.len());
        assert_eq!(presets[0].name, "mitosis");
        assert_eq!(presets[0].params, vec![0.08, 0.028, 0.062]);
    }

    #[test]
    fn test_background_is_fixed_point() {
        let gs = GrayScott::default();
        assert_eq!(gs.reaction(gs.background()), FixedVector::ZERO);
    }

    #[test]
    fn test_reaction_terms() {
        let gs = GrayScott {
            d: 0.1,
            feed: 0.02,
            kill: 0.05,
        };
        let d = gs.reaction(FixedVector::new([0.5, 0.5]));
        // abb = 0.125
        assert!((d[0] - (-0.125 + 0.02 * 0.5)).abs() < 1e-6);
        assert!((d[1] - (0.125 - 0.07 * 0.5)).abs() < 1e-6);
    }

    #[test]
    fn test_diffusion_matrix() {
        let gs = GrayScott::default();
        let m = gs.diffusion_matrix();
        assert!((m.get(0, 0) - 0.16).abs() < 1e-7);
        assert!((m.get(1, 1) - 0.08).abs() < 1e-7);
        assert_eq!(m.get(0, 1), 0.0);
        assert!((gs.diffusion_norm() - 0.16).abs() < 1e-7);
    }

    #[test]
    fn test_seed_values() {
        let gs = GrayScott::default();
        assert_eq!(gs.seed_value(0), FixedVector::new([0.0, 0.0]));
        let s = gs.seed_value(2);
        assert!((s[0] - 3.0 / 7.0).abs() < 1e-6);
        assert!((s[1] - 5.0 / 13.0).abs() < 1e-6);
    }
}
