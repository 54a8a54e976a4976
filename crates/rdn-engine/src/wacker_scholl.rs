//! Wacker-Scholl activator-inhibitor kinetics.
//!
//! A cubic activator `u` is held in check by a linear inhibitor `v` that
//! diffuses `ratio` times faster. With `ratio > 1` the bistable background
//! breaks up into labyrinths and spots.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use rdn_core::{FixedVector, Matrix};

use crate::model::{Preset, Reaction, State, assign_positional, signed_seed};

/// Wacker-Scholl coefficients.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WackerScholl {
    /// Activator diffusion rate.
    pub d: f32,
    /// Inhibitor-to-activator diffusion ratio.
    pub ratio: f32,
    /// Inhibitor time scale.
    pub epsilon: f32,
    /// Inhibitor self-decay.
    pub a1: f32,
    /// Activation offset.
    pub a0: f32,
}

impl Default for WackerScholl {
    fn default() -> Self {
        Self {
            d: 0.05,
            ratio: 10.0,
            epsilon: 1.0,
            a1: 2.0,
            a0: 0.0,
        }
    }
}

impl Reaction for WackerScholl {
    fn param_names(&self) -> &'static [&'static str] {
        &["D", "ratio", "epsilon", "a1", "a0"]
    }

    fn params(&self) -> Vec<f32> {
        vec![self.d, self.ratio, self.epsilon, self.a1, self.a0]
    }

    fn assign_params(&mut self, values: &[f32]) {
        assign_positional(
            [
                &mut self.d,
                &mut self.ratio,
                &mut self.epsilon,
                &mut self.a1,
                &mut self.a0,
            ],
            values,
        );
    }

    fn diffusion_matrix(&self) -> Matrix<2> {
        Matrix::diagonal([1.0, self.ratio]).scale(self.d)
    }

    fn diffusion_norm(&self) -> f32 {
        self.d.abs() * self.ratio.abs().max(1.0)
    }

    fn dt(&self) -> f32 {
        0.1 / self.epsilon.abs().max(1.0)
    }

    #[inline]
    fn reaction(&self, value: State) -> State {
        let [u, v] = value.0;
        FixedVector::new([
            u - u * u * u - v,
            self.epsilon * (u - self.a1 * v - self.a0),
        ])
    }

    fn background(&self) -> State {
        FixedVector::ZERO
    }

    fn seed_value(&self, index: usize) -> State {
        signed_seed(index) * 0.5
    }

    fn presets(&self) -> Vec<Preset> {
        vec![
            Preset::new("labyrinth", &[0.05, 10.0, 1.0, 2.0, 0.0]),
            Preset::new("spots", &[0.05, 10.0, 1.0, 2.0, 0.1]),
            Preset::new("waves", &[0.2, 1.0, 0.05, 0.5, 0.0]),
        ]
    }
}
