//! Complex Ginzburg-Landau oscillator.
//!
//! The two channels are the real and imaginary parts of a complex amplitude
//! `A = U + iV`. Diffusion rotates through `1 + iα`; the cubic term saturates
//! the amplitude with a frequency shift set by `β`.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use rdn_core::{FixedVector, Matrix};

use crate::model::{Preset, Reaction, State, assign_positional, signed_seed};

/// Ginzburg-Landau coefficients.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GinzburgLandau {
    /// Diffusion strength.
    pub d: f32,
    /// Dispersion of the diffusion term.
    pub alpha: f32,
    /// Nonlinear frequency shift.
    pub beta: f32,
}

impl Default for GinzburgLandau {
    fn default() -> Self {
        Self {
            d: 2.0,
            alpha: 0.0625,
            beta: 1.0,
        }
    }
}

impl Reaction for GinzburgLandau {
    fn param_names(&self) -> &'static [&'static str] {
        &["D", "alpha", "beta"]
    }

    fn params(&self) -> Vec<f32> {
        vec![self.d, self.alpha, self.beta]
    }

    fn assign_params(&mut self, values: &[f32]) {
        assign_positional([&mut self.d, &mut self.alpha, &mut self.beta], values);
    }

    fn diffusion_matrix(&self) -> Matrix<2> {
        Matrix::from_rows([[1.0, -self.alpha], [self.alpha, 1.0]]).scale(self.d)
    }

    fn diffusion_norm(&self) -> f32 {
        // Eigenvalues are d · (1 ± iα).
        self.d.abs() * (1.0 + self.alpha * self.alpha).sqrt()
    }

    fn dt(&self) -> f32 {
        0.25 / (1.0 + self.beta.abs())
    }

    #[inline]
    fn reaction(&self, value: State) -> State {
        let [u, v] = value.0;
        let r2 = u * u + v * v;
        FixedVector::new([
            u - (u - self.beta * v) * r2,
            v - (v + self.beta * u) * r2,
        ])
    }

    fn background(&self) -> State {
        FixedVector::ZERO
    }

    fn seed_value(&self, index: usize) -> State {
        signed_seed(index)
    }

    fn presets(&self) -> Vec<Preset> {
        vec![
            Preset::new("spirals", &[2.0, 0.0625, 1.0]),
            Preset::new("turbulence", &[2.0, 0.3, 1.5]),
            Preset::new("domains", &[1.0, 0.0, 0.0]),
            Preset::new("ripples", &[4.0, 0.25, 0.5]),
        ]
    }
}
