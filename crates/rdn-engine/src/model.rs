//! Reaction models sharing one integrator.
//!
//! Each model supplies a diffusion matrix, a local reaction term and its
//! seeding values through [`Reaction`]. [`ReactionModel`] is the closed set
//! the engine switches between.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use rdn_core::{FixedVector, Matrix};

use crate::error::ConfigError;
use crate::ginzburg_landau::GinzburgLandau;
use crate::gray_scott::GrayScott;
use crate::palette::PaletteKind;
use crate::wacker_scholl::WackerScholl;

/// Per-cell state of every model.
pub type State = FixedVector<2>;

/// A named parameter set for a model.
#[derive(Debug, Clone, PartialEq)]
pub struct Preset {
    /// Display name.
    pub name: &'static str,
    /// Values in [`Reaction::param_names`] order.
    pub params: Vec<f32>,
}

impl Preset {
    /// Creates a preset.
    pub fn new(name: &'static str, params: &[f32]) -> Self {
        Self {
            name,
            params: params.to_vec(),
        }
    }
}

/// Capabilities the integrator needs from a model.
pub trait Reaction {
    /// Names of the user-settable coefficients, in positional order.
    fn param_names(&self) -> &'static [&'static str];

    /// Current coefficient values, in positional order.
    fn params(&self) -> Vec<f32>;

    /// Assigns `values` positionally.
    ///
    /// Surplus values are ignored; missing ones keep their old value.
    fn assign_params(&mut self, values: &[f32]);

    /// Linear map from each channel's Laplacian to every channel's derivative.
    fn diffusion_matrix(&self) -> Matrix<2>;

    /// Upper bound on the spectral radius of [`Reaction::diffusion_matrix`].
    fn diffusion_norm(&self) -> f32;

    /// Nominal (largest) step length.
    fn dt(&self) -> f32;

    /// Reaction-only time derivative at one cell.
    fn reaction(&self, value: State) -> State;

    /// Value filling the grid on reseed.
    fn background(&self) -> State;

    /// Value of the `index`th seed patch.
    fn seed_value(&self, index: usize) -> State;

    /// Named parameter sets.
    fn presets(&self) -> Vec<Preset>;

    /// Number of coefficients.
    fn arity(&self) -> usize {
        self.param_names().len()
    }
}

/// Identifies a model in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ModelKind {
    /// Complex Ginzburg-Landau oscillator.
    #[default]
    GinzburgLandau,
    /// Gray-Scott autocatalytic reaction.
    GrayScott,
    /// Wacker-Scholl activator-inhibitor.
    WackerScholl,
}

impl ModelKind {
    /// Registry order; the host selects models by position in this list.
    pub const ALL: [ModelKind; 3] = [
        ModelKind::GinzburgLandau,
        ModelKind::GrayScott,
        ModelKind::WackerScholl,
    ];

    /// Position in [`ModelKind::ALL`].
    pub fn index(self) -> usize {
        match self {
            ModelKind::GinzburgLandau => 0,
            ModelKind::GrayScott => 1,
            ModelKind::WackerScholl => 2,
        }
    }

    /// Looks up a registry position.
    pub fn from_index(index: usize) -> Result<Self, ConfigError> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(ConfigError::UnknownModel(index))
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            ModelKind::GinzburgLandau => "Ginzburg-Landau",
            ModelKind::GrayScott => "Gray-Scott",
            ModelKind::WackerScholl => "Wacker-Scholl",
        }
    }

    /// Palettes available for this model; the first is the default.
    pub fn palettes(self) -> &'static [PaletteKind] {
        match self {
            ModelKind::GinzburgLandau => &[PaletteKind::Glow, PaletteKind::Lumen],
            ModelKind::GrayScott => &[PaletteKind::Ink, PaletteKind::Coral],
            ModelKind::WackerScholl => &[PaletteKind::Heat, PaletteKind::Relief],
        }
    }

    /// Looks up one of this model's palettes.
    pub fn palette(self, index: usize) -> Result<PaletteKind, ConfigError> {
        self.palettes()
            .get(index)
            .copied()
            .ok_or(ConfigError::UnknownPalette { model: self, index })
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Any registered model.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ReactionModel {
    /// See [`GinzburgLandau`].
    GinzburgLandau(GinzburgLandau),
    /// See [`GrayScott`].
    GrayScott(GrayScott),
    /// See [`WackerScholl`].
    WackerScholl(WackerScholl),
}

macro_rules! dispatch {
    ($self:expr, $m:ident => $body:expr) => {
        match $self {
            ReactionModel::GinzburgLandau($m) => $body,
            ReactionModel::GrayScott($m) => $body,
            ReactionModel::WackerScholl($m) => $body,
        }
    };
}

impl ReactionModel {
    /// Creates a model with default coefficients.
    pub fn new(kind: ModelKind) -> Self {
        match kind {
            ModelKind::GinzburgLandau => Self::GinzburgLandau(GinzburgLandau::default()),
            ModelKind::GrayScott => Self::GrayScott(GrayScott::default()),
            ModelKind::WackerScholl => Self::WackerScholl(WackerScholl::default()),
        }
    }

    /// Which model this is.
    pub fn kind(&self) -> ModelKind {
        match self {
            Self::GinzburgLandau(_) => ModelKind::GinzburgLandau,
            Self::GrayScott(_) => ModelKind::GrayScott,
            Self::WackerScholl(_) => ModelKind::WackerScholl,
        }
    }

    /// Validates the length of `values` against the arity, then assigns them.
    ///
    /// The assignment happens even when the length is wrong: as many values
    /// as are present are applied and the error only describes the mismatch.
    pub fn set_params(&mut self, values: &[f32]) -> Result<(), ConfigError> {
        self.assign_params(values);
        let expected = self.arity();
        if values.len() == expected {
            Ok(())
        } else {
            Err(ConfigError::ParamCount {
                model: self.kind(),
                expected,
                got: values.len(),
            })
        }
    }
}

impl Reaction for ReactionModel {
    fn param_names(&self) -> &'static [&'static str] {
        dispatch!(self, m => m.param_names())
    }

    fn params(&self) -> Vec<f32> {
        dispatch!(self, m => m.params())
    }

    fn assign_params(&mut self, values: &[f32]) {
        dispatch!(self, m => m.assign_params(values))
    }

    fn diffusion_matrix(&self) -> Matrix<2> {
        dispatch!(self, m => m.diffusion_matrix())
    }

    fn diffusion_norm(&self) -> f32 {
        dispatch!(self, m => m.diffusion_norm())
    }

    fn dt(&self) -> f32 {
        dispatch!(self, m => m.dt())
    }

    #[inline]
    fn reaction(&self, value: State) -> State {
        dispatch!(self, m => m.reaction(value))
    }

    fn background(&self) -> State {
        dispatch!(self, m => m.background())
    }

    fn seed_value(&self, index: usize) -> State {
        dispatch!(self, m => m.seed_value(index))
    }

    fn presets(&self) -> Vec<Preset> {
        dispatch!(self, m => m.presets())
    }
}

/// Assigns `values` positionally into `slots`.
pub(crate) fn assign_positional<const K: usize>(slots: [&mut f32; K], values: &[f32]) {
    for (slot, v) in slots.into_iter().zip(values) {
        *slot = *v;
    }
}

/// Seed pattern shared by the signed-state models: two residue sequences
/// mapped onto `[-1, 1)`.
pub(crate) fn signed_seed(index: usize) -> State {
    let u = ((index * 5) % 7) as f32 / 7.0;
    let v = ((index * 9) % 13) as f32 / 13.0;
    FixedVector::new([u * 2.0 - 1.0, v * 2.0 - 1.0])
}
