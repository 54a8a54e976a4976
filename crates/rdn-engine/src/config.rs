//! Tunable constants for stepping, seeding and output.
//!
//! The stability constants are empirical. Defaults reproduce the reference
//! animation; they are not derived from the models.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::color::PixelFormat;

/// Adaptive step control and instability recovery.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StepConfig {
    /// Inner iterations per `step()` call.
    pub iterations_per_tick: usize,
    /// Fraction of the explicit diffusion limit `1 / (4 · norm)` used per substep.
    pub diffusion_safety: f32,
    /// Step growth per iteration once stable for `stable_threshold` iterations.
    pub growth_stable: f32,
    /// Step growth per iteration once stable for `fresh_threshold` iterations.
    pub growth_fresh: f32,
    /// Iterations without instability before the step may grow.
    pub stable_threshold: u32,
    /// Iterations without instability before the step grows quickly.
    pub fresh_threshold: u32,
    /// Largest per-channel reaction change allowed in one iteration.
    pub delta_limit: f32,
    /// Step length after a reset, as a fraction of the model's nominal step.
    pub initial_dt_fraction: f32,
    /// Smallest step length, as a fraction of the model's nominal step.
    pub min_dt_fraction: f32,
    /// Cap on diffusion substeps per iteration.
    pub max_diffusion_substeps: usize,
    /// Optional checkerboard scan of the Laplacian before diffusing.
    pub checkerboard: Option<CheckerboardConfig>,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self {
            iterations_per_tick: 5,
            diffusion_safety: 0.95,
            growth_stable: 1.0001,
            growth_fresh: 1.05,
            stable_threshold: 100,
            fresh_threshold: 10_000,
            delta_limit: 0.5,
            initial_dt_fraction: 0.01,
            min_dt_fraction: 1e-4,
            max_diffusion_substeps: 64,
            checkerboard: None,
        }
    }
}

impl StepConfig {
    /// Sets the number of inner iterations per tick.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations_per_tick = iterations;
        self
    }

    /// Sets the reaction delta limit.
    pub fn with_delta_limit(mut self, limit: f32) -> Self {
        self.delta_limit = limit;
        self
    }

    /// Enables the checkerboard scan.
    pub fn with_checkerboard(mut self, checkerboard: CheckerboardConfig) -> Self {
        self.checkerboard = Some(checkerboard);
        self
    }
}

/// Checkerboard detection and smoothing.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CheckerboardConfig {
    /// Minimum Laplacian magnitude counted as above/below.
    pub threshold: f32,
    /// Step multiplier applied on detection.
    pub shrink: f32,
    /// Share of each cell kept by the smoothing pass (0.9 mild, 0.5 strong).
    pub self_weight: f32,
}

impl Default for CheckerboardConfig {
    fn default() -> Self {
        Self {
            threshold: 1e-3,
            shrink: 0.99,
            self_weight: 0.9,
        }
    }
}

/// Reseed pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SeedConfig {
    /// Number of square patches scattered over the background.
    pub patches: usize,
    /// Side length of each patch in cells.
    pub patch_size: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            patches: 20,
            patch_size: 20,
        }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EngineConfig {
    /// Step control.
    pub step: StepConfig,
    /// Reseed pattern.
    pub seeding: SeedConfig,
    /// Output pixel layout.
    pub pixel_format: PixelFormat,
    /// Fixed RNG seed for patch placement; `None` seeds from the OS.
    pub rng_seed: Option<u64>,
}

impl EngineConfig {
    /// Sets the step configuration.
    pub fn with_step(mut self, step: StepConfig) -> Self {
        self.step = step;
        self
    }

    /// Sets the seeding pattern.
    pub fn with_seeding(mut self, seeding: SeedConfig) -> Self {
        self.seeding = seeding;
        self
    }

    /// Sets the output pixel format.
    pub fn with_pixel_format(mut self, format: PixelFormat) -> Self {
        self.pixel_format = format;
        self
    }

    /// Fixes the RNG seed.
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }
}
