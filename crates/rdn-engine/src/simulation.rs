//! Adaptive operator-split integrator.
//!
//! Each iteration grows the step, applies diffusion in equal substeps below
//! the explicit stability limit, applies the reaction with the full step,
//! clamps oversized reaction deltas and shrinks the step on instability.
//! Non-finite state triggers a full reseed.

use rand::rngs::StdRng;
use rand::Rng;

use rdn_core::{stencil, Field, GridSet};

use crate::config::{SeedConfig, StepConfig};
use crate::model::{Reaction, ReactionModel, State};

/// Step length used when a model reports an unusable nominal step.
const FALLBACK_DT: f32 = 0.1;

/// Where one seed patch was placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedPatch {
    /// Left column.
    pub x: usize,
    /// Top row.
    pub y: usize,
    /// Width in cells, after clipping to the grid.
    pub width: usize,
    /// Height in cells, after clipping to the grid.
    pub height: usize,
    /// Index passed to [`Reaction::seed_value`].
    pub index: usize,
}

impl SeedPatch {
    /// Whether the patch covers `(x, y)`.
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

/// What happened during one [`Simulation::step`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StepReport {
    /// Inner iterations run.
    pub iterations: usize,
    /// Cells whose reaction delta was clamped.
    pub clamped_cells: usize,
    /// Largest per-channel reaction change actually applied.
    pub max_applied_delta: f32,
    /// Diffusion substeps run, summed over iterations.
    pub diffusion_substeps: usize,
    /// Longest single diffusion substep.
    pub max_substep_dt: f32,
    /// Checkerboard detections.
    pub checkerboards: usize,
    /// Reseeds after non-finite state.
    pub reseeds: usize,
}

/// Grid state plus adaptive step control.
#[derive(Debug, Clone)]
pub struct Simulation {
    grids: GridSet<2>,
    dt: f32,
    stable_iterations: u32,
    seeds: Vec<SeedPatch>,
    step_config: StepConfig,
    seed_config: SeedConfig,
}

impl Simulation {
    /// Allocates a grid and seeds it for `model`.
    pub fn new(
        width: usize,
        height: usize,
        model: &ReactionModel,
        step_config: StepConfig,
        seed_config: SeedConfig,
        rng: &mut StdRng,
    ) -> Self {
        let mut sim = Self {
            grids: GridSet::new(width, height),
            dt: 0.0,
            stable_iterations: u32::MAX,
            seeds: Vec::new(),
            step_config,
            seed_config,
        };
        sim.reseed(model, rng);
        sim
    }

    /// Grid `(width, height)`.
    pub fn shape(&self) -> (usize, usize) {
        self.grids.shape()
    }

    /// All fields.
    pub fn grids(&self) -> &GridSet<2> {
        &self.grids
    }

    /// Current state.
    pub fn state(&self) -> &Field<2> {
        &self.grids.state
    }

    /// Current state, mutably.
    pub fn state_mut(&mut self) -> &mut Field<2> {
        &mut self.grids.state
    }

    /// Current step length.
    pub fn step_length(&self) -> f32 {
        self.dt
    }

    /// Iterations since the last instability; `u32::MAX` right after a reset.
    pub fn stable_iterations(&self) -> u32 {
        self.stable_iterations
    }

    /// Patches placed by the last reseed.
    pub fn seed_patches(&self) -> &[SeedPatch] {
        &self.seeds
    }

    /// Resets the step length and stability counter.
    pub fn reset_step(&mut self, model: &ReactionModel) {
        self.dt = dt_max(model) * self.step_config.initial_dt_fraction;
        self.stable_iterations = u32::MAX;
    }

    /// Fills the grid with the background and scatters seed patches.
    pub fn reseed(&mut self, model: &ReactionModel, rng: &mut StdRng) {
        let (w, h) = self.grids.shape();
        let state = &mut self.grids.state;
        state.fill(model.background());
        self.seeds.clear();
        if w > 0 && h > 0 {
            let pw = self.seed_config.patch_size.min(w);
            let ph = self.seed_config.patch_size.min(h);
            for index in 0..self.seed_config.patches {
                let x = rng.random_range(0..=w - pw);
                let y = rng.random_range(0..=h - ph);
                state.fill_rect(x, y, pw, ph, model.seed_value(index));
                self.seeds.push(SeedPatch {
                    x,
                    y,
                    width: pw,
                    height: ph,
                    index,
                });
            }
        }
        self.reset_step(model);
    }

    /// Recomputes the Laplacian of the current state, and the gradients when
    /// `with_gradients` is set. Skipped gradients keep their old contents.
    pub fn refresh_derivatives(&mut self, with_gradients: bool) {
        let g = &mut self.grids;
        stencil::laplacian(&g.state, &mut g.laplacian);
        if with_gradients {
            stencil::gradients(&g.state, &mut g.grad_x, &mut g.grad_y);
        }
    }

    /// Runs one tick of `iterations_per_tick` inner iterations.
    pub fn step(&mut self, model: &ReactionModel, rng: &mut StdRng) -> StepReport {
        let mut report = StepReport::default();
        if self.grids.state.is_empty() {
            return report;
        }
        for _ in 0..self.step_config.iterations_per_tick {
            self.iterate(model, &mut report);
            report.iterations += 1;
            if !self.grids.state.is_finite() {
                log::debug!("non-finite state at dt {}, reseeding", self.dt);
                self.reseed(model, rng);
                report.reseeds += 1;
            }
        }
        report
    }

    fn iterate(&mut self, model: &ReactionModel, report: &mut StepReport) {
        let cfg = self.step_config;
        self.grow_step(model);

        let g = &mut self.grids;
        stencil::laplacian(&g.state, &mut g.laplacian);

        if let Some(cb) = cfg.checkerboard {
            let hit =
                (0..2).find_map(|c| stencil::find_checkerboard(&g.laplacian, c, cb.threshold));
            if let Some((x, y)) = hit {
                log::debug!("checkerboard at ({x}, {y}), smoothing");
                self.dt = (self.dt * cb.shrink).max(dt_min(model, &cfg));
                stencil::smooth(&mut g.state, &g.laplacian, cb.self_weight);
                stencil::laplacian(&g.state, &mut g.laplacian);
                self.stable_iterations = 0;
                report.checkerboards += 1;
            }
        }

        // Diffusion in equal substeps under the explicit limit.
        let norm = model.diffusion_norm();
        let bound = cfg.diffusion_safety / (4.0 * norm);
        let max_sub = cfg.max_diffusion_substeps.max(1);
        let mut substeps = if bound.is_finite() && bound > 0.0 {
            let n = (self.dt / bound).ceil();
            if n.is_finite() { n.max(1.0) as usize } else { max_sub }
        } else {
            // Zero norm: one step suffices. NaN norm: fall back to the cap.
            if norm == 0.0 { 1 } else { max_sub }
        };
        if substeps > max_sub {
            substeps = max_sub;
            if bound.is_finite() && bound > 0.0 {
                self.dt = bound * max_sub as f32;
            }
        }
        let lap_dt = self.dt / substeps as f32;
        report.diffusion_substeps += substeps;
        report.max_substep_dt = report.max_substep_dt.max(lap_dt);
        let matrix = model.diffusion_matrix();
        for i in 0..substeps {
            if i > 0 {
                stencil::laplacian(&g.state, &mut g.laplacian);
            }
            stencil::diffuse(&mut g.state, &g.laplacian, &matrix, lap_dt);
        }

        // Reaction with the full step, delta-clamped.
        let limit = cfg.delta_limit;
        let dt = self.dt;
        let mut worst = 0.0f32;
        for cell in g.state.as_mut_slice() {
            let delta: State = model.reaction(*cell) * dt;
            let m = delta.max_abs();
            let applied = if m > limit {
                report.clamped_cells += 1;
                worst = worst.max(m);
                delta.clamp_abs(limit)
            } else {
                delta
            };
            if m.is_finite() {
                report.max_applied_delta = report.max_applied_delta.max(applied.max_abs());
            }
            *cell += applied;
        }

        if worst > 0.0 {
            let shrink = if worst.is_finite() { limit / worst } else { 0.0 };
            self.dt = (self.dt * shrink).max(dt_min(model, &cfg));
            self.stable_iterations = 0;
            log::debug!("reaction delta {worst} over limit, dt now {}", self.dt);
        } else {
            self.stable_iterations = self.stable_iterations.saturating_add(1);
        }
    }

    fn grow_step(&mut self, model: &ReactionModel) {
        let cfg = &self.step_config;
        if self.stable_iterations >= cfg.fresh_threshold {
            self.dt *= cfg.growth_fresh;
        } else if self.stable_iterations >= cfg.stable_threshold {
            self.dt *= cfg.growth_stable;
        }
        self.dt = self.dt.clamp(dt_min(model, cfg), dt_max(model));
    }
}

fn dt_max(model: &ReactionModel) -> f32 {
    let dt = model.dt();
    if dt.is_finite() && dt > 0.0 {
        dt
    } else {
        FALLBACK_DT
    }
}

fn dt_min(model: &ReactionModel, cfg: &StepConfig) -> f32 {
    dt_max(model) * cfg.min_dt_fraction
}
