//! Host-facing engine value.
//!
//! One [`Engine`] owns everything the host drives: the model registry, the
//! active palette and color matrix, the light filter and the lazily
//! allocated simulation grid. Setters never fail loudly; configuration
//! problems go to the log and the engine keeps what it could apply.

use glam::Vec3;
use rand::SeedableRng;
use rand::rngs::StdRng;

use rdn_core::Field;

use crate::color::ColorMatrix;
use crate::config::EngineConfig;
use crate::error::RenderError;
use crate::light::LightTracker;
use crate::model::{ModelKind, Reaction, ReactionModel};
use crate::palette::Palette;
use crate::render::{FrameTarget, render_frame};
use crate::simulation::{SeedPatch, Simulation, StepReport};

/// Reaction-diffusion simulator and renderer.
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    models: [ReactionModel; 3],
    active: ModelKind,
    palette: Palette,
    color: ColorMatrix,
    light: LightTracker,
    sim: Option<Simulation>,
    rng: StdRng,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Creates an engine with default configuration.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Creates an engine with the given configuration.
    ///
    /// No grid is allocated until the first [`Engine::render`].
    pub fn with_config(config: EngineConfig) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let active = ModelKind::default();
        Self {
            config,
            models: ModelKind::ALL.map(ReactionModel::new),
            active,
            palette: Palette::new(active.palettes()[0]),
            color: ColorMatrix::IDENTITY,
            light: LightTracker::default(),
            sim: None,
            rng,
        }
    }

    /// Configuration the engine was built with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Active model kind.
    pub fn active_kind(&self) -> ModelKind {
        self.active
    }

    /// Active model with its current coefficients.
    pub fn active_model(&self) -> &ReactionModel {
        &self.models[self.active.index()]
    }

    /// A registered model with its current coefficients.
    pub fn model(&self, kind: ModelKind) -> &ReactionModel {
        &self.models[kind.index()]
    }

    /// Active palette.
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Installed color matrix.
    pub fn color_matrix(&self) -> &ColorMatrix {
        &self.color
    }

    /// Current state field, once a frame has been rendered.
    pub fn state(&self) -> Option<&Field<2>> {
        self.sim.as_ref().map(Simulation::state)
    }

    /// Current state field, mutably.
    pub fn state_mut(&mut self) -> Option<&mut Field<2>> {
        self.sim.as_mut().map(Simulation::state_mut)
    }

    /// Patches placed by the last reseed.
    pub fn seed_patches(&self) -> &[SeedPatch] {
        self.sim
            .as_ref()
            .map(Simulation::seed_patches)
            .unwrap_or_default()
    }

    /// Current adaptive step length.
    pub fn step_length(&self) -> Option<f32> {
        self.sim.as_ref().map(Simulation::step_length)
    }

    /// Selects a model by registry index along with its default palette.
    ///
    /// The grid is kept; only the step control is reset.
    pub fn set_model(&mut self, index: usize) {
        let kind = match ModelKind::from_index(index) {
            Ok(kind) => kind,
            Err(err) => {
                log::warn!("set_model: {err}");
                return;
            }
        };
        self.active = kind;
        self.palette = Palette::new(kind.palettes()[0]);
        log::info!("model {kind}, palette {}", self.palette.kind().name());
        self.reset_step();
    }

    /// Assigns coefficients of the active model positionally.
    ///
    /// A length mismatch is logged; whatever values were present still apply.
    pub fn set_params(&mut self, values: &[f32]) {
        let model = &mut self.models[self.active.index()];
        if let Err(err) = model.set_params(values) {
            log::warn!("set_params: {err}");
        }
        self.reset_step();
    }

    /// Selects one of the active model's palettes.
    pub fn set_palette(&mut self, index: usize) {
        match self.active.palette(index) {
            Ok(kind) => {
                self.palette = Palette::new(kind);
                log::info!("palette {}", kind.name());
            }
            Err(err) => log::warn!("set_palette: {err}"),
        }
    }

    /// Installs a 20-entry row-major color matrix; a bad one keeps the old.
    pub fn set_color_matrix(&mut self, matrix: &[f32]) {
        match ColorMatrix::from_slice(matrix) {
            Ok(color) => self.color = color,
            Err(err) => log::warn!("set_color_matrix: {err}"),
        }
    }

    /// Reseeds the grid. Does nothing before the first render.
    pub fn reset_grid(&mut self) {
        if let Some(sim) = &mut self.sim {
            sim.reseed(&self.models[self.active.index()], &mut self.rng);
        }
    }

    /// Advances one tick. Does nothing before the first render.
    pub fn step(&mut self) -> StepReport {
        match &mut self.sim {
            Some(sim) => sim.step(&self.models[self.active.index()], &mut self.rng),
            None => StepReport::default(),
        }
    }

    /// Renders one frame of `width`×`height` pixels, one per grid cell.
    ///
    /// Reallocates and reseeds the grid when the size changed. A zero-sized
    /// frame is a no-op. `light` is the raw host vector; it is normalized and
    /// filtered before use.
    pub fn render(
        &mut self,
        width: usize,
        height: usize,
        light: Vec3,
        mirrored: bool,
        pixels: &mut [u8],
        row_stride: usize,
    ) -> Result<(), RenderError> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        let format = self.config.pixel_format;
        let too_large = RenderError::FrameTooLarge { width, height };
        let row_bytes = width
            .checked_mul(format.bytes_per_pixel())
            .ok_or(too_large.clone())?;
        if row_stride < row_bytes {
            return Err(RenderError::StrideTooSmall {
                needed: row_bytes,
                got: row_stride,
            });
        }
        let needed = row_stride
            .checked_mul(height - 1)
            .and_then(|n| n.checked_add(row_bytes))
            .ok_or(too_large)?;
        if pixels.len() < needed {
            return Err(RenderError::BufferTooSmall {
                needed,
                got: pixels.len(),
            });
        }

        let model = &self.models[self.active.index()];
        if self.sim.as_ref().map(Simulation::shape) != Some((width, height)) {
            log::debug!("allocating {width}x{height} grid");
            self.sim = None;
            self.sim = Some(Simulation::new(
                width,
                height,
                model,
                self.config.step,
                self.config.seeding,
                &mut self.rng,
            ));
        }
        let light = self.light.update(light);
        if let Some(sim) = &mut self.sim {
            sim.refresh_derivatives(self.palette.kind().uses_lighting());
            render_frame(
                sim.grids(),
                &mut self.palette,
                &self.color,
                light,
                mirrored,
                FrameTarget {
                    pixels,
                    row_stride,
                    format,
                },
            );
        }
        Ok(())
    }

    fn reset_step(&mut self) {
        if let Some(sim) = &mut self.sim {
            sim.reset_step(&self.models[self.active.index()]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{PixelFormat, to_u8};
    use crate::config::{SeedConfig, StepConfig};
    use rdn_core::{FixedVector, stencil};

    const LIGHT: Vec3 = Vec3::new(0.3, 0.4, 0.866);

    fn engine() -> Engine {
        Engine::with_config(EngineConfig::default().with_rng_seed(1))
    }

    fn frame(engine: &mut Engine, w: usize, h: usize, mirrored: bool) -> Vec<u8> {
        let bpp = engine.config().pixel_format.bytes_per_pixel();
        let mut px = vec![0u8; w * h * bpp];
        engine.render(w, h, LIGHT, mirrored, &mut px, w * bpp).unwrap();
        px
    }

    #[test]
    fn test_no_grid_before_render() {
        let mut e = engine();
        assert!(e.state().is_none());
        assert_eq!(e.step(), StepReport::default());
        e.reset_grid();
        assert!(e.seed_patches().is_empty());
        assert!(e.step_length().is_none());
    }

    #[test]
    fn test_zero_size_render_is_noop() {
        let mut e = engine();
        assert_eq!(e.render(0, 10, LIGHT, false, &mut [], 0), Ok(()));
        assert_eq!(e.render(10, 0, LIGHT, false, &mut [], 30), Ok(()));
        assert!(e.state().is_none());
    }

    #[test]
    fn test_render_rejects_small_buffers() {
        let mut e = engine();
        let mut px = vec![0u8; 10];
        assert_eq!(
            e.render(4, 4, LIGHT, false, &mut px, 8),
            Err(RenderError::StrideTooSmall { needed: 12, got: 8 })
        );
        assert_eq!(
            e.render(4, 4, LIGHT, false, &mut px, 12),
            Err(RenderError::BufferTooSmall { needed: 48, got: 10 })
        );
    }

    #[test]
    fn test_render_rejects_overflowing_sizes() {
        let mut e = engine();
        let mut px = [0u8; 16];
        assert_eq!(
            e.render(usize::MAX / 2, 2, LIGHT, false, &mut px, 12),
            Err(RenderError::FrameTooLarge {
                width: usize::MAX / 2,
                height: 2
            })
        );
        assert_eq!(
            e.render(4, usize::MAX, LIGHT, false, &mut px, 12),
            Err(RenderError::FrameTooLarge {
                width: 4,
                height: usize::MAX
            })
        );
        assert!(e.state().is_none());
    }

    #[test]
    fn test_render_honors_stride() {
        let mut e = Engine::with_config(
            EngineConfig::default()
                .with_rng_seed(3)
                .with_pixel_format(PixelFormat::Rgba8),
        );
        let mut px = vec![7u8; 20 * 3];
        e.render(4, 3, LIGHT, false, &mut px, 20).unwrap();
        for row in px.chunks(20) {
            assert!(row[..16].chunks(4).all(|p| p[3] == 255));
            assert_eq!(&row[16..], &[7, 7, 7, 7]);
        }
    }

    #[test]
    fn test_resize_reallocates() {
        let mut e = engine();
        frame(&mut e, 8, 8, false);
        assert_eq!(e.state().map(Field::shape), Some((8, 8)));
        frame(&mut e, 12, 4, false);
        assert_eq!(e.state().map(Field::shape), Some((12, 4)));
    }

    #[test]
    fn test_set_model_selects_default_palette() {
        let mut e = engine();
        e.set_model(1);
        assert_eq!(e.active_kind(), ModelKind::GrayScott);
        assert_eq!(e.palette().kind(), ModelKind::GrayScott.palettes()[0]);
        e.set_palette(1);
        assert_eq!(e.palette().kind(), ModelKind::GrayScott.palettes()[1]);
        e.set_palette(9);
        assert_eq!(e.palette().kind(), ModelKind::GrayScott.palettes()[1]);
        e.set_model(7);
        assert_eq!(e.active_kind(), ModelKind::GrayScott);
    }

    #[test]
    fn test_set_model_keeps_grid_and_resets_step() {
        let mut e = engine();
        frame(&mut e, 16, 16, false);
        for _ in 0..3 {
            e.step();
        }
        let before = e.state().cloned();
        e.set_model(2);
        assert_eq!(e.state().cloned(), before);
        let expected = e.active_model().dt() * StepConfig::default().initial_dt_fraction;
        assert_eq!(e.step_length(), Some(expected));
    }

    #[test]
    fn test_set_params_wrong_length_applies_prefix() {
        let mut e = engine();
        e.set_params(&[3.0]);
        let params = e.active_model().params();
        assert_eq!(params[0], 3.0);
        let defaults = ReactionModel::new(ModelKind::GinzburgLandau).params();
        assert_eq!(&params[1..], &defaults[1..]);
    }

    #[test]
    fn test_bad_color_matrix_keeps_previous() {
        let mut e = engine();
        let hue = ColorMatrix::hue_rotation(1.0);
        e.set_color_matrix(&hue.to_array());
        e.set_color_matrix(&[1.0; 5]);
        assert_eq!(e.color_matrix(), &ColorMatrix::from_slice(&hue.to_array()).unwrap());
    }

    #[test]
    fn test_reset_grid_restores_pattern() {
        let mut e = engine();
        e.set_model(1);
        frame(&mut e, 40, 30, false);
        for _ in 0..10 {
            e.step();
        }
        e.reset_grid();
        let model = *e.active_model();
        let state = e.state().unwrap();
        let patches = e.seed_patches();
        for y in 0..30 {
            for x in 0..40 {
                let expected = match patches.iter().rev().find(|p| p.contains(x, y)) {
                    Some(p) => model.seed_value(p.index),
                    None => model.background(),
                };
                assert_eq!(state.get(x, y), expected);
            }
        }
    }

    #[test]
    fn test_pathological_params_stay_finite() {
        let cases: [(usize, &[f32]); 6] = [
            (0, &[1e30, 0.0625, 1.0]),
            (0, &[2.0, 0.0625, 1e30]),
            (1, &[1e30, 0.037, 0.06]),
            (1, &[f32::NAN, f32::NAN, f32::NAN]),
            (2, &[0.05, 1e30, 1.0, 2.0, 0.0]),
            (2, &[0.05, 10.0, f32::INFINITY, 2.0, -1e20]),
        ];
        for (model, params) in cases {
            let mut e = engine();
            e.set_model(model);
            frame(&mut e, 24, 24, false);
            e.set_params(params);
            for _ in 0..10 {
                let report = e.step();
                assert!(e.state().unwrap().is_finite(), "{model} {params:?}");
                assert!(report.max_applied_delta <= 0.5 + 1e-6);
            }
            frame(&mut e, 24, 24, false);
        }
    }

    #[test]
    fn test_lumen_statistics_lag_one_frame() {
        let mut e = Engine::with_config(
            EngineConfig::default()
                .with_rng_seed(5)
                .with_seeding(SeedConfig {
                    patches: 1,
                    patch_size: 4,
                }),
        );
        e.set_palette(1);
        let f1 = frame(&mut e, 4, 4, false);
        assert!(
            e.state()
                .unwrap()
                .as_slice()
                .iter()
                .all(|v| *v == FixedVector::new([-1.0, -1.0]))
        );
        let f2 = frame(&mut e, 4, 4, false);
        let f3 = frame(&mut e, 4, 4, false);
        assert_eq!(f2, f3);
        assert_ne!(f1, f2);
    }

    #[test]
    fn test_identity_matrix_outputs_raw_ink() {
        let mut e = engine();
        e.set_model(1);
        frame(&mut e, 5, 4, false);
        let mut field = Field::<2>::new(5, 4);
        for y in 0..4 {
            for x in 0..5 {
                let a = 0.2 * x as f32 + 0.05 * y as f32;
                let b = 0.1 * ((x * y) % 3) as f32;
                field.set(x, y, FixedVector::new([a, b]));
            }
        }
        *e.state_mut().unwrap() = field.clone();
        let mut lap = Field::new(5, 4);
        stencil::laplacian(&field, &mut lap);

        let px = frame(&mut e, 5, 4, false);
        for y in 0..4 {
            for x in 0..5 {
                let [a, b] = field.get(x, y).0;
                let expected = [
                    to_u8((1.0 - a) * 200.0),
                    to_u8(lap.get(x, y)[0] * 20_000.0),
                    to_u8(b * 1000.0),
                ];
                let i = (y * 5 + x) * 3;
                assert_eq!(&px[i..i + 3], &expected, "({x}, {y})");
            }
        }
    }

    #[test]
    fn test_gradients_only_for_lit_palettes() {
        let mut e = engine();
        e.set_model(1);
        frame(&mut e, 64, 64, false);
        let grads_zero = |e: &Engine| {
            let g = e.sim.as_ref().unwrap().grids();
            g.grad_x.as_slice().iter().all(|v| *v == FixedVector::ZERO)
                && g.grad_y.as_slice().iter().all(|v| *v == FixedVector::ZERO)
        };
        assert!(!e.palette().kind().uses_lighting());
        assert!(grads_zero(&e));

        e.set_palette(1);
        assert!(e.palette().kind().uses_lighting());
        frame(&mut e, 64, 64, false);
        assert!(!grads_zero(&e));
    }

    #[test]
    fn test_mirrored_reverses_rows() {
        let mut e = engine();
        e.set_model(1);
        frame(&mut e, 9, 5, false);
        for _ in 0..5 {
            e.step();
        }
        let normal = frame(&mut e, 9, 5, false);
        let mirrored = frame(&mut e, 9, 5, true);
        for (a, b) in normal.chunks(27).zip(mirrored.chunks(27)) {
            let reversed: Vec<&[u8]> = b.chunks(3).rev().collect();
            let forward: Vec<&[u8]> = a.chunks(3).collect();
            assert_eq!(forward, reversed);
        }
    }
}
