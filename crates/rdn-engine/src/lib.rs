//! Real-time reaction-diffusion simulation and rendering.
//!
//! Several two-channel PDE families share one adaptive integrator:
//!
//! - [`GinzburgLandau`] - complex oscillator, spirals and turbulence
//! - [`GrayScott`] - autocatalytic reaction, spots, coral and mazes
//! - [`WackerScholl`] - activator-inhibitor, labyrinths
//!
//! The host drives an [`Engine`]: select a model and palette, call
//! [`Engine::step`] once per tick and [`Engine::render`] once per frame.
//!
//! # Example
//!
//! ```
//! use rdn_engine::{Engine, EngineConfig, glam::Vec3};
//!
//! let mut engine = Engine::with_config(EngineConfig::default().with_rng_seed(7));
//! engine.set_model(1);
//!
//! let (w, h) = (32, 24);
//! let mut pixels = vec![0u8; w * h * 3];
//! engine.render(w, h, Vec3::Z, false, &mut pixels, w * 3).unwrap();
//!
//! engine.step();
//! engine.render(w, h, Vec3::Z, false, &mut pixels, w * 3).unwrap();
//! assert!(engine.state().unwrap().is_finite());
//! ```

mod color;
mod config;
mod engine;
mod error;
mod ginzburg_landau;
mod gray_scott;
mod layout;
mod light;
mod model;
mod palette;
mod render;
mod simulation;
mod wacker_scholl;

pub use color::{COLOR_MATRIX_LEN, ColorMatrix, PixelFormat};
pub use config::{CheckerboardConfig, EngineConfig, SeedConfig, StepConfig};
pub use engine::Engine;
pub use error::{ConfigError, RenderError};
pub use ginzburg_landau::GinzburgLandau;
pub use gray_scott::{GrayScott, GrayScottPreset};
pub use layout::{DEFAULT_RESOLUTION, Layout, MIN_GRID_SIDE};
pub use light::LightTracker;
pub use model::{ModelKind, Preset, Reaction, ReactionModel, State};
pub use palette::{CellSample, FrameStats, Palette, PaletteKind};
pub use render::{FrameTarget, render_frame};
pub use simulation::{SeedPatch, Simulation, StepReport};

pub use glam;
pub use rdn_core;
