//! Grid data model for reaction-diffusion simulation.
//!
//! - [`FixedVector`] / [`Matrix`] - per-cell values and channel-coupling operators
//! - [`Field`] - dense 2D array of vectors
//! - [`GridSet`] - state, Laplacian and gradient fields of one grid shape
//! - [`stencil`] - Laplacian, gradients, diffusion and smoothing on the
//!   mirrored-row topology
//!
//! # Example
//!
//! ```
//! use rdn_core::{stencil, Field, FixedVector, Matrix};
//!
//! let mut state = stencil::impulse(16, 16, 8, 8, FixedVector::new([1.0]));
//! let mut lap = Field::new(16, 16);
//!
//! stencil::laplacian(&state, &mut lap);
//! stencil::diffuse(&mut state, &lap, &Matrix::diagonal([0.2]), 0.5);
//!
//! assert!((state.sum()[0] - 1.0).abs() < 1e-6);
//! ```

mod field;
pub mod stencil;
mod vector;

pub use field::{Field, GridSet};
pub use glam;
pub use vector::{FixedVector, Matrix};
