//! Light direction filtering.

use glam::Vec3;

/// Smallest planar share of the light vector that is accepted.
pub const DEFAULT_MIN_PLANAR: f32 = 0.05;

/// Keeps the last usable light direction.
///
/// A direction almost perpendicular to the screen carries no stable planar
/// angle and flickers with sensor noise; such inputs keep the previous
/// direction, as do zero or non-finite vectors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightTracker {
    current: Vec3,
    min_planar: f32,
}

impl Default for LightTracker {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_PLANAR)
    }
}

impl LightTracker {
    /// Creates a tracker with an oblique default direction.
    pub fn new(min_planar: f32) -> Self {
        Self {
            current: Vec3::new(0.0, 0.6, 0.8),
            min_planar,
        }
    }

    /// Current unit direction.
    pub fn direction(&self) -> Vec3 {
        self.current
    }

    /// Accepts a raw host vector and returns the direction to light with.
    pub fn update(&mut self, raw: Vec3) -> Vec3 {
        if let Some(dir) = raw.try_normalize() {
            if dir.truncate().length() >= self.min_planar {
                self.current = dir;
            }
        }
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizes() {
        let mut t = LightTracker::default();
        let d = t.update(Vec3::new(3.0, 0.0, 4.0));
        assert!((d - Vec3::new(0.6, 0.0, 0.8)).length() < 1e-6);
    }

    #[test]
    fn test_perpendicular_keeps_previous() {
        let mut t = LightTracker::default();
        let first = t.update(Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(t.update(Vec3::new(0.001, 0.0, 9.8)), first);
    }

    #[test]
    fn test_degenerate_keeps_previous() {
        let mut t = LightTracker::default();
        let start = t.direction();
        assert_eq!(t.update(Vec3::ZERO), start);
        assert_eq!(t.update(Vec3::new(f32::NAN, 1.0, 0.0)), start);
        assert_eq!(t.update(Vec3::new(f32::INFINITY, 0.0, 0.0)), start);
    }
}
