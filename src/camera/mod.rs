//! Orbit camera state and the choreographer that animates it.
//!
//! The camera is described in spherical coordinates around a fixed look-at
//! target. Converting to an eye position and aiming is the renderer's job;
//! `to_cartesian` is provided for convenience.

pub mod choreographer;

use serde::{Deserialize, Serialize};

use crate::fast_math::{add, cartesian_to_spherical, spherical_to_cartesian, sub, wrap_angle, Point3};

pub use choreographer::{CameraChoreographer, ChoreoState, Transition};

/// Smallest radius an orbit may have.
pub const MIN_RADIUS: f32 = 1e-3;

/// Camera viewpoint around a look-at target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitConfig {
    /// Radians, (−π, π]
    pub azimuth: f32,
    /// Radians, 0 = straight up, π = straight down
    pub polar: f32,
    /// Distance from the target, > 0
    pub radius: f32,
}

impl OrbitConfig {
    /// Wraps azimuth and forces a positive radius.
    pub fn new(azimuth: f32, polar: f32, radius: f32) -> Self {
        Self {
            azimuth: wrap_angle(azimuth),
            polar,
            radius: radius.max(MIN_RADIUS),
        }
    }

    /// Same orbit with polar clamped to `[min, max]`. An inverted range
    /// pins polar to `max` instead of panicking.
    pub fn clamped(self, polar_min: f32, polar_max: f32) -> Self {
        Self {
            polar: self.polar.max(polar_min).min(polar_max),
            ..Self::new(self.azimuth, self.polar, self.radius)
        }
    }

    /// Eye position for this orbit around `target`.
    pub fn to_cartesian(&self, target: Point3) -> Point3 {
        add(target, spherical_to_cartesian(self.azimuth, self.polar, self.radius))
    }

    /// Orbit that places the eye at `eye` looking at `target`.
    pub fn from_eye(eye: Point3, target: Point3) -> Self {
        let (azimuth, polar, radius) = cartesian_to_spherical(sub(eye, target));
        Self::new(azimuth, polar, radius)
    }
}

/// What to do with a trigger that arrives mid-transition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetriggerPolicy {
    /// Keep the in-flight transition; drop the trigger
    #[default]
    Ignore,
    /// Restart from the supplied current orbit toward the new target
    Retarget,
}

/// The orbit-control abstraction the choreographer reads and writes.
///
/// `orbit()` returns `None` until the controls are ready.
pub trait OrbitControls {
    fn orbit(&self) -> Option<OrbitConfig>;
    fn set_orbit(&mut self, orbit: OrbitConfig);
}

impl OrbitControls for Option<OrbitConfig> {
    fn orbit(&self) -> Option<OrbitConfig> {
        *self
    }

    fn set_orbit(&mut self, orbit: OrbitConfig) {
        *self = Some(orbit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fast_math::distance;
    use std::f32::consts::PI;

    #[test]
    fn new_wraps_and_keeps_radius_positive() {
        let o = OrbitConfig::new(3.0 * PI, 1.0, -4.0);
        assert!((o.azimuth - PI).abs() < 1e-5);
        assert!(o.radius > 0.0);
    }

    #[test]
    fn clamped_limits_polar() {
        let o = OrbitConfig::new(0.0, 0.0, 10.0).clamped(0.1, PI - 0.1);
        assert!((o.polar - 0.1).abs() < 1e-6);
        let o = OrbitConfig::new(0.0, 4.0, 10.0).clamped(0.1, PI - 0.1);
        assert!((o.polar - (PI - 0.1)).abs() < 1e-6);
    }

    #[test]
    fn clamped_with_inverted_range_does_not_panic() {
        let o = OrbitConfig::new(0.0, 1.0, 10.0).clamped(3.1, PI - 0.1);
        assert!((o.polar - (PI - 0.1)).abs() < 1e-6);
    }

    #[test]
    fn eye_round_trip() {
        let target = [1.0, 2.0, 3.0];
        let orbit = OrbitConfig::new(-2.0, 1.2, 15.0);
        let eye = orbit.to_cartesian(target);
        assert!((distance(eye, target) - 15.0).abs() < 1e-3);
        let back = OrbitConfig::from_eye(eye, target);
        assert!((back.azimuth - orbit.azimuth).abs() < 1e-4);
        assert!((back.polar - orbit.polar).abs() < 1e-4);
    }

    #[test]
    fn level_horizon_faces_forward() {
        let eye = OrbitConfig::new(0.0, PI / 2.0, 30.0).to_cartesian([0.0; 3]);
        assert!(eye[1].abs() < 1e-4, "polar π/2 is a level horizon");
        assert!((eye[2] - 30.0).abs() < 1e-4);
    }

    #[test]
    fn option_controls() {
        let mut controls: Option<OrbitConfig> = None;
        assert!(controls.orbit().is_none());
        controls.set_orbit(OrbitConfig::new(0.5, 1.0, 3.0));
        assert_eq!(controls.orbit().map(|o| o.radius), Some(3.0));
    }
}
