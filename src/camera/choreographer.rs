//! Camera choreography: a two-state machine (Idle / Transitioning) that
//! eases the orbit toward a target over ~1.5 s.
//!
//! - progress += dt × rate, clamped to 1
//! - eased = 1 − (1 − progress)³
//! - azimuth follows the shortest arc, polar interpolates linearly,
//!   radius is read from the current orbit and never animated
//!
//! The choreographer has no clock; the host feeds it frame deltas.

use crate::config::CameraConfig;
use crate::fast_math::{ease_out_cubic, lerp, shortest_delta, wrap_angle};

use super::{OrbitConfig, OrbitControls, RetriggerPolicy};

/// An in-flight interpolation between two orbits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub start: OrbitConfig,
    pub target: OrbitConfig,
    /// 0..=1
    pub progress: f32,
}

impl Transition {
    pub fn new(start: OrbitConfig, target: OrbitConfig) -> Self {
        Self {
            start,
            target,
            progress: 0.0,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.progress >= 1.0
    }

    /// Orbit at the current progress, with `radius` passed through.
    pub fn sample(&self, radius: f32) -> OrbitConfig {
        if self.is_complete() {
            return OrbitConfig {
                azimuth: wrap_angle(self.target.azimuth),
                polar: self.target.polar,
                radius,
            };
        }
        let t = ease_out_cubic(self.progress);
        let delta = shortest_delta(self.start.azimuth, self.target.azimuth);
        OrbitConfig {
            azimuth: wrap_angle(self.start.azimuth + delta * t),
            polar: lerp(self.start.polar, self.target.polar, t),
            radius,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum ChoreoState {
    #[default]
    Idle,
    Transitioning(Transition),
}

/// Drives one camera. Owns no resources beyond its scalar state.
#[derive(Debug, Clone, Default)]
pub struct CameraChoreographer {
    config: CameraConfig,
    state: ChoreoState,
}

impl CameraChoreographer {
    pub fn new(config: CameraConfig) -> Self {
        Self {
            config,
            state: ChoreoState::Idle,
        }
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub fn state(&self) -> &ChoreoState {
        &self.state
    }

    pub fn is_transitioning(&self) -> bool {
        matches!(self.state, ChoreoState::Transitioning(_))
    }

    /// Progress of the in-flight transition, if any.
    pub fn progress(&self) -> Option<f32> {
        match &self.state {
            ChoreoState::Transitioning(t) => Some(t.progress),
            ChoreoState::Idle => None,
        }
    }

    /// Start a transition from `current` to the configured home orbit.
    pub fn trigger(&mut self, current: OrbitConfig) -> bool {
        let home = self.config.home;
        self.trigger_to(current, home)
    }

    /// Start a transition from `current` to `target`.
    ///
    /// Returns whether a new transition began. While one is already running
    /// the retrigger policy decides.
    pub fn trigger_to(&mut self, current: OrbitConfig, target: OrbitConfig) -> bool {
        if self.is_transitioning() && self.config.retrigger == RetriggerPolicy::Ignore {
            log::trace!("camera trigger ignored: transition in flight");
            return false;
        }
        // Only the target is clamped; an out-of-range start eases into range.
        let (lo, hi) = (self.config.polar_min, self.config.polar_max);
        let transition = Transition::new(current, target.clamped(lo, hi));
        log::debug!(
            "camera transition: az {:.3} -> {:.3}, polar {:.3} -> {:.3}",
            transition.start.azimuth,
            transition.target.azimuth,
            transition.start.polar,
            transition.target.polar
        );
        self.state = ChoreoState::Transitioning(transition);
        true
    }

    /// Trigger from whatever the controls currently report. No-op while the
    /// controls are not ready.
    pub fn trigger_from<C: OrbitControls + ?Sized>(&mut self, controls: &C) -> bool {
        match controls.orbit() {
            Some(current) => self.trigger(current),
            None => {
                log::trace!("camera trigger dropped: controls not ready");
                false
            }
        }
    }

    /// Abandon any in-flight transition.
    pub fn cancel(&mut self) {
        if self.is_transitioning() {
            log::debug!("camera transition cancelled");
        }
        self.state = ChoreoState::Idle;
    }

    /// Advance by `dt` seconds. Returns the orbit to apply this frame, or
    /// `None` when idle.
    pub fn advance(&mut self, dt: f32, radius: f32) -> Option<OrbitConfig> {
        let rate = self.config.rate();
        let ChoreoState::Transitioning(transition) = &mut self.state else {
            return None;
        };
        let step = (dt.max(0.0) * rate).min(1.0);
        transition.progress = (transition.progress + step).min(1.0);
        let orbit = transition.sample(radius.max(super::MIN_RADIUS));
        if transition.is_complete() {
            log::debug!("camera transition complete");
            self.state = ChoreoState::Idle;
        }
        Some(orbit)
    }

    /// Advance and write the result into `controls`. No-op while the
    /// controls are not ready.
    pub fn drive<C: OrbitControls + ?Sized>(
        &mut self,
        controls: &mut C,
        dt: f32,
    ) -> Option<OrbitConfig> {
        if !self.is_transitioning() {
            return None;
        }
        let Some(current) = controls.orbit() else {
            log::trace!("camera step skipped: controls not ready");
            return None;
        };
        let orbit = self.advance(dt, current.radius)?;
        controls.set_orbit(orbit);
        Some(orbit)
    }
}
