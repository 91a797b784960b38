//! Wheel encoder-based trip odometry.
//!
//! Derives traveled distance and instantaneous speed for a differential
//! drive robot from cumulative wheel angular positions.

use crate::runtime::WheelPositions;

/// Distance and speed reading for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OdometryReading {
    /// Distance traveled since startup (meters)
    pub distance: f32,
    /// Instantaneous speed over the last timestep (m/s)
    pub speed: f32,
}

/// Trip odometry estimator.
///
/// The first update captures the encoder baseline; every later update
/// reports distance relative to that baseline. Distance is never wrapped or
/// reset during a run.
pub struct TripOdometry {
    /// Wheel radius in meters
    wheel_radius: f32,
    /// Timestep in seconds, for speed derivation
    dt: f32,
    /// Encoder positions captured at startup
    baseline: Option<WheelPositions>,
    /// Previous tick's distance
    last_distance: f32,
}

impl TripOdometry {
    /// Create a new estimator.
    ///
    /// # Arguments
    /// * `wheel_radius` - Wheel radius in meters
    /// * `dt` - Fixed timestep in seconds
    pub fn new(wheel_radius: f32, dt: f32) -> Self {
        Self {
            wheel_radius,
            dt,
            baseline: None,
            last_distance: 0.0,
        }
    }

    /// Update with the current encoder positions, once per tick.
    ///
    /// Distance is the wheel radius times the mean angular travel of both
    /// wheels since the baseline; speed is the distance delta over the
    /// timestep.
    pub fn update(&mut self, wheels: WheelPositions) -> OdometryReading {
        let baseline = *self.baseline.get_or_insert(wheels);

        let distance = self.wheel_radius
            * ((wheels.left - baseline.left) + (wheels.right - baseline.right))
            / 2.0;
        let speed = (distance - self.last_distance) / self.dt;
        self.last_distance = distance;

        OdometryReading { distance, speed }
    }

    /// Distance reported by the most recent update.
    pub fn distance(&self) -> f32 {
        self.last_distance
    }
}
