//! Differential drive kinematics for the mock runtime.

use std::f32::consts::{PI, TAU};

/// Simulated robot pose, integrated from commanded wheel velocities.
pub struct SimPhysics {
    /// X position in world frame (meters)
    x: f32,
    /// Y position in world frame (meters)
    y: f32,
    /// Orientation (radians, CCW from +X)
    theta: f32,
}

impl SimPhysics {
    /// Create physics state at the given pose.
    pub fn new(x: f32, y: f32, theta: f32) -> Self {
        Self {
            x,
            y,
            theta: normalize_angle(theta),
        }
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn theta(&self) -> f32 {
        self.theta
    }

    /// Advance the pose by one timestep from wheel angular velocities.
    ///
    /// Uses exact arc integration when turning, straight-line integration
    /// when the angular rate is negligible.
    pub fn update(
        &mut self,
        dt: f32,
        left_omega: f32,
        right_omega: f32,
        wheel_radius: f32,
        axle_length: f32,
    ) {
        let v_l = left_omega * wheel_radius;
        let v_r = right_omega * wheel_radius;

        let v = (v_l + v_r) / 2.0;
        let omega = (v_r - v_l) / axle_length;

        if omega.abs() < 1e-6 {
            self.x += v * self.theta.cos() * dt;
            self.y += v * self.theta.sin() * dt;
        } else {
            let r = v / omega;
            let new_theta = self.theta + omega * dt;
            self.x += r * (new_theta.sin() - self.theta.sin());
            self.y += r * (self.theta.cos() - new_theta.cos());
            self.theta = new_theta;
        }

        self.theta = normalize_angle(self.theta);
    }
}

/// Normalize angle to [-π, π)
fn normalize_angle(angle: f32) -> f32 {
    let mut a = angle % TAU;
    if a >= PI {
        a -= TAU;
    } else if a < -PI {
        a += TAU;
    }
    a
}
