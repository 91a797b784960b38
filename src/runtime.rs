//! Robot runtime abstraction.
//!
//! The controller never talks to hardware or a simulator directly; it drives
//! anything that implements [`RobotRuntime`]. One `step()` advances the
//! environment by one fixed timestep, after which the sensor accessors
//! reflect the new instant and the actuator setter carries the commands for
//! the next interval.

use image::RgbaImage;

/// Cumulative wheel angular positions in radians.
///
/// Values grow with forward rotation and are never wrapped; trip distance is
/// derived from the difference against the positions captured at startup.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WheelPositions {
    pub left: f32,
    pub right: f32,
}

impl WheelPositions {
    pub fn new(left: f32, right: f32) -> Self {
        Self { left, right }
    }
}

/// Interface to the host environment (robot hardware or simulation).
pub trait RobotRuntime {
    /// Advance the environment by one fixed timestep.
    ///
    /// Returns `false` when the environment signals end-of-run; the control
    /// loop has no internal stopping condition of its own.
    fn step(&mut self) -> bool;

    /// Current cumulative wheel encoder positions.
    fn wheel_positions(&self) -> WheelPositions;

    /// Current camera frame (4-channel color, fixed dimensions for the
    /// lifetime of the runtime). Valid from construction onward.
    fn camera_frame(&self) -> &RgbaImage;

    /// Seconds elapsed since the start of the run.
    fn elapsed(&self) -> f32;

    /// Set target wheel angular velocities (rad/s) for the next interval.
    /// Callers are expected to pass saturated values.
    fn set_wheel_velocities(&mut self, left: f32, right: f32);
}
