//! Steering control: PID correction and wheel command saturation.

mod actuator;
mod pid;

pub use actuator::MotionActuator;
pub use pid::{PidGains, SteeringOutput, SteeringPid};

/// Wheel velocity command pair (rad/s).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WheelCommand {
    pub left: f32,
    pub right: f32,
}

impl WheelCommand {
    pub fn new(left: f32, right: f32) -> Self {
        Self { left, right }
    }
}

/// Operating state for one tick, selected solely by the detection result.
///
/// There is no hysteresis: a single lost-line tick switches to `Searching`
/// and a single reacquisition tick switches back to `Tracking`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TrackState {
    /// Line visible; carries the pre-saturation PID command.
    Tracking(WheelCommand),
    /// Line lost; the actuator substitutes the fixed recovery spin.
    Searching,
}
