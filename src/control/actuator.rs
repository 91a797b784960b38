//! Motion actuation: saturation and line-loss recovery.

use super::{TrackState, WheelCommand};

/// Maps the per-tick operating state to the final wheel command.
///
/// Tracking commands are clamped componentwise to the speed bound; a lost
/// line yields the fixed spin-in-place pair regardless of prior controller
/// state. The spin direction is not adaptive to which side the line was
/// last seen.
pub struct MotionActuator {
    max_speed: f32,
    recovery: WheelCommand,
}

impl MotionActuator {
    /// Create an actuator with the saturation bound and recovery pair.
    pub fn new(max_speed: f32, recovery: WheelCommand) -> Self {
        Self {
            max_speed,
            recovery,
        }
    }

    /// Resolve the tick's operating state into a saturated wheel command.
    pub fn resolve(&self, state: TrackState) -> WheelCommand {
        match state {
            TrackState::Tracking(command) => self.clamp(command),
            TrackState::Searching => self.clamp(self.recovery),
        }
    }

    /// Clamp each component independently to `[-max_speed, max_speed]`.
    pub fn clamp(&self, command: WheelCommand) -> WheelCommand {
        WheelCommand::new(
            command.left.clamp(-self.max_speed, self.max_speed),
            command.right.clamp(-self.max_speed, self.max_speed),
        )
    }
}
