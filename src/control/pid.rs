//! PID steering controller.
//!
//! Converts the lateral pixel error between the line centroid and the image
//! center into a symmetric differential correction on the nominal forward
//! speed. The integral term resets on error zero-crossings, which bounds
//! windup without an explicit clamp.

use super::WheelCommand;

/// PID gain set.
#[derive(Clone, Copy, Debug)]
pub struct PidGains {
    pub kp: f32,
    pub ki: f32,
    pub kd: f32,
}

/// One controller update: the signed pixel error and the resulting
/// pre-saturation wheel command.
#[derive(Clone, Copy, Debug)]
pub struct SteeringOutput {
    /// Lateral error in pixels: centroid column minus image center.
    pub error: i32,
    /// Wheel speeds before saturation.
    pub command: WheelCommand,
}

/// Steering PID with zero-crossing integral reset.
///
/// State persists across ticks for the lifetime of the control loop and is
/// mutated exactly once per update.
pub struct SteeringPid {
    gains: PidGains,
    base_speed: f32,
    last_error: f32,
    integral: f32,
}

impl SteeringPid {
    /// Create a controller with the given gains and nominal forward speed.
    pub fn new(gains: PidGains, base_speed: f32) -> Self {
        Self {
            gains,
            base_speed,
            last_error: 0.0,
            integral: 0.0,
        }
    }

    /// Run one update for a detected line centroid.
    ///
    /// The image center uses truncating integer division of the frame width,
    /// matching the pixel grid. The integral accumulates the current error
    /// first and is then zeroed if the error crossed zero since the last
    /// tick (strictly opposite signs) or is exactly zero this tick; the
    /// zeroing discards this tick's accumulation as well. `last_error`
    /// always stores the current error, independent of the reset.
    pub fn update(&mut self, centroid_x: u32, frame_width: u32) -> SteeringOutput {
        let center = (frame_width / 2) as i32;
        let error = centroid_x as i32 - center;

        let derivative = error as f32 - self.last_error;
        self.integral += error as f32;

        let crossed = (error > 0 && self.last_error < 0.0) || (error < 0 && self.last_error > 0.0);
        if crossed || error == 0 {
            self.integral = 0.0;
        }

        let correction = self.gains.kp * error as f32
            + self.gains.ki * self.integral
            + self.gains.kd * derivative;

        self.last_error = error as f32;

        SteeringOutput {
            error,
            command: WheelCommand::new(self.base_speed + correction, self.base_speed - correction),
        }
    }

    /// Clear accumulated state. Only used when the loss-reset policy is
    /// enabled; the default behavior carries state across search phases.
    pub fn reset(&mut self) {
        self.last_error = 0.0;
        self.integral = 0.0;
    }

    /// Error stored by the most recent update.
    pub fn last_error(&self) -> f32 {
        self.last_error
    }

    /// Current integral term.
    pub fn integral(&self) -> f32 {
        self.integral
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn default_pid() -> SteeringPid {
        SteeringPid::new(
            PidGains {
                kp: 0.015,
                ki: 0.005,
                kd: 0.03,
            },
            5.8,
        )
    }

    #[test]
    fn test_centered_line_holds_base_speed() {
        let mut pid = default_pid();

        for _ in 0..2 {
            let out = pid.update(160, 320);
            assert_eq!(out.error, 0);
            assert!((out.command.left - 5.8).abs() < EPSILON);
            assert!((out.command.right - 5.8).abs() < EPSILON);
            assert!(pid.integral().abs() < EPSILON);
        }
    }

    #[test]
    fn test_first_tick_left_offset() {
        let mut pid = default_pid();

        // Centroid at 100 in a 320-wide frame: error -60, derivative -60,
        // integral -60 (last_error of zero does not trigger the reset),
        // correction 0.015*-60 + 0.005*-60 + 0.03*-60 = -3.0
        let out = pid.update(100, 320);
        assert_eq!(out.error, -60);
        assert!((pid.integral() + 60.0).abs() < EPSILON);
        assert!((out.command.left - 2.8).abs() < 1e-4);
        assert!((out.command.right - 8.8).abs() < 1e-4);
    }

    #[test]
    fn test_zero_crossing_resets_integral() {
        let mut pid = default_pid();

        // Error +5 then -3: the crossing discards both accumulations
        pid.update(165, 320);
        assert!((pid.integral() - 5.0).abs() < EPSILON);

        pid.update(157, 320);
        assert!(pid.integral().abs() < EPSILON);
        assert!((pid.last_error() + 3.0).abs() < EPSILON);
    }

    #[test]
    fn test_same_sign_errors_accumulate() {
        let mut pid = default_pid();

        pid.update(170, 320);
        pid.update(168, 320);
        assert!((pid.integral() - 18.0).abs() < EPSILON);
    }

    #[test]
    fn test_exact_zero_resets_integral() {
        let mut pid = default_pid();

        pid.update(170, 320);
        let out = pid.update(160, 320);
        assert_eq!(out.error, 0);
        assert!(pid.integral().abs() < EPSILON);
        // Derivative still acts on the way back to center
        assert!((out.command.left - (5.8 + 0.03 * -10.0)).abs() < 1e-4);
    }

    #[test]
    fn test_derivative_tracks_error_delta() {
        let mut pid = default_pid();

        pid.update(180, 320); // error +20
        let out = pid.update(175, 320); // error +15, derivative -5

        // correction = 0.015*15 + 0.005*35 + 0.03*-5 = 0.225 + 0.175 - 0.15
        let expected = 0.015 * 15.0 + 0.005 * 35.0 + 0.03 * -5.0;
        assert!((out.command.left - (5.8 + expected)).abs() < 1e-4);
        assert!((out.command.right - (5.8 - expected)).abs() < 1e-4);
    }

    #[test]
    fn test_odd_frame_width_truncates_center() {
        let mut pid = default_pid();

        // 321 / 2 truncates to 160
        let out = pid.update(160, 321);
        assert_eq!(out.error, 0);
    }

    #[test]
    fn test_reset_clears_state() {
        let mut pid = default_pid();

        pid.update(200, 320);
        pid.reset();
        assert!(pid.last_error().abs() < EPSILON);
        assert!(pid.integral().abs() < EPSILON);
    }
}
