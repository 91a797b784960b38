//! Control loop driver.
//!
//! Orchestrates one iteration per fixed timestep: odometry from the wheel
//! encoders, frame binarization, line location, PID steering or the search
//! spin, saturation, and command push to the runtime. All controller state
//! is owned here and mutated exactly once per tick by the single control
//! thread; there is no internal stopping condition.

use crate::config::RekhaConfig;
use crate::control::{MotionActuator, PidGains, SteeringPid, TrackState, WheelCommand};
use crate::error::{RekhaError, Result};
use crate::odometry::{OdometryReading, TripOdometry};
use crate::runtime::{RobotRuntime, WheelPositions};
use crate::vision::{binarize, locate_line, LineDetection, Roi};
use crate::viz::{OverlaySink, OverlayTelemetry};
use image::RgbaImage;

/// Lateral error magnitude (pixels) above which a line shift is reported
const SHIFT_WARN_PIXELS: i32 = 2;

/// Everything one tick produced, for diagnostics and tests.
#[derive(Clone, Copy, Debug)]
pub struct TickOutput {
    /// Operating state selected by this tick's detection
    pub state: TrackState,
    /// Final saturated wheel command
    pub command: WheelCommand,
    /// This tick's detection result
    pub detection: LineDetection,
    /// Lateral pixel error, when the line was found
    pub error: Option<i32>,
    /// Trip distance and speed
    pub odometry: OdometryReading,
}

/// Line-following control loop.
pub struct LineTracker {
    roi: Roi,
    frame_width: u32,
    threshold: u8,
    dark_line: bool,
    reset_on_loss: bool,
    pid: SteeringPid,
    actuator: MotionActuator,
    odometry: TripOdometry,
}

impl LineTracker {
    /// Create a tracker for the given frame geometry.
    ///
    /// Validates once, before the loop is entered, that the camera geometry
    /// can carry a detection band; a runtime without a usable camera is a
    /// precondition violation, not a runtime error.
    pub fn new(config: &RekhaConfig, frame_width: u32, frame_height: u32) -> Result<Self> {
        if frame_width == 0 || frame_height == 0 {
            return Err(RekhaError::Precondition(format!(
                "camera frame is {}x{}",
                frame_width, frame_height
            )));
        }

        let roi = Roi::bottom_band(frame_width, frame_height);
        if roi.height == 0 {
            return Err(RekhaError::Precondition(format!(
                "frame height {} leaves an empty detection band",
                frame_height
            )));
        }

        Ok(Self {
            roi,
            frame_width,
            threshold: config.vision.threshold,
            dark_line: config.vision.dark_line,
            reset_on_loss: config.control.reset_on_loss,
            pid: SteeringPid::new(
                PidGains {
                    kp: config.control.kp,
                    ki: config.control.ki,
                    kd: config.control.kd,
                },
                config.control.base_speed,
            ),
            actuator: MotionActuator::new(
                config.control.max_speed,
                WheelCommand::new(config.control.recovery_left, config.control.recovery_right),
            ),
            odometry: TripOdometry::new(config.robot.wheel_radius, config.timestep_secs()),
        })
    }

    /// The detection band computed at construction.
    pub fn roi(&self) -> Roi {
        self.roi
    }

    /// The steering controller (state inspection for tests/diagnostics).
    pub fn pid(&self) -> &SteeringPid {
        &self.pid
    }

    /// Run one control iteration over the current sensor readings.
    ///
    /// The PID state is only touched on Tracking ticks; a Searching tick
    /// leaves it unmodified unless the loss-reset policy is enabled.
    pub fn tick(&mut self, frame: &RgbaImage, wheels: WheelPositions) -> TickOutput {
        let odometry = self.odometry.update(wheels);

        let binary = binarize(frame, self.threshold, self.dark_line);
        let detection = locate_line(&binary, &self.roi);

        let (state, error) = match detection {
            LineDetection::Found { centroid_x } => {
                let steering = self.pid.update(centroid_x, self.frame_width);
                (TrackState::Tracking(steering.command), Some(steering.error))
            }
            LineDetection::NotFound => {
                if self.reset_on_loss {
                    self.pid.reset();
                }
                (TrackState::Searching, None)
            }
        };

        let command = self.actuator.resolve(state);

        TickOutput {
            state,
            command,
            detection,
            error,
            odometry,
        }
    }

    /// Drive the loop against a runtime until it signals end-of-run.
    ///
    /// Returns the number of ticks executed.
    pub fn run<R: RobotRuntime>(
        &mut self,
        runtime: &mut R,
        sink: Option<&OverlaySink>,
    ) -> Result<u64> {
        let mut ticks: u64 = 0;

        tracing::info!(
            width = self.frame_width,
            roi_y = self.roi.y,
            roi_height = self.roi.height,
            "line tracker started"
        );

        while runtime.step() {
            let wheels = runtime.wheel_positions();
            let elapsed = runtime.elapsed();

            let output = {
                let frame = runtime.camera_frame();
                let output = self.tick(frame, wheels);

                if let Some(sink) = sink {
                    if sink.wants(ticks) {
                        let binary = binarize(frame, self.threshold, self.dark_line);
                        let telemetry = OverlayTelemetry {
                            elapsed,
                            distance: output.odometry.distance,
                            speed: output.odometry.speed,
                        };
                        sink.write(ticks, &binary, output.detection, &telemetry)?;
                    }
                }

                output
            };

            runtime.set_wheel_velocities(output.command.left, output.command.right);

            match output.error {
                Some(error) if error.abs() > SHIFT_WARN_PIXELS => {
                    tracing::warn!(error, "line shift");
                }
                Some(_) => {}
                None => tracing::warn!("line lost, searching"),
            }
            tracing::debug!(
                left = output.command.left,
                right = output.command.right,
                distance = output.odometry.distance,
                speed = output.odometry.speed,
                "tick"
            );

            ticks += 1;
        }

        tracing::info!(
            ticks,
            distance = self.odometry.distance(),
            "line tracker finished"
        );

        Ok(ticks)
    }
}
