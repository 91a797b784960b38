//! Mock robot runtime for hardware-free testing.
//!
//! Simulates the external environment the controller normally runs against:
//! a differential-drive robot on a floor with a painted line. Per `step()`:
//!
//! 1. Integrate the robot pose from the last commanded wheel velocities
//! 2. Integrate the wheel encoders (with optional slip noise)
//! 3. Render the downward camera frame from the track texture
//! 4. Advance simulated time by the fixed timestep
//!
//! The run terminates after a configured tick budget, which is the only
//! termination signal the controller observes.
//!
//! Module structure:
//! - [`track`]: world-anchored ground texture (loaded or generated)
//! - [`physics`]: differential drive pose integration
//! - [`encoders`]: cumulative wheel angle integration with slip noise
//! - [`camera`]: downward ground-view rendering

mod camera;
mod encoders;
mod physics;
mod track;

pub use camera::CameraModel;
pub use encoders::EncoderBank;
pub use physics::SimPhysics;
pub use track::TrackMap;

use crate::config::RekhaConfig;
use crate::error::Result;
use crate::runtime::{RobotRuntime, WheelPositions};
use image::RgbaImage;
use std::path::Path;

/// Demo track geometry used when no track file is configured
const DEMO_TRACK_LENGTH_M: f32 = 3.0;
const DEMO_TRACK_AMPLITUDE_M: f32 = 0.05;
const DEMO_TRACK_WAVELENGTH_M: f32 = 1.5;
const DEMO_TRACK_LINE_WIDTH_M: f32 = 0.012;

/// Simulated robot environment implementing [`RobotRuntime`].
pub struct SimRuntime {
    track: TrackMap,
    physics: SimPhysics,
    encoders: EncoderBank,
    camera: CameraModel,
    frame: RgbaImage,
    command: (f32, f32),
    wheel_radius: f32,
    axle_length: f32,
    dt: f32,
    elapsed: f32,
    ticks: u64,
    max_ticks: u64,
}

impl SimRuntime {
    /// Build a runtime over a track, with the robot at the given start pose.
    pub fn new(track: TrackMap, config: &RekhaConfig, start: (f32, f32, f32)) -> Self {
        let sim = &config.simulation;
        let camera = CameraModel::new(
            sim.camera_width,
            sim.camera_height,
            sim.view_width_m,
            sim.view_depth_m,
            sim.view_near_m,
        );
        let physics = SimPhysics::new(start.0, start.1, start.2);
        let frame = camera.render(&track, physics.x(), physics.y(), physics.theta());

        Self {
            track,
            physics,
            encoders: EncoderBank::new(sim.slip_stddev, sim.seed),
            camera,
            frame,
            command: (0.0, 0.0),
            wheel_radius: config.robot.wheel_radius,
            axle_length: sim.axle_length,
            dt: config.timestep_secs(),
            elapsed: 0.0,
            ticks: 0,
            max_ticks: sim.max_ticks,
        }
    }

    /// Build a runtime from configuration alone: the configured track file,
    /// or the built-in demo circuit when none is set. The robot starts at
    /// the track origin heading along +X.
    pub fn from_config(config: &RekhaConfig) -> Result<Self> {
        let sim = &config.simulation;
        let track = match &sim.track_file {
            Some(path) => TrackMap::load(Path::new(path), sim.track_resolution, (0.0, 0.0))?,
            None => TrackMap::sine_track(
                DEMO_TRACK_LENGTH_M,
                DEMO_TRACK_AMPLITUDE_M,
                DEMO_TRACK_WAVELENGTH_M,
                DEMO_TRACK_LINE_WIDTH_M,
                sim.track_resolution,
            ),
        };
        Ok(Self::new(track, config, (0.0, 0.0, 0.0)))
    }

    /// Current robot pose `(x, y, theta)`.
    pub fn pose(&self) -> (f32, f32, f32) {
        (self.physics.x(), self.physics.y(), self.physics.theta())
    }

    /// Ticks simulated so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl RobotRuntime for SimRuntime {
    fn step(&mut self) -> bool {
        if self.ticks >= self.max_ticks {
            return false;
        }

        let (left, right) = self.command;
        self.physics
            .update(self.dt, left, right, self.wheel_radius, self.axle_length);
        self.encoders.integrate(left, right, self.dt);
        self.frame = self
            .camera
            .render(&self.track, self.physics.x(), self.physics.y(), self.physics.theta());

        self.elapsed += self.dt;
        self.ticks += 1;
        true
    }

    fn wheel_positions(&self) -> WheelPositions {
        self.encoders.positions()
    }

    fn camera_frame(&self) -> &RgbaImage {
        &self.frame
    }

    fn elapsed(&self) -> f32 {
        self.elapsed
    }

    fn set_wheel_velocities(&mut self, left: f32, right: f32) {
        self.command = (left, right);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runtime(max_ticks: u64) -> SimRuntime {
        let mut config = RekhaConfig::default();
        config.simulation.max_ticks = max_ticks;
        SimRuntime::from_config(&config).unwrap()
    }

    #[test]
    fn test_step_advances_time_and_ticks() {
        let mut sim = runtime(10);

        assert!(sim.step());
        assert_eq!(sim.ticks(), 1);
        assert!((sim.elapsed() - 0.032).abs() < 1e-6);
    }

    #[test]
    fn test_terminates_at_tick_budget() {
        let mut sim = runtime(3);

        assert!(sim.step());
        assert!(sim.step());
        assert!(sim.step());
        assert!(!sim.step());
        assert_eq!(sim.ticks(), 3);
    }

    #[test]
    fn test_commands_move_the_robot() {
        let mut sim = runtime(100);
        sim.set_wheel_velocities(5.8, 5.8);

        for _ in 0..100 {
            sim.step();
        }

        let (x, y, _) = sim.pose();
        // 5.8 rad/s * 0.02 m * 3.2 s of forward travel
        assert!((x - 0.371).abs() < 0.01, "x = {}", x);
        assert!(y.abs() < 1e-4);

        let positions = sim.wheel_positions();
        assert!((positions.left - 5.8 * 3.2).abs() < 1e-2);
    }

    #[test]
    fn test_initial_frame_is_rendered_before_first_step() {
        let sim = runtime(10);
        assert_eq!(sim.camera_frame().dimensions(), (320, 240));
    }
}
