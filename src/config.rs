//! Configuration loading for RekhaNav

use crate::error::Result;
use serde::Deserialize;
use std::path::Path;

/// Main configuration structure
#[derive(Clone, Debug, Deserialize)]
pub struct RekhaConfig {
    #[serde(default)]
    pub robot: RobotConfig,
    #[serde(default)]
    pub vision: VisionConfig,
    #[serde(default)]
    pub control: ControlConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

/// Robot physical parameters
#[derive(Clone, Debug, Deserialize)]
pub struct RobotConfig {
    /// Wheel radius in meters (default: 0.02)
    #[serde(default = "default_wheel_radius")]
    pub wheel_radius: f32,

    /// Control timestep in milliseconds (default: 32)
    #[serde(default = "default_timestep_ms")]
    pub timestep_ms: u64,
}

/// Line detection parameters
#[derive(Clone, Debug, Deserialize)]
pub struct VisionConfig {
    /// Grayscale binarization threshold (default: 60)
    #[serde(default = "default_threshold")]
    pub threshold: u8,

    /// Line polarity: true = dark line on light floor (default: true).
    /// Pixels at or below the threshold become the foreground class.
    #[serde(default = "default_dark_line")]
    pub dark_line: bool,
}

/// Steering controller parameters
#[derive(Clone, Debug, Deserialize)]
pub struct ControlConfig {
    /// Proportional gain (default: 0.015)
    #[serde(default = "default_kp")]
    pub kp: f32,

    /// Integral gain (default: 0.005)
    #[serde(default = "default_ki")]
    pub ki: f32,

    /// Derivative gain (default: 0.03)
    #[serde(default = "default_kd")]
    pub kd: f32,

    /// Nominal forward wheel speed in rad/s (default: 5.8)
    #[serde(default = "default_base_speed")]
    pub base_speed: f32,

    /// Wheel speed saturation bound in rad/s (default: 6.28)
    #[serde(default = "default_max_speed")]
    pub max_speed: f32,

    /// Left wheel speed while searching for a lost line (default: 1.0)
    #[serde(default = "default_recovery_left")]
    pub recovery_left: f32,

    /// Right wheel speed while searching for a lost line (default: -1.0)
    #[serde(default = "default_recovery_right")]
    pub recovery_right: f32,

    /// Reset PID state when the line is lost (default: false, matching
    /// the behavior of carrying state across search phases)
    #[serde(default)]
    pub reset_on_loss: bool,
}

/// Diagnostic output configuration
#[derive(Clone, Debug, Deserialize)]
pub struct OutputConfig {
    /// Directory for SVG overlay snapshots
    #[serde(default = "default_overlay_dir")]
    pub overlay_dir: String,

    /// Write an overlay every N ticks; 0 disables snapshots (default: 0)
    #[serde(default)]
    pub snapshot_ticks: u64,
}

/// Mock runtime configuration
#[derive(Clone, Debug, Deserialize)]
pub struct SimulationConfig {
    /// Track texture image (grayscale); procedural track when absent
    #[serde(default)]
    pub track_file: Option<String>,

    /// Track resolution in meters per pixel (default: 0.002)
    #[serde(default = "default_track_resolution")]
    pub track_resolution: f32,

    /// Axle length between wheel centers in meters (default: 0.057)
    #[serde(default = "default_axle_length")]
    pub axle_length: f32,

    /// Camera frame width in pixels (default: 320)
    #[serde(default = "default_camera_width")]
    pub camera_width: u32,

    /// Camera frame height in pixels (default: 240)
    #[serde(default = "default_camera_height")]
    pub camera_height: u32,

    /// Lateral ground span covered by the frame in meters (default: 0.08)
    #[serde(default = "default_view_width")]
    pub view_width_m: f32,

    /// Forward ground span covered by the frame in meters (default: 0.06)
    #[serde(default = "default_view_depth")]
    pub view_depth_m: f32,

    /// Ground distance from robot center to the bottom image row (default: 0.02)
    #[serde(default = "default_view_near")]
    pub view_near_m: f32,

    /// Encoder slip noise standard deviation, multiplicative (default: 0.0)
    #[serde(default)]
    pub slip_stddev: f32,

    /// Random seed for sensor noise; 0 = entropy (default: 42)
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Simulated run length in ticks (default: 1000)
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,
}

// Default value functions
fn default_wheel_radius() -> f32 {
    0.02
}
fn default_timestep_ms() -> u64 {
    32
}
fn default_threshold() -> u8 {
    60
}
fn default_dark_line() -> bool {
    true
}
fn default_kp() -> f32 {
    0.015
}
fn default_ki() -> f32 {
    0.005
}
fn default_kd() -> f32 {
    0.03
}
fn default_base_speed() -> f32 {
    5.8
}
fn default_max_speed() -> f32 {
    6.28
}
fn default_recovery_left() -> f32 {
    1.0
}
fn default_recovery_right() -> f32 {
    -1.0
}
fn default_overlay_dir() -> String {
    "output/overlays".to_string()
}

// Simulation defaults
fn default_track_resolution() -> f32 {
    0.002
}
fn default_axle_length() -> f32 {
    0.057
}
fn default_camera_width() -> u32 {
    320
}
fn default_camera_height() -> u32 {
    240
}
fn default_view_width() -> f32 {
    0.08
}
fn default_view_depth() -> f32 {
    0.06
}
fn default_view_near() -> f32 {
    0.02
}
fn default_seed() -> u64 {
    42
}
fn default_max_ticks() -> u64 {
    1000
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            wheel_radius: default_wheel_radius(),
            timestep_ms: default_timestep_ms(),
        }
    }
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            dark_line: default_dark_line(),
        }
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            kp: default_kp(),
            ki: default_ki(),
            kd: default_kd(),
            base_speed: default_base_speed(),
            max_speed: default_max_speed(),
            recovery_left: default_recovery_left(),
            recovery_right: default_recovery_right(),
            reset_on_loss: false,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            overlay_dir: default_overlay_dir(),
            snapshot_ticks: 0,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            track_file: None,
            track_resolution: default_track_resolution(),
            axle_length: default_axle_length(),
            camera_width: default_camera_width(),
            camera_height: default_camera_height(),
            view_width_m: default_view_width(),
            view_depth_m: default_view_depth(),
            view_near_m: default_view_near(),
            slip_stddev: 0.0,
            seed: default_seed(),
            max_ticks: default_max_ticks(),
        }
    }
}

impl Default for RekhaConfig {
    fn default() -> Self {
        Self {
            robot: RobotConfig::default(),
            vision: VisionConfig::default(),
            control: ControlConfig::default(),
            output: OutputConfig::default(),
            simulation: SimulationConfig::default(),
        }
    }
}

impl RekhaConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            crate::error::RekhaError::Config(format!("Failed to read config file: {}", e))
        })?;
        let config: RekhaConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Control timestep in seconds
    pub fn timestep_secs(&self) -> f32 {
        self.robot.timestep_ms as f32 / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_controller_constants() {
        let config = RekhaConfig::default();
        assert_eq!(config.robot.timestep_ms, 32);
        assert!((config.robot.wheel_radius - 0.02).abs() < 1e-9);
        assert_eq!(config.vision.threshold, 60);
        assert!(config.vision.dark_line);
        assert!((config.control.kp - 0.015).abs() < 1e-9);
        assert!((config.control.ki - 0.005).abs() < 1e-9);
        assert!((config.control.kd - 0.03).abs() < 1e-9);
        assert!((config.control.base_speed - 5.8).abs() < 1e-9);
        assert!((config.control.max_speed - 6.28).abs() < 1e-9);
        assert!((config.control.recovery_left - 1.0).abs() < 1e-9);
        assert!((config.control.recovery_right + 1.0).abs() < 1e-9);
        assert!(!config.control.reset_on_loss);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: RekhaConfig = toml::from_str(
            r#"
            [vision]
            threshold = 90

            [control]
            base_speed = 4.0
            "#,
        )
        .unwrap();

        assert_eq!(config.vision.threshold, 90);
        assert!(config.vision.dark_line);
        assert!((config.control.base_speed - 4.0).abs() < 1e-9);
        assert!((config.control.max_speed - 6.28).abs() < 1e-9);
        assert_eq!(config.robot.timestep_ms, 32);
    }

    #[test]
    fn test_timestep_secs() {
        let config = RekhaConfig::default();
        assert!((config.timestep_secs() - 0.032).abs() < 1e-6);
    }
}
