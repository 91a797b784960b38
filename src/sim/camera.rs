//! Downward camera simulation.
//!
//! Renders the RGBA frame a floor-facing camera would see: a rectangular
//! ground footprint ahead of the robot, sampled from the track texture. The
//! bottom image row is the ground nearest the robot.

use super::track::TrackMap;
use image::{Rgba, RgbaImage};

/// Pinhole-free orthographic ground camera.
pub struct CameraModel {
    width: u32,
    height: u32,
    /// Lateral ground span covered by the frame (meters)
    view_width_m: f32,
    /// Forward ground span covered by the frame (meters)
    view_depth_m: f32,
    /// Ground distance from robot center to the bottom image row (meters)
    view_near_m: f32,
}

impl CameraModel {
    pub fn new(
        width: u32,
        height: u32,
        view_width_m: f32,
        view_depth_m: f32,
        view_near_m: f32,
    ) -> Self {
        Self {
            width,
            height,
            view_width_m,
            view_depth_m,
            view_near_m,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Render the frame for a robot at `(x, y)` heading `theta`.
    ///
    /// Columns map to lateral offset (right of heading is +x in the image),
    /// rows map to forward distance with the bottom row nearest the robot.
    pub fn render(&self, track: &TrackMap, x: f32, y: f32, theta: f32) -> RgbaImage {
        let m_per_px_x = self.view_width_m / self.width as f32;
        let m_per_px_y = self.view_depth_m / self.height as f32;
        let (sin_t, cos_t) = theta.sin_cos();

        RgbaImage::from_fn(self.width, self.height, |px, py| {
            let lateral = (px as f32 + 0.5 - self.width as f32 / 2.0) * m_per_px_x;
            let forward =
                self.view_near_m + (self.height as f32 - 1.0 - py as f32 + 0.5) * m_per_px_y;

            let wx = x + forward * cos_t + lateral * sin_t;
            let wy = y + forward * sin_t - lateral * cos_t;

            let v = track.intensity_at(wx, wy);
            Rgba([v, v, v, 255])
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vision::{binarize, locate_line, LineDetection, Roi};

    fn straight_track() -> TrackMap {
        TrackMap::sine_track(2.0, 0.0, 0.0, 0.012, 0.002)
    }

    fn camera() -> CameraModel {
        CameraModel::new(320, 240, 0.08, 0.06, 0.02)
    }

    fn detect(frame: &RgbaImage) -> LineDetection {
        let binary = binarize(frame, 60, true);
        locate_line(&binary, &Roi::bottom_band(320, 240))
    }

    #[test]
    fn test_centered_robot_sees_centered_line() {
        let frame = camera().render(&straight_track(), 0.1, 0.0, 0.0);

        match detect(&frame) {
            LineDetection::Found { centroid_x } => {
                assert!((centroid_x as i32 - 160).abs() <= 1, "centroid {}", centroid_x);
            }
            LineDetection::NotFound => panic!("line not visible"),
        }
    }

    #[test]
    fn test_robot_below_line_sees_it_left_of_center() {
        // Heading +x with the line at y = 0, the robot sits at y = -0.01,
        // so the line is to its left and must image left of center
        let frame = camera().render(&straight_track(), 0.1, -0.01, 0.0);

        match detect(&frame) {
            LineDetection::Found { centroid_x } => {
                assert!(centroid_x < 140, "centroid {}", centroid_x);
            }
            LineDetection::NotFound => panic!("line not visible"),
        }
    }

    #[test]
    fn test_off_track_robot_sees_nothing() {
        let frame = camera().render(&straight_track(), 0.1, 0.5, 0.0);
        assert_eq!(detect(&frame), LineDetection::NotFound);
    }

    #[test]
    fn test_frame_dimensions_are_stable() {
        let frame = camera().render(&straight_track(), 0.0, 0.0, 0.0);
        assert_eq!(frame.dimensions(), (320, 240));
    }
}
