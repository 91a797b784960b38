//! Ground texture for the mock runtime.
//!
//! The floor is a grayscale image sampled in world coordinates: white floor,
//! dark painted line. Tracks load from an image file or are generated
//! procedurally.

use crate::error::Result;
use image::GrayImage;
use std::f32::consts::TAU;
use std::path::Path;

/// Intensity returned for any point outside the texture (bare floor)
const FLOOR_INTENSITY: u8 = 255;
/// Intensity of the painted line in generated tracks
const LINE_INTENSITY: u8 = 20;

/// World-anchored ground texture.
pub struct TrackMap {
    pixels: GrayImage,
    /// Meters per pixel
    resolution: f32,
    /// World coordinates of the bottom-left pixel
    origin: (f32, f32),
}

impl TrackMap {
    /// Wrap an existing grayscale texture.
    pub fn from_image(pixels: GrayImage, resolution: f32, origin: (f32, f32)) -> Self {
        Self {
            pixels,
            resolution,
            origin,
        }
    }

    /// Load a texture from a grayscale image file.
    pub fn load<P: AsRef<Path>>(path: P, resolution: f32, origin: (f32, f32)) -> Result<Self> {
        let pixels = image::open(path.as_ref())?.into_luma8();
        Ok(Self::from_image(pixels, resolution, origin))
    }

    /// Generate a sinusoidal line `y = amplitude * sin(2πx / wavelength)`
    /// running from x = 0 to x = `length_m`. An amplitude of zero paints a
    /// straight segment along the x-axis.
    pub fn sine_track(
        length_m: f32,
        amplitude_m: f32,
        wavelength_m: f32,
        line_width_m: f32,
        resolution: f32,
    ) -> Self {
        let margin = 0.05_f32;
        let half_span = amplitude_m + line_width_m + margin;

        let width_px = ((length_m + 2.0 * margin) / resolution).ceil() as u32;
        let height_px = (2.0 * half_span / resolution).ceil() as u32;
        let origin = (-margin, -half_span);

        let mut track = Self::from_image(
            GrayImage::from_pixel(width_px, height_px, image::Luma([FLOOR_INTENSITY])),
            resolution,
            origin,
        );

        let half_line = line_width_m / 2.0;
        for py in 0..height_px {
            for px in 0..width_px {
                let (x, y) = track.pixel_to_world(px, py);
                if x < 0.0 || x > length_m {
                    continue;
                }
                let line_y = if wavelength_m > 0.0 {
                    amplitude_m * (TAU * x / wavelength_m).sin()
                } else {
                    0.0
                };
                if (y - line_y).abs() <= half_line {
                    track.pixels.put_pixel(px, py, image::Luma([LINE_INTENSITY]));
                }
            }
        }

        track
    }

    /// Texture width in pixels
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Texture height in pixels
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Ground intensity at a world coordinate; bare floor outside the map.
    pub fn intensity_at(&self, x: f32, y: f32) -> u8 {
        match self.world_to_pixel(x, y) {
            Some((px, py)) => self.pixels.get_pixel(px, py).0[0],
            None => FLOOR_INTENSITY,
        }
    }

    /// Center of a pixel in world coordinates. Image y grows downward,
    /// world y grows upward.
    fn pixel_to_world(&self, px: u32, py: u32) -> (f32, f32) {
        let x = self.origin.0 + (px as f32 + 0.5) * self.resolution;
        let y = self.origin.1
            + (self.pixels.height() as f32 - 1.0 - py as f32 + 0.5) * self.resolution;
        (x, y)
    }

    fn world_to_pixel(&self, x: f32, y: f32) -> Option<(u32, u32)> {
        let px = ((x - self.origin.0) / self.resolution) as i32;
        let py =
            (self.pixels.height() as i32 - 1) - ((y - self.origin.1) / self.resolution) as i32;

        if px >= 0
            && py >= 0
            && (px as u32) < self.pixels.width()
            && (py as u32) < self.pixels.height()
        {
            Some((px as u32, py as u32))
        } else {
            None
        }
    }
}
