//! Line perception: frame binarization and centroid-based line location.
//!
//! The camera looks straight down at the floor; the line is located by
//! thresholding the frame into a binary image and computing image moments
//! over a fixed band near the bottom of the frame.

mod locator;
mod preprocess;

pub use locator::locate_line;
pub use preprocess::binarize;

/// Fixed region of the frame examined for line detection.
///
/// Computed once from the frame dimensions at startup and never recomputed:
/// the full frame width by the bottom fifth of its height.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Roi {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Roi {
    /// Bottom band of a frame: full width, lowest 20% of rows.
    pub fn bottom_band(frame_width: u32, frame_height: u32) -> Self {
        Self {
            x: 0,
            y: (frame_height as f32 * 0.8) as u32,
            width: frame_width,
            height: (frame_height as f32 * 0.2) as u32,
        }
    }
}

/// Outcome of one line-location pass. Derived fresh each tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineDetection {
    /// Line found; `centroid_x` is the frame-relative x-coordinate of the
    /// foreground mass centroid, floored to an integer column.
    Found { centroid_x: u32 },
    /// No foreground pixels inside the region of interest.
    NotFound,
}
