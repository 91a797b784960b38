//! Centroid-based line location via image moments.

use super::{LineDetection, Roi};
use image::GrayImage;

/// Locate the line inside the region of interest of a binary image.
///
/// Computes the zeroth moment (foreground pixel count) and the first moment
/// about the x-axis over the ROI. The ROI spans the full frame width, so the
/// resulting centroid column is frame-relative. Returns
/// [`LineDetection::NotFound`] when the band contains no foreground at all.
pub fn locate_line(binary: &GrayImage, roi: &Roi) -> LineDetection {
    let mut m00: u64 = 0;
    let mut m10: u64 = 0;

    for y in roi.y..roi.y + roi.height {
        for x in roi.x..roi.x + roi.width {
            if binary.get_pixel(x, y).0[0] > 0 {
                m00 += 1;
                m10 += x as u64;
            }
        }
    }

    if m00 > 0 {
        LineDetection::Found {
            centroid_x: (m10 / m00) as u32,
        }
    } else {
        LineDetection::NotFound
    }
}
