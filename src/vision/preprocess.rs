//! Frame binarization.

use image::{GrayImage, Luma, RgbaImage};

/// Convert a color frame to a binary image separating line from floor.
///
/// Grayscale conversion uses integer BT.601 luma weights. With `dark_line`
/// set, the threshold is applied with inverted polarity: pixels at or below
/// `threshold` become foreground (255), so the physically dark line carries
/// the mass for the centroid computation. With `dark_line` unset (light line
/// on dark floor), pixels above the threshold become foreground instead.
pub fn binarize(frame: &RgbaImage, threshold: u8, dark_line: bool) -> GrayImage {
    let mut binary = GrayImage::new(frame.width(), frame.height());
    for (x, y, pixel) in frame.enumerate_pixels() {
        let [r, g, b, _] = pixel.0;
        let luma = ((299 * r as u32 + 587 * g as u32 + 114 * b as u32) / 1000) as u8;
        let foreground = if dark_line {
            luma <= threshold
        } else {
            luma > threshold
        };
        binary.put_pixel(x, y, Luma([if foreground { 255 } else { 0 }]));
    }
    binary
}
