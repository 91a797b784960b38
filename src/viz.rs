//! SVG overlay rendering for line-tracking audit.
//!
//! Renders a diagnostic view of one tick to SVG:
//! - the binarized foreground inside the region of interest
//! - the region-of-interest box
//! - the image centerline
//! - a cross marker at the detected centroid
//! - HUD text with elapsed time, trip distance and speed
//!
//! Output is purely observational and never read back by the controller.

use crate::error::Result;
use crate::vision::{LineDetection, Roi};
use image::GrayImage;
use std::fmt::Write;
use std::path::{Path, PathBuf};

/// Overlay color scheme
const COLOR_FOREGROUND: &str = "#333333";
const COLOR_ROI: &str = "#22AA22";
const COLOR_CENTERLINE: &str = "#2222AA";
const COLOR_CENTROID: &str = "#AA2222";

/// Per-tick values shown in the HUD.
#[derive(Clone, Copy, Debug, Default)]
pub struct OverlayTelemetry {
    /// Seconds since run start
    pub elapsed: f32,
    /// Trip distance (meters)
    pub distance: f32,
    /// Instantaneous speed (m/s)
    pub speed: f32,
}

/// Renders one tick's diagnostic overlay as an SVG document.
pub struct OverlayRenderer {
    width: u32,
    height: u32,
    roi: Roi,
}

impl OverlayRenderer {
    /// Create a renderer for the given frame geometry.
    pub fn new(width: u32, height: u32, roi: Roi) -> Self {
        Self { width, height, roi }
    }

    /// Render the overlay for one tick.
    pub fn render(
        &self,
        binary: &GrayImage,
        detection: LineDetection,
        telemetry: &OverlayTelemetry,
    ) -> String {
        let mut svg = String::new();

        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        );
        let _ = writeln!(
            svg,
            r##"  <rect width="{}" height="{}" fill="#FFFFFF"/>"##,
            self.width, self.height
        );

        self.render_foreground_runs(&mut svg, binary);
        self.render_roi_box(&mut svg);
        self.render_centerline(&mut svg);
        if let LineDetection::Found { centroid_x } = detection {
            self.render_centroid_marker(&mut svg, centroid_x);
        }
        self.render_hud(&mut svg, telemetry);

        let _ = writeln!(svg, "</svg>");
        svg
    }

    /// Draw the binary foreground inside the ROI as per-row pixel runs.
    fn render_foreground_runs(&self, svg: &mut String, binary: &GrayImage) {
        for y in self.roi.y..self.roi.y + self.roi.height {
            let mut run_start: Option<u32> = None;
            for x in self.roi.x..self.roi.x + self.roi.width {
                let on = binary.get_pixel(x, y).0[0] > 0;
                match (on, run_start) {
                    (true, None) => run_start = Some(x),
                    (false, Some(start)) => {
                        self.emit_run(svg, start, x, y);
                        run_start = None;
                    }
                    _ => {}
                }
            }
            if let Some(start) = run_start {
                self.emit_run(svg, start, self.roi.x + self.roi.width, y);
            }
        }
    }

    fn emit_run(&self, svg: &mut String, start: u32, end: u32, y: u32) {
        let _ = writeln!(
            svg,
            r#"  <rect x="{}" y="{}" width="{}" height="1" fill="{}"/>"#,
            start,
            y,
            end - start,
            COLOR_FOREGROUND
        );
    }

    fn render_roi_box(&self, svg: &mut String) {
        let _ = writeln!(
            svg,
            r#"  <rect x="{}" y="{}" width="{}" height="{}" fill="none" stroke="{}" stroke-width="1"/>"#,
            self.roi.x, self.roi.y, self.roi.width, self.roi.height, COLOR_ROI
        );
    }

    fn render_centerline(&self, svg: &mut String) {
        let center = self.width / 2;
        let _ = writeln!(
            svg,
            r#"  <line x1="{x}" y1="0" x2="{x}" y2="{h}" stroke="{c}" stroke-width="1"/>"#,
            x = center,
            h = self.height,
            c = COLOR_CENTERLINE
        );
    }

    /// Cross marker at the centroid column, vertically centered in the band.
    fn render_centroid_marker(&self, svg: &mut String, centroid_x: u32) {
        let cy = (self.height as f32 * 0.9) as u32;
        let arm = 5i64;
        let cx = centroid_x as i64;
        let cy = cy as i64;
        let _ = writeln!(
            svg,
            r#"  <line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="2"/>"#,
            cx - arm,
            cy,
            cx + arm,
            cy,
            COLOR_CENTROID
        );
        let _ = writeln!(
            svg,
            r#"  <line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="2"/>"#,
            cx,
            cy - arm,
            cx,
            cy + arm,
            COLOR_CENTROID
        );
    }

    fn render_hud(&self, svg: &mut String, telemetry: &OverlayTelemetry) {
        let lines = [
            (20, format!("Time: {:.2} s", telemetry.elapsed)),
            (40, format!("Dist: {:.3} m", telemetry.distance)),
            (60, format!("Speed: {:.3} m/s", telemetry.speed)),
        ];
        for (y, text) in lines {
            let _ = writeln!(
                svg,
                r#"  <text x="10" y="{}" font-family="monospace" font-size="12" fill="{}">{}</text>"#,
                y, COLOR_FOREGROUND, text
            );
        }
    }
}

/// Writes overlay snapshots to disk at a fixed tick interval.
pub struct OverlaySink {
    renderer: OverlayRenderer,
    dir: PathBuf,
    /// Snapshot period in ticks; 0 disables writing entirely
    interval: u64,
}

impl OverlaySink {
    /// Create a sink writing into `dir`, creating it if needed.
    pub fn new(dir: &Path, interval: u64, renderer: OverlayRenderer) -> Result<Self> {
        if interval > 0 {
            std::fs::create_dir_all(dir)?;
        }
        Ok(Self {
            renderer,
            dir: dir.to_path_buf(),
            interval,
        })
    }

    /// Whether this tick is a snapshot tick.
    pub fn wants(&self, tick: u64) -> bool {
        self.interval > 0 && tick % self.interval == 0
    }

    /// Render and write one snapshot.
    pub fn write(
        &self,
        tick: u64,
        binary: &GrayImage,
        detection: LineDetection,
        telemetry: &OverlayTelemetry,
    ) -> Result<()> {
        let svg = self.renderer.render(binary, detection, telemetry);
        let path = self.dir.join(format!("overlay_{:06}.svg", tick));
        std::fs::write(&path, svg)?;
        tracing::debug!(path = %path.display(), "overlay snapshot written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn test_renderer() -> OverlayRenderer {
        OverlayRenderer::new(320, 240, Roi::bottom_band(320, 240))
    }

    fn binary_with_column(x: u32) -> GrayImage {
        let mut img = GrayImage::new(320, 240);
        for y in 192..240 {
            img.put_pixel(x, y, Luma([255]));
        }
        img
    }

    #[test]
    fn test_render_contains_geometry() {
        let renderer = test_renderer();
        let svg = renderer.render(
            &binary_with_column(160),
            LineDetection::Found { centroid_x: 160 },
            &OverlayTelemetry {
                elapsed: 1.5,
                distance: 0.25,
                speed: 0.116,
            },
        );

        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>\n"));
        // ROI box and centerline
        assert!(svg.contains(r#"y="192" width="320" height="48" fill="none""#));
        assert!(svg.contains(r#"x1="160" y1="0""#));
        // HUD
        assert!(svg.contains("Time: 1.50 s"));
        assert!(svg.contains("Dist: 0.250 m"));
        assert!(svg.contains("Speed: 0.116 m/s"));
    }

    #[test]
    fn test_lost_line_renders_no_marker() {
        let renderer = test_renderer();
        let blank = GrayImage::new(320, 240);
        let svg = renderer.render(&blank, LineDetection::NotFound, &OverlayTelemetry::default());
        assert!(!svg.contains(COLOR_CENTROID));
    }

    #[test]
    fn test_sink_writes_on_interval() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = OverlaySink::new(tmp.path(), 10, test_renderer()).unwrap();

        assert!(sink.wants(0));
        assert!(!sink.wants(5));
        assert!(sink.wants(20));

        sink.write(
            20,
            &binary_with_column(100),
            LineDetection::Found { centroid_x: 100 },
            &OverlayTelemetry::default(),
        )
        .unwrap();

        assert!(tmp.path().join("overlay_000020.svg").exists());
    }

    #[test]
    fn test_disabled_sink_wants_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = OverlaySink::new(tmp.path(), 0, test_renderer()).unwrap();
        assert!(!sink.wants(0));
    }
}
