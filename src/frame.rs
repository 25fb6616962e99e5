//! Draws one timestep of the trajectory onto the shared canvas.

use crate::camera::{Camera, ScreenPoint};
use crate::canvas::Canvas;
use crate::config::RenderSettings;
use crate::glyphs::{text_width, GLYPH_HEIGHT};
use crate::loader::{Record, TrajectoryTable};
use crate::palette::ColorAssignment;
use crate::viewport::{AxisBounds, Viewport};
use glam::Vec3;
use image::Rgba;

const TITLE_SCALE: u32 = 2;
const TITLE_MARGIN: i64 = 10;
const LABEL_SCALE: u32 = 1;
const LABEL_OFFSET: i64 = 2;
const BOX_COLOR: Rgba<u8> = Rgba([190, 190, 190, 255]);

// Edges of the unit cube as pairs of corner indices; corner bits are x, y, z.
const CUBE_EDGES: [(usize, usize); 12] = [
    (0, 1), (2, 3), (4, 5), (6, 7),
    (0, 2), (1, 3), (4, 6), (5, 7),
    (0, 4), (1, 5), (2, 6), (3, 7),
];

/// Summary of a rendered frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    pub time: f64,
    pub points: usize,
}

/// Renders frames against a fixed viewport, color assignment and camera.
pub struct FrameRenderer<'a> {
    table: &'a TrajectoryTable,
    colors: &'a ColorAssignment,
    viewport: &'a Viewport,
    camera: Camera,
    settings: RenderSettings,
}

impl<'a> FrameRenderer<'a> {
    pub fn new(
        table: &'a TrajectoryTable,
        colors: &'a ColorAssignment,
        viewport: &'a Viewport,
        settings: RenderSettings,
    ) -> Self {
        Self {
            table,
            colors,
            viewport,
            camera: Camera::new(settings.width, settings.height),
            settings,
        }
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn viewport(&self) -> &Viewport {
        self.viewport
    }

    pub fn colors(&self) -> &ColorAssignment {
        self.colors
    }

    /// A canvas matching this renderer's settings.
    pub fn create_canvas(&self) -> Canvas {
        Canvas::new(self.settings.width, self.settings.height, self.settings.background)
    }

    /// Where a data-space position lands on the canvas.
    pub fn project(&self, position: [f64; 3]) -> Option<ScreenPoint> {
        self.camera.project(self.viewport.normalize(position))
    }

    /// Clears `canvas` and draws every record at exactly `time`.
    pub fn render(&self, canvas: &mut Canvas, time: f64) -> FrameStats {
        canvas.clear(self.settings.background);
        self.draw_bounding_box(canvas);
        self.draw_axis_labels(canvas);

        let mut points: Vec<(&Record, ScreenPoint)> = self
            .table
            .records_at(time)
            .filter_map(|record| self.project(record.position()).map(|p| (record, p)))
            .collect();
        // Far points first so nearer ones are drawn over them.
        points.sort_by(|a, b| b.1.depth.total_cmp(&a.1.depth));

        for (record, point) in &points {
            self.draw_point(canvas, record, point);
        }
        self.draw_title(canvas, time);

        FrameStats {
            time,
            points: points.len(),
        }
    }

    fn draw_point(&self, canvas: &mut Canvas, record: &Record, point: &ScreenPoint) {
        let radius = self.settings.point_radius;
        canvas.fill_disc(point.x, point.y, radius, self.colors.color_or_fallback(record.body));

        let label_x = point.x.round() as i64 + radius as i64 + LABEL_OFFSET;
        let label_y = point.y.round() as i64 - radius as i64 - (GLYPH_HEIGHT * LABEL_SCALE) as i64;
        canvas.draw_text(
            label_x,
            label_y,
            &record.body.to_string(),
            self.settings.foreground,
            LABEL_SCALE,
        );
    }

    fn draw_title(&self, canvas: &mut Canvas, time: f64) {
        let title = format!("Timestep {:.2}", time);
        let x = (canvas.width() as i64 - text_width(&title, TITLE_SCALE) as i64) / 2;
        canvas.draw_text(x, TITLE_MARGIN, &title, self.settings.foreground, TITLE_SCALE);
    }

    fn draw_bounding_box(&self, canvas: &mut Canvas) {
        let corners: Vec<Option<ScreenPoint>> = (0..8)
            .map(|i| self.camera.project(cube_corner(i)))
            .collect();
        for (a, b) in CUBE_EDGES {
            if let (Some(a), Some(b)) = (corners[a], corners[b]) {
                canvas.draw_line((a.x, a.y), (b.x, b.y), BOX_COLOR);
            }
        }
    }

    /// Min and max values at the ends of the three edges meeting at the
    /// lowest corner, with the axis name at each edge's midpoint.
    fn draw_axis_labels(&self, canvas: &mut Canvas) {
        let origin = cube_corner(0);
        for (axis, (name, bounds)) in ["x", "y", "z"]
            .into_iter()
            .zip(self.viewport.axes())
            .enumerate()
        {
            let end = cube_corner(1 << axis);
            self.draw_label_at(canvas, origin, &format_tick(bounds.min, &bounds));
            self.draw_label_at(canvas, end, &format_tick(bounds.max, &bounds));
            self.draw_label_at(canvas, (origin + end) * 0.5, name);
        }
    }

    fn draw_label_at(&self, canvas: &mut Canvas, position: Vec3, text: &str) {
        if let Some(p) = self.camera.project(position) {
            canvas.draw_text(
                p.x.round() as i64 + LABEL_OFFSET,
                p.y.round() as i64 + LABEL_OFFSET,
                text,
                BOX_COLOR,
                LABEL_SCALE,
            );
        }
    }
}

fn cube_corner(index: usize) -> Vec3 {
    let coord = |bit: usize| if index & (1 << bit) != 0 { 1.0 } else { -1.0 };
    Vec3::new(coord(0), coord(1), coord(2))
}

/// Tick text with enough decimals to tell the axis ends apart.
fn format_tick(value: f64, bounds: &AxisBounds) -> String {
    let extent = bounds.extent();
    if extent >= 10.0 {
        format!("{:.0}", value)
    } else if extent >= 0.1 {
        format!("{:.2}", value)
    } else {
        format!("{:.2e}", value)
    }
}
