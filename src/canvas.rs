//! CPU drawing surface shared by every frame of a run.
//!
//! The canvas is allocated once and cleared at the start of each frame; the
//! same pixels are then either uploaded to the window or handed to the
//! exporter.

use crate::glyphs::{self, GLYPH_ADVANCE, GLYPH_HEIGHT, GLYPH_WIDTH};
use image::{Rgba, RgbaImage};

pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: Rgba<u8>) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, background),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Raw RGBA8 bytes, row-major, no padding.
    pub fn pixels(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        (x < self.width() && y < self.height()).then(|| *self.image.get_pixel(x, y))
    }

    pub fn clear(&mut self, color: Rgba<u8>) {
        for pixel in self.image.pixels_mut() {
            *pixel = color;
        }
    }

    /// Writes a pixel; coordinates outside the canvas are ignored.
    pub fn put_pixel(&mut self, x: i64, y: i64, color: Rgba<u8>) {
        if x >= 0 && y >= 0 && x < self.width() as i64 && y < self.height() as i64 {
            self.image.put_pixel(x as u32, y as u32, color);
        }
    }

    /// Fills a disc; only the part overlapping the canvas is visited.
    pub fn fill_disc(&mut self, cx: f32, cy: f32, radius: u32, color: Rgba<u8>) {
        let cx = cx.round() as i64;
        let cy = cy.round() as i64;
        let r = radius as i64;
        let x_max = self.width() as i64 - 1;
        let y_max = self.height() as i64 - 1;
        let x_range = cx.saturating_sub(r).max(0)..=cx.saturating_add(r).min(x_max);
        let y_range = cy.saturating_sub(r).max(0)..=cy.saturating_add(r).min(y_max);
        let r_squared = (r as i128) * (r as i128);

        for y in y_range {
            let dy = (y - cy) as i128;
            for x in x_range.clone() {
                let dx = (x - cx) as i128;
                if dx * dx + dy * dy <= r_squared {
                    self.image.put_pixel(x as u32, y as u32, color);
                }
            }
        }
    }

    /// Bresenham line between two points, endpoints included.
    pub fn draw_line(&mut self, from: (f32, f32), to: (f32, f32), color: Rgba<u8>) {
        let (mut x0, mut y0) = (from.0.round() as i64, from.1.round() as i64);
        let (x1, y1) = (to.0.round() as i64, to.1.round() as i64);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.put_pixel(x0, y0, color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    /// Draws `text` with its top-left corner at (`x`, `y`).
    pub fn draw_text(&mut self, x: i64, y: i64, text: &str, color: Rgba<u8>, scale: u32) {
        let scale = scale.max(1);
        for (i, c) in text.chars().enumerate() {
            let origin_x = x + (i as u32 * GLYPH_ADVANCE * scale) as i64;
            let glyph = glyphs::glyph(c);
            for row in 0..GLYPH_HEIGHT {
                for col in 0..GLYPH_WIDTH {
                    if !glyphs::is_set(glyph, col, row) {
                        continue;
                    }
                    for sy in 0..scale {
                        for sx in 0..scale {
                            self.put_pixel(
                                origin_x + (col * scale + sx) as i64,
                                y + (row * scale + sy) as i64,
                                color,
                            );
                        }
                    }
                }
            }
        }
    }
}
