//! Render settings shared by the live and export paths.

use crate::error::{RenderError, Result};
use image::Rgba;

const DEFAULT_WIDTH: u32 = 800;
const DEFAULT_HEIGHT: u32 = 600;
const DEFAULT_FPS: u32 = 10;
const DEFAULT_POINT_RADIUS: u32 = 5;
const MAX_DIMENSION: u32 = 8192;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub point_radius: u32,
    pub background: Rgba<u8>,
    pub foreground: Rgba<u8>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            fps: DEFAULT_FPS,
            point_radius: DEFAULT_POINT_RADIUS,
            background: Rgba([255, 255, 255, 255]),
            foreground: Rgba([40, 40, 40, 255]),
        }
    }
}

impl RenderSettings {
    /// Rejects settings no frame could be produced with.
    pub fn validate(&self) -> Result<()> {
        if self.fps == 0 {
            return Err(RenderError::Config("fps must be greater than zero".into()));
        }
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::Config(format!(
                "canvas size {}x{} has a zero dimension",
                self.width, self.height
            )));
        }
        if self.width > MAX_DIMENSION || self.height > MAX_DIMENSION {
            return Err(RenderError::Config(format!(
                "canvas size {}x{} exceeds {}",
                self.width, self.height, MAX_DIMENSION
            )));
        }
        if self.point_radius > MAX_DIMENSION {
            return Err(RenderError::Config(format!(
                "point radius {} exceeds {}",
                self.point_radius, MAX_DIMENSION
            )));
        }
        Ok(())
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Delay between frames in milliseconds, rounded to the nearest unit.
    pub fn frame_delay_ms(&self) -> u32 {
        ((1000.0 / self.fps.max(1) as f64).round() as u32).max(1)
    }
}
