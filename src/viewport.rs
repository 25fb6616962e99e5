//! Fixed axis bounds for the whole animation.

use crate::error::{RenderError, Result};
use crate::loader::{Record, TrajectoryTable};
use glam::Vec3;

/// Axes narrower than this are treated as constant.
pub const DEGENERATE_TOLERANCE: f64 = 1e-9;
/// Half-width added around a constant axis.
pub const DEGENERATE_MARGIN: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisBounds {
    pub min: f64,
    pub max: f64,
}

impl AxisBounds {
    fn from_values(values: impl Iterator<Item = f64>) -> Option<Self> {
        values.fold(None, |bounds, v| match bounds {
            None => Some(Self { min: v, max: v }),
            Some(b) => Some(Self {
                min: b.min.min(v),
                max: b.max.max(v),
            }),
        })
    }

    fn corrected(self) -> Self {
        if self.extent() >= DEGENERATE_TOLERANCE {
            return self;
        }
        // Far from zero a unit margin is lost to rounding, so it grows with
        // the magnitude of the axis.
        let margin = DEGENERATE_MARGIN.max(self.center().abs() * f64::EPSILON * 4.0);
        Self {
            min: self.min - margin,
            max: self.max + margin,
        }
    }

    pub fn extent(&self) -> f64 {
        self.max - self.min
    }

    pub fn center(&self) -> f64 {
        (self.min + self.max) * 0.5
    }

    /// Maps `min..max` onto `-1..1`.
    pub fn normalize(&self, value: f64) -> f64 {
        (value - self.center()) / (self.extent() * 0.5)
    }
}

/// Per-axis bounds over every record of the table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: AxisBounds,
    pub y: AxisBounds,
    pub z: AxisBounds,
}

impl Viewport {
    pub fn from_table(table: &TrajectoryTable) -> Result<Self> {
        let records = table.records();
        let axis = |select: fn(&Record) -> f64| {
            AxisBounds::from_values(records.iter().map(select))
                .map(AxisBounds::corrected)
                .ok_or(RenderError::EmptyDataset)
        };

        let viewport = Self {
            x: axis(|r| r.x)?,
            y: axis(|r| r.y)?,
            z: axis(|r| r.z)?,
        };
        log::debug!("Viewport: {:?}", viewport);
        Ok(viewport)
    }

    pub fn axes(&self) -> [AxisBounds; 3] {
        [self.x, self.y, self.z]
    }

    pub fn center(&self) -> [f64; 3] {
        [self.x.center(), self.y.center(), self.z.center()]
    }

    pub fn extent(&self) -> [f64; 3] {
        [self.x.extent(), self.y.extent(), self.z.extent()]
    }

    /// Position inside the unit cube `[-1, 1]^3` the camera looks at.
    pub fn normalize(&self, point: [f64; 3]) -> Vec3 {
        Vec3::new(
            self.x.normalize(point[0]) as f32,
            self.y.normalize(point[1]) as f32,
            self.z.normalize(point[2]) as f32,
        )
    }
}
