//! Fixed orbit camera over the normalized viewport cube.
//!
//! Z-up coordinate system. The viewport maps data into `[-1, 1]^3` and the
//! camera looks at the cube center from a fixed azimuth and elevation, so
//! every frame of a run is projected identically.

use glam::{Mat4, Vec3, Vec4};

const DEFAULT_FOV_DEGREES: f32 = 35.0;
const DEFAULT_AZIMUTH_DEGREES: f32 = -60.0;
const DEFAULT_ELEVATION_DEGREES: f32 = 30.0;
const DEFAULT_RADIUS: f32 = 6.5;
const NEAR_PLANE: f32 = 0.1;
const FAR_PLANE: f32 = 100.0;
const UP_VECTOR: Vec3 = Vec3::Z;

/// A projected point in pixel coordinates; larger depth is farther away.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
    pub depth: f32,
}

pub struct Camera {
    target: Vec3,
    radius: f32,
    azimuth: f32,
    elevation: f32,
    width: u32,
    height: u32,
    view_projection_matrix: Mat4,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        let mut camera = Self {
            target: Vec3::ZERO,
            radius: DEFAULT_RADIUS,
            azimuth: DEFAULT_AZIMUTH_DEGREES.to_radians(),
            elevation: DEFAULT_ELEVATION_DEGREES.to_radians(),
            width,
            height,
            view_projection_matrix: Mat4::IDENTITY,
        };
        camera.update_matrices();
        camera
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.view_projection_matrix
    }

    pub fn eye_position(&self) -> Vec3 {
        let cos_elevation = self.elevation.cos();
        Vec3::new(
            self.target.x + self.radius * cos_elevation * self.azimuth.cos(),
            self.target.y + self.radius * cos_elevation * self.azimuth.sin(),
            self.target.z + self.radius * self.elevation.sin(),
        )
    }

    /// Projects a normalized-space point onto the canvas. Points behind the
    /// eye have no projection.
    pub fn project(&self, point: Vec3) -> Option<ScreenPoint> {
        let clip = self.view_projection_matrix * Vec4::new(point.x, point.y, point.z, 1.0);
        if clip.w <= f32::EPSILON {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        Some(ScreenPoint {
            x: (ndc.x + 1.0) * 0.5 * self.width as f32,
            y: (1.0 - ndc.y) * 0.5 * self.height as f32,
            depth: clip.w,
        })
    }

    fn update_matrices(&mut self) {
        let view = Mat4::look_at_rh(self.eye_position(), self.target, UP_VECTOR);
        let projection = Mat4::perspective_rh(
            DEFAULT_FOV_DEGREES.to_radians(),
            self.width as f32 / self.height.max(1) as f32,
            NEAR_PLANE,
            FAR_PLANE,
        );
        self.view_projection_matrix = projection * view;
    }
}
