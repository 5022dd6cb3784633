use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::space::{CameraSpace, Light, WorldSpace};
use crate::uniforms::FrameUniform;

/// Look-at camera with a perspective projection in wgpu clip conventions
/// (right-handed, depth 0..1).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraParams {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraParams {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 2.0, 6.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_degrees: 60.0,
            aspect: 1.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl CameraParams {
    pub fn looking_at(position: Vec3, target: Vec3, aspect: f32) -> Self {
        Self {
            position,
            target,
            aspect,
            ..Self::default()
        }
    }

    pub fn view(&self) -> Mat4 {
        let forward = self.target - self.position;
        let target = if forward.length_squared() > f32::EPSILON {
            self.target
        } else {
            self.position + Vec3::NEG_Z
        };
        Mat4::look_at_rh(self.position, target, self.up)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_degrees.to_radians(),
            self.aspect.max(0.01),
            self.near,
            self.far,
        )
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection() * self.view()
    }

    pub fn frame_uniform(&self) -> FrameUniform {
        FrameUniform::new(self.view_proj())
    }

    /// The frame light as the camera-space pipeline consumes it.
    pub fn light_in_camera_space(&self, light: &Light<WorldSpace>) -> Light<CameraSpace> {
        light.to_camera(self.view())
    }
}
