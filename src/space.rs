use std::fmt;
use std::marker::PhantomData;

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Coordinate space a shading quantity is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpaceKind {
    World,
    Camera,
}

impl fmt::Display for SpaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpaceKind::World => f.write_str("world space"),
            SpaceKind::Camera => f.write_str("camera space"),
        }
    }
}

/// Type-level tag for a coordinate space.
pub trait Space: Copy + fmt::Debug + PartialEq + 'static {
    const KIND: SpaceKind;
}

/// World space: the space the model matrix maps into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WorldSpace;

/// Camera space: camera at the origin looking down -Z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CameraSpace;

impl Space for WorldSpace {
    const KIND: SpaceKind = SpaceKind::World;
}

impl Space for CameraSpace {
    const KIND: SpaceKind = SpaceKind::Camera;
}

/// A point whose coordinate space is part of its type.
///
/// The lit fragment stages only accept positions tagged with the space they
/// compute in, so a world-space light can never be compared against a
/// camera-space fragment without an explicit [`Position::to_camera`].
#[derive(Clone, Copy, PartialEq)]
pub struct Position<S: Space> {
    vec: Vec3,
    _space: PhantomData<S>,
}

impl<S: Space> Position<S> {
    pub const fn new(vec: Vec3) -> Self {
        Self {
            vec,
            _space: PhantomData,
        }
    }

    pub fn from_xyz(x: f32, y: f32, z: f32) -> Self {
        Self::new(Vec3::new(x, y, z))
    }

    pub const fn vec(&self) -> Vec3 {
        self.vec
    }

    pub const fn space(&self) -> SpaceKind {
        S::KIND
    }
}

impl Position<WorldSpace> {
    pub const ORIGIN: Self = Self::new(Vec3::ZERO);

    /// Moves a world-space point into camera space with the view matrix.
    pub fn to_camera(&self, view: Mat4) -> Position<CameraSpace> {
        Position::new(view.transform_point3(self.vec))
    }
}

impl<S: Space> fmt::Debug for Position<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Position")
            .field("space", &S::KIND)
            .field("x", &self.vec.x)
            .field("y", &self.vec.y)
            .field("z", &self.vec.z)
            .finish()
    }
}

/// The single point light of a frame, tagged with the space its position is in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light<S: Space> {
    pub position: Position<S>,
}

impl<S: Space> Light<S> {
    pub const fn new(position: Position<S>) -> Self {
        Self { position }
    }
}

impl Light<WorldSpace> {
    pub fn to_camera(&self, view: Mat4) -> Light<CameraSpace> {
        Light::new(self.position.to_camera(view))
    }
}

impl Default for Light<WorldSpace> {
    fn default() -> Self {
        Self::new(Position::ORIGIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_light_moves_into_camera_space() {
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
        let light = Light::<WorldSpace>::default().to_camera(view);
        assert_eq!(light.position.space(), SpaceKind::Camera);
        assert!((light.position.vec() - Vec3::new(0.0, 0.0, -5.0)).length() < 1e-5);
    }

    #[test]
    fn default_world_light_sits_at_origin() {
        let light = Light::<WorldSpace>::default();
        assert_eq!(light.position.vec(), Vec3::ZERO);
        assert_eq!(light.position.space(), SpaceKind::World);
    }
}
