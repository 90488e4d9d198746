use std::f32::consts::PI;

use glam::{Mat4, Quat, Vec3};

use crate::model::Lights;
use crate::utils::{hex_color, Mesh};

/// Shape a node is drawn with. Meshes are built once when the renderer
/// uploads the scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Geometry {
    Sphere { radius: f32, width_segments: u32, height_segments: u32 },
    Plane { width: f32, height: f32 },
}

impl Geometry {
    pub fn build(&self) -> Mesh {
        match *self {
            Geometry::Sphere { radius, width_segments, height_segments } => {
                Mesh::sphere(radius, width_segments, height_segments)
            }
            Geometry::Plane { width, height } => Mesh::plane(width, height),
        }
    }
}

/// Standard (metal/rough) surface description shared by all nodes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub color: [f32; 3],
    pub roughness: f32,
    pub metalness: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: hex_color("#ffffff").unwrap_or([1.0; 3]),
            roughness: 0.4,
            metalness: 0.3,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Node {
    pub position: Vec3,
    pub rotation: Quat,
    pub geometry: Geometry,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl Node {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            geometry,
            cast_shadow: false,
            receive_shadow: false,
        }
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position)
    }
}

/// Everything that gets drawn: the animated sphere, the ground and the lights.
pub struct Scene {
    pub sphere: Node,
    pub plane: Node,
    pub material: Material,
    pub lights: Lights,
}

impl Scene {
    pub fn new() -> Self {
        let mut sphere = Node::new(Geometry::Sphere { radius: 0.5, width_segments: 32, height_segments: 32 });
        sphere.position.y = 0.5;
        sphere.cast_shadow = true;

        // plane geometry is authored in XY, lay it flat on the ground
        let mut plane = Node::new(Geometry::Plane { width: 8.0, height: 8.0 });
        plane.rotation = Quat::from_rotation_x(-PI * 0.5);
        plane.receive_shadow = true;

        Self {
            sphere,
            plane,
            material: Material::default(),
            lights: Lights::default(),
        }
    }

    pub fn nodes(&self) -> [&Node; 2] {
        [&self.sphere, &self.plane]
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
