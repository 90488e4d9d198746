use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

use crate::controller::InputState;
use crate::model::Camera;

const EPS: f32 = 1e-6;

/// Spherical coordinates with Y up: `theta` is the azimuth measured from +Z
/// towards +X, `phi` the polar angle from +Y.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Spherical {
    radius: f32,
    theta: f32,
    phi: f32,
}

impl Spherical {
    fn from_offset(v: Vec3) -> Self {
        let radius = v.length();
        if radius < EPS {
            return Self::default();
        }
        Self {
            radius,
            theta: v.x.atan2(v.z),
            phi: (v.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    fn to_offset(self) -> Vec3 {
        let sin_phi = self.phi.sin();
        Vec3::new(
            self.radius * sin_phi * self.theta.sin(),
            self.radius * self.phi.cos(),
            self.radius * sin_phi * self.theta.cos(),
        )
    }
}

/// Camera controller that orbits, dollies and pans around a target point.
///
/// Pointer input only accumulates deltas; [`OrbitControls::update`] applies
/// them once per frame. With damping enabled each update applies a fraction
/// of the outstanding rotation and pan, so the camera keeps gliding after the
/// pointer is released.
#[derive(Clone, Debug)]
pub struct OrbitControls {
    pub target: Vec3,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    spherical_delta: Spherical,
    scale: f32,
    pan_offset: Vec3,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            enable_damping: false,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
            spherical_delta: Spherical::default(),
            scale: 1.0,
            pan_offset: Vec3::ZERO,
        }
    }
}

impl OrbitControls {
    pub fn new(target: Vec3) -> Self {
        Self { target, ..Self::default() }
    }

    pub fn with_damping(mut self, factor: f32) -> Self {
        self.enable_damping = true;
        self.damping_factor = factor.clamp(0.0, 1.0);
        self
    }

    pub fn rotate_left(&mut self, angle: f32) {
        self.spherical_delta.theta -= angle;
    }

    pub fn rotate_up(&mut self, angle: f32) {
        self.spherical_delta.phi -= angle;
    }

    /// Scale the orbit radius; values below 1 move the camera closer.
    pub fn dolly(&mut self, factor: f32) {
        if factor > 0.0 {
            self.scale *= factor;
        }
    }

    /// Pan by a pointer delta in pixels, keeping the point under the cursor
    /// fixed at the target's depth.
    pub fn pan(&mut self, delta: Vec2, camera: &Camera, viewport_height: f32) {
        let height = viewport_height.max(1.0);
        let target_distance = (camera.eye - self.target).length() * (camera.fov_y / 2.0).tan();

        let forward = camera.forward();
        let right = forward.cross(camera.up).try_normalize().unwrap_or(Vec3::X);
        let up = right.cross(forward);

        self.pan_offset -= right * (2.0 * delta.x * target_distance / height) * self.pan_speed;
        self.pan_offset += up * (2.0 * delta.y * target_distance / height) * self.pan_speed;
    }

    /// Feed pointer deltas accumulated in `input` since the last frame.
    pub fn handle_input(&mut self, input: &mut InputState, camera: &Camera, viewport_height: f32) {
        let (rotate, pan, wheel) = input.consume();
        let height = viewport_height.max(1.0);

        if rotate != Vec2::ZERO {
            self.rotate_left(TAU * rotate.x / height * self.rotate_speed);
            self.rotate_up(TAU * rotate.y / height * self.rotate_speed);
        }
        if pan != Vec2::ZERO {
            self.pan(pan, camera, height);
        }
        if wheel != 0.0 {
            // negative delta scrolls towards the user and zooms in
            self.dolly(0.95f32.powf(-self.zoom_speed * wheel * 0.01));
        }
    }

    /// Apply outstanding motion to `camera`. Returns whether the camera moved.
    pub fn update(&mut self, camera: &mut Camera) -> bool {
        let mut spherical = Spherical::from_offset(camera.eye - self.target);
        let step = if self.enable_damping { self.damping_factor } else { 1.0 };

        spherical.theta += self.spherical_delta.theta * step;
        spherical.phi += self.spherical_delta.phi * step;
        spherical.phi = spherical
            .phi
            .clamp(self.min_polar_angle, self.max_polar_angle)
            .clamp(EPS, PI - EPS);
        spherical.radius = (spherical.radius * self.scale).clamp(self.min_distance, self.max_distance);

        self.target += self.pan_offset * step;

        let new_eye = self.target + spherical.to_offset();
        let moved = new_eye.distance_squared(camera.eye) > EPS || camera.target != self.target;
        camera.eye = new_eye;
        camera.set_look_at(self.target);

        if self.enable_damping {
            let decay = 1.0 - self.damping_factor;
            self.spherical_delta.theta *= decay;
            self.spherical_delta.phi *= decay;
            self.pan_offset *= decay;
        } else {
            self.spherical_delta = Spherical::default();
            self.pan_offset = Vec3::ZERO;
        }
        self.scale = 1.0;

        moved
    }
}
