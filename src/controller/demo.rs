use glam::Vec3;

use crate::config::{AnimationConfig, DemoConfig};
use crate::controller::params::{self, LightSettings};
use crate::controller::{InputEvent, InputState, OrbitControls};
use crate::model::{Camera, LightKind, Scene};
use crate::view::SceneRenderer;

/// Position of the sphere's centre `t` seconds after start: a circle of
/// `orbit_radius` in the XZ plane at 1 rad/s, with a rectified sine bounce.
pub fn sphere_position(t: f32, animation: &AnimationConfig) -> Vec3 {
    Vec3::new(
        t.cos() * animation.orbit_radius,
        (t * animation.bounce_frequency).sin().abs() + animation.bounce_offset,
        t.sin() * animation.orbit_radius,
    )
}

/// All mutable demo state, shared by the frame updater, the resize handler
/// and the parameter panel.
pub struct Demo {
    pub scene: Scene,
    pub camera: Camera,
    pub controls: OrbitControls,
    pub settings: LightSettings,
    pub input: InputState,
    pub animation: AnimationConfig,
    width: u32,
    height: u32,
}

impl Demo {
    pub fn new(config: &DemoConfig) -> Self {
        let scene = Scene::new();
        let mut camera = Camera::new(config.width, config.height);
        camera.eye = config.camera_position;
        camera.set_look_at(Vec3::ZERO);

        let controls = OrbitControls::new(Vec3::ZERO).with_damping(config.damping_factor);
        let settings = LightSettings::from_lights(&scene.lights);

        Self {
            scene,
            camera,
            controls,
            settings,
            input: InputState::new(),
            animation: config.animation,
            width: config.width.max(1),
            height: config.height.max(1),
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Move the sphere to where it should be at elapsed time `t`.
    pub fn animate(&mut self, t: f32) {
        self.scene.sphere.position = sphere_position(t, &self.animation);
    }

    /// Apply pointer input gathered since the last frame, then let the orbit
    /// controls advance (damping keeps moving the camera without input).
    pub fn update_controls(&mut self) -> bool {
        self.controls.handle_input(&mut self.input, &self.camera, self.height as f32);
        self.controls.update(&mut self.camera)
    }

    pub fn handle_input(&mut self, event: &InputEvent) {
        self.input.process_event(event);
    }

    /// Parameter panel callback: one light's intensity changed.
    pub fn set_light_intensity(&mut self, kind: LightKind, value: f32) {
        params::set_intensity(&mut self.scene.lights, kind, value);
        *self.settings.value_mut(kind) = self.scene.lights.intensity(kind);
    }

    /// Viewport resize: camera aspect and projection, then the render surface.
    /// Zero sized viewports (minimised windows) are ignored.
    pub fn resize<R: SceneRenderer + ?Sized>(&mut self, width: u32, height: u32, renderer: &mut R) {
        if width == 0 || height == 0 {
            tracing::debug!(width, height, "ignoring empty viewport");
            return;
        }
        self.width = width;
        self.height = height;
        self.camera.set_aspect(width, height);
        self.camera.update_projection();
        renderer.set_size(width, height);
        tracing::debug!(width, height, "viewport resized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::RecordingRenderer;
    use std::f32::consts::{FRAC_PI_2, PI, TAU};

    const TOL: f32 = 1e-5;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < TOL
    }

    #[test]
    fn test_known_positions() {
        let anim = AnimationConfig::default();
        assert!(close(sphere_position(0.0, &anim), Vec3::new(1.5, 0.5, 0.0)));
        assert!(close(sphere_position(FRAC_PI_2, &anim), Vec3::new(0.0, 1.5, 1.5)));
    }

    #[test]
    fn test_orbit_radius_and_resting_height() {
        let anim = AnimationConfig::default();
        for i in 0..2000 {
            let t = i as f32 * 0.0173;
            let p = sphere_position(t, &anim);
            assert!((p.x * p.x + p.z * p.z - 2.25).abs() < 1e-4, "t = {t}");
            assert!(p.y >= 0.5 && p.y <= 1.5, "t = {t}");
        }
    }

    #[test]
    fn test_periodicity() {
        let anim = AnimationConfig::default();
        for i in 0..50 {
            let t = i as f32 * 0.37;
            let (a, b) = (sphere_position(t, &anim), sphere_position(t + TAU, &anim));
            assert!((a.x - b.x).abs() < 1e-4 && (a.z - b.z).abs() < 1e-4);
            let c = sphere_position(t + TAU / 3.0, &anim);
            assert!((a.y - c.y).abs() < 1e-4);
        }
    }

    #[test]
    fn test_animate_moves_only_sphere() {
        let mut demo = Demo::new(&DemoConfig::default());
        let plane_before = demo.scene.plane.position;
        demo.animate(PI);
        assert!(close(demo.scene.sphere.position, Vec3::new(-1.5, 0.5, 0.0)));
        assert_eq!(demo.scene.plane.position, plane_before);
    }

    #[test]
    fn test_resize_updates_camera_and_surface() {
        let mut demo = Demo::new(&DemoConfig::default());
        let mut renderer = RecordingRenderer::default();
        demo.resize(1024, 512, &mut renderer);
        assert_eq!(demo.camera.aspect, 2.0);
        assert_eq!(renderer.size, Some((1024, 512)));
        assert_eq!(demo.size(), (1024, 512));

        // idempotent
        let projection = demo.camera.projection();
        demo.resize(1024, 512, &mut renderer);
        assert_eq!(demo.camera.projection(), projection);
        assert_eq!(renderer.size, Some((1024, 512)));
    }

    #[test]
    fn test_resize_ignores_empty_viewport() {
        let mut demo = Demo::new(&DemoConfig::default());
        let mut renderer = RecordingRenderer::default();
        demo.resize(0, 300, &mut renderer);
        assert_eq!(renderer.size, None);
        assert_eq!(demo.size(), (1280, 720));
    }

    #[test]
    fn test_slider_change_sets_light_and_settings() {
        let mut demo = Demo::new(&DemoConfig::default());
        demo.set_light_intensity(LightKind::Directional, 1.5);
        assert_eq!(demo.scene.lights.directional.intensity, 1.5);
        assert_eq!(demo.settings.dir_intensity, 1.5);
        assert_eq!(demo.scene.lights.spot.intensity, 0.4);
        assert_eq!(demo.scene.lights.point.intensity, 0.3);
    }

    #[test]
    fn test_controls_start_at_configured_camera() {
        let mut demo = Demo::new(&DemoConfig::default());
        assert!(!demo.update_controls());
        assert!(close(demo.camera.eye, Vec3::new(0.0, 2.0, 5.0)));
    }
}
