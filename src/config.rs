//! Tunables for the demo, gathered in one place.
//!
//! Defaults reproduce the stock scene. The native binary overrides a few of
//! them from the command line; logging is configured separately through
//! `RUST_LOG` and `RUST_LOG_FILE` (see [`crate::logging`]).

use glam::Vec3;

/// Sphere animation constants.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationConfig {
    /// Radius of the horizontal orbit.
    pub orbit_radius: f32,
    /// Angular velocity of the vertical bounce, relative to the orbit.
    pub bounce_frequency: f32,
    /// Resting height of the sphere's centre.
    pub bounce_offset: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            orbit_radius: 1.5,
            bounce_frequency: 3.0,
            bounce_offset: 0.5,
        }
    }
}

#[derive(Clone, Debug)]
pub struct DemoConfig {
    pub title: String,
    /// Initial surface size in physical pixels.
    pub width: u32,
    pub height: u32,
    /// CSS selector of the pre-existing canvas (web only).
    pub canvas_selector: String,
    /// Background colour, sRGB encoded.
    pub clear_color: [f64; 3],
    /// Edge length of each shadow map face.
    pub shadow_map_size: u32,
    pub camera_position: Vec3,
    pub damping_factor: f32,
    pub animation: AnimationConfig,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            title: "Shadow Lights".to_string(),
            width: 1280,
            height: 720,
            canvas_selector: "canvas.webgl".to_string(),
            // #2a2a2a
            clear_color: [42.0 / 255.0, 42.0 / 255.0, 42.0 / 255.0],
            shadow_map_size: 512,
            camera_position: Vec3::new(0.0, 2.0, 5.0),
            damping_factor: 0.05,
            animation: AnimationConfig::default(),
        }
    }
}

impl DemoConfig {
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width.max(1);
        self.height = height.max(1);
        self
    }

    pub fn with_shadow_map_size(mut self, size: u32) -> Self {
        self.shadow_map_size = size.clamp(64, 4096);
        self
    }

    /// Clear colour for an sRGB surface, which expects linear values.
    pub fn clear_wgpu_color(&self) -> wgpu::Color {
        let [r, g, b] = self.clear_color.map(srgb_to_linear);
        wgpu::Color { r, g, b, a: 1.0 }
    }
}

fn srgb_to_linear(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_stock_scene() {
        let config = DemoConfig::default();
        assert_eq!(config.canvas_selector, "canvas.webgl");
        assert_eq!(config.shadow_map_size, 512);
        assert_eq!(config.animation.orbit_radius, 1.5);
        assert_eq!(config.animation.bounce_frequency, 3.0);
        assert_eq!(config.animation.bounce_offset, 0.5);
    }

    #[test]
    fn test_builder_clamps() {
        let config = DemoConfig::default().with_size(0, 0).with_shadow_map_size(1);
        assert_eq!((config.width, config.height), (1, 1));
        assert_eq!(config.shadow_map_size, 64);
    }

    #[test]
    fn test_clear_color_is_linearised() {
        let color = DemoConfig::default().clear_wgpu_color();
        assert!((color.r - 0.0232).abs() < 1e-3);
        assert_eq!(color.r, color.g);
        assert_eq!(color.a, 1.0);
        assert_eq!(srgb_to_linear(1.0), 1.0);
    }
}
