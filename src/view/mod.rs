// VIEW: Rendering and graphics
pub mod render;
pub mod gpu_init;

pub use render::{Renderer, UiOverlay};
pub use gpu_init::GpuContext;

use crate::error::Result;
use crate::model::{Camera, Scene};

/// What the frame loop and the resize handler need from a renderer.
pub trait SceneRenderer {
    /// Draw `scene` as seen from `camera`.
    fn render(&mut self, scene: &Scene, camera: &Camera) -> Result<()>;

    /// Resize the output surface, in physical pixels.
    fn set_size(&mut self, width: u32, height: u32);
}

/// Renderer stand-in that records what it was asked to do.
#[cfg(test)]
#[derive(Default)]
pub struct RecordingRenderer {
    pub renders: u64,
    pub size: Option<(u32, u32)>,
    pub last_sphere: Option<glam::Vec3>,
    pub fail_with: Option<fn() -> crate::error::DemoError>,
}

#[cfg(test)]
impl SceneRenderer for RecordingRenderer {
    fn render(&mut self, scene: &Scene, _camera: &Camera) -> Result<()> {
        if let Some(make_error) = self.fail_with {
            return Err(make_error());
        }
        self.renders += 1;
        self.last_sphere = Some(scene.sphere.position);
        Ok(())
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.size = Some((width, height));
    }
}
