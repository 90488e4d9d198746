//! Error types for the demo.

use thiserror::Error;

/// Failures that can happen while bringing up the window, surface or GPU.
///
/// Per-frame computation (animation, light setters, resize) never fails;
/// everything here comes from the platform or the graphics backend.
#[derive(Error, Debug)]
pub enum DemoError {
    /// The render surface could not be created for the window or canvas
    #[error("surface creation failed: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    /// No adapter compatible with the surface
    #[error("no suitable GPU adapter: {0}")]
    RequestAdapter(#[from] wgpu::RequestAdapterError),

    /// Device request rejected by the adapter
    #[error("device request failed: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    /// Surface reports no usable texture format
    #[error("surface has no supported formats")]
    NoSurfaceFormat,

    /// Acquiring the next frame from the surface failed
    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),

    /// The page has no element matching the canvas selector
    #[error("no canvas matches selector `{0}`")]
    CanvasNotFound(String),

    /// The native event loop could not be created or exited abnormally
    #[cfg(not(target_arch = "wasm32"))]
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    /// Host environment (browser globals, window creation) unavailable
    #[error("platform error: {0}")]
    Platform(String),
}

impl DemoError {
    /// Errors after which no further frame can be drawn.
    pub fn is_fatal(&self) -> bool {
        matches!(self, DemoError::Surface(wgpu::SurfaceError::OutOfMemory))
    }
}

/// Result type alias using [`DemoError`].
pub type Result<T> = std::result::Result<T, DemoError>;
