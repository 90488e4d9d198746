use std::sync::Arc;

use clap::Parser;
use glam::Vec2;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

// Import from the library crate
use shadow_lights::{
    config::DemoConfig,
    controller::{input::native::window_event_to_input, Demo, FrameUpdater, TickStatus},
    error::{DemoError, Result},
    logging,
    model::SystemClock,
    ui,
    view::{GpuContext, Renderer},
};

#[derive(Parser, Debug, Clone)]
#[command(name = "shadow-lights")]
#[command(about = "Sphere orbiting over a plane, lit by three shadow-casting lights", long_about = None)]
struct Cli {
    /// Initial window width in logical pixels
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Initial window height in logical pixels
    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Edge length of each shadow map face
    #[arg(long = "shadow-map-size", default_value_t = 512)]
    shadow_map_size: u32,

    /// Exit after rendering this many frames
    #[arg(long)]
    frames: Option<u64>,
}

/// Window-bound state, created once the event loop resumes.
struct Running {
    window: Arc<Window>,
    renderer: Renderer,
    egui_state: egui_winit::State,
    egui_ctx: egui::Context,
}

struct App {
    config: DemoConfig,
    demo: Demo,
    updater: FrameUpdater<SystemClock>,
    running: Option<Running>,
    cursor: Vec2,
    result: Result<()>,
}

impl App {
    fn new(config: DemoConfig, frames: Option<u64>) -> Self {
        let demo = Demo::new(&config);
        let updater = FrameUpdater::new(SystemClock::start());
        let updater = match frames {
            Some(n) => updater.with_frame_budget(n),
            None => updater,
        };
        Self {
            config,
            demo,
            updater,
            running: None,
            cursor: Vec2::ZERO,
            result: Ok(()),
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<Running> {
        let attributes = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(self.config.width, self.config.height));
        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .map_err(|e| DemoError::Platform(e.to_string()))?,
        );

        let gpu = pollster::block_on(GpuContext::new_native(window.clone()))?;
        let renderer = Renderer::new(
            gpu,
            &self.demo.scene,
            self.config.shadow_map_size,
            self.config.clear_wgpu_color(),
        );

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );

        Ok(Running { window, renderer, egui_state, egui_ctx })
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(running) = self.running.as_mut() else {
            return;
        };

        let raw_input = running.egui_state.take_egui_input(&running.window);
        let (overlay, platform_output) = ui::run_ui(&running.egui_ctx, raw_input, &mut self.demo);
        running.egui_state.handle_platform_output(&running.window, platform_output);
        running.renderer.set_overlay(overlay);

        if self.updater.tick(&mut self.demo, &mut running.renderer) == TickStatus::Stopped {
            tracing::info!(frames = self.updater.frames(), "exiting");
            event_loop.exit();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }
        match self.start(event_loop) {
            Ok(running) => {
                let size = running.window.inner_size();
                self.running = Some(running);
                if let Some(running) = self.running.as_mut() {
                    self.demo.resize(size.width, size.height, &mut running.renderer);
                }
            }
            Err(e) => {
                tracing::error!("startup failed: {e}");
                self.result = Err(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(running) = self.running.as_mut() else {
            return;
        };

        // First let egui process the event
        let consumed = running.egui_state.on_window_event(&running.window, &event).consumed;

        match &event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                self.demo.resize(size.width, size.height, &mut running.renderer);
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Vec2::new(position.x as f32, position.y as f32);
            }
            _ => {}
        }

        // Button releases always reach the controls so a drag cannot get stuck
        let release = matches!(
            event,
            WindowEvent::MouseInput { state: winit::event::ElementState::Released, .. }
                | WindowEvent::Focused(false)
                | WindowEvent::CursorLeft { .. }
        );
        if consumed && !release && !self.demo.input.is_dragging() {
            return;
        }
        if let Some(input) = window_event_to_input(&event, self.cursor) {
            self.demo.handle_input(&input);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(running) = &self.running {
            running.window.request_redraw();
        }
    }
}

fn main() -> std::process::ExitCode {
    logging::init();
    let cli = Cli::parse();

    let config = DemoConfig::default()
        .with_size(cli.width, cli.height)
        .with_shadow_map_size(cli.shadow_map_size);

    match run(config, cli.frames) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            std::process::ExitCode::FAILURE
        }
    }
}

fn run(config: DemoConfig, frames: Option<u64>) -> Result<()> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config, frames);
    event_loop.run_app(&mut app)?;
    app.result
}
