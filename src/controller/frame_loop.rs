use std::cell::Cell;
use std::rc::Rc;

use crate::controller::Demo;
use crate::model::Clock;
use crate::view::SceneRenderer;

/// Cancels a running frame loop. Clones share the same flag.
#[derive(Clone, Default, Debug)]
pub struct StopHandle(Rc<Cell<bool>>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.set(true);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.get()
    }
}

/// Whether the host should schedule another tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickStatus {
    Continue,
    Stopped,
}

/// Per-frame task: animate the sphere from the clock, advance the camera
/// controls and render. The host (requestAnimationFrame or a winit redraw)
/// calls [`FrameUpdater::tick`] once per display refresh until it reports
/// [`TickStatus::Stopped`].
pub struct FrameUpdater<C: Clock> {
    clock: C,
    stop: StopHandle,
    frames: u64,
    frame_budget: Option<u64>,
}

impl<C: Clock> FrameUpdater<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            stop: StopHandle::default(),
            frames: 0,
            frame_budget: None,
        }
    }

    /// Stop on its own after `frames` ticks.
    pub fn with_frame_budget(mut self, frames: u64) -> Self {
        self.frame_budget = Some(frames);
        self
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn tick<R: SceneRenderer + ?Sized>(&mut self, demo: &mut Demo, renderer: &mut R) -> TickStatus {
        if self.stop.is_stopped() {
            return TickStatus::Stopped;
        }

        let elapsed = self.clock.elapsed_secs();
        demo.animate(elapsed);
        demo.update_controls();

        if let Err(e) = renderer.render(&demo.scene, &demo.camera) {
            if e.is_fatal() {
                tracing::error!("render failed, stopping frame loop: {e}");
                self.stop.stop();
            } else {
                tracing::warn!("frame skipped: {e}");
            }
        }

        self.frames += 1;
        if self.frame_budget.is_some_and(|budget| self.frames >= budget) {
            tracing::info!(frames = self.frames, "frame budget reached");
            self.stop.stop();
        }

        if self.stop.is_stopped() {
            TickStatus::Stopped
        } else {
            TickStatus::Continue
        }
    }

    /// Drive ticks back to back until the loop stops. Only terminates if a
    /// frame budget is set or something calls the stop handle.
    pub fn run<R: SceneRenderer + ?Sized>(&mut self, demo: &mut Demo, renderer: &mut R) -> u64 {
        while self.tick(demo, renderer) == TickStatus::Continue {}
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DemoConfig;
    use crate::error::DemoError;
    use crate::model::ManualClock;
    use crate::view::RecordingRenderer;
    use glam::Vec3;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_tick_animates_and_renders_once() {
        let mut demo = Demo::new(&DemoConfig::default());
        let mut renderer = RecordingRenderer::default();
        let mut updater = FrameUpdater::new(ManualClock::at(FRAC_PI_2));

        assert_eq!(updater.tick(&mut demo, &mut renderer), TickStatus::Continue);
        assert_eq!(renderer.renders, 1);
        let rendered = renderer.last_sphere.expect("sphere position recorded");
        assert!((rendered - Vec3::new(0.0, 1.5, 1.5)).length() < 1e-5);
    }

    #[test]
    fn test_frame_budget_bounds_the_loop() {
        let mut demo = Demo::new(&DemoConfig::default());
        let mut renderer = RecordingRenderer::default();
        let mut updater = FrameUpdater::new(ManualClock::default()).with_frame_budget(5);

        assert_eq!(updater.run(&mut demo, &mut renderer), 5);
        assert_eq!(renderer.renders, 5);
        assert_eq!(updater.tick(&mut demo, &mut renderer), TickStatus::Stopped);
        assert_eq!(renderer.renders, 5);
    }

    #[test]
    fn test_stop_handle_cancels_before_next_tick() {
        let mut demo = Demo::new(&DemoConfig::default());
        let mut renderer = RecordingRenderer::default();
        let mut updater = FrameUpdater::new(ManualClock::default());
        let stop = updater.stop_handle();

        for _ in 0..3 {
            updater.clock().advance(1.0 / 60.0);
            assert_eq!(updater.tick(&mut demo, &mut renderer), TickStatus::Continue);
        }
        stop.stop();
        assert_eq!(updater.tick(&mut demo, &mut renderer), TickStatus::Stopped);
        assert_eq!(renderer.renders, 3);
        assert_eq!(updater.frames(), 3);
    }

    #[test]
    fn test_sphere_follows_clock_between_ticks() {
        let mut demo = Demo::new(&DemoConfig::default());
        let mut renderer = RecordingRenderer::default();
        let mut updater = FrameUpdater::new(ManualClock::default());

        updater.tick(&mut demo, &mut renderer);
        assert!((demo.scene.sphere.position - Vec3::new(1.5, 0.5, 0.0)).length() < 1e-5);
        updater.clock().set(std::f32::consts::PI);
        updater.tick(&mut demo, &mut renderer);
        assert!((demo.scene.sphere.position - Vec3::new(-1.5, 0.5, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_fatal_render_error_stops_loop() {
        let mut demo = Demo::new(&DemoConfig::default());
        let mut renderer = RecordingRenderer {
            fail_with: Some(|| DemoError::Surface(wgpu::SurfaceError::OutOfMemory)),
            ..Default::default()
        };
        let mut updater = FrameUpdater::new(ManualClock::default());
        assert_eq!(updater.tick(&mut demo, &mut renderer), TickStatus::Stopped);
    }

    #[test]
    fn test_transient_render_error_keeps_running() {
        let mut demo = Demo::new(&DemoConfig::default());
        let mut renderer = RecordingRenderer {
            fail_with: Some(|| DemoError::Surface(wgpu::SurfaceError::Timeout)),
            ..Default::default()
        };
        let mut updater = FrameUpdater::new(ManualClock::default());
        assert_eq!(updater.tick(&mut demo, &mut renderer), TickStatus::Continue);
        assert_eq!(updater.frames(), 1);
    }
}
