use egui::Context;

use crate::controller::params::{INTENSITY_RANGE, INTENSITY_STEP};
use crate::controller::{Demo, InputEvent, MouseButton};
use crate::model::LightKind;
use crate::view::UiOverlay;

pub const PANEL_WIDTH: f32 = 300.0;

/// Floating parameter panel: one folder with a slider per light.
/// A moved slider updates the light in the same frame. Returns the slider
/// responses, empty while the folder is closed.
pub fn draw_panel(ctx: &Context, demo: &mut Demo) -> Vec<(LightKind, egui::Response)> {
    egui::Window::new("Parameters")
        .title_bar(false)
        .resizable(false)
        .anchor(egui::Align2::RIGHT_TOP, [-8.0, 8.0])
        .default_width(PANEL_WIDTH)
        .show(ctx, |ui| {
            ui.set_width(PANEL_WIDTH);
            egui::CollapsingHeader::new("Shadow Lights")
                .default_open(true)
                .show(ui, |ui| {
                    let mut sliders = Vec::with_capacity(LightKind::ALL.len());
                    for kind in LightKind::ALL {
                        let mut value = *demo.settings.value_mut(kind);
                        let slider = egui::Slider::new(&mut value, INTENSITY_RANGE)
                            .step_by(INTENSITY_STEP)
                            .text(kind.label());
                        let response = ui.add(slider);
                        if response.changed() {
                            demo.set_light_intensity(kind, value);
                        }
                        sliders.push((kind, response));
                    }
                    sliders
                })
                .body_returned
        })
        .and_then(|window| window.inner.flatten())
        .unwrap_or_default()
}

/// Run one egui pass and tessellate it for the renderer.
pub fn run_ui(ctx: &Context, raw_input: egui::RawInput, demo: &mut Demo) -> (UiOverlay, egui::PlatformOutput) {
    let output = ctx.run(raw_input, |ctx| {
        draw_panel(ctx, demo);
    });
    let primitives = ctx.tessellate(output.shapes, output.pixels_per_point);
    let overlay = UiOverlay {
        primitives,
        textures_delta: output.textures_delta,
        pixels_per_point: output.pixels_per_point,
    };
    (overlay, output.platform_output)
}

/// Whether the panel is under or holding the pointer, in which case the
/// orbit controls should not see the event.
pub fn wants_pointer(ctx: &Context) -> bool {
    ctx.is_pointer_over_area() || ctx.is_using_pointer()
}

/// egui input gathered by hand where no integration crate exists (the
/// browser). Positions arrive in physical pixels and are kept in points.
#[derive(Debug)]
pub struct UiInput {
    events: Vec<egui::Event>,
    pixels_per_point: f32,
}

impl UiInput {
    pub fn new(pixels_per_point: f32) -> Self {
        Self {
            events: Vec::new(),
            pixels_per_point: pixels_per_point.max(0.1),
        }
    }

    pub fn set_pixels_per_point(&mut self, pixels_per_point: f32) {
        self.pixels_per_point = pixels_per_point.max(0.1);
    }

    pub fn push(&mut self, event: &InputEvent) {
        let ppp = self.pixels_per_point;
        match *event {
            InputEvent::PointerMoved { x, y } => {
                self.events.push(egui::Event::PointerMoved(egui::pos2(x / ppp, y / ppp)));
            }
            InputEvent::PointerButton { button, pressed, x, y } => {
                let button = match button {
                    MouseButton::Left => egui::PointerButton::Primary,
                    MouseButton::Right => egui::PointerButton::Secondary,
                    MouseButton::Middle => egui::PointerButton::Middle,
                };
                self.events.push(egui::Event::PointerButton {
                    pos: egui::pos2(x / ppp, y / ppp),
                    button,
                    pressed,
                    modifiers: egui::Modifiers::NONE,
                });
            }
            // the panel does not scroll
            InputEvent::Wheel { .. } => {}
            InputEvent::FocusLost => self.events.push(egui::Event::PointerGone),
        }
    }

    /// Drain queued events into the input for the next egui pass over a
    /// `width` x `height` pixel surface.
    pub fn take_raw_input(&mut self, width: u32, height: u32, time: f64) -> egui::RawInput {
        let ppp = self.pixels_per_point;
        let mut raw_input = egui::RawInput {
            screen_rect: Some(egui::Rect::from_min_size(
                egui::Pos2::ZERO,
                egui::vec2(width as f32 / ppp, height as f32 / ppp),
            )),
            time: Some(time),
            events: std::mem::take(&mut self.events),
            ..Default::default()
        };
        raw_input
            .viewports
            .entry(egui::ViewportId::ROOT)
            .or_default()
            .native_pixels_per_point = Some(ppp);
        raw_input
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DemoConfig;

    #[test]
    fn test_ui_input_converts_to_points() {
        let mut input = UiInput::new(2.0);
        input.push(&InputEvent::PointerMoved { x: 200.0, y: 100.0 });
        input.push(&InputEvent::PointerButton { button: MouseButton::Right, pressed: true, x: 200.0, y: 100.0 });
        input.push(&InputEvent::Wheel { delta_y: 100.0 });

        let raw = input.take_raw_input(1280, 720, 1.5);
        assert_eq!(raw.events.len(), 2);
        assert_eq!(raw.events[0], egui::Event::PointerMoved(egui::pos2(100.0, 50.0)));
        assert!(matches!(
            raw.events[1],
            egui::Event::PointerButton { button: egui::PointerButton::Secondary, pressed: true, .. }
        ));
        let rect = raw.screen_rect.expect("screen rect set");
        assert_eq!(rect.size(), egui::vec2(640.0, 360.0));
        assert_eq!(raw.time, Some(1.5));

        assert!(input.take_raw_input(1280, 720, 1.6).events.is_empty());
    }

    #[test]
    fn test_panel_runs_headless_without_touching_lights() {
        let ctx = Context::default();
        let mut demo = Demo::new(&DemoConfig::default());
        let mut input = UiInput::new(1.0);

        for frame in 0..2 {
            let raw = input.take_raw_input(1280, 720, frame as f64 / 60.0);
            let (overlay, _) = run_ui(&ctx, raw, &mut demo);
            assert_eq!(overlay.pixels_per_point, 1.0);
        }
        assert_eq!(demo.scene.lights.directional.intensity, 0.4);
        assert_eq!(demo.scene.lights.spot.intensity, 0.4);
        assert_eq!(demo.scene.lights.point.intensity, 0.3);
        assert!(!wants_pointer(&ctx));
    }

    #[test]
    fn test_dragging_a_slider_sets_only_that_light() {
        let ctx = Context::default();
        let mut demo = Demo::new(&DemoConfig::default());
        let mut frame = 0u32;
        let mut run = |events: Vec<egui::Event>, demo: &mut Demo| {
            let raw = egui::RawInput {
                screen_rect: Some(egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(1280.0, 720.0))),
                time: Some(frame as f64 / 60.0),
                events,
                ..Default::default()
            };
            frame += 1;
            let mut sliders = Vec::new();
            let _ = ctx.run(raw, |ctx| sliders = draw_panel(ctx, demo));
            sliders
        };

        // let the window settle before reading widget rects
        let mut sliders = Vec::new();
        for _ in 0..3 {
            sliders = run(Vec::new(), &mut demo);
        }
        let (kind, spot) = &sliders[1];
        assert_eq!(*kind, LightKind::Spot);
        let target = egui::pos2(spot.rect.left() + 50.0, spot.rect.center().y);

        run(vec![egui::Event::PointerMoved(target)], &mut demo);
        let press = |pressed| egui::Event::PointerButton {
            pos: target,
            button: egui::PointerButton::Primary,
            pressed,
            modifiers: egui::Modifiers::NONE,
        };
        run(vec![press(true)], &mut demo);
        run(vec![press(false)], &mut demo);

        let spot = demo.scene.lights.spot.intensity;
        assert_ne!(spot, 0.4);
        assert!((0.0..=2.0).contains(&spot));
        assert_eq!(*demo.settings.value_mut(LightKind::Spot), spot);
        assert_eq!(demo.scene.lights.directional.intensity, 0.4);
        assert_eq!(demo.scene.lights.point.intensity, 0.3);
    }

    #[test]
    fn test_skipped_overlay_keeps_font_atlas() {
        let ctx = Context::default();
        let mut demo = Demo::new(&DemoConfig::default());
        let mut input = UiInput::new(1.0);

        let (first, _) = run_ui(&ctx, input.take_raw_input(1280, 720, 0.0), &mut demo);
        let (second, _) = run_ui(&ctx, input.take_raw_input(1280, 720, 1.0 / 60.0), &mut demo);
        assert!(first.textures_delta.set.iter().any(|(_, delta)| delta.is_whole()));

        let first_set = first.textures_delta.set.len();
        let second_set = second.textures_delta.set.len();
        let merged = second.merge_pending(Some(first));
        assert_eq!(merged.textures_delta.set.len(), first_set + second_set);
        let (id, delta) = &merged.textures_delta.set[0];
        assert_eq!(*id, egui::TextureId::default());
        assert!(delta.is_whole());

        let (third, _) = run_ui(&ctx, input.take_raw_input(1280, 720, 2.0 / 60.0), &mut demo);
        let third_set = third.textures_delta.set.len();
        assert_eq!(third.merge_pending(None).textures_delta.set.len(), third_set);
    }
}
