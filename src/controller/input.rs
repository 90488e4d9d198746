/// Platform-agnostic pointer input feeding the orbit controls
use glam::Vec2;

/// Platform-independent input events
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerMoved { x: f32, y: f32 },
    PointerButton { button: MouseButton, pressed: bool, x: f32, y: f32 },
    Wheel { delta_y: f32 },
    FocusLost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    pub fn from_web_button(button: i16) -> Self {
        match button {
            1 => MouseButton::Middle,
            2 => MouseButton::Right,
            _ => MouseButton::Left,
        }
    }
}

/// What a pointer drag does to the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragAction {
    Rotate,
    Pan,
}

/// Accumulated pointer state between two control updates.
#[derive(Default)]
pub struct InputState {
    pub pointer: Option<Vec2>,
    pub drag: Option<DragAction>,
    rotate_delta: Vec2,
    pan_delta: Vec2,
    wheel_delta: f32,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process an input event and update state
    pub fn process_event(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::PointerMoved { x, y } => {
                let pos = Vec2::new(x, y);
                if let (Some(prev), Some(action)) = (self.pointer, self.drag) {
                    match action {
                        DragAction::Rotate => self.rotate_delta += pos - prev,
                        DragAction::Pan => self.pan_delta += pos - prev,
                    }
                }
                self.pointer = Some(pos);
            }
            InputEvent::PointerButton { button, pressed, x, y } => {
                self.pointer = Some(Vec2::new(x, y));
                if pressed {
                    self.drag = match button {
                        MouseButton::Left => Some(DragAction::Rotate),
                        MouseButton::Right | MouseButton::Middle => Some(DragAction::Pan),
                    };
                } else {
                    self.drag = None;
                }
            }
            InputEvent::Wheel { delta_y } => {
                self.wheel_delta += delta_y;
            }
            InputEvent::FocusLost => {
                self.drag = None;
            }
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Returns (rotate, pan, wheel) accumulated since the last call and resets them.
    pub fn consume(&mut self) -> (Vec2, Vec2, f32) {
        let out = (self.rotate_delta, self.pan_delta, self.wheel_delta);
        self.rotate_delta = Vec2::ZERO;
        self.pan_delta = Vec2::ZERO;
        self.wheel_delta = 0.0;
        out
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub mod native {
    use super::*;
    use winit::event::{MouseScrollDelta, WindowEvent};

    /// Pixels per wheel "line", roughly what browsers report.
    const LINE_HEIGHT: f32 = 100.0;

    /// Convert a winit window event; `cursor` is the last known pointer position.
    pub fn window_event_to_input(event: &WindowEvent, cursor: Vec2) -> Option<InputEvent> {
        match event {
            WindowEvent::CursorMoved { position, .. } => Some(InputEvent::PointerMoved {
                x: position.x as f32,
                y: position.y as f32,
            }),
            WindowEvent::MouseInput { state, button, .. } => {
                let button = match button {
                    winit::event::MouseButton::Left => MouseButton::Left,
                    winit::event::MouseButton::Right => MouseButton::Right,
                    winit::event::MouseButton::Middle => MouseButton::Middle,
                    _ => return None,
                };
                Some(InputEvent::PointerButton {
                    button,
                    pressed: state.is_pressed(),
                    x: cursor.x,
                    y: cursor.y,
                })
            }
            // winit reports positive y when scrolling away from the user,
            // browsers report the opposite
            WindowEvent::MouseWheel { delta, .. } => Some(InputEvent::Wheel {
                delta_y: match delta {
                    MouseScrollDelta::LineDelta(_, y) => -y * LINE_HEIGHT,
                    MouseScrollDelta::PixelDelta(p) => -p.y as f32,
                },
            }),
            WindowEvent::Focused(false) | WindowEvent::CursorLeft { .. } => Some(InputEvent::FocusLost),
            _ => None,
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub mod wasm {
    use super::*;
    use web_sys::{MouseEvent, WheelEvent};

    /// `scale` converts CSS pixels to physical pixels.
    pub fn mouse_move_to_input(e: &MouseEvent, scale: f32) -> InputEvent {
        InputEvent::PointerMoved {
            x: e.client_x() as f32 * scale,
            y: e.client_y() as f32 * scale,
        }
    }

    pub fn mouse_click_to_input(e: &MouseEvent, pressed: bool, scale: f32) -> InputEvent {
        InputEvent::PointerButton {
            button: MouseButton::from_web_button(e.button()),
            pressed,
            x: e.client_x() as f32 * scale,
            y: e.client_y() as f32 * scale,
        }
    }

    pub fn mouse_wheel_to_input(e: &WheelEvent) -> InputEvent {
        InputEvent::Wheel { delta_y: e.delta_y() as f32 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_left_drag_accumulates_rotation() {
        let mut input = InputState::new();
        input.process_event(&InputEvent::PointerButton { button: MouseButton::Left, pressed: true, x: 10.0, y: 10.0 });
        input.process_event(&InputEvent::PointerMoved { x: 15.0, y: 8.0 });
        input.process_event(&InputEvent::PointerMoved { x: 20.0, y: 8.0 });
        let (rotate, pan, wheel) = input.consume();
        assert_eq!(rotate, Vec2::new(10.0, -2.0));
        assert_eq!(pan, Vec2::ZERO);
        assert_eq!(wheel, 0.0);
        assert_eq!(input.consume().0, Vec2::ZERO);
    }

    #[test]
    fn test_right_drag_pans_and_release_stops() {
        let mut input = InputState::new();
        input.process_event(&InputEvent::PointerButton { button: MouseButton::Right, pressed: true, x: 0.0, y: 0.0 });
        input.process_event(&InputEvent::PointerMoved { x: 3.0, y: 4.0 });
        input.process_event(&InputEvent::PointerButton { button: MouseButton::Right, pressed: false, x: 3.0, y: 4.0 });
        input.process_event(&InputEvent::PointerMoved { x: 30.0, y: 40.0 });
        let (rotate, pan, _) = input.consume();
        assert_eq!(rotate, Vec2::ZERO);
        assert_eq!(pan, Vec2::new(3.0, 4.0));
    }

    #[test]
    fn test_hover_without_button_does_nothing() {
        let mut input = InputState::new();
        input.process_event(&InputEvent::PointerMoved { x: 1.0, y: 1.0 });
        input.process_event(&InputEvent::PointerMoved { x: 50.0, y: 9.0 });
        input.process_event(&InputEvent::Wheel { delta_y: -120.0 });
        let (rotate, pan, wheel) = input.consume();
        assert_eq!((rotate, pan), (Vec2::ZERO, Vec2::ZERO));
        assert_eq!(wheel, -120.0);
    }

    #[test]
    fn test_focus_loss_ends_drag() {
        let mut input = InputState::new();
        input.process_event(&InputEvent::PointerButton { button: MouseButton::Left, pressed: true, x: 0.0, y: 0.0 });
        input.process_event(&InputEvent::FocusLost);
        assert!(!input.is_dragging());
    }

    #[test]
    fn test_web_button_mapping() {
        assert_eq!(MouseButton::from_web_button(0), MouseButton::Left);
        assert_eq!(MouseButton::from_web_button(1), MouseButton::Middle);
        assert_eq!(MouseButton::from_web_button(2), MouseButton::Right);
    }
}
