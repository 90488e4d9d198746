// CONTROLLER: input, camera controls, parameter handlers and the frame loop
pub mod input;
pub mod orbit_controls;
pub mod params;
pub mod demo;
pub mod frame_loop;

pub use input::{InputEvent, InputState, MouseButton};
pub use orbit_controls::OrbitControls;
pub use params::LightSettings;
pub use demo::{sphere_position, Demo};
pub use frame_loop::{FrameUpdater, StopHandle, TickStatus};
