// MODEL: scene description and time
pub mod camera;
pub mod clock;
pub mod light;
pub mod scene;

pub use camera::Camera;
pub use clock::{Clock, ManualClock, SystemClock};
pub use light::{LightKind, Lights};
pub use scene::{Geometry, Material, Node, Scene};
