pub mod canvas;
pub mod input;
pub mod session;
pub mod shortcuts;
pub mod tools;

pub use canvas::{CanvasModel, ObjectMutation};
pub use input::InputEvent;
pub use session::{EventResult, LayoutSession, SessionOptions};
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use tools::{Interaction, InteractionPhase, Placement};
