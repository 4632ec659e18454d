pub mod commands;
pub mod controller;
pub mod input;
pub mod shortcuts;
pub mod store;

pub use commands::{Command, CommandStack};
pub use controller::{InputController, InputState};
pub use input::{InputEvent, Modifiers};
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use store::{Brush, MemoryStore};
