//! Editing side of the FC canvas: pointer gestures, keyboard shortcuts and
//! the [`Engine`] facade hosts embed.

pub mod engine;
pub mod input;
pub mod interaction;
pub mod shortcuts;

pub use engine::{Callbacks, Engine};
pub use input::{InputEvent, Modifiers};
pub use interaction::{Effect, Gesture, GestureState};
pub use shortcuts::{ShortcutAction, ShortcutMap};
