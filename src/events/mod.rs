//! Event handling for poli.
//!
//! Terminal key and mouse events are translated into store [`Action`]s
//! according to the configured key bindings and the current view.
//!
//! [`Action`]: crate::state::Action

mod handler;
mod input;

pub use handler::EventHandler;
pub use input::{InputEvent, Key, Modifiers};
