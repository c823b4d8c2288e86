//! Conversation controller module.
//!
//! Interprets inbound commands, free-text messages, and menu
//! selections; mutates profile records; and renders transport-neutral
//! replies with optional inline menus.

mod event;
mod handler;
mod keyboard;
mod reply;
mod session;
mod text;

pub use event::{CallbackAction, Command, Event};
pub use handler::DialogueHandler;
pub use keyboard::{Button, Keyboard};
pub use reply::{OutMessage, Reply};
pub use session::SessionState;
pub use text::{is_valid_name, normalize_city_name};
