//! Telegram transport binding.
//!
//! Maps Bot API updates onto conversation controller events and
//! renders replies back as messages with inline keyboards.

mod bot;

pub use bot::run;
