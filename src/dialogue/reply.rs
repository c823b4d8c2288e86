//! Transport-neutral reply types.

use super::keyboard::Keyboard;

/// A single outbound message: text with an optional inline menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutMessage {
    /// Reply text.
    pub text: String,

    /// Inline menu attached to the message, if any.
    pub keyboard: Option<Keyboard>,
}

impl OutMessage {
    /// Creates a plain text message.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
        }
    }

    /// Creates a message with an inline menu.
    #[must_use]
    pub fn with_menu(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Self {
            text: text.into(),
            keyboard: Some(keyboard),
        }
    }
}

/// One or more outbound messages produced by a single handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Messages in send order.
    pub messages: Vec<OutMessage>,
}

impl Reply {
    /// A reply consisting of one plain text message.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            messages: vec![OutMessage::text(text)],
        }
    }

    /// A reply consisting of one message with an inline menu.
    #[must_use]
    pub fn with_menu(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Self {
            messages: vec![OutMessage::with_menu(text, keyboard)],
        }
    }

    /// Appends a follow-up message.
    #[must_use]
    pub fn and(mut self, message: OutMessage) -> Self {
        self.messages.push(message);
        self
    }

    /// Returns the first message, if any.
    #[must_use]
    pub fn first(&self) -> Option<&OutMessage> {
        self.messages.first()
    }
}
