//! Inbound event types and parsing.

use std::fmt;

/// Slash commands recognized by the bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `/start` — greet and show the main menu.
    Start,

    /// `/profile` — show the profile card.
    Profile,
}

impl Command {
    /// Parses a slash command from message text.
    ///
    /// Accepts an optional `@botname` suffix and ignores trailing
    /// arguments. Returns `None` if the text is not a known command.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let first = text.trim().split_whitespace().next()?;
        let name = first.strip_prefix('/')?;
        let name = name.split('@').next().unwrap_or(name);

        match name.to_lowercase().as_str() {
            "start" => Some(Self::Start),
            "profile" => Some(Self::Profile),
            _ => None,
        }
    }
}

/// Menu actions carried in callback payloads, encoded as `action` or
/// `action:argument` tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    /// Show the profile card.
    Profile,

    /// Return to the main menu.
    Back,

    /// Prompt for a new display name.
    ChangeName,

    /// Render the query history.
    SendHistory,

    /// Show the first-letter picker.
    ShowLetters,

    /// Show cities starting with the letter.
    Letter(String),

    /// Pin the selected city.
    City(String),

    /// Pin the city from an "add as my city" button.
    AddCity(String),

    /// Weather shortcut for the pinned city.
    Weather(String),
}

impl CallbackAction {
    /// Parses a callback payload.
    ///
    /// Returns `None` for unknown actions or missing arguments, so
    /// stale buttons from older bot versions are ignored rather than
    /// misrouted.
    #[must_use]
    pub fn parse(data: &str) -> Option<Self> {
        let (action, argument) = match data.split_once(':') {
            Some((action, argument)) => (action, Some(argument)),
            None => (data, None),
        };

        match (action, argument) {
            ("profile", None) => Some(Self::Profile),
            ("back", None) => Some(Self::Back),
            ("change_name", None) => Some(Self::ChangeName),
            ("send_history", None) => Some(Self::SendHistory),
            ("show_letters", None) => Some(Self::ShowLetters),
            ("letter", Some(l)) if !l.is_empty() => Some(Self::Letter(l.to_owned())),
            ("city", Some(c)) if !c.is_empty() => Some(Self::City(c.to_owned())),
            ("add_city", Some(c)) if !c.is_empty() => Some(Self::AddCity(c.to_owned())),
            ("weather", Some(c)) if !c.is_empty() => Some(Self::Weather(c.to_owned())),
            _ => None,
        }
    }
}

impl fmt::Display for CallbackAction {
    /// Encodes the action back into its callback payload form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Profile => write!(f, "profile"),
            Self::Back => write!(f, "back"),
            Self::ChangeName => write!(f, "change_name"),
            Self::SendHistory => write!(f, "send_history"),
            Self::ShowLetters => write!(f, "show_letters"),
            Self::Letter(l) => write!(f, "letter:{l}"),
            Self::City(c) => write!(f, "city:{c}"),
            Self::AddCity(c) => write!(f, "add_city:{c}"),
            Self::Weather(c) => write!(f, "weather:{c}"),
        }
    }
}

/// An inbound event handed to the conversation controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A recognized slash command.
    Command(Command),

    /// A menu selection.
    Callback(CallbackAction),

    /// Any other message text.
    Text(String),
}

impl Event {
    /// Classifies raw message text as a command or free text.
    #[must_use]
    pub fn parse_message(text: &str) -> Self {
        match Command::parse(text) {
            Some(command) => Self::Command(command),
            None => Self::Text(text.to_owned()),
        }
    }
}
