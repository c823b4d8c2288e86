//! Ephemeral per-user session state.

/// Conversational state tracking multi-step input. Not persisted; a
/// process restart resets every user to [`SessionState::Idle`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionState {
    /// No multi-step input in progress.
    #[default]
    Idle,

    /// The next free-text message is a display name.
    AwaitingName,
}
