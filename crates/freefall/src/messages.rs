//! Message and command types.
//!
//! Everything that reaches the model is a [`Msg`]; everything the model asks
//! of the event loop is a [`Cmd`]. Both are plain enums, so routing is a
//! `match` rather than a chain of downcasts.

use crate::i18n::Language;

/// A key press, reduced to what the app distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// A printable character.
    Char(char),
    /// Backspace.
    Backspace,
    /// Enter / Return.
    Enter,
    /// Escape.
    Esc,
    /// Ctrl+C.
    CtrlC,
    /// Anything else.
    Other,
}

impl Key {
    /// Maps a crossterm key code and modifiers.
    #[must_use]
    pub fn from_crossterm(
        code: crossterm::event::KeyCode,
        modifiers: crossterm::event::KeyModifiers,
    ) -> Self {
        use crossterm::event::{KeyCode, KeyModifiers};

        match code {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Self::CtrlC,
            KeyCode::Char(c) => Self::Char(c),
            KeyCode::Backspace => Self::Backspace,
            KeyCode::Enter => Self::Enter,
            KeyCode::Esc => Self::Esc,
            _ => Self::Other,
        }
    }
}

/// Input to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Msg {
    /// A key was pressed.
    Key(Key),
    /// The terminal was resized to `cols` × `rows` cells.
    Resize {
        /// Columns.
        cols: u16,
        /// Rows.
        rows: u16,
    },
    /// A requested animation frame is due.
    Frame,
    /// Start a run with the typed acceleration.
    Start,
    /// Return to Idle.
    Reset,
    /// Switch display language.
    SetLanguage(Language),
    /// Switch to the next language.
    CycleLanguage,
    /// Close the notification.
    Dismiss,
    /// Leave the program.
    Quit,
}

/// Request from the model to the event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cmd {
    /// Deliver a [`Msg::Frame`] on the next tick.
    RequestFrame,
    /// Drop a frame that was requested but not yet delivered.
    CancelFrame,
    /// Stop the event loop.
    Quit,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    #[test]
    fn maps_ctrl_c() {
        assert_eq!(
            Key::from_crossterm(KeyCode::Char('c'), KeyModifiers::CONTROL),
            Key::CtrlC
        );
        assert_eq!(
            Key::from_crossterm(KeyCode::Char('c'), KeyModifiers::NONE),
            Key::Char('c')
        );
    }

    #[test]
    fn maps_editing_keys() {
        assert_eq!(
            Key::from_crossterm(KeyCode::Backspace, KeyModifiers::NONE),
            Key::Backspace
        );
        assert_eq!(
            Key::from_crossterm(KeyCode::Enter, KeyModifiers::NONE),
            Key::Enter
        );
        assert_eq!(
            Key::from_crossterm(KeyCode::F(1), KeyModifiers::NONE),
            Key::Other
        );
    }
}
