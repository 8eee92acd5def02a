//! Keyboard command parsing for the editor.
//!
//! Key parsing is kept apart from command execution, see
//! [`EditorContext::execute`](crate::EditorContext::execute).

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Editor command representing a user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorCommand {
    // Navigation
    MoveCursorUp,
    MoveCursorDown,
    MoveCursorLeft,
    MoveCursorRight,
    MoveToLineStart,
    MoveToLineEnd,
    MoveToBufferStart,
    MoveToBufferEnd,
    NextWord,
    PreviousWord,
    NextParagraph,
    PreviousParagraph,
    PageUp,
    PageDown,

    // Text editing
    InsertChar(char),
    InsertNewline,
    InsertTab,
    Backspace,
    Delete,

    // Region and cursors
    StartRegion,
    Cancel,
    KillRegion,
    AddCursorAbove,
    AddCursorBelow,

    // Undo/Redo
    Undo,
    Redo,

    // Application
    Save,
    Quit,

    // No operation (for unhandled keys)
    None,
}

impl EditorCommand {
    /// Parse a KeyEvent into an EditorCommand.
    ///
    /// All bindings live here so they can be read and tested in one place.
    pub fn from_key_event(key: KeyEvent) -> Self {
        match (key.code, key.modifiers) {
            // Navigation
            (KeyCode::Up, KeyModifiers::NONE) => Self::MoveCursorUp,
            (KeyCode::Down, KeyModifiers::NONE) => Self::MoveCursorDown,
            (KeyCode::Left, KeyModifiers::NONE) => Self::MoveCursorLeft,
            (KeyCode::Right, KeyModifiers::NONE) => Self::MoveCursorRight,
            (KeyCode::Home, KeyModifiers::NONE) => Self::MoveToLineStart,
            (KeyCode::End, KeyModifiers::NONE) => Self::MoveToLineEnd,
            (KeyCode::Home, KeyModifiers::CONTROL) => Self::MoveToBufferStart,
            (KeyCode::End, KeyModifiers::CONTROL) => Self::MoveToBufferEnd,
            (KeyCode::PageUp, KeyModifiers::NONE) => Self::PageUp,
            (KeyCode::PageDown, KeyModifiers::NONE) => Self::PageDown,

            // Word and paragraph motions (Ctrl)
            (KeyCode::Right, KeyModifiers::CONTROL) => Self::NextWord,
            (KeyCode::Left, KeyModifiers::CONTROL) => Self::PreviousWord,
            (KeyCode::Down, KeyModifiers::CONTROL) => Self::NextParagraph,
            (KeyCode::Up, KeyModifiers::CONTROL) => Self::PreviousParagraph,

            // Alt+Up/Down - add cursor
            (KeyCode::Up, KeyModifiers::ALT) => Self::AddCursorAbove,
            (KeyCode::Down, KeyModifiers::ALT) => Self::AddCursorBelow,

            // Ctrl+Space - start region
            (KeyCode::Char(' '), KeyModifiers::CONTROL) => Self::StartRegion,
            (KeyCode::Esc, KeyModifiers::NONE) => Self::Cancel,
            // Ctrl+W - kill region
            (KeyCode::Char('w'), KeyModifiers::CONTROL) => Self::KillRegion,

            // Ctrl+Z / Ctrl+Y - undo / redo
            (KeyCode::Char('z'), KeyModifiers::CONTROL) => Self::Undo,
            (KeyCode::Char('y'), KeyModifiers::CONTROL) => Self::Redo,

            // Ctrl+S - save, Ctrl+Q - quit
            (KeyCode::Char('s'), KeyModifiers::CONTROL) => Self::Save,
            (KeyCode::Char('q'), KeyModifiers::CONTROL) => Self::Quit,

            // Editing
            (KeyCode::Char(ch), KeyModifiers::NONE | KeyModifiers::SHIFT) => Self::InsertChar(ch),
            (KeyCode::Enter, KeyModifiers::NONE) => Self::InsertNewline,
            (KeyCode::Tab, KeyModifiers::NONE) => Self::InsertTab,
            (KeyCode::Backspace, KeyModifiers::NONE) => Self::Backspace,
            (KeyCode::Delete, KeyModifiers::NONE) => Self::Delete,

            // Default - no operation
            _ => Self::None,
        }
    }

    /// Whether the command may change the buffer content.
    pub fn is_edit(&self) -> bool {
        matches!(
            self,
            Self::InsertChar(_)
                | Self::InsertNewline
                | Self::InsertTab
                | Self::Backspace
                | Self::Delete
                | Self::KillRegion
                | Self::Undo
                | Self::Redo
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_navigation_keys() {
        assert_eq!(
            EditorCommand::from_key_event(key(KeyCode::Up, KeyModifiers::NONE)),
            EditorCommand::MoveCursorUp
        );
        assert_eq!(
            EditorCommand::from_key_event(key(KeyCode::End, KeyModifiers::CONTROL)),
            EditorCommand::MoveToBufferEnd
        );
        assert_eq!(
            EditorCommand::from_key_event(key(KeyCode::Left, KeyModifiers::CONTROL)),
            EditorCommand::PreviousWord
        );
        assert_eq!(
            EditorCommand::from_key_event(key(KeyCode::Down, KeyModifiers::CONTROL)),
            EditorCommand::NextParagraph
        );
        assert_eq!(
            EditorCommand::from_key_event(key(KeyCode::PageDown, KeyModifiers::NONE)),
            EditorCommand::PageDown
        );
    }

    #[test]
    fn test_text_input() {
        assert_eq!(
            EditorCommand::from_key_event(key(KeyCode::Char('a'), KeyModifiers::NONE)),
            EditorCommand::InsertChar('a')
        );
        assert_eq!(
            EditorCommand::from_key_event(key(KeyCode::Char('A'), KeyModifiers::SHIFT)),
            EditorCommand::InsertChar('A')
        );
        assert_eq!(
            EditorCommand::from_key_event(key(KeyCode::Enter, KeyModifiers::NONE)),
            EditorCommand::InsertNewline
        );
        assert_eq!(
            EditorCommand::from_key_event(key(KeyCode::Tab, KeyModifiers::NONE)),
            EditorCommand::InsertTab
        );
    }

    #[test]
    fn test_control_chars_are_not_inserted() {
        assert_eq!(
            EditorCommand::from_key_event(key(KeyCode::Char('s'), KeyModifiers::CONTROL)),
            EditorCommand::Save
        );
        assert_eq!(
            EditorCommand::from_key_event(key(KeyCode::Char('q'), KeyModifiers::CONTROL)),
            EditorCommand::Quit
        );
        assert_eq!(
            EditorCommand::from_key_event(key(KeyCode::Char(' '), KeyModifiers::CONTROL)),
            EditorCommand::StartRegion
        );
        assert_eq!(
            EditorCommand::from_key_event(key(KeyCode::Char('x'), KeyModifiers::CONTROL)),
            EditorCommand::None
        );
    }

    #[test]
    fn test_multi_cursor_keys() {
        assert_eq!(
            EditorCommand::from_key_event(key(KeyCode::Down, KeyModifiers::ALT)),
            EditorCommand::AddCursorBelow
        );
        assert_eq!(
            EditorCommand::from_key_event(key(KeyCode::Esc, KeyModifiers::NONE)),
            EditorCommand::Cancel
        );
    }

    #[test]
    fn test_is_edit() {
        assert!(EditorCommand::InsertChar('x').is_edit());
        assert!(EditorCommand::Undo.is_edit());
        assert!(!EditorCommand::PageUp.is_edit());
        assert!(!EditorCommand::Save.is_edit());
    }
}
