//! Event handling for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Key action that can be performed in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    // Navigation
    MoveUp,
    MoveDown,
    JumpToTop,
    JumpToBottom,
    PageUp,
    PageDown,

    // Directory navigation
    Enter,
    Back,

    // Deletion
    Delete,
    Confirm,
    Cancel,

    // Rescan
    Rescan,
    RescanRoot,

    // Display
    CycleSort,
    ReverseSort,
    ToggleMetric,
    ToggleHidden,
    ToggleDirsFirst,
    ToggleInfo,
    ToggleWarnings,
    ToggleHelp,

    // Application
    Quit,
    ForceQuit,

    // No action
    None,
}

impl KeyAction {
    /// Convert a key event to an action.
    pub fn from_key_event(event: KeyEvent) -> Self {
        match (event.code, event.modifiers) {
            (KeyCode::Char('q'), KeyModifiers::NONE) => KeyAction::Quit,
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => KeyAction::ForceQuit,
            (KeyCode::Esc, _) => KeyAction::Cancel,

            // Navigation - vim style
            (KeyCode::Char('j'), KeyModifiers::NONE) => KeyAction::MoveDown,
            (KeyCode::Char('k'), KeyModifiers::NONE) => KeyAction::MoveUp,
            (KeyCode::Char('h'), KeyModifiers::NONE) => KeyAction::Back,
            (KeyCode::Char('l'), KeyModifiers::NONE) => KeyAction::Enter,

            // Navigation - arrow keys
            (KeyCode::Down, _) => KeyAction::MoveDown,
            (KeyCode::Up, _) => KeyAction::MoveUp,
            (KeyCode::Left, _) => KeyAction::Back,
            (KeyCode::Right, _) => KeyAction::Enter,

            // Jump
            (KeyCode::Char('g'), KeyModifiers::NONE) => KeyAction::JumpToTop,
            (KeyCode::Char('G'), KeyModifiers::SHIFT) => KeyAction::JumpToBottom,
            (KeyCode::Char('G'), KeyModifiers::NONE) => KeyAction::JumpToBottom,
            (KeyCode::Home, _) => KeyAction::JumpToTop,
            (KeyCode::End, _) => KeyAction::JumpToBottom,

            // Page navigation
            (KeyCode::PageUp, _) => KeyAction::PageUp,
            (KeyCode::PageDown, _) => KeyAction::PageDown,
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => KeyAction::PageUp,
            (KeyCode::Char('d'), KeyModifiers::CONTROL) => KeyAction::PageDown,

            // Directory navigation
            (KeyCode::Enter, _) => KeyAction::Enter,
            (KeyCode::Backspace, _) => KeyAction::Back,
            (KeyCode::Char('<'), _) => KeyAction::Back,

            // Deletion and dialogs
            (KeyCode::Char('d'), KeyModifiers::NONE) => KeyAction::Delete,
            (KeyCode::Delete, _) => KeyAction::Delete,
            (KeyCode::Char('y'), KeyModifiers::NONE) => KeyAction::Confirm,
            (KeyCode::Char('n'), KeyModifiers::NONE) => KeyAction::Cancel,

            // Rescan
            (KeyCode::Char('r'), KeyModifiers::NONE) => KeyAction::Rescan,
            (KeyCode::Char('R'), _) => KeyAction::RescanRoot,

            // Display
            (KeyCode::Char('s'), KeyModifiers::NONE) => KeyAction::CycleSort,
            (KeyCode::Char('S'), _) => KeyAction::ReverseSort,
            (KeyCode::Char('a'), KeyModifiers::NONE) => KeyAction::ToggleMetric,
            (KeyCode::Char('.'), _) => KeyAction::ToggleHidden,
            (KeyCode::Char('t'), KeyModifiers::NONE) => KeyAction::ToggleDirsFirst,
            (KeyCode::Char('i'), KeyModifiers::NONE) => KeyAction::ToggleInfo,
            (KeyCode::Char('w'), KeyModifiers::NONE) => KeyAction::ToggleWarnings,
            (KeyCode::Char('?'), _) => KeyAction::ToggleHelp,

            _ => KeyAction::None,
        }
    }
}

/// A section of key bindings for the help display.
pub struct HelpSection {
    pub title: &'static str,
    pub bindings: Vec<KeyBinding>,
}

/// Key binding for display in help.
pub struct KeyBinding {
    pub keys: &'static str,
    pub description: &'static str,
}

/// Get all key bindings organized by section for help display.
pub fn get_help_sections() -> Vec<HelpSection> {
    vec![
        HelpSection {
            title: "Navigation",
            bindings: vec![
                KeyBinding { keys: "j/k ↑/↓", description: "Move up/down" },
                KeyBinding { keys: "l → Enter", description: "Open directory" },
                KeyBinding { keys: "h ← Bksp", description: "Parent directory" },
                KeyBinding { keys: "g/G", description: "Jump to top/bottom" },
                KeyBinding { keys: "PgUp/PgDn", description: "Page up/down" },
            ],
        },
        HelpSection {
            title: "Display",
            bindings: vec![
                KeyBinding { keys: "s", description: "Cycle sort column" },
                KeyBinding { keys: "S", description: "Reverse sort order" },
                KeyBinding { keys: "a", description: "Disk usage / apparent size" },
                KeyBinding { keys: ".", description: "Show/hide dot-files" },
                KeyBinding { keys: "t", description: "Directories first" },
                KeyBinding { keys: "i", description: "Entry information" },
                KeyBinding { keys: "w", description: "Scan warnings" },
            ],
        },
        HelpSection {
            title: "Actions",
            bindings: vec![
                KeyBinding { keys: "d/Del", description: "Delete selected entry" },
                KeyBinding { keys: "y/n", description: "Confirm/cancel" },
                KeyBinding { keys: "r", description: "Rescan this directory" },
                KeyBinding { keys: "R", description: "Rescan everything" },
                KeyBinding { keys: "Esc", description: "Cancel dialog or scan" },
                KeyBinding { keys: "?", description: "Show this help" },
                KeyBinding { keys: "q", description: "Quit" },
            ],
        },
    ]
}
