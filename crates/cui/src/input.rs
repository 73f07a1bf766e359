use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    None,
    Quit,
    ToggleHelp,
    Back,
    Confirm,
    Flip,
    Auto,
    Interpret,
    MoveUp,
    MoveDown,
    RotateLeft,
    RotateRight,
    ToggleDrawMode,
    CycleTone,
    ToggleMeanings,
    ToggleHistory,
    NewReading,
}

pub fn map_key(key: KeyEvent) -> InputAction {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => InputAction::Quit,
            KeyCode::Char('n') => InputAction::NewReading,
            _ => InputAction::None,
        };
    }
    match key.code {
        KeyCode::Esc | KeyCode::Backspace => InputAction::Back,
        KeyCode::Enter => InputAction::Confirm,
        KeyCode::Up | KeyCode::Char('k') => InputAction::MoveUp,
        KeyCode::Down | KeyCode::Char('j') => InputAction::MoveDown,
        KeyCode::Left | KeyCode::Char('h') => InputAction::RotateLeft,
        KeyCode::Right | KeyCode::Char('l') => InputAction::RotateRight,
        KeyCode::Char(' ') => InputAction::Flip,
        KeyCode::Char('q') => InputAction::Quit,
        KeyCode::Char('?') => InputAction::ToggleHelp,
        KeyCode::Char('a') => InputAction::Auto,
        KeyCode::Char('i') => InputAction::Interpret,
        KeyCode::Char('m') => InputAction::ToggleDrawMode,
        KeyCode::Char('t') => InputAction::CycleTone,
        KeyCode::Char('v') => InputAction::ToggleMeanings,
        KeyCode::Char('H') => InputAction::ToggleHistory,
        KeyCode::Char('n') => InputAction::NewReading,
        _ => InputAction::None,
    }
}
