use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::nav::{Input, KeyMode};

/// Decode a key press for the current [`KeyMode`]. Returns None for keys
/// with no meaning in that mode.
pub fn map_key(mode: KeyMode, key: KeyEvent) -> Option<Input> {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return None;
    }
    let key = normalize_key(key);
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Input::Quit),
            _ => None,
        };
    }

    match mode {
        KeyMode::Normal => map_normal(key.code),
        KeyMode::Prompt => map_prompt(key.code),
        KeyMode::Confirm => map_confirm(key.code),
        KeyMode::Picker => map_picker(key.code),
    }
}

fn map_normal(code: KeyCode) -> Option<Input> {
    let input = match code {
        KeyCode::Char('q') => Input::Quit,
        KeyCode::Char('r') | KeyCode::Esc => Input::Back,
        KeyCode::Up | KeyCode::Char('k') => Input::Up,
        KeyCode::Down | KeyCode::Char('j') => Input::Down,
        KeyCode::Enter => Input::Select,
        KeyCode::Char('c') => Input::Create,
        KeyCode::Char('d') => Input::Delete,
        KeyCode::Char('g') => Input::Goto,
        KeyCode::Char('h') => Input::Dashboard,
        KeyCode::Char('s') => Input::Status,
        KeyCode::Char('a') => Input::Add,
        KeyCode::Char('m') => Input::Tools,
        _ => return None,
    };
    Some(input)
}

fn map_prompt(code: KeyCode) -> Option<Input> {
    match code {
        KeyCode::Enter => Some(Input::Select),
        KeyCode::Esc => Some(Input::Back),
        KeyCode::Backspace => Some(Input::Backspace),
        KeyCode::Char(c) => Some(Input::Char(c)),
        _ => None,
    }
}

fn map_confirm(code: KeyCode) -> Option<Input> {
    match code {
        KeyCode::Char('y') | KeyCode::Char('Y') => Some(Input::Yes),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(Input::No),
        _ => None,
    }
}

fn map_picker(code: KeyCode) -> Option<Input> {
    match code {
        KeyCode::Up | KeyCode::Char('k') => Some(Input::Up),
        KeyCode::Down | KeyCode::Char('j') => Some(Input::Down),
        KeyCode::Enter => Some(Input::Select),
        KeyCode::Esc | KeyCode::Char('q') => Some(Input::Back),
        _ => None,
    }
}

/// Terminals disagree on whether Shift+letter arrives as an uppercase char
/// with SHIFT set; fold both forms into the uppercase char.
fn normalize_key(mut key: KeyEvent) -> KeyEvent {
    if let KeyCode::Char(c) = key.code
        && key.modifiers.contains(KeyModifiers::SHIFT)
    {
        key.code = KeyCode::Char(c.to_ascii_uppercase());
        key.modifiers.remove(KeyModifiers::SHIFT);
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn normal_mode_keys() {
        let m = KeyMode::Normal;
        assert_eq!(map_key(m, key(KeyCode::Char('q'))), Some(Input::Quit));
        assert_eq!(map_key(m, key(KeyCode::Esc)), Some(Input::Back));
        assert_eq!(map_key(m, key(KeyCode::Char('r'))), Some(Input::Back));
        assert_eq!(map_key(m, key(KeyCode::Char('j'))), Some(Input::Down));
        assert_eq!(map_key(m, key(KeyCode::Up)), Some(Input::Up));
        assert_eq!(map_key(m, key(KeyCode::Char('h'))), Some(Input::Dashboard));
        assert_eq!(map_key(m, key(KeyCode::Char('m'))), Some(Input::Tools));
        assert_eq!(map_key(m, key(KeyCode::Char('x'))), None);
    }

    #[test]
    fn prompt_mode_types_everything() {
        let m = KeyMode::Prompt;
        assert_eq!(map_key(m, key(KeyCode::Char('q'))), Some(Input::Char('q')));
        assert_eq!(map_key(m, key(KeyCode::Char('/'))), Some(Input::Char('/')));
        assert_eq!(map_key(m, key(KeyCode::Backspace)), Some(Input::Backspace));
        assert_eq!(map_key(m, key(KeyCode::Enter)), Some(Input::Select));
        assert_eq!(
            map_key(m, KeyEvent::new(KeyCode::Char('a'), KeyModifiers::SHIFT)),
            Some(Input::Char('A'))
        );
    }

    #[test]
    fn ctrl_c_quits_in_every_mode() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        for mode in [
            KeyMode::Normal,
            KeyMode::Prompt,
            KeyMode::Confirm,
            KeyMode::Picker,
        ] {
            assert_eq!(map_key(mode, ctrl_c), Some(Input::Quit));
        }
    }

    #[test]
    fn picker_q_closes_instead_of_quitting() {
        assert_eq!(
            map_key(KeyMode::Picker, key(KeyCode::Char('q'))),
            Some(Input::Back)
        );
    }

    #[test]
    fn confirm_mode_yes_no() {
        let m = KeyMode::Confirm;
        assert_eq!(map_key(m, key(KeyCode::Char('y'))), Some(Input::Yes));
        assert_eq!(map_key(m, key(KeyCode::Esc)), Some(Input::No));
        assert_eq!(map_key(m, key(KeyCode::Enter)), None);
    }
}
