use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, Message};

/// A declarative keybinding map that can be composed and extended.
#[derive(Clone)]
pub struct Keymap {
    bindings: Vec<(KeyCode, KeyModifiers, Message)>,
}

impl Keymap {
    pub const fn new() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Add a key binding with no modifiers.
    pub fn bind(mut self, code: KeyCode, message: Message) -> Self {
        self.bindings.push((code, KeyModifiers::NONE, message));
        self
    }

    /// Add a key binding with Ctrl modifier.
    pub fn bind_ctrl(mut self, code: KeyCode, message: Message) -> Self {
        self.bindings.push((code, KeyModifiers::CONTROL, message));
        self
    }

    /// Look up a message for a key event.
    /// Later bindings take precedence over earlier ones.
    pub fn get(&self, event: &KeyEvent) -> Option<Message> {
        self.bindings
            .iter()
            .rev()
            .find(|(code, mods, _)| *code == event.code && event.modifiers.contains(*mods))
            .map(|(_, _, msg)| msg.clone())
    }

    /// Extend this keymap with another. The other keymap's bindings take precedence.
    pub fn extend(mut self, other: Self) -> Self {
        self.bindings.extend(other.bindings);
        self
    }

    /// Find the first key bound to a specific message.
    pub fn find_key(&self, message: &Message) -> Option<(KeyCode, KeyModifiers)> {
        self.bindings
            .iter()
            .find(|(_, _, msg)| msg == message)
            .map(|(code, mods, _)| (*code, *mods))
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a key binding for display in help text.
pub fn format_key(code: KeyCode, mods: KeyModifiers) -> String {
    let key_str = match code {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Up => "↑".to_string(),
        KeyCode::Down => "↓".to_string(),
        KeyCode::PageUp => "PgUp".to_string(),
        KeyCode::PageDown => "PgDn".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        _ => "?".to_string(),
    };
    if mods.contains(KeyModifiers::CONTROL) {
        format!("C-{key_str}")
    } else {
        key_str
    }
}

/// Global keybindings that work in every state.
pub fn global_keymap() -> Keymap {
    Keymap::new()
        .bind(KeyCode::Char('q'), Message::Quit)
        .bind_ctrl(KeyCode::Char('c'), Message::Quit)
        .bind(KeyCode::Char('`'), Message::ToggleDebug)
        .bind(KeyCode::Char('?'), Message::ToggleHelp)
}

/// Keybindings for moving through the feed.
pub fn list_keymap() -> Keymap {
    Keymap::new()
        .bind(KeyCode::Char('j'), Message::SelectNext)
        .bind(KeyCode::Down, Message::SelectNext)
        .bind(KeyCode::Char('k'), Message::SelectPrev)
        .bind(KeyCode::Up, Message::SelectPrev)
        .bind(KeyCode::Char('g'), Message::SelectFirst)
        .bind(KeyCode::Home, Message::SelectFirst)
        .bind(KeyCode::Char('G'), Message::SelectLast)
        .bind(KeyCode::End, Message::SelectLast)
        .bind_ctrl(KeyCode::Char('d'), Message::PageDown)
        .bind(KeyCode::PageDown, Message::PageDown)
        .bind_ctrl(KeyCode::Char('u'), Message::PageUp)
        .bind(KeyCode::PageUp, Message::PageUp)
        .bind(KeyCode::Char('r'), Message::Retry)
        .bind(KeyCode::Char('R'), Message::Reload)
}

/// Keybindings while the help overlay is open.
fn help_overlay_keymap() -> Keymap {
    Keymap::new()
        .bind(KeyCode::Char('?'), Message::ToggleHelp)
        .bind(KeyCode::Esc, Message::ToggleHelp)
        .bind(KeyCode::Char('q'), Message::ToggleHelp)
        .bind_ctrl(KeyCode::Char('c'), Message::Quit)
}

pub fn handle_key(key: KeyEvent, app: &App) -> Option<Message> {
    if app.show_help {
        return help_overlay_keymap().get(&key);
    }
    list_keymap().extend(global_keymap()).get(&key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestAppBuilder;
    use crossterm::event::{KeyEventKind, KeyEventState};

    fn make_key(code: KeyCode) -> KeyEvent {
        make_key_with_mods(code, KeyModifiers::empty())
    }

    fn make_key_with_mods(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::empty(),
        }
    }

    #[test]
    fn test_quit_keys() {
        let app = TestAppBuilder::new().build();
        assert_eq!(
            handle_key(make_key(KeyCode::Char('q')), &app),
            Some(Message::Quit)
        );
        assert_eq!(
            handle_key(
                make_key_with_mods(KeyCode::Char('c'), KeyModifiers::CONTROL),
                &app
            ),
            Some(Message::Quit)
        );
    }

    #[test]
    fn test_navigation_keys() {
        let app = TestAppBuilder::new().build();
        assert_eq!(
            handle_key(make_key(KeyCode::Char('j')), &app),
            Some(Message::SelectNext)
        );
        assert_eq!(
            handle_key(make_key(KeyCode::Up), &app),
            Some(Message::SelectPrev)
        );
        assert_eq!(
            handle_key(make_key(KeyCode::Char('G')), &app),
            Some(Message::SelectLast)
        );
        assert_eq!(
            handle_key(
                make_key_with_mods(KeyCode::Char('d'), KeyModifiers::CONTROL),
                &app
            ),
            Some(Message::PageDown)
        );
    }

    #[test]
    fn test_retry_and_reload_are_distinct() {
        let app = TestAppBuilder::new().build();
        assert_eq!(
            handle_key(make_key(KeyCode::Char('r')), &app),
            Some(Message::Retry)
        );
        assert_eq!(
            handle_key(make_key(KeyCode::Char('R')), &app),
            Some(Message::Reload)
        );
    }

    #[test]
    fn test_help_overlay_captures_keys() {
        let app = TestAppBuilder::new().show_help().build();
        assert_eq!(
            handle_key(make_key(KeyCode::Char('q')), &app),
            Some(Message::ToggleHelp)
        );
        assert_eq!(handle_key(make_key(KeyCode::Char('j')), &app), None);
    }

    #[test]
    fn test_keymap_extend_precedence() {
        let base = Keymap::new().bind(KeyCode::Char('x'), Message::Quit);
        let extended = base.extend(Keymap::new().bind(KeyCode::Char('x'), Message::Reload));

        assert_eq!(
            extended.get(&make_key(KeyCode::Char('x'))),
            Some(Message::Reload)
        );
    }

    #[test]
    fn test_unknown_key_returns_none() {
        let app = TestAppBuilder::new().build();
        assert!(handle_key(make_key(KeyCode::F(12)), &app).is_none());
    }
}
