//! Key bindings for the main screen and the add-user dialog, backed by `keybinds.conf`.
//!
//! Printable characters typed into a focused text field never reach the keymap;
//! everything else is resolved here, both on the main screen and in the dialog.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What a key press means, independent of the physical key.
///
/// Several keys may map to the same action (e.g. both `j` and Down move down).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Exit the application.
    Quit,
    /// Open the "add user" dialog.
    NewUser,
    /// Display the help modal.
    OpenHelp,
    /// Re-fetch roles and cost centers.
    Refresh,
    /// Move focus to the next dialog control.
    NextField,
    /// Move focus to the previous dialog control.
    PrevField,
    /// Activate the focused control.
    Confirm,
    /// Dismiss the current dialog, picker or modal.
    Cancel,
    MoveUp,
    MoveDown,
    /// Select the previous entry of a dropdown.
    OptionPrev,
    /// Select the next entry of a dropdown.
    OptionNext,
    /// Swallow this key.
    Ignore,
}

#[derive(Clone, Debug)]
pub struct Keymap {
    /// (modifiers, code) -> action.
    bindings: std::collections::HashMap<(KeyModifiers, KeyCode), KeyAction>,
}

impl Keymap {
    /// Built-in bindings, used when no config file overrides them.
    pub fn new_defaults() -> Self {
        use KeyCode::*;
        use KeyModifiers as M;
        let mut bindings = std::collections::HashMap::new();
        bindings.insert((M::NONE, Char('q')), KeyAction::Quit);
        bindings.insert((M::CONTROL, Char('c')), KeyAction::Quit);
        bindings.insert((M::NONE, Char('n')), KeyAction::NewUser);
        bindings.insert((M::NONE, Char('?')), KeyAction::OpenHelp);
        bindings.insert((M::NONE, Char('r')), KeyAction::Refresh);
        bindings.insert((M::NONE, Esc), KeyAction::Cancel);
        bindings.insert((M::NONE, Enter), KeyAction::Confirm);
        bindings.insert((M::NONE, Tab), KeyAction::NextField);
        // Shift+Tab is BackTab in crossterm; some terminals add SHIFT, some send Tab+SHIFT
        bindings.insert((M::NONE, BackTab), KeyAction::PrevField);
        bindings.insert((M::SHIFT, BackTab), KeyAction::PrevField);
        bindings.insert((M::SHIFT, Tab), KeyAction::PrevField);

        bindings.insert((M::NONE, Up), KeyAction::MoveUp);
        bindings.insert((M::NONE, Down), KeyAction::MoveDown);
        bindings.insert((M::NONE, Left), KeyAction::OptionPrev);
        bindings.insert((M::NONE, Right), KeyAction::OptionNext);
        // Vim-like keys
        bindings.insert((M::NONE, Char('k')), KeyAction::MoveUp);
        bindings.insert((M::NONE, Char('j')), KeyAction::MoveDown);
        bindings.insert((M::NONE, Char('h')), KeyAction::OptionPrev);
        bindings.insert((M::NONE, Char('l')), KeyAction::OptionNext);

        Self { bindings }
    }

    /// Read `path`, or the user config dir, or write the defaults to `path`.
    ///
    /// Checks `path` first, then the standard config locations. If neither has a
    /// file, the defaults are written to `path` for later customization.
    pub fn load_or_init(path: &str) -> Self {
        let p = std::path::Path::new(path);
        if p.exists() {
            return Self::from_file(path).unwrap_or_default();
        }
        if let Some(existing) = crate::app::config_file_read_path("keybinds.conf") {
            return Self::from_file(&existing).unwrap_or_default();
        }
        let km = Self::default();
        let _ = km.write_file(path);
        km
    }

    /// Load a keymap from a configuration file.
    ///
    /// Lines are `<Action> = <KeySpec>`; the legacy `<KeySpec> = <Action>` order
    /// is accepted too. File bindings are layered over the defaults.
    ///
    /// Returns `None` if the file can't be read.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut map = Self::default();
        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, '=');
            let lhs = parts.next().map(|s| s.trim()).unwrap_or("");
            let rhs = parts.next().map(|s| s.trim()).unwrap_or("");
            if lhs.is_empty() || rhs.is_empty() {
                continue;
            }
            if let (Some(action), Some(key)) = (parse_action(lhs), parse_key(rhs)) {
                map.bindings.insert(key, action);
                continue;
            }
            if let (Some(key), Some(action)) = (parse_key(lhs), parse_action(rhs)) {
                map.bindings.insert(key, action);
                continue;
            }
        }
        Some(map)
    }

    /// Write a readable subset of the keymap to a configuration file.
    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# orguser-manager keybindings\n");
        buf.push_str("# Format: <Action> = <KeySpec>\n");
        buf.push_str("# KeySpec examples: q, Ctrl+q, Enter, Esc, Tab, BackTab, Up, Down, Left, Right, n, r, j, k, h, l\n");
        buf.push_str("# Actions: Quit, NewUser, OpenHelp, Refresh, NextField, PrevField, Confirm, Cancel, MoveUp, MoveDown, OptionPrev, OptionNext, Ignore\n\n");

        let dump = [
            ("q", KeyAction::Quit),
            ("n", KeyAction::NewUser),
            ("?", KeyAction::OpenHelp),
            ("r", KeyAction::Refresh),
            ("Tab", KeyAction::NextField),
            ("BackTab", KeyAction::PrevField),
            ("Enter", KeyAction::Confirm),
            ("Esc", KeyAction::Cancel),
            ("Up", KeyAction::MoveUp),
            ("Down", KeyAction::MoveDown),
            ("Left", KeyAction::OptionPrev),
            ("Right", KeyAction::OptionNext),
            ("k", KeyAction::MoveUp),
            ("j", KeyAction::MoveDown),
            ("h", KeyAction::OptionPrev),
            ("l", KeyAction::OptionNext),
        ];
        for (k, a) in dump {
            let _ = writeln!(&mut buf, "{} = {}", format_action(a), k);
        }

        std::fs::write(path, buf)
    }

    /// Resolve a key event to its action, if bound.
    pub fn resolve(&self, key: &KeyEvent) -> Option<KeyAction> {
        self.bindings.get(&(key.modifiers, key.code)).copied()
    }

    /// Keys bound to `action`, formatted and sorted.
    pub fn keys_for(&self, action: KeyAction) -> Vec<String> {
        let mut keys: Vec<String> = self
            .bindings
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|((m, c), _)| Self::format_key(*m, *c))
            .collect();
        keys.sort();
        keys.dedup();
        keys
    }

    /// Format a key (modifiers + code) into a spec like "Ctrl+q" or "BackTab".
    pub fn format_key(mods: KeyModifiers, code: KeyCode) -> String {
        use KeyCode::*;
        let base = match code {
            Enter => "Enter".to_string(),
            Esc => "Esc".to_string(),
            Tab if mods.contains(KeyModifiers::SHIFT) => "BackTab".to_string(),
            Tab => "Tab".to_string(),
            BackTab => "BackTab".to_string(),
            Up => "Up".to_string(),
            Down => "Down".to_string(),
            Left => "Left".to_string(),
            Right => "Right".to_string(),
            Backspace => "Backspace".to_string(),
            Char(c) => c.to_string(),
            _ => format!("{:?}", code),
        };
        if mods.contains(KeyModifiers::CONTROL) {
            format!("Ctrl+{}", base)
        } else {
            base
        }
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new_defaults()
    }
}

fn parse_key(spec: &str) -> Option<(KeyModifiers, KeyCode)> {
    use KeyCode::*;
    let s = spec.trim();
    let mut rest = s;
    let mut mods = KeyModifiers::NONE;
    if let Some(after) = s.strip_prefix("Ctrl+") {
        mods |= KeyModifiers::CONTROL;
        rest = after;
    }
    let code = match rest {
        "Enter" => Enter,
        "Esc" | "Escape" => Esc,
        "Tab" => Tab,
        "BackTab" => BackTab,
        "Up" => Up,
        "Down" => Down,
        "Left" => Left,
        "Right" => Right,
        "Backspace" => Backspace,
        _ => {
            let chars: Vec<char> = rest.chars().collect();
            if chars.len() == 1 {
                KeyCode::Char(chars[0])
            } else {
                return None;
            }
        }
    };
    Some((mods, code))
}

fn parse_action(s: &str) -> Option<KeyAction> {
    match s.trim() {
        "Quit" => Some(KeyAction::Quit),
        "NewUser" => Some(KeyAction::NewUser),
        "OpenHelp" => Some(KeyAction::OpenHelp),
        "Refresh" => Some(KeyAction::Refresh),
        "NextField" => Some(KeyAction::NextField),
        "PrevField" => Some(KeyAction::PrevField),
        "Confirm" => Some(KeyAction::Confirm),
        "Cancel" => Some(KeyAction::Cancel),
        "MoveUp" => Some(KeyAction::MoveUp),
        "MoveDown" => Some(KeyAction::MoveDown),
        "OptionPrev" => Some(KeyAction::OptionPrev),
        "OptionNext" => Some(KeyAction::OptionNext),
        "Ignore" => Some(KeyAction::Ignore),
        _ => None,
    }
}

pub fn format_action(a: KeyAction) -> &'static str {
    match a {
        KeyAction::Quit => "Quit",
        KeyAction::NewUser => "NewUser",
        KeyAction::OpenHelp => "OpenHelp",
        KeyAction::Refresh => "Refresh",
        KeyAction::NextField => "NextField",
        KeyAction::PrevField => "PrevField",
        KeyAction::Confirm => "Confirm",
        KeyAction::Cancel => "Cancel",
        KeyAction::MoveUp => "MoveUp",
        KeyAction::MoveDown => "MoveDown",
        KeyAction::OptionPrev => "OptionPrev",
        KeyAction::OptionNext => "OptionNext",
        KeyAction::Ignore => "Ignore",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_resolve_dialog_keys() {
        let km = Keymap::default();
        let key = |c| KeyEvent::new(c, KeyModifiers::NONE);
        assert_eq!(km.resolve(&key(KeyCode::Esc)), Some(KeyAction::Cancel));
        assert_eq!(km.resolve(&key(KeyCode::Enter)), Some(KeyAction::Confirm));
        assert_eq!(km.resolve(&key(KeyCode::Tab)), Some(KeyAction::NextField));
        assert_eq!(km.resolve(&key(KeyCode::Char('x'))), None);
    }

    #[test]
    fn parse_key_handles_ctrl_and_names() {
        assert_eq!(parse_key("Ctrl+s"), Some((KeyModifiers::CONTROL, KeyCode::Char('s'))));
        assert_eq!(parse_key("Escape"), Some((KeyModifiers::NONE, KeyCode::Esc)));
        assert_eq!(parse_key("Nope"), None);
    }

    #[test]
    fn keys_for_lists_sorted_specs() {
        let km = Keymap::default();
        assert_eq!(km.keys_for(KeyAction::Quit), vec!["Ctrl+c".to_string(), "q".to_string()]);
    }
}
