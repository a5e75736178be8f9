//! Application state types and entry glue.
//!
//! [`AppState`] owns everything the event loop mutates: the dialog, the users
//! created this session, loaded configuration and transient UI state.
//! The loop itself lives in [`update`] (re-exported as `run`).
//!
pub mod dialog;
pub mod form;
pub mod keymap;
pub mod messages;
pub mod reference;
pub mod update;

use ratatui::style::Color;
use std::path::{Path, PathBuf};

use crate::api::CreatedUser;
use dialog::AddUserDialog;
use keymap::Keymap;
use messages::Messages;

/// Color palette for theming the TUI.
#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub focus: Color,
    pub error: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
}

impl Theme {
    /// Catppuccin Mocha theme defaults.
    pub fn mocha() -> Self {
        // Palette reference: https://github.com/catppuccin/catppuccin
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),         // text
            muted: Color::Rgb(0x7f, 0x84, 0x9c),        // overlay1
            title: Color::Rgb(0xcb, 0xa6, 0xf7),        // mauve
            border: Color::Rgb(0x58, 0x5b, 0x70),       // surface2
            focus: Color::Rgb(0x89, 0xb4, 0xfa),        // blue
            error: Color::Rgb(0xf3, 0x8b, 0xa8),        // red
            header_bg: Color::Rgb(0x31, 0x32, 0x44),    // surface0
            header_fg: Color::Rgb(0xb4, 0xbe, 0xfe),    // lavender
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),    // surface1
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),    // text
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf), // yellow
            highlight_bg: Color::Rgb(0x45, 0x47, 0x5a), // surface1
        }
    }

    fn slots(&mut self) -> [(&'static str, &mut Color); 12] {
        [
            ("text", &mut self.text),
            ("muted", &mut self.muted),
            ("title", &mut self.title),
            ("border", &mut self.border),
            ("focus", &mut self.focus),
            ("error", &mut self.error),
            ("header_bg", &mut self.header_bg),
            ("header_fg", &mut self.header_fg),
            ("status_bg", &mut self.status_bg),
            ("status_fg", &mut self.status_fg),
            ("highlight_fg", &mut self.highlight_fg),
            ("highlight_bg", &mut self.highlight_bg),
        ]
    }

    /// Load theme from a `key = value` file. Unknown or missing keys fall back to `mocha`.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut theme = Self::mocha();

        for raw_line in contents.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, '=');
            let key = parts.next().map(|s| s.trim()).unwrap_or("");
            let val = parts.next().map(|s| s.trim()).unwrap_or("");
            let Some(color) = Self::parse_color(val) else { continue };
            if let Some((_, slot)) = theme.slots().into_iter().find(|(name, _)| *name == key) {
                *slot = color;
            }
        }

        Some(theme)
    }

    /// Parse a color from hex ("#RRGGBB" or "RRGGBB") or "reset".
    fn parse_color(s: &str) -> Option<Color> {
        let lower = s.trim().to_ascii_lowercase();
        if lower == "reset" {
            return Some(Color::Reset);
        }
        let hex = lower.strip_prefix('#').unwrap_or(lower.as_str());
        if hex.len() != 6 {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Inverse of `parse_color`; every value a theme can hold is written back readable.
    fn color_to_str(c: Color) -> String {
        match c {
            Color::Rgb(r, g, b) => format!("#{:02X}{:02X}{:02X}", r, g, b),
            _ => "reset".to_string(),
        }
    }

    /// Persist the theme in `key = value` form.
    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# orguser-manager theme configuration\n");
        buf.push_str("# Colors: hex as #RRGGBB or RRGGBB, or 'reset'\n\n");
        let mut copy = *self;
        for (k, v) in copy.slots() {
            let _ = writeln!(&mut buf, "{} = {}", k, Self::color_to_str(*v));
        }
        std::fs::write(path, buf)
    }

    /// Load the theme from `path`, writing the default there first if it is missing.
    pub fn load_or_init(path: &str) -> Self {
        if Path::new(path).exists() {
            return Self::from_file(path).unwrap_or_else(Self::mocha);
        }
        if let Some(existing) = config_file_read_path("theme.conf") {
            return Self::from_file(&existing).unwrap_or_else(Self::mocha);
        }
        let t = Self::mocha();
        let _ = t.write_file(path);
        t
    }
}

/// Find an existing config file in the standard locations.
///
/// Looks in `$XDG_CONFIG_HOME/orguser-manager/` and then
/// `$HOME/.config/orguser-manager/`.
pub fn config_file_read_path(name: &str) -> Option<String> {
    let mut dirs: Vec<PathBuf> = Vec::new();
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        dirs.push(PathBuf::from(xdg).join("orguser-manager"));
    }
    if let Some(home) = std::env::var_os("HOME").filter(|v| !v.is_empty()) {
        dirs.push(PathBuf::from(home).join(".config").join("orguser-manager"));
    }
    dirs.into_iter()
        .map(|d| d.join(name))
        .find(|p| p.is_file())
        .map(|p| p.to_string_lossy().into_owned())
}

/// Overlays drawn above the main screen, other than the add-user dialog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModalState {
    Info { message: String },
    Help { scroll: u16 },
}

pub struct AppState {
    pub organization_id: String,
    pub is_admin: bool,
    /// Where reference data comes from, for the header.
    pub source: String,
    pub theme: Theme,
    pub keymap: Keymap,
    pub messages: Messages,
    pub dialog: AddUserDialog,
    /// Users added during this session, newest last.
    pub created: Vec<CreatedUser>,
    pub selected_index: usize,
    pub modal: Option<ModalState>,
    pub status: String,
    pub last_error: Option<String>,
    /// Reference fetches started but not yet reported back.
    pub pending_fetches: usize,
}

impl AppState {
    /// State with built-in theme, keymap and messages; touches no files.
    pub fn new(organization_id: &str, is_admin: bool, source: impl Into<String>) -> Self {
        Self {
            organization_id: organization_id.to_string(),
            is_admin,
            source: source.into(),
            theme: Theme::mocha(),
            keymap: Keymap::default(),
            messages: Messages::defaults(),
            dialog: AddUserDialog::new(organization_id, is_admin),
            created: Vec::new(),
            selected_index: 0,
            modal: None,
            status: String::new(),
            last_error: None,
            pending_fetches: 0,
        }
    }

    /// Like [`AppState::new`], loading `theme.conf`, `keybinds.conf` and
    /// `messages.conf` from `config_dir` (created with defaults when missing).
    pub fn with_config_dir(
        organization_id: &str,
        is_admin: bool,
        source: impl Into<String>,
        config_dir: &Path,
    ) -> Self {
        let path = |name: &str| config_dir.join(name).to_string_lossy().into_owned();
        Self {
            theme: Theme::load_or_init(&path("theme.conf")),
            keymap: Keymap::load_or_init(&path("keybinds.conf")),
            messages: Messages::load_or_init(&path("messages.conf")),
            ..Self::new(organization_id, is_admin, source)
        }
    }

    pub fn selected_user(&self) -> Option<&CreatedUser> {
        self.created.get(self.selected_index)
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;
