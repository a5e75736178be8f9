//! Message catalog: parse/write `messages.conf` and resolve dialog labels.
//!
//! Labels live under two namespaces, `admin` (operator view) and `store`
//! (storefront view). Both ship with the same English defaults; the
//! namespace only decides which keys are read, so an installation can
//! reword one view without touching the other.
//!
//! Lines use `<namespace>.<key> = <text>`, e.g.
//! `store.user-details.placeholder-role = Pick a role`. Unknown keys are kept
//! and can be looked up, missing keys resolve to the key itself.

use std::collections::BTreeMap;

/// Namespace for the operator view.
pub const ADMIN_NAMESPACE: &str = "admin";
/// Namespace for the storefront view.
pub const STORE_NAMESPACE: &str = "store";

const DEFAULTS: [(&str, &str); 10] = [
    ("organization-details.add-user", "Add new user"),
    ("organization-details.add-user.helpText", "Add a user to this organization and pick a role."),
    ("organization-details.button.add", "Add"),
    ("organization-details.button.cancel", "Cancel"),
    ("user-details.name", "Name"),
    ("user-details.email", "Email"),
    ("user-details.costCenter", "Cost center"),
    ("user-details.placeholder-costCenter", "Select a cost center"),
    ("user-details.role", "Role"),
    ("user-details.placeholder-role", "Select a role"),
];

pub fn namespace_for(is_admin: bool) -> &'static str {
    if is_admin { ADMIN_NAMESPACE } else { STORE_NAMESPACE }
}

/// Resolved strings for one rendering of the dialog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelSet {
    pub title: String,
    pub help: String,
    pub add: String,
    pub cancel: String,
    pub name: String,
    pub email: String,
    pub cost_center: String,
    pub cost_center_placeholder: String,
    pub role: String,
    pub role_placeholder: String,
}

#[derive(Clone, Debug)]
pub struct Messages {
    entries: BTreeMap<String, String>,
}

impl Messages {
    /// Catalog holding the built-in strings for both namespaces.
    pub fn defaults() -> Self {
        let mut entries = BTreeMap::new();
        for ns in [ADMIN_NAMESPACE, STORE_NAMESPACE] {
            for (key, text) in DEFAULTS {
                entries.insert(format!("{ns}.{key}"), text.to_string());
            }
        }
        Self { entries }
    }

    /// Look up a fully qualified key; falls back to the key itself.
    pub fn get<'a>(&'a self, key: &'a str) -> &'a str {
        self.entries.get(key).map(String::as_str).unwrap_or(key)
    }

    pub fn set(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.entries.insert(key.into(), text.into());
    }

    /// Resolve every dialog label from the namespace selected by `is_admin`.
    pub fn label_set(&self, is_admin: bool) -> LabelSet {
        let ns = namespace_for(is_admin);
        let t = |key: &str| {
            let full = format!("{ns}.{key}");
            self.entries.get(&full).cloned().unwrap_or(full)
        };
        LabelSet {
            title: t("organization-details.add-user"),
            help: t("organization-details.add-user.helpText"),
            add: t("organization-details.button.add"),
            cancel: t("organization-details.button.cancel"),
            name: t("user-details.name"),
            email: t("user-details.email"),
            cost_center: t("user-details.costCenter"),
            cost_center_placeholder: t("user-details.placeholder-costCenter"),
            role: t("user-details.role"),
            role_placeholder: t("user-details.placeholder-role"),
        }
    }

    /// Load the catalog from a file, or write the defaults there if it doesn't exist.
    ///
    /// Falls back to the standard config locations before creating a new file.
    pub fn load_or_init(path: &str) -> Self {
        let p = std::path::Path::new(path);
        if p.exists() {
            return Self::from_file(path).unwrap_or_else(Self::defaults);
        }
        if let Some(existing) = crate::app::config_file_read_path("messages.conf") {
            return Self::from_file(&existing).unwrap_or_else(Self::defaults);
        }
        let cfg = Self::defaults();
        let _ = cfg.write_file(path);
        cfg
    }

    /// Load overrides from a file on top of the defaults.
    ///
    /// Returns `None` if the file can't be read.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut cfg = Self::defaults();
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
            cfg.set(lhs, rhs);
        }
        Some(cfg)
    }

    /// Write the whole catalog in `key = text` form.
    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# orguser-manager messages\n");
        buf.push_str("# Format: <namespace>.<key> = <text>\n");
        buf.push_str("# Namespaces: admin (operator view), store (storefront view)\n\n");
        for (k, v) in &self.entries {
            let _ = writeln!(&mut buf, "{} = {}", k, v);
        }
        std::fs::write(path, buf)
    }
}

impl Default for Messages {
    fn default() -> Self {
        Self::defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespaces_share_default_text() {
        let m = Messages::defaults();
        assert_eq!(m.label_set(true), m.label_set(false));
        assert_eq!(m.get("admin.user-details.name"), "Name");
        assert_eq!(m.label_set(false).role_placeholder, "Select a role");
    }

    #[test]
    fn override_applies_to_one_namespace() {
        let mut m = Messages::defaults();
        m.set("store.organization-details.button.add", "Invite");
        assert_eq!(m.label_set(false).add, "Invite");
        assert_eq!(m.label_set(true).add, "Add");
    }

    #[test]
    fn missing_key_resolves_to_itself() {
        let m = Messages::defaults();
        assert_eq!(m.get("admin.nope"), "admin.nope");
    }
}
