//! The "add user" dialog: draft record, reference options, focus and key handling.
//!
//! The dialog never talks to the directory itself. Reference data is pushed in
//! through [`AddUserDialog::on_roles_loaded`] and
//! [`AddUserDialog::on_cost_centers_loaded`], and user intent comes back out as
//! a [`DialogAction`] for the owner to act on.
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use crate::api::{CostCentersResponse, Role, Scope};
use crate::app::form::{DraftField, DraftUser};
use crate::app::keymap::{KeyAction, Keymap};
use crate::app::reference::{OptionEntry, ReferenceOptions, index_of};

/// Observable lifecycle of the dialog.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DialogPhase {
    Closed,
    LoadingReferences,
    Ready,
    Submitting,
}

/// Focusable controls, in tab order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DialogFocus {
    Name,
    Email,
    CostCenter,
    Role,
    Cancel,
    Confirm,
}

impl DialogFocus {
    const ORDER: [DialogFocus; 6] = [
        DialogFocus::Name,
        DialogFocus::Email,
        DialogFocus::CostCenter,
        DialogFocus::Role,
        DialogFocus::Cancel,
        DialogFocus::Confirm,
    ];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        let n = Self::ORDER.len();
        Self::ORDER[(self.position() + n - 1) % n]
    }

    /// The draft field edited by this control, if any.
    pub fn field(self) -> Option<DraftField> {
        match self {
            DialogFocus::Name => Some(DraftField::Name),
            DialogFocus::Email => Some(DraftField::Email),
            DialogFocus::CostCenter => Some(DraftField::CostCenter),
            DialogFocus::Role => Some(DraftField::Role),
            DialogFocus::Cancel | DialogFocus::Confirm => None,
        }
    }

    fn is_text(self) -> bool {
        matches!(self, DialogFocus::Name | DialogFocus::Email)
    }

    fn is_dropdown(self) -> bool {
        matches!(self, DialogFocus::CostCenter | DialogFocus::Role)
    }
}

/// What the owner of the dialog is asked to do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DialogAction {
    /// Create a user from this snapshot of the draft.
    Submit(DraftUser),
    /// Dismiss the dialog; the draft is discarded.
    Close,
}

#[derive(Clone, Debug)]
pub struct AddUserDialog {
    is_open: bool,
    loading: bool,
    is_admin: bool,
    organization_id: String,
    draft: DraftUser,
    options: ReferenceOptions,
    focus: DialogFocus,
    picker: Option<usize>,
}

impl AddUserDialog {
    pub fn new(organization_id: impl Into<String>, is_admin: bool) -> Self {
        let organization_id = organization_id.into();
        Self {
            is_open: false,
            loading: false,
            is_admin,
            draft: DraftUser::seeded(&organization_id, None),
            organization_id,
            options: ReferenceOptions::default(),
            focus: DialogFocus::Name,
            picker: None,
        }
    }

    /// Show or hide the dialog. Hiding always resets the draft.
    pub fn set_open(&mut self, open: bool) {
        if !open {
            self.reset();
        }
        self.is_open = open;
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    fn reset(&mut self) {
        self.draft = DraftUser::seeded(&self.organization_id, self.options.first_cost_center());
        self.focus = DialogFocus::Name;
        self.picker = None;
        debug!(organization = %self.organization_id, "add-user draft reset");
    }

    pub fn on_roles_loaded(&mut self, roles: &[Role]) {
        self.options.apply_roles(roles);
        debug!(upstream = roles.len(), options = self.options.roles.len(), "role options projected");
    }

    /// Project cost centers and select the first one, replacing any current choice.
    pub fn on_cost_centers_loaded(&mut self, response: &CostCentersResponse) {
        if let Some(default) = self.options.apply_cost_centers(response, self.scope()) {
            self.draft = self.draft.with_field(DraftField::CostCenter, default);
            debug!(options = self.options.cost_centers.len(), "cost-center options projected");
        }
    }

    /// Replace a single field of the draft.
    pub fn update(&mut self, field: DraftField, value: impl Into<String>) {
        self.draft = self.draft.with_field(field, value);
    }

    pub fn draft(&self) -> &DraftUser {
        &self.draft
    }

    pub fn options(&self) -> &ReferenceOptions {
        &self.options
    }

    pub fn focus(&self) -> DialogFocus {
        self.focus
    }

    /// Highlighted row of the open dropdown list, if one is open.
    pub fn picker(&self) -> Option<usize> {
        self.picker
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    pub fn scope(&self) -> Scope {
        Scope::from_admin(self.is_admin)
    }

    pub fn organization_id(&self) -> &str {
        &self.organization_id
    }

    /// Interactive content exists only once both option lists are populated.
    pub fn is_ready(&self) -> bool {
        self.options.is_ready()
    }

    pub fn is_visible(&self) -> bool {
        self.is_open && self.is_ready()
    }

    pub fn can_submit(&self) -> bool {
        self.draft.can_submit()
    }

    pub fn confirm_enabled(&self) -> bool {
        self.can_submit() && !self.loading
    }

    pub fn phase(&self) -> DialogPhase {
        if !self.is_open {
            DialogPhase::Closed
        } else if !self.is_ready() {
            DialogPhase::LoadingReferences
        } else if self.loading {
            DialogPhase::Submitting
        } else {
            DialogPhase::Ready
        }
    }

    pub fn cancel(&self) -> DialogAction {
        DialogAction::Close
    }

    pub fn confirm(&self) -> Option<DialogAction> {
        self.confirm_enabled().then(|| DialogAction::Submit(self.draft.clone()))
    }

    fn options_for(&self, focus: DialogFocus) -> &[OptionEntry] {
        match focus {
            DialogFocus::CostCenter => &self.options.cost_centers,
            DialogFocus::Role => &self.options.roles,
            _ => &[],
        }
    }

    /// Move the focused dropdown's selection by `delta`, wrapping around.
    fn cycle_option(&mut self, delta: isize) {
        let Some(field) = self.focus.field() else { return };
        let opts = self.options_for(self.focus);
        if opts.is_empty() {
            return;
        }
        let len = opts.len() as isize;
        let next = match index_of(opts, self.draft.field(field)) {
            Some(i) => (i as isize + delta).rem_euclid(len) as usize,
            None => 0,
        };
        let value = opts[next].value.clone();
        self.update(field, value);
    }

    fn handle_picker_key(&mut self, action: Option<KeyAction>, highlighted: usize) {
        let len = self.options_for(self.focus).len();
        match action {
            Some(KeyAction::MoveUp) | Some(KeyAction::OptionPrev) => {
                self.picker = Some(highlighted.saturating_sub(1));
            }
            Some(KeyAction::MoveDown) | Some(KeyAction::OptionNext) => {
                self.picker = Some((highlighted + 1).min(len.saturating_sub(1)));
            }
            Some(KeyAction::Confirm) => {
                let picked = self.options_for(self.focus).get(highlighted).map(|o| o.value.clone());
                if let (Some(value), Some(field)) = (picked, self.focus.field()) {
                    self.update(field, value);
                }
                self.picker = None;
            }
            Some(KeyAction::Cancel) => self.picker = None,
            _ => {}
        }
    }

    /// Apply a key press. Returns an action when the owner has to step in.
    pub fn handle_key(&mut self, key: KeyEvent, keymap: &Keymap) -> Option<DialogAction> {
        let action = keymap.resolve(&key);
        if !self.is_visible() {
            // nothing is drawn yet, but dismissal still works
            return matches!(action, Some(KeyAction::Cancel)).then(|| self.cancel());
        }

        if let Some(highlighted) = self.picker {
            self.handle_picker_key(action, highlighted);
            return None;
        }

        if self.focus.is_text() {
            let field = self.focus.field()?;
            match key.code {
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    let mut value = self.draft.field(field).to_string();
                    value.push(c);
                    self.update(field, value);
                    return None;
                }
                KeyCode::Backspace => {
                    let mut value = self.draft.field(field).to_string();
                    value.pop();
                    self.update(field, value);
                    return None;
                }
                _ => {}
            }
        }

        match action {
            Some(KeyAction::NextField) | Some(KeyAction::MoveDown) => self.focus = self.focus.next(),
            Some(KeyAction::PrevField) | Some(KeyAction::MoveUp) => self.focus = self.focus.prev(),
            Some(KeyAction::OptionNext) if self.focus.is_dropdown() => self.cycle_option(1),
            Some(KeyAction::OptionPrev) if self.focus.is_dropdown() => self.cycle_option(-1),
            Some(KeyAction::OptionNext) | Some(KeyAction::OptionPrev)
                if matches!(self.focus, DialogFocus::Cancel | DialogFocus::Confirm) =>
            {
                self.focus = if self.focus == DialogFocus::Cancel {
                    DialogFocus::Confirm
                } else {
                    DialogFocus::Cancel
                };
            }
            Some(KeyAction::Cancel) => return Some(self.cancel()),
            Some(KeyAction::Confirm) => match self.focus {
                DialogFocus::Name | DialogFocus::Email => self.focus = self.focus.next(),
                DialogFocus::CostCenter | DialogFocus::Role => {
                    let current = self.focus.field().map(|f| self.draft.field(f)).unwrap_or("");
                    self.picker = Some(index_of(self.options_for(self.focus), current).unwrap_or(0));
                }
                DialogFocus::Cancel => return Some(self.cancel()),
                DialogFocus::Confirm => return self.confirm(),
            },
            _ => {}
        }
        None
    }
}
