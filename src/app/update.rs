use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::sync::Arc;
use std::sync::mpsc::{self, Sender};
use std::time::Duration;
use tracing::{info, warn};

use crate::api::Directory;
use crate::api::fetch::{FetchEvent, spawn_create_user, spawn_reference_fetches};
use crate::app::dialog::DialogAction;
use crate::app::form::DraftUser;
use crate::app::keymap::KeyAction;
use crate::app::{AppState, ModalState};
use crate::ui;

/// Handles the event loop needs to start background work.
pub struct Services {
    pub directory: Arc<dyn Directory>,
    pub tx: Sender<FetchEvent>,
}

/// Whether the loop should keep going after an input event.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut AppState,
    directory: Arc<dyn Directory>,
) -> Result<()> {
    let (tx, rx) = mpsc::channel();
    let services = Services { directory, tx };
    refresh_references(app, &services);

    loop {
        terminal.draw(|f| {
            ui::render(f, app);
        })?;

        while let Ok(ev) = rx.try_recv() {
            handle_fetch_event(app, ev);
        }

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && handle_key(app, key, &services) == Flow::Quit {
                    break;
                }
            }
        }
    }
    info!("exiting");
    Ok(())
}

/// Start fetching roles and cost centers unless a fetch is already running.
pub fn refresh_references(app: &mut AppState, services: &Services) {
    if app.pending_fetches > 0 {
        return;
    }
    let handles = spawn_reference_fetches(
        Arc::clone(&services.directory),
        &app.organization_id,
        app.dialog.scope(),
        services.tx.clone(),
    );
    app.pending_fetches = handles.len();
    app.status = "Loading roles and cost centers...".to_string();
    info!(organization = %app.organization_id, scope = ?app.dialog.scope(), "reference fetch started");
}

/// Open the add-user dialog, fetching reference data if it is still missing.
pub fn open_dialog(app: &mut AppState, services: &Services) {
    app.dialog.set_open(true);
    if !app.dialog.is_ready() {
        refresh_references(app, services);
    }
    info!(phase = ?app.dialog.phase(), "add-user dialog opened");
}

/// Submit handler for the dialog: create the user in the background.
pub fn handle_add_new_user(app: &mut AppState, record: DraftUser, services: &Services) {
    if app.dialog.is_loading() {
        return;
    }
    info!(email = %record.email, role = %record.role_id, cost_center = %record.cost_center_id, "submitting new user");
    app.dialog.set_loading(true);
    app.last_error = None;
    app.status = format!("Creating {}...", record.email);
    spawn_create_user(Arc::clone(&services.directory), record, services.tx.clone());
}

/// Close handler for the dialog: hide it and clear the last submission error.
pub fn handle_close_modal(app: &mut AppState) {
    app.dialog.set_open(false);
    app.last_error = None;
    info!("add-user dialog closed");
}

fn reference_fetch_done(app: &mut AppState) {
    app.pending_fetches = app.pending_fetches.saturating_sub(1);
    if app.pending_fetches == 0 {
        let opts = app.dialog.options();
        app.status = format!(
            "{} roles, {} cost centers available",
            opts.roles.len(),
            opts.cost_centers.len()
        );
    }
}

/// Apply the result of a background call to the application state.
pub fn handle_fetch_event(app: &mut AppState, ev: FetchEvent) {
    match ev {
        FetchEvent::Roles(res) => {
            match res {
                Ok(roles) => app.dialog.on_roles_loaded(&roles),
                // the dialog just stays unready; details are in the log
                Err(e) => warn!(error = %e, "roles unavailable"),
            }
            reference_fetch_done(app);
        }
        FetchEvent::CostCenters(res) => {
            match res {
                Ok(resp) => app.dialog.on_cost_centers_loaded(&resp),
                Err(e) => warn!(error = %e, "cost centers unavailable"),
            }
            reference_fetch_done(app);
        }
        FetchEvent::UserCreated(Ok(user)) => {
            app.dialog.set_loading(false);
            let message = format!("Added {} <{}>", user.name, user.email);
            app.created.push(user);
            app.selected_index = app.created.len() - 1;
            handle_close_modal(app);
            app.status = message.clone();
            app.modal = Some(ModalState::Info { message });
        }
        FetchEvent::UserCreated(Err(e)) => {
            app.dialog.set_loading(false);
            app.status = "Could not add user".to_string();
            app.last_error = Some(e);
        }
    }
}

fn handle_modal_key(app: &mut AppState, action: Option<KeyAction>) {
    match action {
        Some(KeyAction::Cancel) | Some(KeyAction::Confirm) => app.modal = None,
        Some(KeyAction::MoveDown) => {
            if let Some(ModalState::Help { scroll }) = app.modal.as_mut() {
                *scroll = scroll.saturating_add(1);
            }
        }
        Some(KeyAction::MoveUp) => {
            if let Some(ModalState::Help { scroll }) = app.modal.as_mut() {
                *scroll = scroll.saturating_sub(1);
            }
        }
        _ => {}
    }
}

/// Route a key press to the topmost layer: modal, dialog, then main screen.
pub fn handle_key(app: &mut AppState, key: KeyEvent, services: &Services) -> Flow {
    let action = app.keymap.resolve(&key);

    if app.modal.is_some() {
        handle_modal_key(app, action);
        return Flow::Continue;
    }

    if app.dialog.is_open() {
        match app.dialog.handle_key(key, &app.keymap) {
            Some(DialogAction::Submit(record)) => handle_add_new_user(app, record, services),
            Some(DialogAction::Close) => handle_close_modal(app),
            None => {}
        }
        return Flow::Continue;
    }

    match action {
        Some(KeyAction::Quit) => return Flow::Quit,
        Some(KeyAction::NewUser) => open_dialog(app, services),
        Some(KeyAction::OpenHelp) => app.modal = Some(ModalState::Help { scroll: 0 }),
        Some(KeyAction::Refresh) => refresh_references(app, services),
        Some(KeyAction::MoveUp) => app.selected_index = app.selected_index.saturating_sub(1),
        Some(KeyAction::MoveDown) => {
            app.selected_index = (app.selected_index + 1).min(app.created.len().saturating_sub(1));
        }
        Some(KeyAction::Confirm) => {
            if let Some(u) = app.selected_user() {
                let message = format!(
                    "{} <{}>\nid: {}\nrole: {}\ncost center: {}",
                    u.name, u.email, u.id, u.role_id, u.cost_center_id
                );
                app.modal = Some(ModalState::Info { message });
            }
        }
        _ => {}
    }
    Flow::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fixture::FixtureDirectory;
    use crossterm::event::{KeyCode, KeyModifiers};
    use std::sync::mpsc::Receiver;

    const FIXTURE: &str = r#"{
        "roles": [
            {"id":"r1","name":"Buyer","slug":"customer-buyer"},
            {"id":"r2","name":"Admin","slug":"system-admin"}
        ],
        "organizations": {"org-1": {"costCenters": [{"id":"c1","name":"HQ"}]}}
    }"#;

    fn setup() -> (AppState, Services, Receiver<FetchEvent>) {
        let (tx, rx) = mpsc::channel();
        let directory: Arc<dyn Directory> = Arc::new(FixtureDirectory::from_json(FIXTURE).unwrap());
        (AppState::new("org-1", false, "test"), Services { directory, tx }, rx)
    }

    fn drain(app: &mut AppState, rx: &Receiver<FetchEvent>, n: usize) {
        for _ in 0..n {
            let ev = rx.recv_timeout(Duration::from_secs(5)).expect("fetch event");
            handle_fetch_event(app, ev);
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn opening_dialog_fetches_references_once() {
        let (mut app, services, rx) = setup();
        open_dialog(&mut app, &services);
        assert_eq!(app.pending_fetches, 2);
        // a second request while in flight is ignored
        refresh_references(&mut app, &services);
        assert_eq!(app.pending_fetches, 2);
        drain(&mut app, &rx, 2);
        assert_eq!(app.pending_fetches, 0);
        assert!(app.dialog.is_visible());
        assert_eq!(app.dialog.draft().cost_center_id, "c1");
        assert_eq!(app.status, "1 roles, 1 cost centers available");
    }

    #[test]
    fn submit_success_closes_dialog_and_records_user() {
        let (mut app, services, rx) = setup();
        open_dialog(&mut app, &services);
        drain(&mut app, &rx, 2);
        for c in "Ada".chars() {
            handle_key(&mut app, key(KeyCode::Char(c)), &services);
        }
        let record = app
            .dialog
            .draft()
            .with_field(crate::app::form::DraftField::Email, "ada@example.com")
            .with_field(crate::app::form::DraftField::Role, "r1");
        handle_add_new_user(&mut app, record, &services);
        assert!(app.dialog.is_loading());
        drain(&mut app, &rx, 1);
        assert!(!app.dialog.is_loading());
        assert!(!app.dialog.is_open());
        assert_eq!(app.created.len(), 1);
        assert_eq!(app.created[0].email, "ada@example.com");
        assert!(matches!(app.modal, Some(ModalState::Info { .. })));
        assert_eq!(app.dialog.draft().name, "");
    }

    #[test]
    fn submit_failure_keeps_dialog_open_until_closed() {
        let (mut app, services, rx) = setup();
        open_dialog(&mut app, &services);
        drain(&mut app, &rx, 2);
        let record = DraftUser {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            organization_id: "org-404".into(),
            cost_center_id: "c1".into(),
            role_id: "r1".into(),
        };
        handle_add_new_user(&mut app, record, &services);
        drain(&mut app, &rx, 1);
        assert!(app.dialog.is_open());
        assert!(app.last_error.is_some());
        handle_key(&mut app, key(KeyCode::Esc), &services);
        assert!(!app.dialog.is_open());
        assert!(app.last_error.is_none());
    }

    #[test]
    fn quit_only_from_main_screen() {
        let (mut app, services, _rx) = setup();
        app.dialog.set_open(true);
        assert_eq!(handle_key(&mut app, key(KeyCode::Char('q')), &services), Flow::Continue);
        app.dialog.set_open(false);
        assert_eq!(handle_key(&mut app, key(KeyCode::Char('q')), &services), Flow::Quit);
    }

    #[test]
    fn help_modal_scrolls_and_closes() {
        let (mut app, services, _rx) = setup();
        handle_key(&mut app, key(KeyCode::Char('?')), &services);
        handle_key(&mut app, key(KeyCode::Down), &services);
        assert_eq!(app.modal, Some(ModalState::Help { scroll: 1 }));
        handle_key(&mut app, key(KeyCode::Esc), &services);
        assert_eq!(app.modal, None);
    }
}
