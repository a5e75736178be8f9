// Integration tests for orguser-manager

const FIXTURE: &str = r#"{
    "roles": [
        {"id":"r1","name":"Buyer","slug":"customer-buyer"},
        {"id":"r2","name":"Sales","slug":"sales-rep"},
        {"id":"r3","name":"Approver","slug":"customer-approver"}
    ],
    "organizations": {
        "org-1": {"costCenters": [{"id":"c1","name":"HQ"},{"id":"c2","name":"Branch"}]},
        "org-empty": {"costCenters": []}
    }
}"#;

fn buffer_text(buf: &ratatui::buffer::Buffer) -> String {
    let area = buf.area;
    let mut out = String::new();
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            out.push_str(buf[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}

fn fixture_services() -> (
    orguser_manager::app::update::Services,
    std::sync::mpsc::Receiver<orguser_manager::api::fetch::FetchEvent>,
) {
    use std::sync::Arc;
    use orguser_manager::api::Directory;
    use orguser_manager::api::fixture::FixtureDirectory;

    let (tx, rx) = std::sync::mpsc::channel();
    let directory: Arc<dyn Directory> = Arc::new(FixtureDirectory::from_json(FIXTURE).expect("fixture"));
    (orguser_manager::app::update::Services { directory, tx }, rx)
}

// 1) Config files roundtrip and init
#[test]
fn config_files_roundtrip_and_init() {
    use orguser_manager::app::Theme;
    use orguser_manager::app::keymap::{KeyAction, Keymap};
    use orguser_manager::app::messages::Messages;

    let dir = tempfile::tempdir().expect("tempdir");
    let path = |name: &str| dir.path().join(name).to_string_lossy().to_string();

    let t = Theme::mocha();
    t.write_file(&path("theme.conf")).expect("write theme");
    let t2 = Theme::from_file(&path("theme.conf")).expect("read theme");
    assert_eq!(format!("{:?}", t.text), format!("{:?}", t2.text));
    assert_eq!(format!("{:?}", t.error), format!("{:?}", t2.error));

    std::fs::write(path("keybinds.conf"), "Quit = Ctrl+x\nnonsense line\n").expect("write keybinds");
    let km = Keymap::from_file(&path("keybinds.conf")).expect("read keybinds");
    assert!(km.keys_for(KeyAction::Quit).contains(&"Ctrl+x".to_string()));
    // defaults are still present underneath
    assert!(km.keys_for(KeyAction::Quit).contains(&"q".to_string()));

    std::fs::write(path("messages.conf"), "admin.organization-details.add-user = New operator user\n").expect("write messages");
    let m = Messages::from_file(&path("messages.conf")).expect("read messages");
    assert_eq!(m.label_set(true).title, "New operator user");
    assert_eq!(m.label_set(false).title, "Add new user");

    let fresh = path("fresh-messages.conf");
    Messages::defaults().write_file(&fresh).expect("write messages");
    let reread = Messages::from_file(&fresh).expect("reread messages");
    assert_eq!(reread.label_set(false), Messages::defaults().label_set(false));
}

// 2) Reference fetch workers deliver both lists, in either order
#[test]
fn fetch_workers_populate_dialog_for_both_scopes() {
    use orguser_manager::api::Scope;
    use orguser_manager::api::fetch::spawn_reference_fetches;
    use orguser_manager::app::dialog::AddUserDialog;
    use orguser_manager::app::update::handle_fetch_event;
    use orguser_manager::app::AppState;

    for is_admin in [true, false] {
        let (services, rx) = fixture_services();
        let mut app = AppState::new("org-1", is_admin, "fixtures");
        app.dialog = AddUserDialog::new("org-1", is_admin);
        app.dialog.set_open(true);
        let handles = spawn_reference_fetches(
            services.directory.clone(),
            "org-1",
            Scope::from_admin(is_admin),
            services.tx.clone(),
        );
        app.pending_fetches = handles.len();
        for h in handles {
            h.join().expect("worker");
        }
        for _ in 0..2 {
            handle_fetch_event(&mut app, rx.recv().expect("event"));
        }
        assert!(app.dialog.is_visible(), "admin={is_admin}");
        let roles: Vec<&str> = app.dialog.options().roles.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(roles, ["r1", "r3"]);
        assert_eq!(app.dialog.draft().cost_center_id, "c1");
    }
}

// 3) An organization without cost centers never shows the dialog
#[test]
fn empty_cost_centers_render_nothing() {
    use orguser_manager::app::AppState;
    use orguser_manager::app::update::{handle_fetch_event, open_dialog};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    let (services, rx) = fixture_services();
    let mut app = AppState::new("org-empty", false, "fixtures");
    open_dialog(&mut app, &services);
    for _ in 0..2 {
        handle_fetch_event(&mut app, rx.recv().expect("event"));
    }
    assert!(app.dialog.is_open());
    assert!(!app.dialog.is_visible());
    assert_eq!(app.dialog.draft().cost_center_id, "");

    let mut terminal = Terminal::new(TestBackend::new(100, 30)).expect("terminal");
    terminal.draw(|f| orguser_manager::ui::render(f, &mut app)).expect("draw");
    let text = buffer_text(terminal.backend().buffer());
    assert!(!text.contains("Add new user"));
    assert!(text.contains("LOADING"));
}

// 4) Full flow: open, fill in, submit, see the new user listed
#[test]
fn add_user_end_to_end_with_rendering() {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use orguser_manager::app::AppState;
    use orguser_manager::app::update::{handle_fetch_event, handle_key};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    let (services, rx) = fixture_services();
    let mut app = AppState::new("org-1", true, "fixtures");
    app.messages.set("admin.organization-details.add-user", "Operator: add user");
    let press = |app: &mut AppState, code: KeyCode| {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE), &services)
    };

    press(&mut app, KeyCode::Char('n'));
    for _ in 0..2 {
        handle_fetch_event(&mut app, rx.recv().expect("event"));
    }

    let mut terminal = Terminal::new(TestBackend::new(100, 30)).expect("terminal");
    terminal.draw(|f| orguser_manager::ui::render(f, &mut app)).expect("draw");
    let text = buffer_text(terminal.backend().buffer());
    assert!(text.contains("Operator: add user"));
    assert!(text.contains("Add a user to this organization"));
    assert!(text.contains("HQ"));
    // no role picked yet
    assert!(text.contains("Select a role"));

    for c in "Ada".chars() {
        press(&mut app, KeyCode::Char(c));
    }
    press(&mut app, KeyCode::Tab);
    for c in "ada@example.com".chars() {
        press(&mut app, KeyCode::Char(c));
    }
    press(&mut app, KeyCode::Tab); // cost center keeps HQ
    press(&mut app, KeyCode::Tab);
    press(&mut app, KeyCode::Right); // first eligible role
    press(&mut app, KeyCode::Tab);
    press(&mut app, KeyCode::Tab);
    assert!(app.dialog.confirm_enabled());
    press(&mut app, KeyCode::Enter);
    assert!(app.dialog.is_loading());

    handle_fetch_event(&mut app, rx.recv().expect("created"));
    assert!(!app.dialog.is_open());
    assert_eq!(app.created.len(), 1);
    assert_eq!(app.created[0].role_id, "r1");
    assert_eq!(app.created[0].cost_center_id, "c1");

    // dismiss the info modal and look at the main screen
    press(&mut app, KeyCode::Esc);
    terminal.draw(|f| orguser_manager::ui::render(f, &mut app)).expect("draw");
    let text = buffer_text(terminal.backend().buffer());
    assert!(text.contains("ada@example.com"));
    assert!(text.contains("Buyer"));
}

// 5) Store view reads its own labels and keeps its options across an empty reload
#[test]
fn store_labels_and_empty_reload() {
    use orguser_manager::api::fetch::FetchEvent;
    use orguser_manager::api::CostCentersResponse;
    use orguser_manager::app::AppState;
    use orguser_manager::app::update::{handle_fetch_event, open_dialog};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    let (services, rx) = fixture_services();
    let mut app = AppState::new("org-1", false, "fixtures");
    app.messages.set("store.user-details.placeholder-role", "Pick a buyer role");
    app.messages.set("admin.user-details.placeholder-role", "Operator role");
    open_dialog(&mut app, &services);
    for _ in 0..2 {
        handle_fetch_event(&mut app, rx.recv().expect("event"));
    }

    handle_fetch_event(&mut app, FetchEvent::Roles(Ok(vec![])));
    handle_fetch_event(&mut app, FetchEvent::CostCenters(Ok(CostCentersResponse::storefront(vec![]))));
    assert!(app.dialog.is_visible());
    assert_eq!(app.dialog.draft().cost_center_id, "c1");

    let mut terminal = Terminal::new(TestBackend::new(100, 30)).expect("terminal");
    terminal.draw(|f| orguser_manager::ui::render(f, &mut app)).expect("draw");
    let text = buffer_text(terminal.backend().buffer());
    assert!(text.contains("Pick a buyer role"));
    assert!(!text.contains("Operator role"));
}
