//! Rendering: main screen, status bar and overlays.
pub mod add_user;
pub mod components;
pub mod users;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::messages::namespace_for;
use crate::app::{AppState, ModalState};

pub fn render(f: &mut Frame, app: &mut AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Length(1)].as_ref())
        .split(f.area());
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)].as_ref())
        .split(root[1]);

    let view = namespace_for(app.is_admin);
    let p = Paragraph::new(format!(
        "organization: {}  view: {view}  source: {}  added: {}  | n: new user; r: reload; ?: help; q: quit",
        app.organization_id,
        app.source,
        app.created.len()
    ))
    .block(
        Block::default()
            .title("orguser-manager")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    )
    .style(Style::default().fg(app.theme.header_fg).bg(app.theme.header_bg));
    f.render_widget(p, root[0]);

    users::render_created_table(f, body[0], app);
    users::render_user_details(f, body[1], app);
    components::render_status_bar(f, root[2], app);

    // renders nothing until both reference lists are in
    if app.dialog.is_visible() {
        add_user::render_add_user_dialog(f, f.area(), app);
    }

    match app.modal.clone() {
        Some(state @ ModalState::Info { .. }) => components::render_info_modal(f, f.area(), app, &state),
        Some(ModalState::Help { scroll }) => components::render_help_modal(f, f.area(), app, scroll),
        None => {}
    }
}
