use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use crate::app::AppState;
use crate::app::reference::label_for;

/// Table of users added during this session.
pub fn render_created_table(f: &mut Frame, area: Rect, app: &AppState) {
    let rows_per_page = (area.height.saturating_sub(3) as usize).max(1);
    let start = (app.selected_index / rows_per_page) * rows_per_page;
    let end = (start + rows_per_page).min(app.created.len());
    let slice = app.created.get(start..end).unwrap_or_default();

    let rows = slice.iter().enumerate().map(|(i, u)| {
        let style = if start + i == app.selected_index {
            Style::default()
                .fg(app.theme.highlight_fg)
                .bg(app.theme.highlight_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text)
        };
        Row::new(vec![
            Cell::from(u.id.clone()),
            Cell::from(u.name.clone()),
            Cell::from(u.email.clone()),
        ])
        .style(style)
    });

    let widths = [Constraint::Length(10), Constraint::Percentage(40), Constraint::Percentage(60)];
    let header = Row::new(vec!["ID", "NAME", "EMAIL"]).style(
        Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD),
    );
    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title("Added this session")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .column_spacing(1);
    f.render_widget(table, area);
}

/// Details of the selected user, with role and cost center shown by label when known.
pub fn render_user_details(f: &mut Frame, area: Rect, app: &AppState) {
    let text = match app.selected_user() {
        Some(u) => {
            let opts = app.dialog.options();
            let role = label_for(&opts.roles, &u.role_id).unwrap_or(&u.role_id);
            let cost_center = label_for(&opts.cost_centers, &u.cost_center_id).unwrap_or(&u.cost_center_id);
            format!(
                "Name: {}\nEmail: {}\nID: {}\nRole: {}\nCost center: {}",
                u.name, u.email, u.id, role, cost_center
            )
        }
        None => "No users added yet. Press n to add one.".to_string(),
    };
    let p = Paragraph::new(text).style(Style::default().fg(app.theme.text)).block(
        Block::default()
            .title("Details")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(p, area);
}
