//! Shared UI components (status bar, modal helpers).
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::dialog::DialogPhase;
use crate::app::keymap::KeyAction;
use crate::app::{AppState, ModalState};

/// Render the bottom status bar with dialog phase, last message and any error.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let phase = match app.dialog.phase() {
        DialogPhase::Closed => "MAIN",
        DialogPhase::LoadingReferences => "LOADING",
        DialogPhase::Ready => "ADD USER",
        DialogPhase::Submitting => "SAVING",
    };
    let mut spans = vec![Span::raw(format!("mode: {phase}  {}", app.status))];
    if let Some(err) = app.last_error.as_deref() {
        spans.push(Span::styled(
            format!("  error: {err}"),
            Style::default().fg(app.theme.error).add_modifier(Modifier::BOLD),
        ));
    }
    let p = Paragraph::new(Line::from(spans)).style(
        Style::default()
            .fg(app.theme.status_fg)
            .bg(app.theme.status_bg),
    );
    f.render_widget(p, area);
}

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render a generic informational modal dialog.
pub fn render_info_modal(f: &mut Frame, area: Rect, app: &AppState, state: &ModalState) {
    if let ModalState::Info { message } = state {
        let max_w = area.width.saturating_sub(6).max(30);
        let min_w = 48u16.min(max_w);
        let wrapped = (message.len() as u16 / (min_w.saturating_sub(4).max(10))).max(1);
        let lines = (message.lines().count() as u16).max(wrapped);
        let max_h = area.height.saturating_sub(6).max(5);
        let height = (lines + 4).min(max_h).max(5);
        let rect = centered_rect(min_w, height, area);
        let p = Paragraph::new(format!("{message}\n\nEnter / Esc to close"))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .title("Info")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(app.theme.border)),
            );
        f.render_widget(Clear, rect);
        f.render_widget(p, rect);
    }
}

fn key_line(app: &AppState, label: &str, action: KeyAction) -> Line<'static> {
    Line::from(vec![
        Span::raw(format!("{label}: ")),
        Span::styled(
            app.keymap.keys_for(action).join(", "),
            Style::default().add_modifier(Modifier::ITALIC),
        ),
    ])
}

/// Render the help modal; key names come from the active keymap.
pub fn render_help_modal(f: &mut Frame, area: Rect, app: &AppState, scroll: u16) {
    let width = 72u16.min(area.width.saturating_sub(4)).max(40);
    let height = 22u16.min(area.height.saturating_sub(4)).max(10);
    let rect = centered_rect(width, height, area);
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let lines: Vec<Line> = vec![
        Line::from(Span::styled("Main screen", bold)),
        key_line(app, "Add user", KeyAction::NewUser),
        key_line(app, "Reload roles and cost centers", KeyAction::Refresh),
        key_line(app, "Move selection", KeyAction::MoveDown),
        key_line(app, "Show selected user", KeyAction::Confirm),
        key_line(app, "Quit", KeyAction::Quit),
        Line::raw(""),
        Line::from(Span::styled("Add user dialog", bold)),
        Line::raw("Type to edit name and email; Backspace deletes"),
        key_line(app, "Next field", KeyAction::NextField),
        key_line(app, "Previous field", KeyAction::PrevField),
        key_line(app, "Previous / next option", KeyAction::OptionPrev),
        key_line(app, "Open list / press button", KeyAction::Confirm),
        key_line(app, "Close dialog or list", KeyAction::Cancel),
        Line::raw(""),
        Line::raw("The dialog appears once roles and cost centers are loaded."),
        Line::raw("Only customer roles can be assigned here."),
        Line::raw(""),
        key_line(app, "Close help", KeyAction::Cancel),
    ];

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(
            Block::default()
                .title("Help")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
