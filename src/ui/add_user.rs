//! Rendering of the add-user dialog.
//!
//! Draws two text inputs, two dropdowns and the footer buttons. When a
//! dropdown list is open it is drawn as a second popup below the dialog's
//! field.
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph};

use crate::app::AppState;
use crate::app::dialog::{AddUserDialog, DialogFocus};
use crate::app::reference::{OptionEntry, label_for};
use crate::ui::components::centered_rect;

const WIDTH: u16 = 64;
const HEIGHT: u16 = 17;

/// Row inside the dialog (relative to its inner area) where each dropdown value is drawn.
fn dropdown_row(focus: DialogFocus) -> u16 {
    match focus {
        DialogFocus::CostCenter => 7,
        _ => 9,
    }
}

fn field_line<'a>(app: &AppState, value: String, focused: bool) -> Line<'a> {
    let style = if focused {
        Style::default().fg(app.theme.focus).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.text)
    };
    let cursor = if focused { "_" } else { "" };
    Line::from(Span::styled(format!("[ {value}{cursor} ]"), style))
}

fn dropdown_line<'a>(app: &AppState, options: &[OptionEntry], value: &str, placeholder: &str, focused: bool) -> Line<'a> {
    let shown = label_for(options, value).unwrap_or(placeholder).to_string();
    let style = if focused {
        Style::default().fg(app.theme.focus).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.text)
    };
    Line::from(Span::styled(format!("< {shown} ▾ >"), style))
}

fn button<'a>(app: &AppState, label: &str, focused: bool, enabled: bool) -> Span<'a> {
    let mut style = if enabled {
        Style::default().fg(app.theme.text)
    } else {
        Style::default().fg(app.theme.muted)
    };
    if focused {
        style = style.add_modifier(Modifier::REVERSED);
    }
    Span::styled(format!("[ {label} ]"), style)
}

pub fn render_add_user_dialog(f: &mut Frame, area: Rect, app: &AppState) {
    let dialog: &AddUserDialog = &app.dialog;
    let labels = app.messages.label_set(dialog.is_admin());
    let draft = dialog.draft();
    let focus = dialog.focus();
    let opts = dialog.options();
    let label_style = Style::default().fg(app.theme.title);
    let help_style = Style::default().fg(app.theme.muted);

    let confirm_label = if dialog.is_loading() { format!("{} ...", labels.add) } else { labels.add.clone() };
    let footer = Line::from(vec![
        Span::raw("  "),
        button(app, &labels.cancel, focus == DialogFocus::Cancel, true),
        Span::raw("  "),
        button(app, &confirm_label, focus == DialogFocus::Confirm, dialog.confirm_enabled()),
    ]);

    let lines = vec![
        Line::from(Span::styled(labels.help.clone(), help_style)),
        Line::raw(""),
        Line::from(Span::styled(labels.name.clone(), label_style)),
        field_line(app, draft.name.clone(), focus == DialogFocus::Name),
        Line::from(Span::styled(labels.email.clone(), label_style)),
        field_line(app, draft.email.clone(), focus == DialogFocus::Email),
        Line::from(Span::styled(labels.cost_center.clone(), label_style)),
        dropdown_line(
            app,
            &opts.cost_centers,
            &draft.cost_center_id,
            &labels.cost_center_placeholder,
            focus == DialogFocus::CostCenter,
        ),
        Line::from(Span::styled(labels.role.clone(), label_style)),
        dropdown_line(app, &opts.roles, &draft.role_id, &labels.role_placeholder, focus == DialogFocus::Role),
        Line::raw(""),
        Line::raw(""),
        footer,
    ];

    let rect = centered_rect(WIDTH, HEIGHT, area);
    let block = Block::default()
        .title(labels.title.clone())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border));
    let inner = block.inner(rect);
    let p = Paragraph::new(lines).block(block);
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);

    if let Some(highlighted) = dialog.picker() {
        let options = match focus {
            DialogFocus::CostCenter => &opts.cost_centers,
            _ => &opts.roles,
        };
        render_picker(f, area, inner, app, options, highlighted, dropdown_row(focus));
    }
}

fn render_picker(
    f: &mut Frame,
    area: Rect,
    inner: Rect,
    app: &AppState,
    options: &[OptionEntry],
    highlighted: usize,
    row: u16,
) {
    let y = (inner.y + row + 1).min(area.bottom().saturating_sub(3));
    let height = (options.len() as u16 + 2).min(area.bottom().saturating_sub(y)).max(3);
    let rect = Rect { x: inner.x, y, width: inner.width.min(40), height };
    let visible = height.saturating_sub(2) as usize;
    let offset = highlighted.saturating_sub(visible.saturating_sub(1));

    let items: Vec<ListItem> = options
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible)
        .map(|(i, o)| {
            if i == highlighted {
                ListItem::new(format!("▶ {}", o.label)).style(
                    Style::default()
                        .fg(app.theme.highlight_fg)
                        .bg(app.theme.highlight_bg)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                ListItem::new(format!("  {}", o.label)).style(Style::default().fg(app.theme.text))
            }
        })
        .collect();
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.focus)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(list, rect);
}
