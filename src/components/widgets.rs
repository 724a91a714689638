//! Shared colours and small drawing helpers used by the views.

use crate::tui::Frame;
use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

pub const BACKGROUND: Color = Color::Rgb(16, 16, 28);
pub const PANEL: Color = Color::Rgb(22, 22, 35);
pub const INPUT: Color = Color::Rgb(26, 26, 36);
pub const DIALOG: Color = Color::Rgb(30, 30, 46);
pub const BORDER: Color = Color::Rgb(75, 75, 120);
pub const BORDER_IDLE: Color = Color::Rgb(140, 140, 200);
pub const FOCUS: Color = Color::Rgb(250, 250, 110);
pub const TEXT: Color = Color::Rgb(230, 230, 250);
pub const MUTED: Color = Color::Rgb(140, 140, 170);
pub const SUCCESS: Color = Color::Rgb(140, 219, 140);
pub const DANGER: Color = Color::Rgb(255, 100, 100);
pub const LINK: Color = Color::Rgb(129, 199, 245);

/// Paints the view background and a centered title bar; returns the area below it.
pub fn render_header(frame: &mut Frame, area: Rect, title: &str) -> Rect {
    frame.render_widget(Block::default().style(Style::default().bg(BACKGROUND)), area);

    let [header, body] =
        Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(area);
    let header_block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(BORDER))
        .style(Style::default().bg(BACKGROUND));
    let inner = header_block.inner(header);
    frame.render_widget(header_block, header);
    frame.render_widget(
        Paragraph::new(title)
            .style(Style::default().fg(TEXT).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center),
        inner,
    );
    body
}

/// `► label ◄` when focused, padded otherwise, so buttons do not shift.
pub fn button_text(label: &str, focused: bool) -> String {
    if focused {
        format!("► {label} ◄")
    } else {
        format!("  {label}  ")
    }
}

pub fn button_style(focused: bool, accent: Color) -> Style {
    if focused {
        Style::default().fg(accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Rgb(180, 180, 200))
    }
}

/// Bordered single-line input with an optional inline error below it.
pub fn render_input(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    value: &str,
    focused: bool,
    error: Option<&str>,
) {
    let [field, message] =
        Layout::vertical([Constraint::Length(3), Constraint::Length(1)]).areas(area);
    let border = if error.is_some() {
        DANGER
    } else if focused {
        FOCUS
    } else {
        BORDER_IDLE
    };
    let shown = if focused {
        format!("{value}▏")
    } else {
        value.to_string()
    };
    let input = Paragraph::new(shown)
        .style(Style::default().fg(Color::Rgb(220, 220, 240)).bg(INPUT))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(Span::styled(format!(" {label} "), Style::default().fg(TEXT)))
                .border_style(Style::default().fg(border))
                .style(Style::default().bg(INPUT)),
        );
    frame.render_widget(input, field);
    if let Some(error) = error {
        frame.render_widget(
            Paragraph::new(error).style(Style::default().fg(DANGER)),
            message,
        );
    }
}

/// Yes/No overlay centered in `area`. `yes_selected` highlights "Yes".
pub fn render_confirm_dialog(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    message: &str,
    yes_selected: bool,
) {
    let width = 56.min(area.width);
    let height = 8.min(area.height);
    let dialog_area = Rect::new(
        area.x + area.width.saturating_sub(width) / 2,
        area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    );
    frame.render_widget(Clear, dialog_area);

    let dialog_block = Block::default()
        .title(format!(" {title} "))
        .title_style(Style::default().fg(TEXT).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_IDLE))
        .style(Style::default().bg(DIALOG));
    let inner = dialog_block.inner(dialog_area);
    frame.render_widget(dialog_block, dialog_area);

    let [text, buttons] = Layout::vertical([Constraint::Length(2), Constraint::Length(2)])
        .margin(1)
        .areas(inner);
    frame.render_widget(
        Paragraph::new(message)
            .style(Style::default().fg(Color::Rgb(220, 220, 240)))
            .add_modifier(Modifier::BOLD)
            .alignment(Alignment::Center),
        text,
    );

    let [yes, no] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(buttons);
    frame.render_widget(
        Paragraph::new(button_text("Yes", yes_selected))
            .style(button_style(yes_selected, SUCCESS))
            .alignment(Alignment::Center),
        yes,
    );
    frame.render_widget(
        Paragraph::new(button_text("No", !yes_selected))
            .style(button_style(!yes_selected, DANGER))
            .alignment(Alignment::Center),
        no,
    );
}
