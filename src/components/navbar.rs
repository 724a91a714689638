//! Top bar with the app title and the section links.

use crate::components::widgets;
use crate::routes::{Route, Section};
use crate::tui::Frame;
use crossterm::event::KeyCode;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

/// Height the shell reserves for the navbar.
pub const HEIGHT: u16 = 3;

const LINKS: [(&str, &str, Section); 2] = [
    ("F2", "Patients", Section::Patients),
    ("F3", "Clinical Data", Section::ClinicalData),
];

/// Maps the navbar function keys to their destinations.
pub fn route_for_key(code: KeyCode) -> Option<Route> {
    match code {
        KeyCode::F(1) => Some(Route::Home),
        KeyCode::F(2) => Some(Route::Patients),
        KeyCode::F(3) => Some(Route::ClinicalData),
        _ => None,
    }
}

pub fn render(frame: &mut Frame, area: Rect, current: Route) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(widgets::BORDER))
        .style(Style::default().bg(widgets::PANEL));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [brand, links] =
        Layout::horizontal([Constraint::Length(24), Constraint::Min(0)]).areas(inner);

    let home_style = if current.section() == Section::Home {
        Style::default()
            .fg(widgets::FOCUS)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(widgets::TEXT)
            .add_modifier(Modifier::BOLD)
    };
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(" Clinicals App", home_style),
            Span::styled(" [F1]", Style::default().fg(widgets::MUTED)),
        ])),
        brand,
    );

    let mut spans = Vec::new();
    for (hotkey, label, section) in LINKS {
        let style = if current.section() == section {
            Style::default()
                .fg(Color::Black)
                .bg(widgets::LINK)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(widgets::LINK)
        };
        spans.push(Span::styled(format!(" {label} "), style));
        spans.push(Span::styled(
            format!("[{hotkey}]   "),
            Style::default().fg(widgets::MUTED),
        ));
    }
    spans.push(Span::styled(
        "Ctrl+Q: Quit ",
        Style::default().fg(widgets::MUTED),
    ));
    frame.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Right),
        links,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn function_keys_map_to_sections() {
        assert_eq!(route_for_key(KeyCode::F(1)), Some(Route::Home));
        assert_eq!(route_for_key(KeyCode::F(2)), Some(Route::Patients));
        assert_eq!(route_for_key(KeyCode::F(3)), Some(Route::ClinicalData));
        assert_eq!(route_for_key(KeyCode::F(4)), None);
    }

    #[test]
    fn active_section_is_highlighted() {
        let mut terminal = Terminal::new(TestBackend::new(100, HEIGHT)).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), Route::EditPatient(3)))
            .unwrap();
        let buffer = terminal.backend().buffer();

        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        let start = text.find("Patients").unwrap();
        assert_eq!(buffer.content()[start].bg, widgets::LINK);

        let other = text.find("Clinical Data").unwrap();
        assert_ne!(buffer.content()[other].bg, widgets::LINK);
    }
}
