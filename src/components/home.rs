//! Landing page: one card per managed resource, each with its own links.

use crate::components::widgets::{self, render_header};
use crate::components::Component;
use crate::routes::Route;
use crate::tui::Frame;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, List, ListItem, Padding, Paragraph, Wrap},
};

struct Card {
    title: &'static str,
    description: &'static str,
    links: [(&'static str, Route); 2],
}

const CARDS: [Card; 2] = [
    Card {
        title: " 🏥 Patient Management ",
        description: "Browse, search and maintain patient records.",
        links: [
            ("View Patients", Route::Patients),
            ("Add Patient", Route::NewPatient),
        ],
    },
    Card {
        title: " 🩺 Clinical Data ",
        description: "Record and review clinical measurements for your patients.",
        links: [
            ("View Clinical Data", Route::ClinicalData),
            ("Add Clinical Data", Route::NewClinicalData),
        ],
    },
];

#[derive(Default)]
pub struct Home {
    selected_card: usize,
    selected_link: usize,
}

impl Home {
    pub fn new() -> Self {
        Self::default()
    }

    /// The route Enter would navigate to.
    pub fn selected_route(&self) -> Route {
        CARDS[self.selected_card].links[self.selected_link].1
    }

    fn render_card(&self, frame: &mut Frame, area: Rect, index: usize) {
        let card = &CARDS[index];
        let active = index == self.selected_card;
        let border = if active {
            widgets::FOCUS
        } else {
            widgets::BORDER_IDLE
        };

        let block = Block::default()
            .title(card.title)
            .title_style(Style::default().fg(widgets::TEXT).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border))
            .padding(Padding::new(2, 2, 1, 0))
            .style(Style::default().bg(widgets::PANEL));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [description, links] =
            Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(inner);
        frame.render_widget(
            Paragraph::new(card.description)
                .style(Style::default().fg(widgets::MUTED))
                .wrap(Wrap { trim: true }),
            description,
        );

        let items: Vec<ListItem> = card
            .links
            .iter()
            .enumerate()
            .map(|(idx, (label, _))| {
                let selected = active && idx == self.selected_link;
                let style = if selected {
                    Style::default()
                        .fg(widgets::FOCUS)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(widgets::LINK)
                };
                let prefix = if selected { " ► " } else { "   " };
                ListItem::new(format!("{prefix}{label} →")).style(style)
            })
            .collect();
        frame.render_widget(List::new(items), links);
    }
}

impl Component for Home {
    fn handle_input(&mut self, key: KeyEvent) -> Result<Option<Route>> {
        match key.code {
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::BackTab => {
                self.selected_card = 1 - self.selected_card;
                self.selected_link = 0;
            }
            KeyCode::Up | KeyCode::Down => {
                self.selected_link = 1 - self.selected_link;
            }
            KeyCode::Enter => return Ok(Some(self.selected_route())),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let body = render_header(frame, area, "Welcome to Clinicals App");

        let [intro, cards, _, help] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(10),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(body);

        frame.render_widget(
            Paragraph::new("Manage patients and their clinical measurements.")
                .style(Style::default().fg(Color::Rgb(180, 190, 254)))
                .alignment(Alignment::Center)
                .block(Block::default().padding(Padding::new(0, 0, 1, 0))),
            intro,
        );

        let [left, right] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .spacing(2)
                .horizontal_margin(2)
                .areas(cards);
        self.render_card(frame, left, 0);
        self.render_card(frame, right, 1);

        frame.render_widget(
            Paragraph::new("←→/Tab: Switch Card | ↑↓: Choose Link | Enter: Open")
                .style(Style::default().fg(widgets::MUTED))
                .alignment(Alignment::Center),
            help,
        );
    }
}
