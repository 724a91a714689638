//! Searchable, paginated list view shared by patients and clinical data.

use crate::api::worker::take_finished;
use crate::api::{ApiResult, ClinicalsApi, InFlight};
use crate::components::pagination::SearchableList;
use crate::components::widgets::{self, render_confirm_dialog, render_header};
use crate::components::{Component, ViewContext};
use crate::models::Searchable;
use crate::routes::Route;
use crate::tui::Frame;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{prelude::*, widgets::*};
use tracing::debug;

/// What a list view needs to know about the records it shows.
pub trait ListResource: Searchable + Clone + Send + 'static {
    /// Title bar text.
    const TITLE: &'static str;
    /// Plural noun for messages ("Failed to fetch patients").
    const PLURAL: &'static str;
    /// Singular noun for messages ("Failed to delete patient").
    const SINGULAR: &'static str;
    const LOADED_MESSAGE: &'static str;
    const DELETED_MESSAGE: &'static str;
    const CONFIRM_MESSAGE: &'static str;
    const SEARCH_PLACEHOLDER: &'static str;
    const ADD_LABEL: &'static str;
    /// Column headers, without the trailing actions column.
    const HEADERS: &'static [&'static str];
    /// Column widths, including the trailing actions column.
    const WIDTHS: &'static [Constraint];
    const NEW_ROUTE: Route;

    fn id(&self) -> i64;
    fn cells(&self) -> Vec<String>;
    fn edit_route(id: i64) -> Route;
    fn fetch_all(api: &dyn ClinicalsApi) -> ApiResult<Vec<Self>>;
    fn delete(api: &dyn ClinicalsApi, id: i64) -> ApiResult<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Search,
    Table,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Load,
    Delete(i64),
}

#[derive(Debug, Clone, Copy)]
struct Confirmation {
    id: i64,
    yes_selected: bool,
}

/// List view over one resource type.
pub struct ListView<R: ListResource> {
    ctx: ViewContext,
    rows: SearchableList<R>,
    table_state: TableState,
    focus: Focus,
    loading: bool,
    confirmation: Option<Confirmation>,
    pending: Option<Pending>,
    load_request: Option<InFlight<Vec<R>>>,
    delete_request: Option<InFlight<()>>,
}

impl<R: ListResource> ListView<R> {
    /// Creates the view in the loading state; the fetch starts on the first update.
    pub fn new(ctx: ViewContext) -> Self {
        Self {
            ctx,
            rows: SearchableList::new(),
            table_state: TableState::default(),
            focus: Focus::Table,
            loading: true,
            confirmation: None,
            pending: Some(Pending::Load),
            load_request: None,
            delete_request: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn rows(&self) -> &SearchableList<R> {
        &self.rows
    }

    pub fn is_confirming(&self) -> bool {
        self.confirmation.is_some()
    }

    /// True while a request is scheduled or running.
    fn busy(&self) -> bool {
        self.pending.is_some() || self.load_request.is_some() || self.delete_request.is_some()
    }

    fn start(&mut self, pending: Pending) {
        match pending {
            Pending::Load => self.load_request = Some(self.ctx.requests.start(R::fetch_all)),
            Pending::Delete(id) => {
                self.delete_request =
                    Some(self.ctx.requests.start(move |api| R::delete(api, id)));
            }
        }
    }

    fn finish_load(&mut self, result: ApiResult<Vec<R>>) {
        match result {
            Ok(items) => {
                debug!(count = items.len(), kind = R::PLURAL, "list loaded");
                self.rows.set_items(items);
                self.ctx.notifier.success(R::LOADED_MESSAGE);
            }
            Err(e) => {
                self.ctx.notifier.error(format!(
                    "Failed to fetch {}: {}",
                    R::PLURAL,
                    e.user_message()
                ));
            }
        }
        self.loading = false;
        self.reset_selection();
    }

    fn finish_delete(&mut self, result: ApiResult<()>) {
        match result {
            Ok(()) => {
                self.ctx.notifier.success(R::DELETED_MESSAGE);
                self.reload();
            }
            Err(e) => {
                self.ctx.notifier.error(format!(
                    "Failed to delete {}: {}",
                    R::SINGULAR,
                    e.user_message()
                ));
            }
        }
    }

    fn reload(&mut self) {
        self.loading = true;
        self.pending = Some(Pending::Load);
    }

    fn reset_selection(&mut self) {
        let selection = (!self.rows.page_items().is_empty()).then_some(0);
        self.table_state.select(selection);
    }

    /// The record under the cursor on the current page.
    pub fn selected(&self) -> Option<&R> {
        self.table_state
            .selected()
            .and_then(|i| self.rows.page_items().get(i))
    }

    fn select_next(&mut self) {
        let len = self.rows.page_items().len();
        if len == 0 {
            return;
        }
        let next = match self.table_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.table_state.select(Some(next));
    }

    fn select_previous(&mut self) {
        let len = self.rows.page_items().len();
        if len == 0 {
            return;
        }
        let previous = match self.table_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.table_state.select(Some(previous));
    }

    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Search => Focus::Table,
            Focus::Table => Focus::Search,
        };
    }

    fn handle_confirmation(&mut self, key: KeyEvent, confirmation: Confirmation) {
        match key.code {
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::BackTab => {
                self.confirmation = Some(Confirmation {
                    yes_selected: !confirmation.yes_selected,
                    ..confirmation
                });
            }
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.confirmation = None;
                self.pending = Some(Pending::Delete(confirmation.id));
            }
            KeyCode::Enter => {
                self.confirmation = None;
                if confirmation.yes_selected {
                    self.pending = Some(Pending::Delete(confirmation.id));
                }
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.confirmation = None;
            }
            _ => {}
        }
    }

    fn handle_search_input(&mut self, key: KeyEvent) -> Option<Route> {
        match key.code {
            KeyCode::Char(c) => {
                self.rows.push_search_char(c);
                self.reset_selection();
            }
            KeyCode::Backspace => {
                self.rows.pop_search_char();
                self.reset_selection();
            }
            KeyCode::Enter | KeyCode::Down | KeyCode::Esc => self.focus = Focus::Table,
            _ => {}
        }
        None
    }

    fn handle_table_input(&mut self, key: KeyEvent) -> Option<Route> {
        match key.code {
            KeyCode::Down => self.select_next(),
            KeyCode::Up => self.select_previous(),
            KeyCode::Left | KeyCode::PageUp | KeyCode::Char('[') => {
                if self.rows.previous_page() {
                    self.reset_selection();
                }
            }
            KeyCode::Right | KeyCode::PageDown | KeyCode::Char(']') => {
                if self.rows.next_page() {
                    self.reset_selection();
                }
            }
            KeyCode::Char(c @ '1'..='9') => {
                let page = c.to_digit(10).unwrap_or(1) as usize;
                if self.rows.go_to_page(page) {
                    self.reset_selection();
                }
            }
            KeyCode::Enter | KeyCode::Char('e') | KeyCode::Char('E') => {
                return self.selected().map(|record| R::edit_route(record.id()));
            }
            KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Delete => {
                if let Some(id) = self.selected().map(R::id) {
                    self.confirmation = Some(Confirmation {
                        id,
                        yes_selected: false,
                    });
                }
            }
            KeyCode::Char('n') | KeyCode::Char('N') => return Some(R::NEW_ROUTE),
            KeyCode::Char('r') | KeyCode::Char('R') => self.reload(),
            KeyCode::Char('/') | KeyCode::Char('s') | KeyCode::Char('S') => {
                self.focus = Focus::Search
            }
            KeyCode::Esc => return Some(Route::Home),
            _ => {}
        }
        None
    }

    fn render_pagination(&self, frame: &mut Frame, area: Rect) {
        let enabled = Style::default().fg(widgets::LINK);
        let disabled = Style::default().fg(Color::Rgb(70, 70, 90));
        let mut spans = vec![Span::styled(
            " ‹ Previous ",
            if self.rows.has_previous() {
                enabled
            } else {
                disabled
            },
        )];
        for page in 1..=self.rows.total_pages() {
            let style = if page == self.rows.page() {
                Style::default()
                    .fg(widgets::BACKGROUND)
                    .bg(widgets::LINK)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(widgets::TEXT)
            };
            spans.push(Span::raw(" "));
            spans.push(Span::styled(format!(" {page} "), style));
        }
        spans.push(Span::styled(
            "  Next › ",
            if self.rows.has_next() {
                enabled
            } else {
                disabled
            },
        ));
        frame.render_widget(
            Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
            area,
        );
    }
}

impl<R: ListResource> Component for ListView<R> {
    fn handle_input(&mut self, key: KeyEvent) -> Result<Option<Route>> {
        if self.loading || self.busy() {
            return Ok(None);
        }
        if let Some(confirmation) = self.confirmation {
            self.handle_confirmation(key, confirmation);
            return Ok(None);
        }
        if matches!(key.code, KeyCode::Tab | KeyCode::BackTab) {
            self.toggle_focus();
            return Ok(None);
        }
        Ok(match self.focus {
            Focus::Search => self.handle_search_input(key),
            Focus::Table => self.handle_table_input(key),
        })
    }

    fn update(&mut self) -> Result<Option<Route>> {
        if let Some(pending) = self.pending.take() {
            self.start(pending);
        }
        if let Some(result) = take_finished(&mut self.load_request) {
            self.finish_load(result);
        }
        if let Some(result) = take_finished(&mut self.delete_request) {
            self.finish_delete(result);
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let body = render_header(frame, area, R::TITLE);

        if self.loading {
            frame.render_widget(
                Paragraph::new(format!("Loading {}...", R::PLURAL))
                    .style(Style::default().fg(widgets::MUTED))
                    .alignment(Alignment::Center),
                body,
            );
            return;
        }

        let [toolbar, search, table_area, pager, help] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(9),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .horizontal_margin(1)
        .areas(body);

        frame.render_widget(
            Paragraph::new(format!("[n] {}", R::ADD_LABEL))
                .style(Style::default().fg(widgets::SUCCESS).add_modifier(Modifier::BOLD))
                .alignment(Alignment::Right),
            toolbar,
        );

        let search_focused = self.focus == Focus::Search;
        let (search_text, search_style) = if self.rows.search().is_empty() && !search_focused {
            (R::SEARCH_PLACEHOLDER.to_string(), Style::default().fg(widgets::MUTED))
        } else if search_focused {
            (
                format!("{}▏", self.rows.search()),
                Style::default().fg(widgets::TEXT),
            )
        } else {
            (self.rows.search().to_string(), Style::default().fg(widgets::TEXT))
        };
        frame.render_widget(
            Paragraph::new(search_text).style(search_style).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .title(" Search ")
                    .border_style(Style::default().fg(if search_focused {
                        widgets::FOCUS
                    } else {
                        widgets::BORDER_IDLE
                    }))
                    .style(Style::default().bg(widgets::INPUT)),
            ),
            search,
        );

        let header = Row::new(
            R::HEADERS
                .iter()
                .copied()
                .chain(std::iter::once("Actions"))
                .map(|h| Cell::from(h).style(Style::default().fg(widgets::TEXT))),
        )
        .style(Style::default().bg(widgets::INPUT))
        .bottom_margin(1);

        let page_items = self.rows.page_items();
        let rows: Vec<Row> = page_items
            .iter()
            .map(|record| {
                let mut cells = record.cells();
                cells.push("[e] Edit  [d] Delete".to_string());
                Row::new(cells)
            })
            .collect();

        let table_focused = self.focus == Focus::Table;
        let table = Table::new(rows, R::WIDTHS.to_vec())
            .header(header)
            .block(
                Block::default()
                    .title(format!(" {} of {} ", self.rows.filtered().len(), self.rows.all().len()))
                    .title_alignment(Alignment::Center)
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(widgets::BORDER))
                    .style(Style::default().bg(widgets::PANEL)),
            )
            .row_highlight_style(
                Style::default()
                    .bg(if table_focused {
                        Color::Rgb(40, 40, 65)
                    } else {
                        Color::Rgb(30, 30, 45)
                    })
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol(if table_focused { "► " } else { "  " });
        frame.render_stateful_widget(table, table_area, &mut self.table_state.clone());

        if page_items.is_empty() {
            let inner = table_area.inner(Margin::new(1, 1));
            let [_, message] =
                Layout::vertical([Constraint::Length(2), Constraint::Length(1)]).areas(inner);
            frame.render_widget(
                Paragraph::new(format!("No {} found", R::PLURAL))
                    .style(Style::default().fg(widgets::MUTED))
                    .alignment(Alignment::Center),
                message,
            );
        }

        if self.rows.shows_controls() {
            self.render_pagination(frame, pager);
        }

        frame.render_widget(
            Paragraph::new(
                "↑↓: Select | ←→: Page | Enter/E: Edit | D: Delete | /: Search | R: Refresh | Tab: Focus",
            )
            .style(Style::default().fg(widgets::MUTED))
            .alignment(Alignment::Center),
            help,
        );

        if self.confirmation.is_some() {
            render_confirm_dialog(
                frame,
                area,
                "Confirm Delete",
                R::CONFIRM_MESSAGE,
                self.confirmation.is_some_and(|c| c.yes_selected),
            );
        }
    }
}
