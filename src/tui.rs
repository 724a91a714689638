use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, KeyEvent, KeyEventKind, MouseEvent},
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{io, time::Duration};

#[derive(Debug, Clone)]
pub enum Event {
    /// A key press. Releases and repeats are filtered out.
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize,
    Tick,
}

pub type Frame<'a> = ratatui::Frame<'a>;

pub struct Tui {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    framerate: f64,
}

impl Tui {
    pub fn new(terminal: Terminal<CrosstermBackend<io::Stdout>>, framerate: f64) -> Self {
        Self {
            terminal,
            framerate: framerate.max(1.0),
        }
    }

    pub fn init(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        crossterm::execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture)?;
        self.terminal.hide_cursor()?;
        self.terminal.clear()?;
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        self.terminal.show_cursor()?;
        terminal::disable_raw_mode()?;
        crossterm::execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture)?;
        Ok(())
    }

    pub fn draw(&mut self, render: impl FnOnce(&mut Frame)) -> Result<()> {
        self.terminal.draw(render)?;
        Ok(())
    }

    pub fn next_event(&self) -> Result<Event> {
        let timeout = Duration::from_secs_f64(1.0 / self.framerate);

        if event::poll(timeout)? {
            return Ok(match event::read()? {
                event::Event::Key(key) if key.kind == KeyEventKind::Press => Event::Key(key),
                event::Event::Mouse(mouse) => Event::Mouse(mouse),
                event::Event::Resize(..) => Event::Resize,
                _ => Event::Tick,
            });
        }

        Ok(Event::Tick)
    }
}
