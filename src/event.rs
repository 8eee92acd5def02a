use anyhow::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use std::time::Duration;

/// Application event
#[derive(Debug, Clone)]
pub enum Event {
    /// Key press
    Key(KeyEvent),
    /// Terminal resize event
    Resize(u16, u16),
    /// Nothing happened within the poll interval
    Tick,
}

/// Polls crossterm for the next event.
pub struct EventHandler {
    poll_interval: Duration,
}

impl EventHandler {
    pub fn new(poll_interval: Duration) -> Self {
        Self { poll_interval }
    }

    /// Wait for next event
    pub fn next(&self) -> Result<Event> {
        if !event::poll(self.poll_interval)? {
            return Ok(Event::Tick);
        }
        match event::read()? {
            // Windows and kitty-protocol terminals also report key releases
            CrosstermEvent::Key(key) if key.kind != KeyEventKind::Release => Ok(Event::Key(key)),
            CrosstermEvent::Resize(width, height) => Ok(Event::Resize(width, height)),
            _ => Ok(Event::Tick),
        }
    }
}
