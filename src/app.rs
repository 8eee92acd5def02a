use anyhow::Result;
use ratatui::{backend::Backend, Terminal};
use std::time::Duration;

use teditor_editor::{EditorCommand, EditorContext};

use crate::event::{Event, EventHandler};
use crate::ui;

/// Poll interval of the event loop
const EVENT_POLL_INTERVAL_MS: u64 = 250;

/// Main application: editor state plus what is needed to draw it.
pub struct App {
    ctx: EditorContext,
    events: EventHandler,
    /// First buffer line on screen
    top: usize,
    needs_redraw: bool,
}

impl App {
    pub fn new(ctx: EditorContext) -> Self {
        Self {
            ctx,
            events: EventHandler::new(Duration::from_millis(EVENT_POLL_INTERVAL_MS)),
            top: 0,
            needs_redraw: true,
        }
    }

    /// Run the main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let size = terminal.size()?;
        self.resize(size.width, size.height);

        while !self.ctx.should_quit() {
            if self.needs_redraw {
                let top = self.top;
                terminal.draw(|frame| ui::render(frame, &self.ctx, top))?;
                self.needs_redraw = false;
            }

            match self.events.next()? {
                Event::Key(key) => {
                    let cmd = EditorCommand::from_key_event(key);
                    self.handle_command(cmd)?;
                }
                Event::Resize(width, height) => self.resize(width, height),
                Event::Tick => {}
            }
        }

        Ok(())
    }

    fn handle_command(&mut self, cmd: EditorCommand) -> Result<()> {
        if cmd == EditorCommand::None {
            return Ok(());
        }
        if cmd.is_edit() {
            self.ctx.clear_status();
        }
        self.ctx.execute(cmd)?;
        self.scroll_to_cursor();
        self.needs_redraw = true;
        Ok(())
    }

    fn resize(&mut self, width: u16, height: u16) {
        // Last row is the status line
        self.ctx.set_view_size(width, height.saturating_sub(1));
        self.scroll_to_cursor();
        self.needs_redraw = true;
    }

    fn scroll_to_cursor(&mut self) {
        let view = self.ctx.view_size();
        self.top = ui::scroll_top(self.ctx.buffer(), self.top, view.width, view.height);
    }
}
