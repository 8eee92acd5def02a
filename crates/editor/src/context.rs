//! Editor state passed explicitly to command execution.

use std::path::Path;

use anyhow::Result;
use teditor_config::Config;

use crate::{Buffer, EditorCommand};

/// Size of the text area (without the status line)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewSize {
    pub width: u16,
    pub height: u16,
}

impl Default for ViewSize {
    fn default() -> Self {
        Self {
            width: 80,
            height: 23,
        }
    }
}

/// Everything a command can touch: configuration, open buffers and UI state.
#[derive(Debug)]
pub struct EditorContext {
    config: Config,
    buffers: Vec<Buffer>,
    /// Index of the current buffer
    current: usize,
    view: ViewSize,
    /// Status line message (message, is_error)
    status_message: Option<(String, bool)>,
    should_quit: bool,
}

impl EditorContext {
    /// Create a context holding one empty buffer.
    pub fn new(config: Config) -> Self {
        let buffer = Buffer::new(config.editor.clone());
        Self {
            config,
            buffers: vec![buffer],
            current: 0,
            view: ViewSize::default(),
            status_message: None,
            should_quit: false,
        }
    }

    /// Open `path` in a new buffer and make it current.
    ///
    /// A path that does not exist yet opens an empty buffer saved there later.
    pub fn open(&mut self, path: &Path) -> Result<()> {
        let buffer = if path.exists() {
            Buffer::open(path, self.config.editor.clone())?
        } else {
            log::info!("New file {}", path.display());
            Buffer::with_path(path, self.config.editor.clone())
        };

        // Replace the initial scratch buffer if it was never touched
        if self.buffers.len() == 1
            && self.buffers[0].file_path().is_none()
            && !self.buffers[0].is_modified()
        {
            self.buffers[0] = buffer;
        } else {
            self.buffers.push(buffer);
            self.current = self.buffers.len() - 1;
        }
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn buffers(&self) -> &[Buffer] {
        &self.buffers
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Make buffer `index` current. Returns false for an unknown index.
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.buffers.len() {
            self.current = index;
            true
        } else {
            false
        }
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffers[self.current]
    }

    pub fn buffer_mut(&mut self) -> &mut Buffer {
        &mut self.buffers[self.current]
    }

    pub fn view_size(&self) -> ViewSize {
        self.view
    }

    pub fn set_view_size(&mut self, width: u16, height: u16) {
        self.view = ViewSize { width, height };
    }

    pub fn status_message(&self) -> Option<&(String, bool)> {
        self.status_message.as_ref()
    }

    pub fn set_info(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), false));
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), true));
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Execute `cmd` on the current buffer.
    ///
    /// Save failures end up in the status line; editing errors are returned.
    pub fn execute(&mut self, cmd: EditorCommand) -> Result<()> {
        let height = self.view.height as usize;
        let buffer = &mut self.buffers[self.current];

        match cmd {
            // Navigation
            EditorCommand::MoveCursorUp => buffer.move_up(),
            EditorCommand::MoveCursorDown => buffer.move_down(),
            EditorCommand::MoveCursorLeft => buffer.move_left(),
            EditorCommand::MoveCursorRight => buffer.move_right(),
            EditorCommand::MoveToLineStart => buffer.move_to_line_start(),
            EditorCommand::MoveToLineEnd => buffer.move_to_line_end(),
            EditorCommand::MoveToBufferStart => buffer.move_to_buffer_start(),
            EditorCommand::MoveToBufferEnd => buffer.move_to_buffer_end(),
            EditorCommand::NextWord => buffer.next_word(),
            EditorCommand::PreviousWord => buffer.previous_word(),
            EditorCommand::NextParagraph => buffer.next_paragraph(),
            EditorCommand::PreviousParagraph => buffer.previous_paragraph(),
            EditorCommand::PageUp => buffer.page_up(height),
            EditorCommand::PageDown => buffer.page_down(height),

            // Text editing
            EditorCommand::InsertChar(ch) => {
                let mut buf = [0u8; 4];
                buffer.insert(ch.encode_utf8(&mut buf))?;
            }
            EditorCommand::InsertNewline => buffer.insert_newline()?,
            EditorCommand::InsertTab => buffer.insert_tab()?,
            EditorCommand::Backspace => buffer.backspace()?,
            EditorCommand::Delete => buffer.delete_forward()?,

            // Region and cursors
            EditorCommand::StartRegion => {
                buffer.start_region();
                self.set_info("Region started");
            }
            EditorCommand::Cancel => {
                buffer.cancel();
                self.clear_status();
            }
            EditorCommand::KillRegion => {
                let killed = buffer.kill_region()?;
                let chars: usize = killed.iter().map(|text| text.chars().count()).sum();
                self.set_info(format!("Killed {} characters", chars));
            }
            EditorCommand::AddCursorAbove => {
                buffer.add_cursor_above();
            }
            EditorCommand::AddCursorBelow => {
                buffer.add_cursor_below();
            }

            // Undo/Redo
            EditorCommand::Undo => {
                if !buffer.undo() {
                    self.set_info("Nothing to undo");
                }
            }
            EditorCommand::Redo => {
                if !buffer.redo() {
                    self.set_info("Nothing to redo");
                }
            }

            // Application
            EditorCommand::Save => match buffer.save() {
                Ok(()) => {
                    let msg = format!("Saved {}", buffer.name());
                    self.set_info(msg);
                }
                Err(e) => {
                    log::warn!("Save failed: {:#}", e);
                    self.set_error(format!("Save failed: {}", e));
                }
            },
            EditorCommand::Quit => self.should_quit = true,

            // No operation
            EditorCommand::None => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use teditor_buffer::Position;

    fn context(text: &str) -> EditorContext {
        let mut ctx = EditorContext::new(Config::default());
        ctx.buffer_mut().load(text);
        ctx
    }

    fn run(ctx: &mut EditorContext, commands: &[EditorCommand]) {
        for cmd in commands {
            ctx.execute(*cmd).unwrap();
        }
    }

    #[test]
    fn test_typing_and_undo() {
        let mut ctx = context("");
        run(
            &mut ctx,
            &[
                EditorCommand::InsertChar('h'),
                EditorCommand::InsertChar('i'),
                EditorCommand::InsertNewline,
                EditorCommand::InsertTab,
            ],
        );
        assert_eq!(ctx.buffer().text(), "hi\n    ");

        run(&mut ctx, &[EditorCommand::Undo, EditorCommand::Undo]);
        assert_eq!(ctx.buffer().text(), "hi");
        run(&mut ctx, &[EditorCommand::Redo]);
        assert_eq!(ctx.buffer().text(), "hi\n");
    }

    #[test]
    fn test_nothing_to_undo_sets_status() {
        let mut ctx = context("text");
        ctx.execute(EditorCommand::Undo).unwrap();
        assert_eq!(
            ctx.status_message(),
            Some(&("Nothing to undo".to_string(), false))
        );
        ctx.execute(EditorCommand::Cancel).unwrap();
        assert_eq!(ctx.status_message(), None);
    }

    #[test]
    fn test_multi_cursor_commands() {
        let mut ctx = context("* Hello\nTesting123");
        run(
            &mut ctx,
            &[EditorCommand::AddCursorBelow, EditorCommand::InsertChar('T')],
        );
        assert_eq!(ctx.buffer().text(), "T* Hello\nTTesting123");

        run(&mut ctx, &[EditorCommand::Cancel, EditorCommand::InsertChar('!')]);
        assert_eq!(ctx.buffer().text(), "T!* Hello\nTTesting123");
    }

    #[test]
    fn test_region_commands() {
        let mut ctx = context("alpha beta");
        run(
            &mut ctx,
            &[
                EditorCommand::StartRegion,
                EditorCommand::NextWord,
                EditorCommand::KillRegion,
            ],
        );
        assert_eq!(ctx.buffer().text(), " beta");
        assert_eq!(
            ctx.status_message(),
            Some(&("Killed 5 characters".to_string(), false))
        );
    }

    #[test]
    fn test_page_uses_view_height() {
        let mut ctx = context(&"x\n".repeat(50));
        ctx.set_view_size(80, 20);
        ctx.execute(EditorCommand::PageDown).unwrap();
        assert_eq!(ctx.buffer().cursors().first(), Position::new(0, 15));
    }

    #[test]
    fn test_save_and_quit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");

        let mut ctx = EditorContext::new(Config::default());
        ctx.execute(EditorCommand::Save).unwrap();
        assert!(matches!(ctx.status_message(), Some((_, true))));

        ctx.open(&path).unwrap();
        assert_eq!(ctx.buffers().len(), 1);
        assert_eq!(ctx.buffer().name(), "notes.txt");
        run(
            &mut ctx,
            &[EditorCommand::InsertChar('a'), EditorCommand::Save],
        );
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a");
        assert_eq!(
            ctx.status_message(),
            Some(&("Saved notes.txt".to_string(), false))
        );

        assert!(!ctx.should_quit());
        ctx.execute(EditorCommand::Quit).unwrap();
        assert!(ctx.should_quit());
    }

    #[test]
    fn test_open_keeps_modified_scratch_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("existing.txt");
        std::fs::write(&path, "on disk").unwrap();

        let mut ctx = context("");
        ctx.execute(EditorCommand::InsertChar('x')).unwrap();
        ctx.open(&path).unwrap();
        assert_eq!(ctx.buffers().len(), 2);
        assert_eq!(ctx.current_index(), 1);
        assert_eq!(ctx.buffer().text(), "on disk");

        assert!(ctx.select(0));
        assert_eq!(ctx.buffer().text(), "x");
        assert!(!ctx.select(2));
    }
}
