mod app;
mod event;
mod ui;

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;

use teditor_config::Config;
use teditor_editor::EditorContext;
use teditor_logger::LogLevel;

use app::App;

fn main() -> Result<()> {
    // Fall back to defaults, but remember why
    let (config, config_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    init_logging(&config);
    if let Some(e) = config_error {
        log::warn!("Using default config: {:#}", e);
    }

    let mut ctx = EditorContext::new(config);
    if let Some(path) = std::env::args_os().nth(1).map(PathBuf::from) {
        ctx.open(&path)?;
    }

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run application
    let result = App::new(ctx).run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Print error if there was one
    if let Err(err) = result {
        log::error!("Editor stopped: {:#}", err);
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

fn init_logging(config: &Config) {
    let level = config
        .logging
        .min_level
        .parse()
        .unwrap_or(LogLevel::Info);
    match config.logging.resolved_file_path() {
        Ok(path) => teditor_logger::init(path, config.logging.max_entries, level),
        Err(e) => eprintln!("Logging disabled: {:#}", e),
    }
}
