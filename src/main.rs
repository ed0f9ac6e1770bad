//! gridline - browse CSV and JSON tables in the terminal
//!
//! Loads a data file into the table engine and drives it with a ratatui
//! component tree.

mod action;
mod app;
mod component;
mod components;
mod config;
mod model;
mod services;
mod tui;

use crate::action::Action;
use crate::app::App;
use crate::component::Component;
use crate::config::TableConfig;
use crate::services::{infer_facets, load_file};
use crate::tui::Tui;
use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::Event;
use gridline::engine::{FileStore, PreferenceStore, TableView};
use log::{error, info, LevelFilter};
use simplelog::{Config, WriteLogger};
use std::fs::{self, File};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "gridline", version, about = "Browse CSV and JSON tables in the terminal")]
struct Cli {
    /// CSV or JSON data file
    data: PathBuf,

    /// Table config; defaults to <name>.table.yaml next to the data file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory exports are written to
    #[arg(short, long, default_value = ".")]
    export_dir: PathBuf,

    /// Forget sorting, filters and hidden columns between runs
    #[arg(long)]
    no_persist: bool,

    /// off, error, warn, info, debug or trace
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.parse().unwrap_or(LevelFilter::Info));

    let data = load_file(&cli.data)
        .with_context(|| format!("Failed to load {}", cli.data.display()))?;
    let config = TableConfig::resolve(&cli.data, cli.config.as_deref())?;
    info!(
        "Loaded {} rows with {} fields from {}",
        data.rows.len(),
        data.headers.len(),
        cli.data.display()
    );

    let columns_from_headers = config.columns.is_empty();
    let infer_filters = config.filters.is_empty();
    let mut options = config.into_options(&cli.data, &data.headers);
    if infer_filters {
        options.filters = infer_facets(&data);
    }

    let store: Option<Box<dyn PreferenceStore>> = if cli.no_persist {
        None
    } else {
        TableConfig::prefs_dir()
            .map(|dir| Box::new(FileStore::new(dir)) as Box<dyn PreferenceStore>)
    };

    let mut table = TableView::new(options, store);
    table.set_rows(data.rows);
    let mut app = App::new(table, cli.data, cli.export_dir, columns_from_headers);

    let mut tui = Tui::new()?.with_tick_rate(Duration::from_millis(100));
    tui.enter()?;
    app.init()?;

    let result = run_app(&mut tui, &mut app);

    tui.exit()?;

    if let Err(err) = result {
        error!("Exiting after error: {:?}", err);
        eprintln!("Error: {:?}", err);
        std::process::exit(1);
    }

    Ok(())
}

/// Log to `~/.gridline/gridline.log`. The terminal belongs to the UI, so
/// logging is skipped when the file cannot be opened.
fn init_logging(level: LevelFilter) {
    let Some(path) = TableConfig::log_path() else {
        return;
    };
    if let Some(dir) = path.parent() {
        if fs::create_dir_all(dir).is_err() {
            return;
        }
    }
    if let Ok(file) = File::create(&path) {
        let _ = WriteLogger::init(level, Config::default(), file);
    }
}

fn run_app(tui: &mut Tui, app: &mut App) -> Result<()> {
    while !app.should_quit {
        tui.draw(|frame| {
            if let Err(e) = app.draw(frame, frame.area()) {
                error!("Draw error: {}", e);
            }
        })?;

        if let Some(event) = tui.next_event()? {
            let action = match event {
                Event::Key(key) => app.handle_key_event(key)?,
                Event::Mouse(mouse) => app.handle_mouse_event(mouse)?,
                Event::Resize(w, h) => Some(Action::Resize(w, h)),
                _ => None,
            };

            let mut current_action = action;
            while let Some(a) = current_action {
                current_action = app.update(a)?;
            }
        } else {
            app.update(Action::Tick)?;
        }
    }

    Ok(())
}
