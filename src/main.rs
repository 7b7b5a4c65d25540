mod app;
mod cli;
mod event;
mod feed_list;
mod help;
mod keys;
mod logging;
mod settings;
mod source;
mod theme;
mod tui;
mod views;

#[cfg(test)]
mod test_utils;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use ratatui::Frame;
use tracing::{error, info};

use app::{App, Message};
use cli::{Cli, Commands, ConfigCommands, OutputFormat};
use event::Event;
use settings::Settings;
use source::PagedSource;
use theme::default_for_variant;
use tui::EventHandler;

const TICK_MS: u64 = 100;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_dir = settings::config_dir(cli.config_dir.as_ref());

    if let Some(Commands::Config(args)) = &cli.command {
        return handle_config_command(&args.command, &cli, config_dir.as_ref());
    }
    run_tui(cli, config_dir).await
}

fn load_settings(config_dir: Option<&PathBuf>) -> Settings {
    config_dir
        .map(|dir| {
            Settings::load(&settings::settings_path(dir)).unwrap_or_else(|e| {
                eprintln!("Warning: {:#}", e);
                Settings::default()
            })
        })
        .unwrap_or_default()
}

fn handle_config_command(
    command: &ConfigCommands,
    cli: &Cli,
    config_dir: Option<&PathBuf>,
) -> Result<()> {
    match command {
        ConfigCommands::Show { format } => {
            let settings = cli.apply(load_settings(config_dir));
            match format {
                OutputFormat::Toml => {
                    let toml =
                        toml::to_string_pretty(&settings).context("Failed to serialize settings")?;
                    print!("{}", toml);
                }
                OutputFormat::Json => {
                    let json = serde_json::to_string_pretty(&settings)
                        .context("Failed to serialize settings to JSON")?;
                    println!("{}", json);
                }
            }
        }
        ConfigCommands::Path => match config_dir {
            Some(dir) => println!("{}", settings::settings_path(dir).display()),
            None => eprintln!("Could not determine config directory"),
        },
    }
    Ok(())
}

async fn run_tui(cli: Cli, config_dir: Option<PathBuf>) -> Result<()> {
    let settings = cli.apply(load_settings(config_dir.as_ref()));

    let _log_guard = match &config_dir {
        Some(dir) => match logging::init(dir, cli.verbose) {
            Ok(guard) => Some(guard),
            Err(e) => {
                eprintln!("Logging disabled: {:#}", e);
                None
            }
        },
        None => None,
    };
    info!(
        layout = settings.layout.label(),
        columns = settings.columns,
        page_size = settings.page_size,
        "starting"
    );

    let theme = default_for_variant(settings.theme.unwrap_or_default());
    let source = PagedSource::new(settings.source_config());
    let mut app = App::new(theme, source, settings.layout, settings.columns);

    let mut terminal = tui::init()?;
    let result = run_loop(&mut terminal, &mut app).await;
    tui::restore()?;

    if let Err(e) = &result {
        error!(error = %e, "exited with error");
    }
    result
}

async fn run_loop(terminal: &mut ratatui::DefaultTerminal, app: &mut App) -> Result<()> {
    let mut events = EventHandler::new(TICK_MS);
    let mut last_height: Option<u16> = None;

    app.load_first_page();

    loop {
        terminal.draw(|frame| render(app, frame))?;

        // Runs after the frame. A load requested here is fetched next turn,
        // once the refreshed status row has been drawn.
        app.pump();

        let current_height = terminal.size()?.height;
        if last_height != Some(current_height) {
            last_height = Some(current_height);
            app.update(Message::UpdateViewportHeight(current_height))?;
        }

        if app.should_quit {
            break;
        }

        match events.next().await? {
            Event::Key(key) => {
                if let Some(msg) = keys::handle_key(key, app) {
                    app.update(msg)?;
                }
            }
            Event::Tick | Event::Resize => {}
        }
    }
    Ok(())
}

fn render(app: &App, frame: &mut Frame) {
    use ratatui::layout::{Constraint, Layout};

    let area = frame.area();

    let (main_area, debug_area) = if app.debug.visible {
        let chunks =
            Layout::vertical([Constraint::Min(0), Constraint::Length(App::DEBUG_HEIGHT)])
                .split(area);
        (chunks[0], Some(chunks[1]))
    } else {
        (area, None)
    };

    views::feed::render(frame, app, main_area);

    if let Some(debug_area) = debug_area {
        views::debug::render(frame, app, debug_area);
    }

    views::help_overlay::render(frame, app, area);
}
