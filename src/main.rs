use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use ratatui::layout::{Constraint, Layout, Rect};
use tokio::sync::mpsc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use bomtrace::action::Action;
use bomtrace::app::{App, Effect, InputMode, Overlay, View};
use bomtrace::client::{HttpTraceClient, TraceClient};
use bomtrace::config::{Cli, ConfigFile, Settings};
use bomtrace::event::{key_to_action, AppEvent, RawEventHandler};
use bomtrace::report;
use bomtrace::trace::fetch_trace_page;
use bomtrace::widgets;
use bomtrace::worker::{CliHandle, CliRequest, CliWorker};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let settings = Settings::resolve(Cli::parse(), ConfigFile::load());

    // Held until exit so buffered log lines are flushed
    let _log_guard = init_logging(&settings)?;

    let client = match HttpTraceClient::new(&settings.base_url, settings.timeout) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Invalid backend URL {}: {}", settings.base_url, e);
            eprintln!();
            eprintln!("Set it with --base-url or BOMTRACE_BASE_URL.");
            std::process::exit(1);
        }
    };

    if settings.print {
        run_print(&client, &settings).await
    } else {
        run_tui(Arc::new(client), settings).await
    }
}

fn init_logging(settings: &Settings) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if let Some(ref log_file) = settings.log_file {
        let file = std::fs::File::create(log_file)
            .wrap_err_with(|| format!("cannot create log file {}", log_file.display()))?;
        let (writer, guard) = tracing_appender::non_blocking(file);
        tracing_subscriber::fmt()
            .with_writer(writer)
            .with_ansi(false)
            .with_env_filter(filter)
            .init();
        return Ok(Some(guard));
    }

    // The UI owns the terminal; only print mode may log to stderr
    if settings.print {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .init();
    }
    Ok(None)
}

async fn run_print(client: &dyn TraceClient, settings: &Settings) -> Result<()> {
    let page = fetch_trace_page(client, settings.item, settings.page)
        .await
        .wrap_err_with(|| format!("failed to load trace for {}", settings.item))?;
    print!("{}", report::render_page(&page));
    Ok(())
}

async fn run_tui(client: Arc<dyn TraceClient>, settings: Settings) -> Result<()> {
    let mut app = App::new(settings.item, settings.base_url.clone());

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();

    let (worker, cli_handle) = CliWorker::new(client, action_tx);
    tokio::spawn(worker.run());

    let effects = app.init(settings.page);
    handle_effects(effects, &cli_handle);

    let mut terminal = bomtrace::tui::init()?;
    let mut events = RawEventHandler::new(Duration::from_secs(1));

    loop {
        terminal.draw(|frame| render(&mut app, frame))?;

        tokio::select! {
            Some(event) = events.next() => {
                let action = match event {
                    AppEvent::Key(key) => key_to_action(
                        key,
                        &app.view,
                        &app.input_mode,
                        &app.overlay,
                        &app.input_buffer,
                    ),
                    AppEvent::Tick => Some(Action::Tick),
                };
                if let Some(action) = action {
                    let effects = app.update(action);
                    handle_effects(effects, &cli_handle);
                }
            }
            Some(action) = action_rx.recv() => {
                let effects = app.update(action);
                handle_effects(effects, &cli_handle);
            }
        }

        if app.should_quit {
            break;
        }
    }

    bomtrace::tui::restore()?;

    Ok(())
}

fn render(app: &mut App, frame: &mut ratatui::Frame) {
    let area = frame.area();

    frame.render_widget(
        ratatui::widgets::Block::default()
            .style(ratatui::style::Style::default().bg(bomtrace::theme::BG_DARK)),
        area,
    );

    let layout = Layout::vertical([
        Constraint::Length(1), // Header
        Constraint::Fill(1),   // Content
        Constraint::Length(1), // Footer or command line
    ])
    .split(area);

    widgets::header::render(app, frame, layout[0]);

    match app.view {
        View::Trace => widgets::trace_table::render(app, frame, layout[1]),
        View::Stock => widgets::stock_chart::render(app, frame, layout[1]),
    }

    if app.input_mode == InputMode::Command {
        let content = layout[1];
        let suggestions = Rect {
            y: content.y + content.height.saturating_sub(1),
            height: content.height.min(1),
            ..content
        };
        widgets::command_input::render_suggestions(app, frame, suggestions);
        widgets::command_input::render(app, frame, layout[2]);
    } else {
        widgets::footer::render(app, frame, layout[2]);
    }

    match &app.overlay {
        Overlay::Help => widgets::help_overlay::render(&app.view, frame, area),
        Overlay::EventDetail(_) => widgets::event_detail::render(app, frame, area),
        Overlay::None => {}
    }

    widgets::error_toast::render(app, frame, area);
}

fn handle_effects(effects: Vec<Effect>, cli_handle: &CliHandle) {
    for effect in effects {
        match effect {
            Effect::LoadTrace { seq, item, page } => {
                cli_handle.send(CliRequest::LoadTrace { seq, item, page });
            }
            Effect::LoadStock { seq, item } => {
                cli_handle.send(CliRequest::LoadStock { seq, item });
            }
            Effect::Quit => {}
        }
    }
}
