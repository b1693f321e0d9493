use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Terminal,
};

use oxywatch::app::App;
use oxywatch::config::Settings;
use oxywatch::events;
use oxywatch::gateway::{GatewayWorker, HttpGateway};
use oxywatch::schedule::RefreshSchedule;
use oxywatch::ui;

#[derive(Parser, Debug)]
#[command(name = "oxywatch")]
#[command(about = "Clinician TUI for monitoring remote patient SpO2 readings")]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Patient id to select at startup (must be in the configured list)
    #[arg(short, long)]
    patient: Option<u32>,

    /// Patient resource URL template; "{}" is replaced by the patient id
    #[arg(long)]
    base_url: Option<String>,

    /// SpO2 warning threshold (inclusive lower bound for normal)
    #[arg(short, long)]
    threshold: Option<i32>,

    /// Auto-refresh interval in seconds
    #[arg(short, long)]
    refresh: Option<u64>,

    /// Append tracing output to this file (filtered by RUST_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(url) = args.base_url {
        settings.base_url_template = url;
    }
    if let Some(threshold) = args.threshold {
        settings.spo2_threshold = threshold;
    }
    if let Some(refresh) = args.refresh {
        settings.refresh_secs = refresh;
    }
    settings.validate()?;

    if let Some(ref path) = args.log_file {
        init_tracing(path)?;
    }

    // Background runtime for the gateway worker and the refresh trigger.
    // Kept alive for the lifetime of the TUI.
    let rt = tokio::runtime::Runtime::new()?;
    let gateway = Arc::new(HttpGateway::new(settings.base_url_template.clone()));
    let (worker, worker_handle, schedule, schedule_handle) = rt.block_on(async {
        let (worker, worker_handle) = GatewayWorker::spawn(gateway);
        let (schedule, schedule_handle) =
            RefreshSchedule::start(Duration::from_secs(settings.refresh_secs));
        (worker, worker_handle, schedule, schedule_handle)
    });

    let mut app = App::new(worker, settings.patients.clone(), settings.spo2_threshold);
    if let Some(patient) = args.patient {
        match settings.patients.iter().position(|&p| p == patient) {
            Some(index) => app.selected_patient = index,
            None => anyhow::bail!("patient {patient} is not in the configured list"),
        }
    }

    let result = run_tui(&mut app, schedule);

    // Tear down the recurring trigger and the worker
    schedule_handle.abort();
    worker_handle.abort();

    result
}

/// Set up tracing to a file; stdout belongs to the TUI.
fn init_tracing(path: &Path) -> Result<()> {
    let file = std::fs::OpenOptions::new().create(true).append(true).open(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Run the TUI around the prepared application state.
fn run_tui(app: &mut App, schedule: RefreshSchedule) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    let result = run_app(&mut terminal, app, schedule);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    mut schedule: RefreshSchedule,
) -> Result<()> {
    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 50;
    const MIN_HEIGHT: u16 = 12;

    // Initial load
    app.request_refresh();

    while app.running {
        terminal.draw(|frame| {
            let area = frame.area();

            // Check for minimum terminal size
            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = ratatui::widgets::Paragraph::new(msg)
                    .alignment(ratatui::layout::Alignment::Center)
                    .style(ratatui::style::Style::default().fg(ratatui::style::Color::Yellow));
                let centered = ratatui::layout::Rect::new(
                    0,
                    (area.height / 2).saturating_sub(2),
                    area.width,
                    5.min(area.height),
                );
                frame.render_widget(paragraph, centered);
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Min(6),    // Readings table
                Constraint::Length(4), // Advice panel
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            ui::common::render_header(frame, app, chunks[0]);
            ui::readings::render(frame, app, chunks[1]);
            ui::advice::render(frame, app, chunks[2]);
            ui::common::render_status_bar(frame, app, chunks[3]);

            // Render help overlay if active
            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        // Poll for events with a short timeout
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }

        // Periodic trigger funnels into the same fetch as the manual key
        if schedule.due() {
            app.request_refresh();
        }

        // Apply completed gateway outcomes on the control thread
        app.drain_outcomes();
    }

    Ok(())
}
