mod app;
mod chart;
mod config;
mod model;
mod slider;
mod theme;
mod ui;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app::{App, Popup};
use config::AppConfig;
use model::{project_years, YearProjection};
use ui::ScreenLayout;

/// Poll interval while the handle moves; short enough for smooth animation
const FRAME: Duration = Duration::from_millis(16);
const IDLE: Duration = Duration::from_millis(100);

#[derive(Parser, Debug)]
#[command(name = "agebars")]
#[command(version = "0.1.0")]
#[command(about = "Compound-interest growth, one bar per year of age")]
struct Args {
    /// Age of the first bar (projection runs to 79)
    #[arg(long)]
    current_age: Option<u32>,

    /// Amount added every year
    #[arg(long)]
    yearly_contribution: Option<f64>,

    /// Starting balance
    #[arg(long)]
    initial_principal: Option<f64>,

    /// Yearly growth rate (0.04 = 4%)
    #[arg(long)]
    rate: Option<f64>,

    /// Print the projection as JSON and exit
    #[arg(long)]
    json: bool,

    /// Config file to use instead of ~/.config/agebars/config.toml
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Args {
    /// CLI flags win over the config file
    fn apply(&self, mut config: AppConfig) -> AppConfig {
        if let Some(age) = self.current_age {
            config.current_age = age;
        }
        if let Some(contribution) = self.yearly_contribution {
            config.yearly_contribution = contribution;
        }
        if let Some(principal) = self.initial_principal {
            config.initial_principal = principal;
        }
        if let Some(rate) = self.rate {
            config.rate = rate;
        }
        config.validated()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectionOutput {
    current_age: u32,
    yearly_contribution: f64,
    initial_principal: f64,
    rate: f64,
    years: Vec<YearProjection>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they stay off the alternate screen
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = args.apply(AppConfig::load(args.config.as_deref())?);

    if args.json {
        return print_projection(&config);
    }

    run_tui(config).await
}

fn print_projection(config: &AppConfig) -> Result<()> {
    let inputs = config.chart_inputs().sanitized();
    let output = ProjectionOutput {
        current_age: inputs.current_age,
        yearly_contribution: inputs.yearly_contribution,
        initial_principal: inputs.initial_principal,
        rate: inputs.rate,
        years: project_years(&inputs),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn run_tui(config: AppConfig) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, Instant::now());

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;
    app.shutdown();

    // Restore terminal even when the loop failed; the loop's error wins
    let restored = restore_terminal(&mut terminal);
    result.and(restored)
}

/// Every step runs; the first failure is reported
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    let raw = disable_raw_mode();
    let screen = execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    );
    let cursor = terminal.show_cursor();

    raw.and(screen).and(cursor)?;
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    let size = terminal.size()?;
    app.on_resize(ScreenLayout::new(ratatui::layout::Rect::new(0, 0, size.width, size.height)));

    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        let timeout = if app.is_busy() { FRAME } else { IDLE };
        if event::poll(timeout)? {
            let now = Instant::now();
            let handled = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') if app.popup == Popup::None => return Ok(()),
                    KeyCode::Char('c') if key.modifiers.contains(event::KeyModifiers::CONTROL) => {
                        return Ok(())
                    }
                    _ => app.handle_key(key, now),
                },
                Event::Mouse(mouse) => app.handle_mouse(mouse, now),
                Event::Resize(width, height) => {
                    app.on_resize(ScreenLayout::new(ratatui::layout::Rect::new(0, 0, width, height)));
                    Ok(())
                }
                _ => Ok(()),
            };

            // Show errors in the info line instead of tearing down the UI
            if let Err(e) = handled {
                app.status_message = Some(format!("Error: {}", e));
                app.status_message_time = Some(Instant::now());
            }
        }

        app.tick(Instant::now());
    }
}
