use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use fra_dashboard::{
    app::App,
    catalog::{file::JsonFileSource, fixtures::StaticSource, traits::OpportunitySource, OpportunityCatalog},
    ui, DashboardConfig,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::path::Path;
use std::time::Duration;
use tracing::{error, info};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, EnvFilter};

pub fn init_file_logging(log_dir: &Path) -> Result<()> {
    let file_appender = RollingFileAppender::new(Rotation::NEVER, log_dir, "fra-dashboard.log");

    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(false)
        .with_line_number(true)
        .with_file(true)
        .with_level(true)
        .compact()
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))
}

/// Owns the terminal; restores it on drop even if the loop bails out early.
struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl Tui {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture,
        );
        let _ = self.terminal.show_cursor();
    }
}

fn run(tui: &mut Tui, app: &mut App, tick_rate: Duration) -> Result<()> {
    while !app.should_quit() {
        tui.terminal.draw(|f| ui::draw(f, &*app))?;

        if event::poll(tick_rate)? {
            match event::read()? {
                Event::Key(key) => app.handle_key(key),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let (config, origin) = DashboardConfig::load()?;
    init_file_logging(&config.log_dir)?;
    info!("Config loaded from {}", origin);

    let source: Box<dyn OpportunitySource> = match &config.catalog_path {
        Some(path) => Box::new(JsonFileSource::new(path.clone())),
        None => Box::new(StaticSource),
    };
    let catalog = OpportunityCatalog::load(source.as_ref()).await?;
    info!("Catalog loaded from {}", catalog.source());

    let mut app = App::new(catalog, &config)?;
    let mut tui = Tui::enter()?;
    let result = run(&mut tui, &mut app, Duration::from_millis(config.tick_rate_ms));
    drop(tui);

    if let Err(e) = &result {
        error!("Dashboard exited with error: {:?}", e);
    }
    result
}
