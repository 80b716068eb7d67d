//! hyperadar: a live dashboard of what is trending, for the terminal.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌────────────┐ refresh() ┌─────────────┐ fetch_items() ┌───────────┐
//! │scheduler.rs│ ────────► │aggregator.rs│ ────────────► │ source/*  │
//! │  (timer)   │           │  (fan-out)  │   (parallel)  │ (3 feeds) │
//! └────────────┘           └─────────────┘               └───────────┘
//!       │ RefreshResult (channel)
//!       ▼
//! ┌──────────┐  filter()  ┌──────────┐  draw()  ┌──────────┐
//! │  app.rs  │ ─────────► │filter.rs │ ───────► │  ui.rs   │
//! │ (state)  │            │  (view)  │          │ (render) │
//! └──────────┘            └──────────┘          └──────────┘
//!       ▲
//!       │ handle_key_event()
//! ┌──────────┐
//! │ input.rs │
//! └──────────┘
//! ```
//!
//! * **`source/`**: the `DataSource` trait and one adapter per upstream.
//! * **`aggregator`**: runs every source concurrently and merges the results.
//! * **`scheduler`**: decides when to refresh: on start, on a timer, on `r`.
//! * **`state`**: the aggregated lists and the published, versioned snapshot.
//! * **`filter`**: the live search over the snapshot.
//! * **`app`**: owns all UI state (snapshot, query, selection, etc.).
//! * **`ui`**: pure rendering: reads `App` state and draws widgets.
//! * **`input`**: maps key events to `App` mutations.
//! * **`main`**: wires everything together: parse args, set up logging and
//!   the terminal, and run the event loop.

mod aggregator;
mod app;
mod config;
mod error;
mod filter;
mod input;
mod scheduler;
mod source;
mod state;
mod ui;

use std::fs::File;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use aggregator::Aggregator;
use app::App;
use config::Config;
use input::Action;
use scheduler::{Scheduler, Trigger};
use source::{NewsSource, SocialSource, TrendSource};

// ---------------------------------------------------------------------------
// RAII terminal guard, restores the terminal even on panic
// ---------------------------------------------------------------------------

/// Manages terminal raw-mode and alternate-screen lifetime via [`Drop`].
///
/// Constructing this struct enters raw mode + alternate screen.  When the
/// value is dropped (normally or during stack unwinding) it restores the
/// terminal.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Install a panic hook that restores the terminal before printing the
/// panic message.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));
}

/// Send logs to a file; stdout belongs to the UI.
fn init_logging(config: &Config) -> Result<()> {
    let path = config.log_path();
    let file = File::create(&path)
        .with_context(|| format!("cannot open log file {}", path.display()))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hyperadar=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Arc::new(file)),
        )
        .init();
    Ok(())
}

fn build_aggregator(config: &Config) -> Result<Aggregator> {
    let client = reqwest::Client::builder()
        .timeout(config.timeout())
        .user_agent(concat!("hyperadar/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("failed to create HTTP client")?;

    Ok(Aggregator::new(
        TrendSource::new(
            client.clone(),
            TrendSource::feed_url_for_region(&config.region),
            config.relay(),
        ),
        SocialSource::new(client.clone(), &config.social_url),
        NewsSource::new(client, &config.news_url),
        config.timeout(),
    ))
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    // -- parse arguments -----------------------------------------------------
    let config = Config::parse();
    config.validate()?;
    init_logging(&config)?;
    info!(region = %config.region, relay = ?config.relay(), "starting");

    // -- background runtime for fetching -----------------------------------
    // The UI loop below stays synchronous; refreshes and the interval timer
    // run as tasks on this runtime.
    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    let mut scheduler = Scheduler::new(
        build_aggregator(&config)?,
        runtime.handle().clone(),
        config.interval(),
    );

    install_panic_hook();

    // -- terminal setup (Drop restores on exit or panic) --------------------
    let mut guard = TerminalGuard::new()?;
    let mut app = App::new();
    scheduler.activate();

    // -- main event loop -----------------------------------------------------
    // Runs at ~10 fps (100 ms tick).  Each iteration:
    //   1. Collect a finished refresh, if any.
    //   2. Render the UI.
    //   3. Poll for keyboard input (non-blocking, up to tick_rate).
    let tick_rate = Duration::from_millis(100);

    loop {
        // 1. Process scheduler messages
        if let Some(result) = scheduler.try_next() {
            app.apply_refresh(result);
        }
        app.loading = scheduler.is_refreshing();

        // 2. Render
        guard.terminal.draw(|f| ui::draw(&mut app, f))?;

        // 3. Handle input
        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if input::handle_key_event(&mut app, key) == Action::Refresh
                    && scheduler.trigger(Trigger::Manual)
                {
                    app.loading = true;
                }
            }
        }

        if app.quit {
            break;
        }
    }

    // Stop the timer before the runtime goes away.
    scheduler.deactivate();
    info!("shutting down");

    // `guard` is dropped here, restoring the terminal.
    Ok(())
}
