mod app;
mod catalog;
mod config;
mod constants;
mod feed;
mod gesture;
mod input;
mod playback;
mod search;
mod theme;
mod ui;
mod upload;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use directories::ProjectDirs;
use ratatui::{
  DefaultTerminal,
  crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
  },
};
use std::path::PathBuf;
use std::time::Duration;

use app::App;
use catalog::VideoCatalog;

// --- CLI ---

#[derive(Parser, Debug)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about, long_about = None)]
struct Args {
  /// Theme name (e.g. 'midnight chalk'); defaults to the saved preference
  #[arg(short, long)]
  theme: Option<String>,

  /// Load feed records from a JSON file instead of the built-in catalog
  #[arg(long)]
  catalog: Option<PathBuf>,

  /// Print shell completions and exit
  #[arg(long, value_enum)]
  completions: Option<Shell>,
}

// --- Logging ---

/// Set up file logging under the platform data dir. Stdout belongs to the
/// terminal UI, so everything goes through a non-blocking file appender.
fn init_tracing() -> Option<tracing_appender::non_blocking::WorkerGuard> {
  let proj_dirs = ProjectDirs::from("", "", "shine")?;
  let log_dir = proj_dirs.data_local_dir().join("logs");
  std::fs::create_dir_all(&log_dir).ok()?;

  let appender = tracing_appender::rolling::daily(log_dir, "shine.log");
  let (writer, guard) = tracing_appender::non_blocking(appender);
  let filter = tracing_subscriber::EnvFilter::try_from_env("SHINE_LOG")
    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
  tracing_subscriber::fmt().with_env_filter(filter).with_writer(writer).with_ansi(false).init();
  Some(guard)
}

// --- Main ---

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  if let Some(shell) = args.completions {
    clap_complete::generate(shell, &mut Args::command(), "shine", &mut std::io::stdout());
    return Ok(());
  }

  let _guard = init_tracing();

  let catalog = match args.catalog {
    Some(ref path) => VideoCatalog::load_from_path(path)?,
    None => VideoCatalog::seed()?,
  };

  let default_hook = std::panic::take_hook();
  std::panic::set_hook(Box::new(move |info| {
    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();
    default_hook(info);
  }));

  let mut terminal = ratatui::init();
  // The gesture router consumes wheel and press/release events; capture is
  // scoped to the feed's lifetime and released on every exit path.
  execute!(std::io::stdout(), EnableMouseCapture).context("Failed to enable mouse capture")?;
  let result = run(&mut terminal, catalog, args.theme).await;
  let _ = execute!(std::io::stdout(), DisableMouseCapture);
  ratatui::restore();
  result
}

async fn run(terminal: &mut DefaultTerminal, catalog: VideoCatalog, theme: Option<String>) -> Result<()> {
  let mut app = App::new(catalog, theme);

  loop {
    app.check_pending();
    app.tick();

    terminal.draw(|frame| ui::ui(frame, &mut app))?;

    if event::poll(Duration::from_millis(100))? {
      match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => input::handle_key_event(&mut app, key),
        Event::Mouse(mouse) => input::handle_mouse_event(&mut app, mouse),
        _ => {}
      }
    }

    if app.should_quit {
      break;
    }
  }

  app.cancel_upload();
  Ok(())
}
