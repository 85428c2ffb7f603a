use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{
        self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture, Event,
        KeyEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use folio::app::App;
use folio::config::{Config, Settings};
use folio::gemini::{Completer, GeminiClient, OfflineCompleter};
use folio::mail::{EmailJsRelay, OfflineRelay, Relay};
use folio::router::Router;
use folio::theme::{self, FileThemeStore, Theme, ThemeController};
use folio::ui::{draw, draw_backdrop};

#[derive(Debug, Parser)]
#[command(name = "folio", version, about = "Animated terminal portfolio with an AI assistant")]
struct Cli {
    /// Initial view fragment (home, about, services, projects, journey, contact)
    #[arg(long, default_value = "")]
    view: String,

    /// Run without network access
    #[arg(short, long)]
    offline: bool,

    /// Settings file (defaults to the platform config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log filter directive, e.g. `folio=debug`
    #[arg(long)]
    log_level: Option<String>,
}

/// Log to `folio.log` in the data dir; the terminal belongs to the UI.
fn init_logging(directive: Option<&str>) -> Option<WorkerGuard> {
    let dir = dirs::data_dir()?.join("folio");
    std::fs::create_dir_all(&dir).ok()?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("folio.log"))
        .ok()?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    let default_level = directive.unwrap_or("folio=info");
    let env_filter = match directive {
        Some(d) => EnvFilter::try_new(d),
        None => EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level)),
    }
    .unwrap_or_else(|_| EnvFilter::new("folio=info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_ansi(false)
        .with_writer(writer)
        .try_init();
    Some(guard)
}

fn load_settings(path: Option<PathBuf>) -> anyhow::Result<Settings> {
    let settings = match path.or_else(Settings::default_path) {
        Some(path) => Settings::load(&path).with_context(|| format!("loading {}", path.display()))?,
        None => Settings::default(),
    };
    Ok(settings.with_env(|key| std::env::var(key).ok()))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging(cli.log_level.as_deref());
    let settings = load_settings(cli.config.clone())?;

    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;
    let _enter = runtime.enter();

    let (completer, relay): (Arc<dyn Completer>, Arc<dyn Relay>) = if cli.offline {
        info!("running offline");
        (Arc::new(OfflineCompleter), Arc::new(OfflineRelay))
    } else {
        if settings.gemini_api_key.is_none() {
            warn!("no Gemini API key configured; chat will answer with a fallback line");
        }
        (
            Arc::new(
                GeminiClient::new(settings.gemini_api_key.clone(), Some(settings.model()))
                    .with_base_url(settings.gemini_base_url()),
            ),
            Arc::new(
                EmailJsRelay::new(settings.email_credentials())
                    .with_endpoint(settings.emailjs_endpoint()),
            ),
        )
    };

    // The stored value or the platform preference colors the first frame;
    // the controller then starts from its own default when nothing is stored.
    let store = FileThemeStore::in_data_dir();
    let root = theme::bootstrap(&store, theme::platform_prefers_dark());
    let first_frame = if root.has_dark() { Theme::Dark } else { Theme::Light };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.draw(|frame| draw_backdrop(frame, &first_frame.palette()))?;

    let default_theme = settings.default_theme().unwrap_or(theme::DEFAULT_THEME);
    let theme = ThemeController::new(Box::new(store), default_theme);

    let config = Config::default();
    let router = Router::load(&cli.view, config.transition_delay);

    let size = terminal.size()?;
    let mut app = App::new(
        config,
        router,
        theme,
        completer,
        relay,
        Rect::new(0, 0, size.width, size.height),
        Instant::now(),
    );
    info!(view = ?app.router.active_view(), "started");

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    result.context("event loop failed")
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> io::Result<()> {
    let tick_rate = app.config.tick_rate();
    loop {
        app.tick(Instant::now());

        terminal.draw(|frame| draw(frame, app))?;

        if app.should_quit {
            info!("quit requested");
            return Ok(());
        }

        // Poll for events with timeout (60 FPS for smooth animation)
        if event::poll(tick_rate)? {
            let now = Instant::now();
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key, now),
                Event::Paste(text) => app.handle_paste(&text),
                Event::Mouse(mouse) => app.handle_mouse(mouse, now),
                Event::Resize(width, height) => app.resize(width, height),
                Event::FocusLost => app.pointer.leave(),
                _ => {}
            }
        }
    }
}
