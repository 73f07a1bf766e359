mod actions;
mod app;
pub mod config;
mod input;
pub mod logging;
pub mod persistence;
mod view;
pub mod wheel;

use anyhow::{Context, Result};
use app::App;
use arcana_core::Locale;
use config::AppConfig;
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event as CEvent, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, ExecutableCommand};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use std::io::{self, stdout, IsTerminal};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, clap::Args)]
pub struct LaunchOptions {
    /// Interface language (en_US or zh_CN).
    #[arg(long = "lang", short = 'l', global = true)]
    pub locale: Option<String>,
    /// Fixed shuffle seed.
    #[arg(long, global = true)]
    pub seed: Option<u64>,
    /// Config file; defaults to the per-user location.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Skip the interpretation service and use fallback text.
    #[arg(long, global = true)]
    pub offline: bool,
}

impl LaunchOptions {
    pub fn load_config(&self) -> Result<AppConfig> {
        let mut config = AppConfig::load(self.config.as_deref())?;
        if let Some(locale) = self.locale.as_deref() {
            config.locale = Some(Locale::from_opt(Some(locale)));
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        Ok(config)
    }
}

pub fn run(options: LaunchOptions) -> Result<()> {
    let config = options.load_config()?;
    logging::init_file_tracing(&config.log_path());
    let mut app = App::bootstrap(&config, options.offline)?;

    ensure_interactive_terminal()?;

    enable_raw_mode().map_err(|err| {
        anyhow::anyhow!(
            "failed to enable raw mode; ensure the process owns an interactive terminal: {err}"
        )
    })?;
    let mut stdout = stdout();
    stdout
        .execute(EnterAlternateScreen)
        .context("enter alternate screen")?;
    stdout
        .execute(EnableMouseCapture)
        .context("enable mouse capture")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let run_result = run_loop(&mut terminal, &mut app);
    restore_terminal(&mut terminal)?;
    run_result
}

fn run_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    let tick_rate = Duration::from_millis(50);
    while !app.should_quit {
        terminal.draw(|frame| view::draw(frame, app))?;
        if event::poll(tick_rate)? {
            match event::read()? {
                CEvent::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if !app.handle_text_key(key) {
                        let action = input::map_key(key);
                        actions::dispatch(app, action);
                    }
                }
                CEvent::Mouse(mouse) => {
                    let size = terminal.size()?;
                    let area = view::wheel_area(Rect::new(0, 0, size.width, size.height));
                    app.handle_mouse(mouse, area);
                }
                _ => {}
            }
        }
        app.on_tick();
    }
    Ok(())
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )
    .context("leave alternate screen")?;
    terminal.show_cursor().context("show cursor")?;
    Ok(())
}

fn ensure_interactive_terminal() -> Result<()> {
    if io::stdin().is_terminal() && io::stdout().is_terminal() {
        return Ok(());
    }
    anyhow::bail!(
        "arcana-cui requires an interactive TTY (run directly in a terminal, not a piped/headless shell)"
    );
}
