use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use matchit::{
    app::{App, Flow},
    config::{Config, ConfigStore, FileConfigStore},
    deck::{self, BuiltinDeck, DeckError},
    logging,
    runtime::{CrosstermEventSource, FixedTicker, MatchEvent, Runner},
    session::Pair,
    timer::{minutes_to_secs, TimerPreset},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    fs,
    io::{self, stdin, Write},
    path::{Path, PathBuf},
};
use tracing::{info, warn};

/// terminal matching quiz: pair every question with its answer before the clock runs out
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Match each question with its answer, then check the board. Decks are plain CSV files with question,answer rows; an optional countdown checks the board for you when it runs out."
)]
pub struct Cli {
    /// CSV deck to play (question,answer rows)
    deck: Option<PathBuf>,

    /// play one of the bundled decks
    #[clap(short = 'b', long, value_enum, conflicts_with = "deck")]
    builtin: Option<BuiltinDeck>,

    /// shortcut for --builtin demo
    #[clap(long, conflicts_with_all = ["deck", "builtin"])]
    demo: bool,

    /// countdown preset
    #[clap(short = 't', long, value_enum, conflicts_with_all = ["minutes", "seconds"])]
    timer: Option<TimerPreset>,

    /// custom countdown in minutes (clamped to 1-120)
    #[clap(short = 'm', long, conflicts_with = "seconds")]
    minutes: Option<u32>,

    /// custom countdown in seconds
    #[clap(short = 's', long, value_parser = clap::value_parser!(u32).range(1..))]
    seconds: Option<u32>,

    /// play without a countdown
    #[clap(long, conflicts_with_all = ["timer", "minutes", "seconds"])]
    no_timer: bool,

    /// deal the answers in a new order whenever the board is reset
    #[clap(long)]
    reshuffle_on_reset: bool,

    /// write a CSV template to PATH (or stdout) and exit
    #[clap(long, value_name = "PATH", num_args = 0..=1, default_missing_value = "-")]
    template: Option<PathBuf>,

    /// remember the timer settings from this run
    #[clap(long)]
    save_settings: bool,
}

impl Cli {
    /// Command line flags layered over the persisted settings
    fn apply(&self, mut config: Config) -> Config {
        let secs = self
            .timer
            .map(TimerPreset::secs)
            .or(self.minutes.map(minutes_to_secs))
            .or(self.seconds);

        if let Some(secs) = secs {
            config.timer_secs = secs;
            config.timer_enabled = true;
        }
        if self.no_timer {
            config.timer_enabled = false;
        }
        if self.reshuffle_on_reset {
            config.reshuffle_on_reset = true;
        }
        config
    }

    fn load_deck(&self) -> Result<(Vec<Pair>, String), DeckError> {
        if let Some(ref path) = self.deck {
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            return Ok((deck::load_file(path)?, name));
        }

        let builtin = match (self.builtin, self.demo) {
            (Some(b), _) => b,
            (None, true) => BuiltinDeck::Demo,
            (None, false) => BuiltinDeck::Default,
        };
        Ok((builtin.load()?, builtin.to_string()))
    }
}

fn write_template(path: &Path) -> io::Result<()> {
    let csv = deck::template_csv();
    if path.as_os_str() == "-" {
        io::stdout().write_all(csv.as_bytes())
    } else {
        fs::write(path, csv)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if let Some(ref path) = cli.template {
        write_template(path)?;
        return Ok(());
    }

    // A missing log file must not keep anyone from playing.
    let _ = logging::init();

    let store = FileConfigStore::new();
    let config = cli.apply(store.load());
    if cli.save_settings {
        if let Err(err) = store.save(&config) {
            warn!(%err, path = %store.path().display(), "could not save settings");
        }
    }

    let (pairs, deck_name) = match cli.load_deck() {
        Ok(loaded) => loaded,
        Err(err) => {
            let mut cmd = Cli::command();
            cmd.error(ErrorKind::Io, err.to_string()).exit();
        }
    };

    info!(deck = %deck_name, pairs = pairs.len(), "deck loaded");

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(pairs, deck_name, config);
    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let mut runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());
    let changes = app.game.subscribe();

    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    loop {
        let redraw = match runner.step() {
            MatchEvent::Tick => {
                let animating = app.celebration.is_active();
                app.on_tick();
                // idle ticks change nothing on screen
                changes.try_iter().count() > 0 || animating
            }
            MatchEvent::Resize => true,
            MatchEvent::Key(key) => {
                match app.on_key(key) {
                    Flow::Quit => break,
                    Flow::Rearm => runner.rearm(),
                    Flow::Continue => {}
                }
                changes.try_iter().for_each(drop);
                true
            }
        };

        if redraw {
            terminal.draw(|f| f.render_widget(&*app, f.area()))?;
        }
    }

    Ok(())
}
