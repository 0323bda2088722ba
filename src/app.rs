use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{info, warn};

use crate::celebration::Celebration;
use crate::config::Config;
use crate::deck;
use crate::engine::ValidationReport;
use crate::error::MatchError;
use crate::game::Game;
use crate::session::Pair;
use crate::timer::TimerPreset;
use crate::util::fmt_duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Start,
    Playing,
    Results,
    Load,
}

/// A deck read from disk but not yet in play
#[derive(Debug, Clone)]
pub struct DeckPreview {
    pub path: PathBuf,
    pub pairs: Vec<Pair>,
}

/// Path entry for loading another deck mid-session.
#[derive(Debug, Clone)]
pub struct DeckPrompt {
    pub input: String,
    pub preview: Option<DeckPreview>,
    return_to: AppState,
}

impl Default for DeckPrompt {
    fn default() -> Self {
        Self {
            input: String::new(),
            preview: None,
            return_to: AppState::Start,
        }
    }
}

/// What the event loop should do after handling input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// The countdown just began running; realign the tick source.
    Rearm,
    Quit,
}

#[derive(Debug)]
pub struct App {
    pub game: Game,
    pub config: Config,
    pub state: AppState,
    pub deck_name: String,
    pub selected_question: usize,
    pub answer_cursor: usize,
    pub results_scroll: usize,
    pub last_report: Option<ValidationReport>,
    pub notice: Option<String>,
    pub prompt: DeckPrompt,
    pub celebration: Celebration,
}

impl App {
    pub fn new(pairs: Vec<Pair>, deck_name: impl Into<String>, config: Config) -> Self {
        Self {
            game: Game::new(pairs, config.countdown()),
            config,
            state: AppState::Start,
            deck_name: deck_name.into(),
            selected_question: 0,
            answer_cursor: 0,
            results_scroll: 0,
            last_report: None,
            notice: None,
            prompt: DeckPrompt::default(),
            celebration: Celebration::default(),
        }
    }

    /// Answer under the cursor in the pool of unplaced answers.
    pub fn highlighted_answer(&self) -> Option<usize> {
        self.game
            .state()
            .available_answers()
            .get(self.answer_cursor)
            .copied()
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Flow {
        if self.state == AppState::Load && key.code == KeyCode::Esc {
            self.state = self.prompt.return_to;
            self.notice = None;
            return Flow::Continue;
        }
        if key.code == KeyCode::Esc
            || (key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c'))
        {
            return Flow::Quit;
        }
        self.notice = None;

        match self.state {
            AppState::Start => self.on_start_key(key),
            AppState::Playing => self.on_playing_key(key),
            AppState::Results => self.on_results_key(key),
            AppState::Load => self.on_load_key(key),
        }
    }

    /// One second of countdown. Expiry forces a validation attempt.
    pub fn on_tick(&mut self) {
        self.celebration.advance();
        match self.game.tick() {
            Some(Ok(report)) => {
                self.notice = Some("Time's up!".to_string());
                self.show_results(report);
            }
            Some(Err(err)) => {
                self.notice = Some(format!("Time's up! {err}"));
            }
            None => {}
        }
    }

    fn on_start_key(&mut self, key: KeyEvent) -> Flow {
        match key.code {
            KeyCode::Enter => {
                self.state = AppState::Playing;
                self.game.begin_countdown();
                if self.game.timer().running {
                    Flow::Rearm
                } else {
                    Flow::Continue
                }
            }
            KeyCode::Char('t') => {
                self.cycle_timer_preset();
                Flow::Continue
            }
            KeyCode::Char('o') => {
                self.toggle_timer_enabled();
                Flow::Continue
            }
            KeyCode::Char('l') => {
                self.open_prompt();
                Flow::Continue
            }
            _ => Flow::Continue,
        }
    }

    fn on_playing_key(&mut self, key: KeyEvent) -> Flow {
        let n = self.game.state().len();
        match key.code {
            KeyCode::Up if n > 0 => {
                self.selected_question = (self.selected_question + n - 1) % n;
            }
            KeyCode::Down if n > 0 => {
                self.selected_question = (self.selected_question + 1) % n;
            }
            KeyCode::Left => self.move_answer_cursor(-1),
            KeyCode::Right | KeyCode::Tab => self.move_answer_cursor(1),
            KeyCode::Enter => self.place_highlighted(),
            KeyCode::Backspace | KeyCode::Delete => {
                if let Err(err) = self.game.unassign(self.selected_question) {
                    self.notice = Some(err.to_string());
                }
            }
            KeyCode::Char('c') => self.check(),
            KeyCode::Char('s') => {
                self.game.reshuffle();
                self.answer_cursor = 0;
                self.notice = Some("Answers shuffled".to_string());
            }
            KeyCode::Char('r') => {
                self.reset();
                self.notice = Some("Game reset".to_string());
            }
            KeyCode::Char('p') | KeyCode::Char(' ') => {
                self.game.toggle_timer();
                if self.game.timer().running {
                    return Flow::Rearm;
                }
            }
            KeyCode::Char('x') => {
                self.game.reset_timer();
                self.notice = Some("Timer reset".to_string());
            }
            KeyCode::Char('t') => self.cycle_timer_preset(),
            KeyCode::Char('o') => self.toggle_timer_enabled(),
            _ => {}
        }
        Flow::Continue
    }

    fn on_results_key(&mut self, key: KeyEvent) -> Flow {
        match key.code {
            KeyCode::Up => self.results_scroll = self.results_scroll.saturating_sub(1),
            KeyCode::Down => {
                let items = self.last_report.as_ref().map_or(0, |r| r.items.len());
                if self.results_scroll + 1 < items {
                    self.results_scroll += 1;
                }
            }
            KeyCode::Char('e') | KeyCode::Enter => self.state = AppState::Playing,
            KeyCode::Char('r') => {
                self.reset();
                self.state = AppState::Playing;
            }
            KeyCode::Char('n') => {
                self.game.reset(true);
                self.clear_cursors();
                self.state = AppState::Start;
            }
            KeyCode::Char('l') => self.open_prompt(),
            _ => {}
        }
        Flow::Continue
    }

    /// First enter previews the typed path, a second enter plays it.
    fn on_load_key(&mut self, key: KeyEvent) -> Flow {
        match key.code {
            KeyCode::Char(c) => {
                self.prompt.input.push(c);
                self.prompt.preview = None;
            }
            KeyCode::Backspace => {
                self.prompt.input.pop();
                self.prompt.preview = None;
            }
            KeyCode::Enter => match self.prompt.preview.take() {
                Some(preview) if preview.path == Path::new(self.prompt.input.trim()) => {
                    self.load_deck(preview)
                }
                _ => self.preview_deck(),
            },
            _ => {}
        }
        Flow::Continue
    }

    fn open_prompt(&mut self) {
        self.game.pause_timer();
        self.prompt.preview = None;
        self.prompt.return_to = self.state;
        self.state = AppState::Load;
    }

    fn preview_deck(&mut self) {
        let path = PathBuf::from(self.prompt.input.trim());
        if path.extension().map_or(true, |ext| !ext.eq_ignore_ascii_case("csv")) {
            self.notice = Some("Only .csv files can be loaded".to_string());
            return;
        }
        match deck::load_file(&path) {
            Ok(pairs) => self.prompt.preview = Some(DeckPreview { path, pairs }),
            Err(err) => self.notice = Some(err.to_string()),
        }
    }

    fn load_deck(&mut self, preview: DeckPreview) {
        self.deck_name = preview
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| preview.path.display().to_string());
        info!(deck = %self.deck_name, pairs = preview.pairs.len(), "deck loaded");

        self.game.load_pairs(preview.pairs);
        self.clear_cursors();
        self.prompt = DeckPrompt::default();
        self.notice = Some(format!(
            "Loaded {} ({} pairs)",
            self.deck_name,
            self.game.state().len()
        ));
        self.state = AppState::Start;
    }

    fn move_answer_cursor(&mut self, delta: isize) {
        let len = self.game.state().available_answers().len();
        if len == 0 {
            self.answer_cursor = 0;
            return;
        }
        self.answer_cursor = (self.answer_cursor as isize + delta).rem_euclid(len as isize) as usize;
    }

    fn place_highlighted(&mut self) {
        let Some(answer) = self.highlighted_answer() else {
            self.notice = Some("No answers left to place".to_string());
            return;
        };
        if let Err(err) = self.game.assign(self.selected_question, answer) {
            self.notice = Some(err.to_string());
            return;
        }

        let available = self.game.state().available_answers().len();
        self.answer_cursor = self.answer_cursor.min(available.saturating_sub(1));

        // jump to the next open question
        let st = self.game.state();
        let current = self.selected_question;
        let n = st.len();
        let next = (1..=n)
            .map(|off| (current + off) % n)
            .find(|&q| st.assigned(q).is_none());
        if let Some(next) = next {
            self.selected_question = next;
        }
    }

    fn check(&mut self) {
        match self.game.validate() {
            Ok(report) => self.show_results(report),
            Err(MatchError::IncompleteAssignment { missing }) => {
                self.notice = Some(format!("{missing} answer(s) missing"));
            }
            Err(err) => self.notice = Some(err.to_string()),
        }
    }

    fn show_results(&mut self, report: ValidationReport) {
        if report.is_perfect() {
            self.celebration.start();
        } else {
            self.celebration.stop();
        }
        self.last_report = Some(report);
        self.results_scroll = 0;
        self.state = AppState::Results;
    }

    fn reset(&mut self) {
        self.game.reset(self.config.reshuffle_on_reset);
        self.clear_cursors();
    }

    fn clear_cursors(&mut self) {
        self.selected_question = 0;
        self.answer_cursor = 0;
        self.results_scroll = 0;
        self.last_report = None;
        self.celebration.stop();
    }

    fn cycle_timer_preset(&mut self) {
        let preset = TimerPreset::next_after(self.config.timer_secs);
        self.apply_timer(preset.secs(), true);
    }

    fn toggle_timer_enabled(&mut self) {
        self.apply_timer(self.config.timer_secs, !self.config.timer_enabled);
    }

    fn apply_timer(&mut self, secs: u32, enabled: bool) {
        match self.game.configure_timer(secs, enabled) {
            Ok(()) => {
                self.config.timer_secs = secs;
                self.config.timer_enabled = enabled;
                self.notice = Some(if enabled {
                    format!("Timer: {}", fmt_duration(secs))
                } else {
                    "Timer off".to_string()
                });
            }
            Err(err) => {
                warn!(%err, "timer settings unchanged");
                self.notice = Some(format!("{err}; pause it first"));
            }
        }
    }
}
