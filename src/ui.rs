pub mod load;
pub mod results;
pub mod screen;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    app::App,
    timer::Threshold,
    util::{fmt_clock, fmt_duration, truncate_to_width, wrap_to_width},
};

const HORIZONTAL_MARGIN: u16 = 2;
const VERTICAL_MARGIN: u16 = 1;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        screen::current_screen(&self.state).render(self, area, buf);
    }
}

pub fn threshold_color(threshold: Threshold) -> Color {
    match threshold {
        Threshold::Normal => Color::Green,
        Threshold::Warning => Color::Yellow,
        Threshold::Danger => Color::Red,
        Threshold::Done => Color::DarkGray,
    }
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn italic() -> Style {
    Style::default().add_modifier(Modifier::ITALIC)
}

pub(crate) fn render_start(app: &App, area: Rect, buf: &mut Buffer) {
    let timer = app.game.timer();
    let timer_text = if timer.enabled {
        format!("time limit: {}", fmt_duration(timer.total_secs))
    } else {
        "no time limit".to_string()
    };

    let lines = vec![
        Line::from(Span::styled("matchit", bold().fg(Color::Magenta))),
        Line::from(""),
        Line::from(format!(
            "{} · {} pair(s)",
            app.deck_name,
            app.game.state().len()
        )),
        Line::from(Span::styled(timer_text, Style::default().fg(Color::Cyan))),
        Line::from(""),
        Line::from(Span::styled("press enter to start", bold())),
    ];

    let height = lines.len() as u16;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(area.height.saturating_sub(height + 2) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    render_notice(app, chunks[3], buf);
    Paragraph::new(Span::styled(
        "(t) timer preset / (o) timer on/off / (l)oad deck / (esc)ape",
        italic(),
    ))
    .alignment(Alignment::Center)
    .render(chunks[4], buf);
}

pub(crate) fn render_playing(app: &App, area: Rect, buf: &mut Buffer) {
    let timer_lines = if app.game.timer().enabled { 1 } else { 0 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1),           // score
            Constraint::Length(timer_lines), // countdown
            Constraint::Min(3),              // columns
            Constraint::Length(1),           // notice
            Constraint::Length(1),           // legend
        ])
        .split(area);

    render_score(app, chunks[0], buf);
    if timer_lines > 0 {
        render_timer(app, chunks[1], buf);
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(chunks[2]);

    render_questions(app, columns[0], buf);
    render_answers(app, columns[1], buf);
    render_notice(app, chunks[3], buf);

    Paragraph::new(Span::styled(
        "↑↓ question  ←→ answer  (enter) place  (del) remove  (c)heck  (s)huffle  (r)eset  (p)ause  (x) timer reset",
        italic(),
    ))
    .render(chunks[4], buf);
}

fn render_score(app: &App, area: Rect, buf: &mut Buffer) {
    let score = app.game.score();
    let mut spans = vec![
        Span::styled(app.deck_name.clone(), bold()),
        Span::raw(format!("   placed {}/{}", score.placed, score.total)),
    ];
    if app.game.state().is_checked() {
        spans.push(Span::styled(
            format!("   ✓ {}", score.correct),
            bold().fg(Color::Green),
        ));
        spans.push(Span::styled(
            format!("   ✗ {}", score.incorrect),
            bold().fg(Color::Red),
        ));
    }
    Paragraph::new(Line::from(spans)).render(area, buf);
}

fn render_timer(app: &App, area: Rect, buf: &mut Buffer) {
    let countdown = app.game.countdown();
    let snapshot = countdown.snapshot();
    let color = threshold_color(snapshot.threshold());

    let state = if snapshot.expired {
        "time's up"
    } else if snapshot.running {
        "remaining"
    } else {
        "paused"
    };

    Gauge::default()
        .gauge_style(Style::default().fg(color))
        .ratio(countdown.fraction_remaining().clamp(0.0, 1.0))
        .label(format!("{} {}", fmt_clock(snapshot.remaining_secs), state))
        .render(area, buf);
}

fn render_questions(app: &App, area: Rect, buf: &mut Buffer) {
    let st = app.game.state();
    let results = st.results();
    let inner_width = area.width.saturating_sub(2) as usize;

    let mut lines = Vec::with_capacity(st.len() * 2);
    let mut selected_rows = 0..0;
    for (qi, question) in st.questions().iter().enumerate() {
        let selected = qi == app.selected_question;
        let marker = if selected { "▸ " } else { "  " };
        let prefix = format!("{marker}{}. ", qi + 1);
        let indent = " ".repeat(prefix.width());
        let q_style = if selected {
            bold().fg(Color::Cyan)
        } else {
            Style::default()
        };

        let first_row = lines.len();
        let wrapped = wrap_to_width(&question.text, inner_width.saturating_sub(prefix.width()));
        for (i, text) in wrapped.into_iter().enumerate() {
            let lead = if i == 0 { prefix.clone() } else { indent.clone() };
            lines.push(Line::from(vec![
                Span::styled(lead, q_style),
                Span::styled(text, q_style),
            ]));
        }

        match st.assigned(qi).and_then(|a| st.answer(a)) {
            Some(answer) => {
                let (mark, style) = match results.map(|r| r[qi]) {
                    Some(true) => ("✓ ", bold().fg(Color::Green)),
                    Some(false) => ("✗ ", bold().fg(Color::Red)),
                    None => ("→ ", bold()),
                };
                for (i, text) in wrap_to_width(answer, inner_width.saturating_sub(6))
                    .into_iter()
                    .enumerate()
                {
                    let lead = if i == 0 { mark } else { "  " };
                    lines.push(Line::from(Span::styled(format!("    {lead}{text}"), style)));
                }
            }
            None => lines.push(Line::from(Span::styled(
                "    → ·····",
                Style::default().add_modifier(Modifier::DIM),
            ))),
        }

        if selected {
            selected_rows = first_row..lines.len();
        }
    }

    // keep the selected question on screen, its first line if it can't all fit
    let visible = area.height.saturating_sub(2) as usize;
    let scroll = selected_rows
        .end
        .saturating_sub(visible)
        .min(selected_rows.start);

    Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Questions"))
        .scroll((to_row(scroll), 0))
        .render(area, buf);
}

/// Paragraph scroll offsets are `u16`; anything past that is clamped.
fn to_row(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

fn render_answers(app: &App, area: Rect, buf: &mut Buffer) {
    let st = app.game.state();
    let available = st.available_answers();
    let highlighted = app.highlighted_answer();
    let inner_width = area.width.saturating_sub(4) as usize;

    let lines: Vec<Line> = if available.is_empty() {
        vec![Line::from(Span::styled(
            "all answers placed, (c)heck when ready",
            italic(),
        ))]
    } else {
        available
            .iter()
            .map(|&a| {
                let text = truncate_to_width(st.answer(a).unwrap_or_default(), inner_width);
                if Some(a) == highlighted {
                    Line::from(Span::styled(
                        format!("» {text}"),
                        bold().add_modifier(Modifier::REVERSED),
                    ))
                } else {
                    Line::from(format!("  {text}"))
                }
            })
            .collect()
    };

    let visible = area.height.saturating_sub(2);
    let scroll = to_row(app.answer_cursor)
        .saturating_add(1)
        .saturating_sub(visible);

    Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Answers ({} left)", available.len())),
        )
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .render(area, buf);
}

pub(crate) fn render_notice(app: &App, area: Rect, buf: &mut Buffer) {
    if let Some(ref notice) = app.notice {
        Paragraph::new(Span::styled(
            notice.clone(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
        .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{app::AppState, config::Config, session::Pair};
    use ratatui::{backend::TestBackend, Terminal};

    pub(crate) fn draw(app: &App) -> String {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| f.render_widget(app, f.area())).unwrap();
        let buffer = terminal.backend().buffer();
        buffer.content.iter().map(|c| c.symbol()).collect()
    }

    fn app(timer: bool) -> App {
        let pairs = vec![
            Pair::new("What is the capital of France?", "Paris"),
            Pair::new("What is 12 x 12?", "144"),
        ];
        let config = Config {
            timer_enabled: timer,
            timer_secs: 90,
            reshuffle_on_reset: false,
        };
        App::new(pairs, "demo", config)
    }

    #[test]
    fn start_screen_shows_deck_and_timer() {
        let content = draw(&app(true));
        assert!(content.contains("press enter to start"));
        assert!(content.contains("demo · 2 pair(s)"));
        assert!(content.contains("time limit: 1m 30s"));

        let content = draw(&app(false));
        assert!(content.contains("no time limit"));
    }

    #[test]
    fn playing_screen_lists_questions_and_answers() {
        let mut a = app(true);
        a.state = AppState::Playing;
        let content = draw(&a);

        assert!(content.contains("Questions"));
        assert!(content.contains("Answers (2 left)"));
        assert!(content.contains("capital of France"));
        assert!(content.contains("Paris"));
        assert!(content.contains("01:30 paused"));
    }

    #[test]
    fn placed_answer_moves_to_question_column() {
        let mut a = app(false);
        a.state = AppState::Playing;
        a.game.assign(0, 0).unwrap();
        let content = draw(&a);

        assert!(content.contains("→ Paris"));
        assert!(content.contains("Answers (1 left)"));
        assert!(!content.contains("paused"));
    }

    #[test]
    fn checked_marks_render() {
        let mut a = app(false);
        a.state = AppState::Playing;
        a.game.assign(0, 1).unwrap();
        a.game.assign(1, 0).unwrap();
        a.game.validate().unwrap();
        let content = draw(&a);

        assert!(content.contains("✗ 144"));
        assert!(content.contains("✗ 2"));
    }

    fn rows(app: &App, width: u16, height: u16) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| f.render_widget(app, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .chunks(width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect())
            .collect()
    }

    /// Inner text of the question column, one entry per rendered row.
    fn question_column(rows: &[String]) -> Vec<String> {
        rows.iter()
            .filter_map(|row| row.split('│').nth(1).map(|s| s.trim().to_string()))
            .collect()
    }

    fn default_deck_app() -> App {
        let pairs = crate::deck::BuiltinDeck::Default.load().unwrap();
        let mut a = App::new(pairs, "default", Config::default());
        a.state = AppState::Playing;
        a
    }

    #[test]
    fn long_questions_wrap_instead_of_truncating() {
        let a = default_deck_app();
        let first = a.game.state().question(0).unwrap().text.clone();
        let column = question_column(&rows(&a, 80, 24));

        let start = column.iter().position(|l| l.starts_with("▸ 1. ")).unwrap();
        let text: Vec<&str> = column[start..]
            .iter()
            .take_while(|l| !l.starts_with('→'))
            .map(|l| l.trim_start_matches("▸ 1. "))
            .collect();

        assert!(text.len() > 1);
        assert_eq!(text.join(" "), first);
        assert!(column.iter().all(|l| !l.contains('…')));
    }

    #[test]
    fn selected_question_stays_visible_after_wrapping() {
        let mut a = default_deck_app();
        let last = a.game.state().len() - 1;
        a.selected_question = last;
        let column = question_column(&rows(&a, 80, 24));
        let marker = format!("▸ {}. ", last + 1);
        assert!(column.iter().any(|l| l.starts_with(&marker)));
        assert!(column.iter().any(|l| l.starts_with("→ ·····")));
    }

    #[test]
    fn oversized_scroll_offsets_clamp() {
        assert_eq!(to_row(12), 12);
        assert_eq!(to_row(usize::MAX), u16::MAX);
    }

    #[test]
    fn threshold_colors() {
        assert_eq!(threshold_color(Threshold::Normal), Color::Green);
        assert_eq!(threshold_color(Threshold::Danger), Color::Red);
    }
}
