use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Widget},
};

use crate::{app::App, celebration::Celebration, engine::ItemFeedback, ui::render_notice};

/// Pure presenter for one feedback row
pub fn present_row(item: &ItemFeedback) -> Row<'static> {
    let (mark, color) = if item.is_correct {
        ("✓", Color::Green)
    } else {
        ("✗", Color::Red)
    };

    // only worth repeating the right answer when it differs
    let expected = if item.is_correct {
        String::new()
    } else {
        item.correct_answer.clone()
    };

    Row::new(vec![
        Cell::from(Span::styled(
            mark,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Cell::from(format!("{}. {}", item.question_index + 1, item.question)),
        Cell::from(Span::styled(
            item.given_answer.clone(),
            Style::default().fg(color),
        )),
        Cell::from(Span::styled(expected, Style::default().fg(Color::Green))),
    ])
}

pub fn headline(correct: usize, total: usize) -> String {
    match (correct, total) {
        (c, t) if c == t => format!("Perfect! {c}/{t} correct"),
        (0, t) => format!("0/{t} correct, try again"),
        (c, t) => format!("{c}/{t} correct"),
    }
}

pub(crate) fn render_results(app: &App, area: Rect, buf: &mut Buffer) {
    let Some(ref report) = app.last_report else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2), // headline
            Constraint::Min(3),    // feedback table
            Constraint::Length(1), // notice
            Constraint::Length(1), // legend
        ])
        .split(area);

    let color = if report.is_perfect() {
        Color::Green
    } else {
        Color::Yellow
    };
    Paragraph::new(Span::styled(
        headline(report.correct, report.total()),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .render(chunks[0], buf);

    let rows: Vec<Row> = report
        .items
        .iter()
        .skip(app.results_scroll)
        .map(present_row)
        .collect();

    let header = Row::new(vec!["", "Question", "Your answer", "Correct answer"]).style(
        Style::default()
            .add_modifier(Modifier::BOLD)
            .add_modifier(Modifier::UNDERLINED),
    );

    Table::new(
        rows,
        [
            Constraint::Length(2),
            Constraint::Percentage(50),
            Constraint::Percentage(24),
            Constraint::Percentage(24),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title("Results"))
    .render(chunks[1], buf);

    render_notice(app, chunks[2], buf);

    Paragraph::new(Span::styled(
        "(e)dit / (r)eset / (n)ew round / (l)oad deck / ↑↓ scroll / (esc)ape",
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .render(chunks[3], buf);

    if app.celebration.is_active() {
        render_confetti(&app.celebration, area, buf);
    }
}

/// Draws the confetti on top of whatever is already in `area`.
fn render_confetti(celebration: &Celebration, area: Rect, buf: &mut Buffer) {
    let colors = [
        Color::Yellow,
        Color::Magenta,
        Color::Cyan,
        Color::Green,
        Color::Red,
        Color::Blue,
        Color::LightYellow,
    ];

    for particle in celebration.particles.iter().filter(|p| p.on_screen()) {
        let x = area.x + (particle.x * f64::from(area.width)) as u16;
        let y = area.y + (particle.y * f64::from(area.height)) as u16;
        if let Some(cell) = buf.cell_mut((x, y)) {
            cell.set_symbol(&particle.symbol.to_string());
            cell.set_style(
                Style::default()
                    .fg(colors[particle.color_index % colors.len()])
                    .add_modifier(Modifier::BOLD),
            );
        }
    }
}
