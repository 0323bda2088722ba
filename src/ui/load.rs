use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Widget},
};

use crate::{app::App, session::Pair, ui::render_notice};

/// Rows shown before the preview collapses into a count.
const PREVIEW_ROWS: usize = 8;

pub fn preview_rows(pairs: &[Pair]) -> Vec<Row<'static>> {
    let mut rows: Vec<Row> = pairs
        .iter()
        .take(PREVIEW_ROWS)
        .enumerate()
        .map(|(i, p)| {
            Row::new(vec![
                Cell::from(format!("{}", i + 1)),
                Cell::from(p.question.clone()),
                Cell::from(p.answer.clone()),
            ])
        })
        .collect();

    if pairs.len() > PREVIEW_ROWS {
        rows.push(Row::new(vec![
            Cell::from(""),
            Cell::from(Span::styled(
                format!("… and {} more", pairs.len() - PREVIEW_ROWS),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )),
        ]));
    }
    rows
}

pub(crate) fn render_load(app: &App, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // path input
            Constraint::Min(3),    // preview
            Constraint::Length(1), // notice
            Constraint::Length(1), // legend
        ])
        .split(area);

    Paragraph::new(Line::from(vec![
        Span::raw(app.prompt.input.clone()),
        Span::styled("▏", Style::default().add_modifier(Modifier::SLOW_BLINK)),
    ]))
    .block(Block::default().borders(Borders::ALL).title("Load deck (CSV path)"))
    .render(chunks[0], buf);

    match app.prompt.preview {
        Some(ref preview) => {
            let header = Row::new(vec!["#", "Question", "Answer"]).style(
                Style::default()
                    .add_modifier(Modifier::BOLD)
                    .add_modifier(Modifier::UNDERLINED),
            );
            Table::new(
                preview_rows(&preview.pairs),
                [
                    Constraint::Length(3),
                    Constraint::Percentage(65),
                    Constraint::Percentage(30),
                ],
            )
            .header(header)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("Preview: {} pair(s)", preview.pairs.len())),
            )
            .render(chunks[1], buf);
        }
        None => {
            Paragraph::new(Span::styled(
                "type a path and press enter to preview it",
                Style::default().add_modifier(Modifier::ITALIC),
            ))
            .alignment(Alignment::Center)
            .render(chunks[1], buf);
        }
    }

    render_notice(app, chunks[2], buf);

    let legend = if app.prompt.preview.is_some() {
        "(enter) play this deck / (esc) cancel"
    } else {
        "(enter) preview / (esc) cancel"
    };
    Paragraph::new(Span::styled(
        legend,
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .render(chunks[3], buf);
}
