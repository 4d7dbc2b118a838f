use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Widget, Wrap},
};

use crate::app::{App, MenuState, Screen};
use crate::difficulty::Difficulty;
use crate::quiz::QuizSession;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match (self.screen(), self.session()) {
            (Screen::Playing, Some(session)) => render_playing(self, session, area, buf),
            (Screen::GameOver, Some(session)) => {
                render_playing(self, session, area, buf);
                render_game_over(session, area, buf);
            }
            _ => render_menu(self.menu(), area, buf),
        }
    }
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

fn italic() -> Style {
    Style::default().add_modifier(Modifier::ITALIC)
}

/// Bar colour shifts as time runs low
fn gauge_color(fraction: f64) -> Color {
    if fraction > 0.5 {
        Color::Green
    } else if fraction > 0.25 {
        Color::Yellow
    } else {
        Color::Red
    }
}

fn render_menu(menu: &MenuState, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(1), // title
            Constraint::Length(1),
            Constraint::Length(1), // difficulty
            Constraint::Length(1), // time
            Constraint::Length(1),
            Constraint::Length(2), // error
            Constraint::Min(0),
            Constraint::Length(1), // legend
        ])
        .split(area);

    Paragraph::new(Span::styled("mathdash", bold().fg(Color::Cyan)))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    let mut spans = vec![Span::styled("difficulty  ", dim())];
    for (idx, difficulty) in Difficulty::ALL.iter().enumerate() {
        let label = format!(" ({}) {} ", idx + 1, difficulty);
        let style = if *difficulty == menu.difficulty {
            bold().fg(Color::Black).bg(Color::Cyan)
        } else {
            dim()
        };
        spans.push(Span::styled(label, style));
    }
    Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .render(chunks[3], buf);

    Paragraph::new(Line::from(vec![
        Span::styled("seconds per question  ", dim()),
        Span::styled(format!("◀ {} ▶", menu.seconds_per_question), bold()),
    ]))
    .alignment(Alignment::Center)
    .render(chunks[4], buf);

    if let Some(error) = &menu.error {
        Paragraph::new(Span::styled(error.as_str(), bold().fg(Color::Red)))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(chunks[6], buf);
    }

    Paragraph::new(Span::styled(
        "(1/2/3 ←/→) difficulty / (↑/↓ pgup/pgdn) time / (enter) start / (esc)ape",
        italic(),
    ))
    .alignment(Alignment::Center)
    .render(chunks[8], buf);
}

fn render_playing(app: &App, session: &QuizSession, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1), // score / settings
            Constraint::Length(3), // time bar
            Constraint::Min(0),
            Constraint::Length(1), // question
            Constraint::Length(1),
            Constraint::Length(1), // answer
            Constraint::Length(1), // notice
            Constraint::Min(0),
            Constraint::Length(1), // legend
        ])
        .split(area);

    let config = session.config();
    Paragraph::new(Line::from(vec![
        Span::styled(format!("score {}", session.score()), bold().fg(Color::Cyan)),
        Span::styled(
            format!(
                "   {} / {}s per question",
                config.difficulty, config.seconds_per_question
            ),
            dim(),
        ),
    ]))
    .render(chunks[0], buf);

    let fraction = session.time_fraction();
    Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .gauge_style(Style::default().fg(gauge_color(fraction)))
        .ratio(fraction)
        .label(format!("{}s", session.time_remaining().max(0)))
        .render(chunks[1], buf);

    Paragraph::new(Span::styled(
        format!("{} = ?", session.question_text()),
        bold(),
    ))
    .alignment(Alignment::Center)
    .render(chunks[3], buf);

    let cursor = if session.is_over() { "" } else { "_" };
    Paragraph::new(Line::from(vec![
        Span::styled("> ", dim()),
        Span::styled(format!("{}{}", app.input(), cursor), bold().fg(Color::Green)),
    ]))
    .alignment(Alignment::Center)
    .render(chunks[5], buf);

    if let Some(notice) = app.notice() {
        Paragraph::new(Span::styled(notice, italic().fg(Color::Yellow)))
            .alignment(Alignment::Center)
            .render(chunks[6], buf);
    }

    Paragraph::new(Span::styled("(enter) submit / (esc) back", italic()))
        .render(chunks[8], buf);
}

fn render_game_over(session: &QuizSession, area: Rect, buf: &mut Buffer) {
    let Some(over) = session.game_over() else {
        return;
    };
    let popup = centered_rect(area, 44, 9);
    Clear.render(popup, buf);

    let lines = vec![
        Line::from(Span::styled(
            format!("GAME OVER: {}", over.reason),
            bold().fg(Color::Red),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("final score  ", dim()),
            Span::styled(over.final_score.to_string(), bold().fg(Color::Cyan)),
        ]),
        Line::from(vec![
            Span::styled("answer  ", dim()),
            Span::styled(over.correct_answer.as_str(), bold().fg(Color::Green)),
        ]),
        Line::from(""),
        Line::from(Span::styled("(r)estart / (b)ack / (q)uit", italic())),
    ];

    Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center)
        .render(popup, buf);
}

/// A `width` x `height` rect centred in `area`, shrunk to fit
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
