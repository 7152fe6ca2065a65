//! Terminal UI rendering with ratatui

use blockdrop::board::{BOARD_HEIGHT, BOARD_WIDTH};
use blockdrop::piece::Piece;
use blockdrop::settings::Settings;
use blockdrop::tetromino::{PieceColor, TetrominoType};
use blockdrop::Snapshot;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Total width needed: board(22) + next/stats(16) = 38
const GAME_WIDTH: u16 = 38;
/// Total height needed: board(20) + 2 for borders
const GAME_HEIGHT: u16 = BOARD_HEIGHT as u16 + 2;

fn terminal_color(color: PieceColor) -> Color {
    match color {
        PieceColor::Cyan => Color::Cyan,
        PieceColor::Blue => Color::Blue,
        PieceColor::Orange => Color::Rgb(255, 165, 0),
        PieceColor::Yellow => Color::Yellow,
        PieceColor::Green => Color::Green,
        PieceColor::Purple => Color::Magenta,
        PieceColor::Red => Color::Red,
    }
}

/// Color for a nonzero cell value
fn value_color(value: u8) -> Option<Color> {
    TetrominoType::from_cell_value(value).map(|kind| terminal_color(kind.color()))
}

/// Render one frame of the game
pub fn render_game(frame: &mut Frame, snapshot: &Snapshot, settings: &Settings) {
    let area = frame.area();
    let game_area = center_rect(area, GAME_WIDTH, GAME_HEIGHT);

    // Create main layout: board | next + stats
    let main_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(BOARD_WIDTH as u16 * 2 + 2),
            Constraint::Length(16),
        ])
        .split(game_area);

    render_board(frame, main_layout[0], snapshot, settings);

    let right_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(6)])
        .split(main_layout[1]);

    render_next(frame, right_layout[0], &snapshot.next, settings);
    render_stats(frame, right_layout[1], snapshot);

    if snapshot.game_over {
        render_overlay(
            frame,
            area,
            "GAME OVER",
            &format!("Score: {}", snapshot.score.points),
            "Press any key to play again",
        );
    }
}

fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render the game board with the falling piece drawn in
fn render_board(frame: &mut Frame, area: Rect, snapshot: &Snapshot, settings: &Settings) {
    let (block_char, empty_char) = settings.visual.block_chars();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line> = snapshot
        .composed_values()
        .iter()
        .map(|row| {
            let spans: Vec<Span> = row
                .iter()
                .map(|&value| match value_color(value) {
                    Some(color) => Span::styled(block_char, Style::default().fg(color)),
                    None => Span::styled(empty_char, Style::default().fg(Color::DarkGray)),
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render the preview piece
fn render_next(frame: &mut Frame, area: Rect, piece: &Piece, settings: &Settings) {
    let (block_char, _) = settings.visual.block_chars();

    let block = Block::default()
        .title(" NEXT ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let style = Style::default().fg(terminal_color(piece.color()));
    let mut lines = vec![Line::raw("")];
    for row in piece.shape.rows() {
        let spans: Vec<Span> = row
            .iter()
            .map(|&v| {
                if v != 0 {
                    Span::styled(block_char, style)
                } else {
                    Span::raw("  ")
                }
            })
            .collect();
        lines.push(Line::from(spans));
    }

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}

fn render_stats(frame: &mut Frame, area: Rect, snapshot: &Snapshot) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        Line::from(Span::styled("SCORE", Style::default().fg(Color::Gray))),
        Line::from(Span::styled(
            format!("{}", snapshot.score.points),
            Style::default().fg(Color::Yellow).bold(),
        )),
        Line::raw(""),
        Line::from(Span::styled("LINES", Style::default().fg(Color::Gray))),
        Line::from(Span::styled(
            format!("{}", snapshot.score.lines),
            Style::default().fg(Color::Green),
        )),
        Line::raw(""),
        Line::from(Span::styled("PIECES", Style::default().fg(Color::Gray))),
        Line::from(Span::styled(
            format!("{}", snapshot.score.pieces),
            Style::default().fg(Color::Cyan),
        )),
    ];

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render the end-of-game notice
fn render_overlay(frame: &mut Frame, area: Rect, title: &str, detail: &str, hint: &str) {
    let popup_area = center_rect(area, 26, 7);

    // Clear the background
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let text = vec![
        Line::styled(title.to_string(), Style::default().fg(Color::Yellow).bold()),
        Line::raw(""),
        Line::styled(detail.to_string(), Style::default().fg(Color::White)),
        Line::styled(hint.to_string(), Style::default().fg(Color::Gray)),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}
