use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Clear, Paragraph};

use crate::config::{Difficulty, Theme};
use crate::game::{GameOverCause, GameOverEvent};

/// Leaderboard rows listed on the start and game-over screens.
pub const TOP_SCORES_SHOWN: usize = 5;

const POPUP_PADDING_X: u16 = 1;

/// Draws the idle screen shown after every reset.
pub fn render_start_menu(
    frame: &mut Frame<'_>,
    area: Rect,
    difficulty: Difficulty,
    high_score: u32,
    leaderboard: &[GameOverEvent],
    theme: &Theme,
) {
    let mut lines = vec![
        Line::from(format!("Difficulty: {difficulty}")),
        Line::from(format!("High score: {high_score}")),
        Line::from(""),
        Line::from("[Arrows]/[Enter] Start"),
        Line::from("[Tab] Difficulty"),
        Line::from("[Q] Quit"),
    ];
    push_top_scores(&mut lines, leaderboard, theme);

    let block = Block::bordered()
        .title(Line::from(" SNAKE ").style(title_style(theme)))
        .title_bottom(
            Line::from(" Arrows/WASD/hjkl move ")
                .style(Style::default().fg(theme.menu_footer)),
        );
    render_popup(frame, area, block, lines);
}

/// Draws the pause screen as a centered popup.
pub fn render_pause_menu(frame: &mut Frame<'_>, area: Rect, theme: &Theme) {
    let lines = vec![
        Line::from("[Space]/[P] Resume"),
        Line::from("[R] Restart"),
        Line::from("[Q] Quit"),
    ];

    let block = Block::bordered().title(Line::from(" PAUSED ").style(title_style(theme)));
    render_popup(frame, area, block, lines);
}

/// Draws the game-over screen as a centered popup.
pub fn render_game_over_menu(
    frame: &mut Frame<'_>,
    area: Rect,
    score: u32,
    previous_high_score: u32,
    cause: Option<GameOverCause>,
    leaderboard: &[GameOverEvent],
    theme: &Theme,
) {
    let mut lines = vec![
        Line::from(format!("Score: {score}")),
        Line::from(format!("High score: {}", score.max(previous_high_score))),
    ];
    if let Some(cause) = cause {
        lines.push(Line::from(cause_text(cause)));
    }
    if score > previous_high_score {
        lines.push(Line::from("New high score!").style(title_style(theme)));
    }
    lines.extend([
        Line::from(""),
        Line::from("[Enter]/[R] Play Again"),
        Line::from("[Q] Quit"),
    ]);
    push_top_scores(&mut lines, leaderboard, theme);

    let block = Block::bordered().title(Line::from(" GAME OVER ").style(title_style(theme)));
    render_popup(frame, area, block, lines);
}

fn push_top_scores(lines: &mut Vec<Line<'static>>, leaderboard: &[GameOverEvent], theme: &Theme) {
    lines.push(Line::from(""));
    lines.push(Line::from("Top scores").style(Style::default().fg(theme.menu_footer)));

    if leaderboard.is_empty() {
        lines.push(Line::from("No games yet"));
        return;
    }

    lines.extend(
        leaderboard
            .iter()
            .take(TOP_SCORES_SHOWN)
            .enumerate()
            .map(|(index, entry)| Line::from(top_score_row(index + 1, entry))),
    );
}

/// One leaderboard row: rank, score, difficulty and the day it was played.
fn top_score_row(rank: usize, entry: &GameOverEvent) -> String {
    format!(
        "{rank:>2}. {score:>5}  {difficulty:<6} {date}",
        score = entry.final_score,
        difficulty = entry.difficulty.label(),
        date = entry.timestamp.format("%Y-%m-%d"),
    )
}

fn cause_text(cause: GameOverCause) -> &'static str {
    match cause {
        GameOverCause::Wall => "Cause: hit wall",
        GameOverCause::Body => "Cause: hit yourself",
        GameOverCause::BoardFull => "Board cleared!",
    }
}

fn title_style(theme: &Theme) -> Style {
    Style::default()
        .fg(theme.menu_title)
        .add_modifier(Modifier::BOLD)
}

/// Clears a content-sized rectangle in the middle of `area` and draws `lines` in it.
fn render_popup(frame: &mut Frame<'_>, area: Rect, block: Block<'_>, lines: Vec<Line<'_>>) {
    let popup = popup_rect(area, &lines);
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block),
        popup,
    );
}

/// Sizes a bordered popup to fit `lines`, clamped to `area` and centered in it.
fn popup_rect(area: Rect, lines: &[Line<'_>]) -> Rect {
    let widest = lines.iter().map(Line::width).max().unwrap_or(0);
    let content_width = u16::try_from(widest).unwrap_or(u16::MAX);
    let content_height = u16::try_from(lines.len()).unwrap_or(u16::MAX);

    let width = content_width
        .saturating_add(2 + 2 * POPUP_PADDING_X)
        .min(area.width);
    let height = content_height.saturating_add(2).min(area.height);

    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use ratatui::layout::Rect;
    use ratatui::text::Line;

    use super::{popup_rect, top_score_row};
    use crate::config::Difficulty;
    use crate::game::{GameOverCause, GameOverEvent};

    #[test]
    fn popup_fits_content_plus_border() {
        let lines = vec![Line::from("12345678"), Line::from(""), Line::from("abc")];

        assert_eq!(popup_rect(Rect::new(0, 0, 40, 20), &lines), Rect::new(14, 7, 12, 5));
    }

    #[test]
    fn popup_never_exceeds_its_area() {
        let lines = vec![Line::from("x".repeat(80)); 30];
        let area = Rect::new(3, 2, 32, 17);

        assert_eq!(popup_rect(area, &lines), area);
    }

    #[test]
    fn top_score_row_lists_rank_score_difficulty_and_date() {
        let entry = GameOverEvent {
            final_score: 120,
            difficulty: Difficulty::Hard,
            cause: GameOverCause::Body,
            timestamp: Utc
                .with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
                .single()
                .expect("valid timestamp"),
        };

        assert_eq!(top_score_row(1, &entry), " 1.   120  hard   2024-05-01");
    }
}
