use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::config::Theme;
use crate::game::{GameOverCause, GameOverEvent, Snapshot};

const HUD_MARGIN_X: u16 = 1;
const SEPARATOR: &str = " │ ";

/// Supplemental values displayed around the board.
#[derive(Debug, Clone)]
pub struct HudInfo<'a> {
    /// Best score for the current difficulty, including the running game.
    pub high_score: u32,
    /// Best score before the game that just ended; drives "new high score".
    pub previous_high_score: u32,
    pub last_cause: Option<GameOverCause>,
    /// Leaderboard entries, best first.
    pub leaderboard: &'a [GameOverEvent],
    pub theme: &'a Theme,
}

/// Renders the one-line HUD and returns the play area above it.
#[must_use]
pub fn render_hud(frame: &mut Frame<'_>, area: Rect, snapshot: &Snapshot, info: &HudInfo<'_>) -> Rect {
    let [play_area, hud_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);

    frame.render_widget(
        Paragraph::new(info_line(snapshot, info)).alignment(Alignment::Center),
        inset_horizontal(hud_area, HUD_MARGIN_X),
    );

    play_area
}

fn info_line(snapshot: &Snapshot, info: &HudInfo<'_>) -> Line<'static> {
    let label = Style::default().fg(info.theme.hud_label);
    let value = Style::default().fg(info.theme.hud_value);
    let high_style = if snapshot.score > 0 && snapshot.score >= info.high_score {
        value.add_modifier(Modifier::BOLD)
    } else {
        value
    };

    Line::from(vec![
        Span::styled("Difficulty: ", label),
        Span::styled(snapshot.difficulty.to_string(), value),
        Span::styled(SEPARATOR, label),
        Span::styled("Length: ", label),
        Span::styled(snapshot.snake.len().to_string(), value),
        Span::styled(SEPARATOR, label),
        Span::styled("Score: ", label),
        Span::styled(snapshot.score.to_string(), value),
        Span::styled(SEPARATOR, label),
        Span::styled("Hi: ", label),
        Span::styled(info.high_score.to_string(), high_style),
    ])
}

fn inset_horizontal(area: Rect, margin: u16) -> Rect {
    Rect {
        x: area.x.saturating_add(margin),
        y: area.y,
        width: area.width.saturating_sub(margin.saturating_mul(2)),
        height: area.height,
    }
}
