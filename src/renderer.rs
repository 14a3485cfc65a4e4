use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Block;

use crate::config::{
    CELL_WIDTH, GLYPH_FOOD, GLYPH_SNAKE_BODY, GLYPH_SNAKE_HEAD_DOWN, GLYPH_SNAKE_HEAD_LEFT,
    GLYPH_SNAKE_HEAD_RIGHT, GLYPH_SNAKE_HEAD_UP, GLYPH_SNAKE_TAIL, Theme,
};
use crate::game::{Snapshot, Status};
use crate::input::Direction;
use crate::snake::Position;
use crate::ui::hud::{HudInfo, render_hud};
use crate::ui::menu::{render_game_over_menu, render_pause_menu, render_start_menu};

/// Renders the full game frame from an immutable snapshot.
pub fn render(frame: &mut Frame<'_>, snapshot: &Snapshot, hud_info: &HudInfo<'_>) {
    let area = frame.area();
    let play_area = render_hud(frame, area, snapshot, hud_info);
    let board_area = board_rect(play_area, snapshot.grid_size);

    let theme = hud_info.theme;
    let block = Block::bordered()
        .title(" snake ")
        .border_style(Style::new().fg(theme.border_fg));

    let inner = block.inner(board_area);
    frame.render_widget(block, board_area);

    render_food(frame, inner, snapshot, theme);
    render_snake(frame, inner, snapshot, theme);

    match snapshot.status {
        Status::Idle => render_start_menu(
            frame,
            board_area,
            snapshot.difficulty,
            hud_info.high_score,
            hud_info.leaderboard,
            theme,
        ),
        Status::Paused => render_pause_menu(frame, board_area, theme),
        Status::GameOver => render_game_over_menu(
            frame,
            board_area,
            snapshot.score,
            hud_info.previous_high_score,
            hud_info.last_cause,
            hud_info.leaderboard,
            theme,
        ),
        Status::Playing => {}
    }
}

/// Centers a bordered board of `grid_size` cells inside `area`.
fn board_rect(area: Rect, grid_size: u16) -> Rect {
    let width = grid_size
        .saturating_mul(CELL_WIDTH)
        .saturating_add(2)
        .min(area.width);
    let height = grid_size.saturating_add(2).min(area.height);

    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_food(frame: &mut Frame<'_>, inner: Rect, snapshot: &Snapshot, theme: &Theme) {
    let Some((x, y)) = logical_to_terminal(inner, snapshot.food) else {
        return;
    };

    frame
        .buffer_mut()
        .set_string(x, y, GLYPH_FOOD, Style::new().fg(theme.food));
}

fn render_snake(frame: &mut Frame<'_>, inner: Rect, snapshot: &Snapshot, theme: &Theme) {
    let last = snapshot.snake.len().saturating_sub(1);
    let buffer = frame.buffer_mut();

    // Drawn tail first so the head stays visible if it overlaps the body.
    for (index, segment) in snapshot.snake.iter().enumerate().rev() {
        let Some((x, y)) = logical_to_terminal(inner, *segment) else {
            continue;
        };

        let (glyph, style) = if index == 0 {
            (
                head_glyph(snapshot.direction),
                Style::new()
                    .fg(theme.snake_head)
                    .add_modifier(Modifier::BOLD),
            )
        } else if index == last {
            (GLYPH_SNAKE_TAIL, Style::new().fg(theme.snake_tail))
        } else {
            (GLYPH_SNAKE_BODY, Style::new().fg(theme.snake_body))
        };

        buffer.set_string(x, y, glyph, style);
    }
}

fn head_glyph(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => GLYPH_SNAKE_HEAD_UP,
        Direction::Down => GLYPH_SNAKE_HEAD_DOWN,
        Direction::Left => GLYPH_SNAKE_HEAD_LEFT,
        Direction::Right => GLYPH_SNAKE_HEAD_RIGHT,
    }
}

fn logical_to_terminal(inner: Rect, position: Position) -> Option<(u16, u16)> {
    let x_offset = u16::try_from(position.x).ok()?.checked_mul(CELL_WIDTH)?;
    let y_offset = u16::try_from(position.y).ok()?;

    let x = inner.x.saturating_add(x_offset);
    let y = inner.y.saturating_add(y_offset);
    if x.saturating_add(CELL_WIDTH) > inner.right() || y >= inner.bottom() {
        return None;
    }

    Some((x, y))
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::layout::Rect;

    use super::{board_rect, logical_to_terminal, render};
    use crate::config::{Difficulty, GLYPH_FOOD, THEME_CLASSIC};
    use crate::game::{GameOverCause, GameOverEvent, Snapshot, Status};
    use crate::input::Direction;
    use crate::snake::Position;
    use crate::ui::hud::HudInfo;

    fn snapshot(status: Status) -> Snapshot {
        Snapshot {
            snake: vec![Position::new(2, 1), Position::new(1, 1)],
            food: Position::new(4, 3),
            direction: Direction::Right,
            status,
            score: 0,
            grid_size: 5,
            difficulty: Difficulty::Medium,
        }
    }

    #[test]
    fn board_is_centered_and_clamped() {
        let area = Rect::new(0, 0, 40, 20);
        assert_eq!(board_rect(area, 5), Rect::new(14, 6, 12, 7));

        let small = Rect::new(0, 0, 10, 4);
        assert_eq!(board_rect(small, 25), small);
    }

    #[test]
    fn cells_map_to_two_columns() {
        let inner = Rect::new(1, 1, 10, 5);

        assert_eq!(logical_to_terminal(inner, Position::new(0, 0)), Some((1, 1)));
        assert_eq!(logical_to_terminal(inner, Position::new(4, 4)), Some((9, 5)));
        assert_eq!(logical_to_terminal(inner, Position::new(5, 0)), None);
        assert_eq!(logical_to_terminal(inner, Position::new(-1, 0)), None);
    }

    #[test]
    fn playing_frame_draws_food_inside_board() {
        let backend = TestBackend::new(40, 20);
        let mut terminal = Terminal::new(backend).expect("test terminal");
        let info = HudInfo {
            high_score: 0,
            previous_high_score: 0,
            last_cause: None,
            leaderboard: &[],
            theme: &THEME_CLASSIC,
        };

        terminal
            .draw(|frame| render(frame, &snapshot(Status::Playing), &info))
            .expect("draw should succeed");

        // Board at (14, 6) with a one-cell border; food cell (4, 3).
        let buffer = terminal.backend().buffer();
        let first = GLYPH_FOOD.chars().next().expect("glyph").to_string();
        assert_eq!(buffer[(15 + 8, 7 + 3)].symbol(), first);
    }

    fn finished(score: u32, difficulty: Difficulty, day: u32) -> GameOverEvent {
        GameOverEvent {
            final_score: score,
            difficulty,
            cause: GameOverCause::Wall,
            timestamp: Utc
                .with_ymd_and_hms(2024, 5, day, 12, 0, 0)
                .single()
                .expect("valid timestamp"),
        }
    }

    /// Draws an easy-sized board on a 40x20 terminal and returns its rows as text.
    fn draw_rows(status: Status, score: u32, info: &HudInfo<'_>) -> Vec<String> {
        let backend = TestBackend::new(40, 20);
        let mut terminal = Terminal::new(backend).expect("test terminal");
        let snapshot = Snapshot {
            score,
            grid_size: 15,
            difficulty: Difficulty::Easy,
            ..snapshot(status)
        };

        terminal
            .draw(|frame| render(frame, &snapshot, info))
            .expect("draw should succeed");

        let buffer = terminal.backend().buffer();
        (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer[(x, y)].symbol())
                    .collect()
            })
            .collect()
    }

    #[test]
    fn start_screen_lists_top_scores_and_controls() {
        let entries = [
            finished(120, Difficulty::Hard, 1),
            finished(40, Difficulty::Easy, 2),
        ];
        let info = HudInfo {
            high_score: 40,
            previous_high_score: 40,
            last_cause: None,
            leaderboard: &entries,
            theme: &THEME_CLASSIC,
        };

        let rows = draw_rows(Status::Idle, 0, &info);
        let shows = |text: &str| rows.iter().any(|row| row.contains(text));

        assert!(shows(" 1.   120  hard   2024-05-01"), "{rows:#?}");
        assert!(shows(" 2.    40  easy   2024-05-02"), "{rows:#?}");
        assert!(shows("[Q] Quit"), "{rows:#?}");
        assert!(shows("Arrows/WASD/hjkl move"), "{rows:#?}");
    }

    #[test]
    fn game_over_screen_fits_easy_board_with_full_leaderboard() {
        let entries: Vec<GameOverEvent> = (1..=10)
            .map(|day| finished(200 - day * 10, Difficulty::Easy, day))
            .collect();
        let info = HudInfo {
            high_score: 190,
            previous_high_score: 190,
            last_cause: Some(GameOverCause::Body),
            leaderboard: &entries,
            theme: &THEME_CLASSIC,
        };

        let rows = draw_rows(Status::GameOver, 30, &info);
        let shows = |text: &str| rows.iter().any(|row| row.contains(text));

        assert!(shows("Cause: hit yourself"), "{rows:#?}");
        assert!(shows("[Enter]/[R] Play Again"), "{rows:#?}");
        assert!(shows(" 5.   150  easy   2024-05-05"), "{rows:#?}");
        assert!(!shows(" 6.   140"), "{rows:#?}");
    }

    #[test]
    fn empty_leaderboard_says_so() {
        let info = HudInfo {
            high_score: 0,
            previous_high_score: 0,
            last_cause: None,
            leaderboard: &[],
            theme: &THEME_CLASSIC,
        };

        let rows = draw_rows(Status::Idle, 0, &info);

        assert!(rows.iter().any(|row| row.contains("No games yet")), "{rows:#?}");
    }
}
