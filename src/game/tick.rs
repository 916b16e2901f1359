//! Engine Tick
//!
//! One logical tick, in strict order: apply the tick's input, run exactly
//! one domain update producing one delta image, encode it, XOR it into
//! the persistent canvas, serialize. Single-threaded by construction -
//! the state is owned by whoever calls [`tick`], and the codec's device
//! round trip completes inside the call.

use tracing::debug;

use crate::core::canvas::CanvasError;
use crate::codec::{CodecError, MaskEncoder};
use crate::codec::image::Image;
use crate::draw::painter::Painter;
use crate::maze::grid::{MazeGrid, MazeError};
use crate::maze::navigator::MazeNavigator;
use super::events::GameEvent;
use super::input::{Command, InputFrame};
use super::mode::{Mode, TextScroll, TITLE_TEXT, HELP_TEXT, CREDITS_TEXT, SPLASH_TEXT};
use super::state::{GameState, MAZE_SIZE, RESHUFFLE_TARGET};

/// Anything a tick can fail with.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// Encoding the delta failed (device loss included).
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Applying the delta failed.
    #[error(transparent)]
    Canvas(#[from] CanvasError),

    /// Maze generation failed.
    #[error(transparent)]
    Maze(#[from] MazeError),
}

/// Result of one tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TickResult {
    /// The serialized canvas: ceil(W*H/32) words, least-significant word
    /// first, for the external render-uniform consumer.
    pub frame: Vec<u32>,
    /// Events generated this tick.
    pub events: Vec<GameEvent>,
}

/// Run one logical tick.
pub fn tick(
    state: &mut GameState,
    input: &InputFrame,
    painter: &mut dyn Painter,
    encoder: &mut dyn MaskEncoder,
) -> Result<TickResult, GameError> {
    state.tick += 1;
    let mut events = Vec::new();

    apply_input(state, input, painter, &mut events)?;

    let image = update_mode(state, painter, &mut events);
    let delta = encoder.encode(&image)?;
    state.canvas.invert_mask(&delta)?;

    Ok(TickResult {
        frame: state.canvas.serialize(),
        events,
    })
}

/// XOR the session splash into the canvas, once, before the first tick.
pub fn splash(
    state: &mut GameState,
    painter: &mut dyn Painter,
    encoder: &mut dyn MaskEncoder,
) -> Result<(), GameError> {
    let (text_w, text_h) = painter.text_extent(SPLASH_TEXT);
    let origin = (
        (state.canvas.width() as i32 - text_w as i32) / 2,
        (state.canvas.height() as i32 - text_h as i32) / 2,
    );
    let image = painter.text_blit(SPLASH_TEXT, origin);
    let delta = encoder.encode(&image)?;
    state.canvas.invert_mask(&delta)?;
    Ok(())
}

/// Apply the tick's command, if any.
///
/// Moves go to the navigator's queue; mode switches are only honoured in
/// the text modes (the opening shuffle cannot be interrupted), except
/// Menu, which also leaves a running maze - dropping the session, grid
/// and navigator together.
fn apply_input(
    state: &mut GameState,
    input: &InputFrame,
    painter: &mut dyn Painter,
    events: &mut Vec<GameEvent>,
) -> Result<(), GameError> {
    let Some(command) = input.command else {
        return Ok(());
    };

    let in_text_mode = matches!(state.mode, Mode::Marquee(_) | Mode::Crawl(_));
    let in_maze = matches!(state.mode, Mode::Maze(_));
    let width = state.canvas.width();
    let height = state.canvas.height();

    match command {
        Command::Move(direction) => {
            if let Mode::Maze(nav) = &mut state.mode {
                nav.enqueue(direction);
            }
        }
        Command::Play if in_text_mode => {
            let (maze_w, maze_h) = MAZE_SIZE;
            let grid = MazeGrid::generate(maze_w, maze_h, &mut state.rng)?;
            set_mode(state, Mode::Maze(MazeNavigator::new(grid)), events);
        }
        Command::Shuffle if in_text_mode => {
            set_mode(
                state,
                Mode::Shuffle {
                    drawn: 0,
                    target: RESHUFFLE_TARGET,
                },
                events,
            );
        }
        Command::Help if in_text_mode => {
            let scroll = TextScroll::marquee(painter, HELP_TEXT, width);
            set_mode(state, Mode::Marquee(scroll), events);
        }
        Command::Credits if in_text_mode => {
            let scroll = TextScroll::crawl(painter, CREDITS_TEXT, height);
            set_mode(state, Mode::Crawl(scroll), events);
        }
        Command::Menu if in_text_mode || in_maze => {
            let scroll = TextScroll::marquee(painter, TITLE_TEXT, width);
            set_mode(state, Mode::Marquee(scroll), events);
        }
        _ => {
            // Command not available in this mode
        }
    }

    Ok(())
}

/// The one domain update of the tick: produce the delta image and advance
/// the current mode's state.
fn update_mode(
    state: &mut GameState,
    painter: &mut dyn Painter,
    events: &mut Vec<GameEvent>,
) -> Image {
    let width = state.canvas.width();
    let height = state.canvas.height();

    let mut shuffle_done = false;
    let mut solved: Option<u32> = None;

    let image = match &mut state.mode {
        Mode::Shuffle { drawn, target } => {
            let from = (
                state.rng.next_int_range(0, width as i32 - 1),
                state.rng.next_int_range(0, height as i32 - 1),
            );
            let to = (
                state.rng.next_int_range(0, width as i32 - 1),
                state.rng.next_int_range(0, height as i32 - 1),
            );
            let image = painter.line(from, to);

            *drawn += 1;
            if *drawn >= *target {
                shuffle_done = true;
            }
            image
        }

        Mode::Marquee(scroll) => {
            let top = (height as i32 - scroll.size.1 as i32) / 2;
            let image = painter.text_blit(&scroll.text, (scroll.offset, top));
            scroll.advance_marquee(width);
            image
        }

        Mode::Crawl(scroll) => {
            let image = painter.text_blit(&scroll.text, (0, scroll.offset));
            scroll.advance_crawl(height);
            image
        }

        Mode::Maze(nav) => {
            let result = nav.tick();
            let image = painter.maze_snapshot(nav.grid(), nav.visual());
            if result.solved {
                solved = Some(nav.moves());
            }
            image
        }
    };

    if shuffle_done {
        let scroll = TextScroll::marquee(painter, TITLE_TEXT, width);
        set_mode(state, Mode::Marquee(scroll), events);
    }

    if let Some(moves) = solved {
        debug!("maze solved in {} moves", moves);
        events.push(GameEvent::MazeSolved { moves });
        if state.record_solve(moves) {
            events.push(GameEvent::NewBestScore { moves });
        }
        let text = format!("solved in {moves} moves -- enter to play again");
        let scroll = TextScroll::marquee(painter, &text, width);
        set_mode(state, Mode::Marquee(scroll), events);
    }

    image
}

fn set_mode(state: &mut GameState, next: Mode, events: &mut Vec<GameEvent>) {
    debug!("mode change: {} -> {}", state.mode.name(), next.name());
    events.push(GameEvent::ModeChanged {
        from: state.mode.name().to_owned(),
        to: next.name().to_owned(),
    });
    state.mode = next;
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{PIXEL_ON, ScalarCodec, ComputeCodec, SoftwareDevice};
    use crate::core::canvas::PackedCanvas;
    use crate::draw::painter::SoftwarePainter;
    use crate::maze::grid::Direction;
    use crate::{CANVAS_WIDTH, CANVAS_HEIGHT, FRAME_WORDS};

    fn scalar_setup() -> (SoftwarePainter, ScalarCodec) {
        (
            SoftwarePainter::new(CANVAS_WIDTH, CANVAS_HEIGHT),
            ScalarCodec::new(CANVAS_WIDTH, CANVAS_HEIGHT, PIXEL_ON),
        )
    }

    /// Drive a fresh state into the title marquee.
    fn state_at_title(painter: &mut SoftwarePainter, codec: &mut ScalarCodec) -> GameState {
        let mut state = GameState::new(5);
        state.mode = Mode::Shuffle { drawn: 0, target: 1 };
        tick(&mut state, &InputFrame::idle(), painter, codec).unwrap();
        assert!(matches!(state.mode, Mode::Marquee(_)));
        state
    }

    #[test]
    fn test_tick_emits_full_frame() {
        let (mut painter, mut codec) = scalar_setup();
        let mut state = GameState::new(1);

        let result = tick(&mut state, &InputFrame::idle(), &mut painter, &mut codec).unwrap();
        assert_eq!(result.frame.len(), FRAME_WORDS);
        assert!(state.canvas.count_ones() > 0, "shuffle line must land");
        assert_eq!(state.tick, 1);
    }

    #[test]
    fn test_tick_is_deterministic() {
        let (mut painter1, mut codec1) = scalar_setup();
        let (mut painter2, mut codec2) = scalar_setup();
        let mut state1 = GameState::new(77);
        let mut state2 = GameState::new(77);

        for _ in 0..50 {
            let r1 = tick(&mut state1, &InputFrame::idle(), &mut painter1, &mut codec1).unwrap();
            let r2 = tick(&mut state2, &InputFrame::idle(), &mut painter2, &mut codec2).unwrap();
            assert_eq!(r1.frame, r2.frame);
        }
    }

    #[test]
    fn test_codecs_interchangeable_at_engine_level() {
        // Scenario: same session, one driven through each codec path
        let mut painter1 = SoftwarePainter::new(CANVAS_WIDTH, CANVAS_HEIGHT);
        let mut painter2 = SoftwarePainter::new(CANVAS_WIDTH, CANVAS_HEIGHT);
        let mut scalar = ScalarCodec::new(CANVAS_WIDTH, CANVAS_HEIGHT, PIXEL_ON);
        let mut compute = ComputeCodec::new(
            SoftwareDevice::new(),
            CANVAS_WIDTH,
            CANVAS_HEIGHT,
            "void main() {}",
        )
        .unwrap();

        let mut state1 = GameState::new(123);
        let mut state2 = GameState::new(123);

        for _ in 0..20 {
            let r1 = tick(&mut state1, &InputFrame::idle(), &mut painter1, &mut scalar).unwrap();
            let r2 = tick(&mut state2, &InputFrame::idle(), &mut painter2, &mut compute).unwrap();
            assert_eq!(r1.frame, r2.frame);
        }
    }

    #[test]
    fn test_shuffle_finishes_into_title() {
        let (mut painter, mut codec) = scalar_setup();
        let mut state = GameState::new(9);
        state.mode = Mode::Shuffle { drawn: 0, target: 3 };

        for _ in 0..2 {
            let result = tick(&mut state, &InputFrame::idle(), &mut painter, &mut codec).unwrap();
            assert!(result.events.is_empty());
        }

        let result = tick(&mut state, &InputFrame::idle(), &mut painter, &mut codec).unwrap();
        assert_eq!(
            result.events,
            vec![GameEvent::ModeChanged {
                from: "shuffle".into(),
                to: "marquee".into()
            }]
        );
        assert!(matches!(state.mode, Mode::Marquee(_)));
    }

    #[test]
    fn test_play_starts_maze_session() {
        let (mut painter, mut codec) = scalar_setup();
        let mut state = state_at_title(&mut painter, &mut codec);

        let result = tick(
            &mut state,
            &InputFrame::with_command(Command::Play),
            &mut painter,
            &mut codec,
        )
        .unwrap();

        assert!(matches!(state.mode, Mode::Maze(_)));
        assert!(result
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::ModeChanged { to, .. } if to == "maze")));
    }

    #[test]
    fn test_menu_leaves_maze_session() {
        let (mut painter, mut codec) = scalar_setup();
        let mut state = state_at_title(&mut painter, &mut codec);

        tick(
            &mut state,
            &InputFrame::with_command(Command::Play),
            &mut painter,
            &mut codec,
        )
        .unwrap();
        tick(
            &mut state,
            &InputFrame::with_command(Command::Menu),
            &mut painter,
            &mut codec,
        )
        .unwrap();

        // Grid and navigator are gone with the mode
        assert!(matches!(state.mode, Mode::Marquee(_)));
    }

    #[test]
    fn test_commands_ignored_during_shuffle() {
        let (mut painter, mut codec) = scalar_setup();
        let mut state = GameState::new(2);

        tick(
            &mut state,
            &InputFrame::with_command(Command::Play),
            &mut painter,
            &mut codec,
        )
        .unwrap();
        assert!(matches!(state.mode, Mode::Shuffle { .. }));
    }

    #[test]
    fn test_move_command_drives_navigator_same_tick() {
        let (mut painter, mut codec) = scalar_setup();
        let mut state = GameState::new(6);

        // 2x1 corridor with the connecting wall open: one legal move east
        // solves it. The input is applied before the mode update, so the
        // whole pipeline resolves within a single tick.
        let grid = MazeGrid::from_parts(
            2,
            1,
            vec![
                crate::maze::grid::WALL_SOUTH,
                crate::maze::grid::WALL_SOUTH | crate::maze::grid::WALL_EAST,
            ],
            (0, 0),
        );
        state.mode = Mode::Maze(MazeNavigator::new(grid));

        let result = tick(
            &mut state,
            &InputFrame::with_command(Command::Move(Direction::East)),
            &mut painter,
            &mut codec,
        )
        .unwrap();

        assert!(result.events.contains(&GameEvent::MazeSolved { moves: 1 }));
        assert!(matches!(state.mode, Mode::Marquee(_)));
    }

    #[test]
    fn test_solved_maze_records_best_and_returns_to_text() {
        let (mut painter, mut codec) = scalar_setup();
        let mut state = GameState::new(3);

        // Hand-build a solved-on-arrival session: 1x1 maze
        let mut rng = crate::core::rng::DeterministicRng::new(0);
        let grid = MazeGrid::generate(1, 1, &mut rng).unwrap();
        state.mode = Mode::Maze(MazeNavigator::new(grid));

        let result = tick(&mut state, &InputFrame::idle(), &mut painter, &mut codec).unwrap();

        assert!(result.events.contains(&GameEvent::MazeSolved { moves: 0 }));
        assert!(result.events.contains(&GameEvent::NewBestScore { moves: 0 }));
        assert_eq!(state.best_score(), Some(0));
        assert!(matches!(state.mode, Mode::Marquee(_)));
    }

    #[test]
    fn test_splash_is_self_inverse() {
        let (mut painter, mut codec) = scalar_setup();
        let mut state = GameState::new(4);

        splash(&mut state, &mut painter, &mut codec).unwrap();
        assert!(state.canvas.count_ones() > 0);

        // XORing the identical splash again restores the blank canvas
        splash(&mut state, &mut painter, &mut codec).unwrap();
        assert_eq!(state.canvas, PackedCanvas::new(CANVAS_WIDTH, CANVAS_HEIGHT));
    }
}
