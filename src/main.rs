//! Xorcade Demo Driver
//!
//! Drives a headless session end to end: splash, opening shuffle, a maze
//! session solved along the spanning tree's unique path, and best-score
//! persistence as plain JSON. Rendering, windowing and input live in an
//! external integration; this binary exists to exercise the engine.

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Serialize, Deserialize};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use xorcade::{
    CANVAS_WIDTH, CANVAS_HEIGHT, TICK_RATE, VERSION,
    core::rng::derive_session_seed,
    codec::compute::{ComputeCodec, SoftwareDevice},
    draw::painter::SoftwarePainter,
    game::{
        events::GameEvent,
        input::{Command, InputFrame},
        mode::Mode,
        state::GameState,
        tick::{tick, splash},
    },
    maze::grid::{Direction, MazeGrid},
};

/// Best-score file exchanged with the engine as a plain integer.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ScoreFile {
    best_moves: Option<u32>,
}

const SCORE_PATH: &str = "xorcade_score.json";
const KERNEL_PATH: &str = "shaders/parity_pack.comp";

fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    info!("Xorcade Engine v{}", VERSION);
    info!("Canvas: {}x{} @ {} Hz", CANVAS_WIDTH, CANVAS_HEIGHT, TICK_RATE);

    // The compute kernel is an external, versioned artifact
    let kernel = fs::read_to_string(KERNEL_PATH)
        .with_context(|| format!("Failed to load kernel from {KERNEL_PATH}"))?;

    let device = SoftwareDevice::new();
    let mut encoder = ComputeCodec::new(device, CANVAS_WIDTH, CANVAS_HEIGHT, &kernel)
        .context("Failed to set up compute codec")?;
    let mut painter = SoftwarePainter::new(CANVAS_WIDTH, CANVAS_HEIGHT);

    let best = load_best_score(SCORE_PATH);
    if let Some(best) = best {
        info!("Best score on file: {} moves", best);
    }

    let seed = derive_session_seed("xorcade-demo");
    info!("Session seed: {}", seed);
    let mut state = GameState::new(seed).with_best_score(best);

    splash(&mut state, &mut painter, &mut encoder)?;
    info!("Splash applied: {} pixels lit", state.canvas.count_ones());

    // Opening shuffle runs until the title marquee takes over
    let mut ticks = 0u32;
    while matches!(state.mode, Mode::Shuffle { .. }) {
        let result = tick(&mut state, &InputFrame::idle(), &mut painter, &mut encoder)?;
        log_events(&result.events);
        ticks += 1;
        if ticks % 200 == 0 {
            info!(
                "Shuffle tick {}: {} pixels lit",
                ticks,
                state.canvas.count_ones()
            );
        }
    }

    // Start a maze session
    let result = tick(
        &mut state,
        &InputFrame::with_command(Command::Play),
        &mut painter,
        &mut encoder,
    )?;
    log_events(&result.events);

    // Walk the spanning tree's unique path to the goal
    let path = match &state.mode {
        Mode::Maze(nav) => solve_path(nav.grid()),
        _ => Vec::new(),
    };
    info!("Path to goal: {} moves", path.len());

    let mut inputs: Vec<InputFrame> = path
        .into_iter()
        .map(|dir| InputFrame::with_command(Command::Move(dir)))
        .collect();
    inputs.reverse(); // pop from the back below

    let mut solved = false;
    let mut maze_ticks = 0u32;
    while !solved {
        let input = inputs.pop().unwrap_or_default();
        let result = tick(&mut state, &input, &mut painter, &mut encoder)?;
        log_events(&result.events);
        solved = result
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::MazeSolved { .. }));
        ticks += 1;
        maze_ticks += 1;
        if maze_ticks > 200_000 {
            anyhow::bail!("maze session never solved");
        }
    }

    info!(
        "Session done after {} ticks, frame {} words, best score {:?}",
        ticks,
        state.canvas.serialize().len(),
        state.best_score()
    );

    save_best_score(SCORE_PATH, state.best_score())?;
    Ok(())
}

fn log_events(events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::ModeChanged { from, to } => info!("Mode: {} -> {}", from, to),
            GameEvent::MazeSolved { moves } => info!("Maze solved in {} moves", moves),
            GameEvent::NewBestScore { moves } => info!("New best score: {} moves", moves),
        }
    }
}

/// Depth-first search for the unique open path from start to goal.
fn solve_path(grid: &MazeGrid) -> Vec<Direction> {
    let width = grid.width();
    let height = grid.height();
    let mut visited = vec![false; width as usize * height as usize];
    let mut stack = vec![(grid.start(), Vec::new())];
    visited[(grid.start().0 + width * grid.start().1) as usize] = true;

    while let Some(((x, y), path)) = stack.pop() {
        if (x, y) == grid.goal() {
            return path;
        }
        for dir in Direction::ALL {
            if grid.can_move(x, y, dir) {
                if let Some((nx, ny)) = dir.step(x, y, width, height) {
                    let idx = (nx + width * ny) as usize;
                    if !visited[idx] {
                        visited[idx] = true;
                        let mut next = path.clone();
                        next.push(dir);
                        stack.push(((nx, ny), next));
                    }
                }
            }
        }
    }
    Vec::new()
}

fn load_best_score(path: &str) -> Option<u32> {
    let data = fs::read_to_string(path).ok()?;
    serde_json::from_str::<ScoreFile>(&data).ok()?.best_moves
}

fn save_best_score(path: &str, best_moves: Option<u32>) -> anyhow::Result<()> {
    let file = ScoreFile { best_moves };
    let data = serde_json::to_string_pretty(&file).context("Failed to encode score file")?;
    fs::write(Path::new(path), data)
        .with_context(|| format!("Failed to write score file {path}"))?;
    info!("Best score saved to {}", path);
    Ok(())
}
