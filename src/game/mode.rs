//! Engine Modes
//!
//! The engine is always in exactly one mode, and each tick the mode alone
//! decides what gets drawn and XORed into the canvas. Modes are a tagged
//! variant with per-variant state, dispatched by matching in the tick
//! loop; transition side effects live with the transitions themselves.

use serde::{Serialize, Deserialize};

use crate::draw::painter::Painter;
use crate::maze::navigator::MazeNavigator;

/// Pixels a scrolling text advances per tick.
pub const SCROLL_STEP: i32 = 6;

/// Title marquee text.
pub const TITLE_TEXT: &str = "XORCADE  enter = play -- h = help";

/// Help marquee text.
pub const HELP_TEXT: &str =
    "move with arrows <> enter = play <> s = shuffle <> e = how it works <> esc = title";

/// Explanation crawl text.
pub const CREDITS_TEXT: &str = "every tick one shape is drawn\n\
and XORed into the canvas.\n\
drawing it again erases it,\n\
and the flicker in between\n\
is all you ever see.";

/// Splash text XORed in once at session start.
pub const SPLASH_TEXT: &str = "HOLD ON";

/// State of a scrolling text, horizontal or vertical.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextScroll {
    /// The text being scrolled.
    pub text: String,
    /// Rendered extent (width, height), from the painter.
    pub size: (u32, u32),
    /// Position along the scroll axis: x of the left edge for a marquee,
    /// y of the top edge for a crawl.
    pub offset: i32,
}

impl TextScroll {
    /// A marquee entering from the right canvas edge.
    pub fn marquee(painter: &mut dyn Painter, text: &str, canvas_width: u32) -> Self {
        Self {
            text: text.to_owned(),
            size: painter.text_extent(text),
            offset: canvas_width as i32,
        }
    }

    /// A crawl entering from the bottom canvas edge.
    pub fn crawl(painter: &mut dyn Painter, text: &str, canvas_height: u32) -> Self {
        Self {
            text: text.to_owned(),
            size: painter.text_extent(text),
            offset: canvas_height as i32,
        }
    }

    /// Scroll left one step; wrap to the right edge once fully off-screen.
    pub fn advance_marquee(&mut self, canvas_width: u32) {
        self.offset -= SCROLL_STEP;
        if self.offset + (self.size.0 as i32) < 0 {
            self.offset = canvas_width as i32;
        }
    }

    /// Scroll up one step; wrap to the bottom edge once fully off-screen.
    pub fn advance_crawl(&mut self, canvas_height: u32) {
        self.offset -= SCROLL_STEP;
        if self.offset + (self.size.1 as i32) < 0 {
            self.offset = canvas_height as i32;
        }
    }
}

/// The engine's current mode.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Mode {
    /// Draw one random line per tick until the target count is reached.
    Shuffle {
        /// Lines drawn so far this shuffle.
        drawn: u32,
        /// Lines to draw before switching to the title.
        target: u32,
    },
    /// Horizontally scrolling text.
    Marquee(TextScroll),
    /// Vertically scrolling text.
    Crawl(TextScroll),
    /// A live maze session.
    Maze(MazeNavigator),
}

impl Mode {
    /// Stable mode name for events and logging.
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Shuffle { .. } => "shuffle",
            Mode::Marquee(_) => "marquee",
            Mode::Crawl(_) => "crawl",
            Mode::Maze(_) => "maze",
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
