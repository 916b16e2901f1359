//! Drawing Collaborator
//!
//! The engine never rasterizes anything itself: each tick it asks a
//! [`Painter`] for a raw pixel image (a random line, a text blit, a
//! camera-shifted maze snapshot) and feeds that image to a mask codec.
//! [`SoftwarePainter`] is the built-in reference implementation; a real
//! integration can swap in anything that upholds the same contract.
//!
//! Painters draw with [`PIXEL_ON`] so the compute codec's parity contract
//! holds (see `codec::image`).

use crate::codec::image::{Image, PIXEL_ON};
use crate::core::fixed::{FIXED_HALF, fixed_floor, to_fixed};
use crate::core::vec2::FixedVec2;
use crate::maze::grid::MazeGrid;

/// Pixel size of one maze cell in snapshots.
pub const CELL_PX: i32 = 10;

/// Placeholder glyph cell width, including spacing.
pub const GLYPH_W: u32 = 6;

/// Placeholder glyph cell height.
pub const GLYPH_H: u32 = 10;

/// Produces raw pixel images for the engine's draw requests.
///
/// Every image must be exactly the canvas shape; the codecs reject
/// anything else.
pub trait Painter {
    /// A one-pixel line between two points, clipped to the canvas.
    fn line(&mut self, from: (i32, i32), to: (i32, i32)) -> Image;

    /// The rendered size of a text blit, for scroll wrap-around math.
    fn text_extent(&mut self, text: &str) -> (u32, u32);

    /// Text blitted with its top-left corner at `origin`. Newlines stack
    /// lines vertically.
    fn text_blit(&mut self, text: &str, origin: (i32, i32)) -> Image;

    /// The maze with walls, player and goal markers, camera-centered on
    /// `focus` (continuous, in cell units).
    fn maze_snapshot(&mut self, grid: &MazeGrid, focus: FixedVec2) -> Image;
}

// =============================================================================
// SOFTWARE PAINTER
// =============================================================================

/// CPU reference painter.
///
/// Lines are Bresenham; text is a placeholder box per glyph (real font
/// rasterization belongs to an external collaborator); maze cells are
/// [`CELL_PX`] squares.
#[derive(Clone, Copy, Debug)]
pub struct SoftwarePainter {
    width: u32,
    height: u32,
}

impl SoftwarePainter {
    /// Painter for a fixed canvas shape.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    fn blank(&self) -> Image {
        Image::new(self.width, self.height)
    }
}

impl Painter for SoftwarePainter {
    fn line(&mut self, from: (i32, i32), to: (i32, i32)) -> Image {
        let mut img = self.blank();
        draw_line(&mut img, from, to);
        img
    }

    fn text_extent(&mut self, text: &str) -> (u32, u32) {
        let mut lines = 0u32;
        let mut widest = 0u32;
        for line in text.split('\n') {
            lines += 1;
            widest = widest.max(line.chars().count() as u32 * GLYPH_W);
        }
        (widest, lines.max(1) * GLYPH_H)
    }

    fn text_blit(&mut self, text: &str, origin: (i32, i32)) -> Image {
        let mut img = self.blank();
        for (row, line) in text.split('\n').enumerate() {
            let top = origin.1 + row as i32 * GLYPH_H as i32;
            for (col, ch) in line.chars().enumerate() {
                if ch.is_whitespace() {
                    continue;
                }
                let left = origin.0 + col as i32 * GLYPH_W as i32;
                // Box glyph with a 1px gap on the right and bottom
                fill_rect(
                    &mut img,
                    left,
                    top,
                    GLYPH_W as i32 - 1,
                    GLYPH_H as i32 - 1,
                );
            }
        }
        img
    }

    fn maze_snapshot(&mut self, grid: &MazeGrid, focus: FixedVec2) -> Image {
        let mut img = self.blank();

        // Camera: the focused cell center sits at the canvas center
        let center = focus
            .add(FixedVec2::new(FIXED_HALF, FIXED_HALF))
            .scale(to_fixed(CELL_PX as f64));
        let off_x = self.width as i32 / 2 - fixed_floor(center.x);
        let off_y = self.height as i32 / 2 - fixed_floor(center.y);

        let grid_w = grid.width() as i32 * CELL_PX;
        let grid_h = grid.height() as i32 * CELL_PX;

        // Outer north and west boundary; south and east walls of the
        // boundary cells are stored in the grid itself
        draw_line(&mut img, (off_x, off_y), (off_x + grid_w, off_y));
        draw_line(&mut img, (off_x, off_y), (off_x, off_y + grid_h));

        for y in 0..grid.height() {
            for x in 0..grid.width() {
                let left = off_x + x as i32 * CELL_PX;
                let top = off_y + y as i32 * CELL_PX;
                if grid.wall_south(x, y) {
                    draw_line(
                        &mut img,
                        (left, top + CELL_PX),
                        (left + CELL_PX, top + CELL_PX),
                    );
                }
                if grid.wall_east(x, y) {
                    draw_line(
                        &mut img,
                        (left + CELL_PX, top),
                        (left + CELL_PX, top + CELL_PX),
                    );
                }
            }
        }

        // Goal marker in the far corner cell
        let (gx, gy) = grid.goal();
        fill_rect(
            &mut img,
            off_x + gx as i32 * CELL_PX + 3,
            off_y + gy as i32 * CELL_PX + 3,
            CELL_PX - 5,
            CELL_PX - 5,
        );

        // Player marker: always at the canvas center by construction
        fill_rect(
            &mut img,
            self.width as i32 / 2 - 1,
            self.height as i32 / 2 - 1,
            3,
            3,
        );

        img
    }
}

/// Bresenham line, clipped per-pixel by `Image::put`.
fn draw_line(img: &mut Image, from: (i32, i32), to: (i32, i32)) {
    let (x0, y0) = from;
    let (x1, y1) = to;

    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let mut x = x0;
    let mut y = y0;

    loop {
        img.put(x, y, PIXEL_ON);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

fn fill_rect(img: &mut Image, left: i32, top: i32, w: i32, h: i32) {
    for y in top..top + h {
        for x in left..left + w {
            img.put(x, y, PIXEL_ON);
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
