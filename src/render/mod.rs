//! Painting a world into the buffer through the viewport.
//!
//! The map area is every row between the top ruler and the status bar and
//! every column right of the left ruler. Screen cells whose world position
//! falls outside the world keep what the buffer already holds.
//!
//! When zoomed out far enough that one screen cell covers more than one
//! world cell, a 2x2 neighbourhood is reduced to one representative cell
//! so panning does not flicker between unrelated glyphs.

mod overlay;

pub use overlay::{draw_circle_world, draw_rect_world, draw_text_screen};

use crate::buffer::CellBuffer;
use crate::cell::Cell;
use crate::color::Rgb;
use crate::viewport::{MARGIN_X, MARGIN_Y, Viewport};
use crate::world::WorldSource;

/// Draw `world` into the map area of `buf`. Does nothing when disabled.
pub fn draw_world<W: WorldSource + ?Sized>(
    buf: &mut CellBuffer,
    vp: &Viewport,
    world: &W,
    enabled: bool,
) {
    if !enabled {
        return;
    }
    let (w, h) = (i32::from(buf.width()), i32::from(buf.height()));
    let world_per_cell = 1.0 / vp.zoom();

    for sy in MARGIN_Y..h - 1 {
        for sx in MARGIN_X..w {
            let (wx, wy) = vp.screen_to_world(sx, sy);
            if let Some(cell) = sample(world, wx, wy, world_per_cell) {
                buf.set(sx, sy, cell);
            }
        }
    }
}

/// Representative cell at a continuous world position.
///
/// Up to one world cell per screen cell this is the nearest cell. Beyond
/// that the 2x2 block starting at `floor(w - step/2)` is averaged: colors
/// channel-wise over the cells that exist, glyph by majority with ties
/// going to the first seen. `None` when no sampled cell exists.
#[must_use]
pub fn sample<W: WorldSource + ?Sized>(
    world: &W,
    wx: f64,
    wy: f64,
    world_per_cell: f64,
) -> Option<Cell> {
    if world_per_cell <= 1.0 {
        return world.cell(wx.round() as i64, wy.round() as i64);
    }

    let step = (world_per_cell * 0.8).max(1.0);
    let x0 = (wx - step * 0.5).floor() as i64;
    let y0 = (wy - step * 0.5).floor() as i64;

    let mut block = [None; 4];
    for (i, slot) in block.iter_mut().enumerate() {
        let (dx, dy) = ((i % 2) as i64, (i / 2) as i64);
        *slot = world.cell(x0 + dx, y0 + dy);
    }
    reduce(&block)
}

fn reduce(block: &[Option<Cell>; 4]) -> Option<Cell> {
    let present: Vec<Cell> = block.iter().flatten().copied().collect();
    if present.is_empty() {
        return None;
    }
    Some(Cell::new(
        mode_glyph(&present),
        average(present.iter().map(|c| c.fg)),
        average(present.iter().map(|c| c.bg)),
    ))
}

fn average(colors: impl Iterator<Item = Rgb>) -> Rgb {
    let (mut r, mut g, mut b, mut n) = (0u32, 0u32, 0u32, 0u32);
    for c in colors {
        r += u32::from(c.r);
        g += u32::from(c.g);
        b += u32::from(c.b);
        n += 1;
    }
    let n = n.max(1);
    Rgb::new((r / n) as u8, (g / n) as u8, (b / n) as u8)
}

fn mode_glyph(cells: &[Cell]) -> char {
    let mut best = cells[0].ch;
    let mut best_count = 0;
    for (i, cell) in cells.iter().enumerate() {
        // Only the first occurrence of a glyph is counted.
        if cells[..i].iter().any(|c| c.ch == cell.ch) {
            continue;
        }
        let count = cells.iter().filter(|c| c.ch == cell.ch).count();
        if count > best_count {
            best = cell.ch;
            best_count = count;
        }
    }
    best
}
