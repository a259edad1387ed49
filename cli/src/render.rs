//! Plain-text dumps of layouts, patterns and dig sites.

use digsite_core::{Cell, DigSite, Layout, MinePattern};
use std::fmt::Write;

fn treasure_mark(index: usize) -> char {
    const MARKS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
    MARKS.get(index).map_or('*', |&mark| mark as char)
}

fn grid(size: (i32, i32), mut cell: impl FnMut(Cell) -> char) -> String {
    let (width, height) = size;
    let mut out = String::new();
    for y in 0..height {
        out.extend((0..width).map(|x| cell((x, y))));
        out.push('\n');
    }
    out
}

pub fn layout(layout: &Layout) -> String {
    let mut out = grid(layout.grid(), |cell| {
        layout.treasure_at(cell).map_or('.', treasure_mark)
    });
    for (index, placed) in layout.placements().iter().enumerate() {
        let _ = writeln!(
            out,
            "{} {} (score {}) at {:?}",
            treasure_mark(index),
            placed.shape.name(),
            placed.shape.score(),
            placed.origin
        );
    }
    for failed in layout.failures() {
        let _ = writeln!(
            out,
            "! could not place {} ({}x{})",
            failed.shape, failed.size.0, failed.size.1
        );
    }
    let _ = writeln!(out, "total score {}", layout.total_score());
    out
}

/// Power map over the pattern's bounding box; powers above 9 print as `+`.
pub fn pattern(pattern: &MinePattern) -> String {
    let Some(first) = pattern.first() else {
        return String::from("(empty pattern)\n");
    };
    let (mut min, mut max) = (first.cell, first.cell);
    for entry in pattern {
        min = (min.0.min(entry.cell.0), min.1.min(entry.cell.1));
        max = (max.0.max(entry.cell.0), max.1.max(entry.cell.1));
    }

    let size = (max.0 - min.0 + 1, max.1 - min.1 + 1);
    let mut out = format!("origin {:?}, top-left {:?}\n", first.cell, min);
    out += &grid(size, |(x, y)| {
        let cell = (x + min.0, y + min.1);
        match pattern.iter().find(|entry| entry.cell == cell) {
            Some(entry) => char::from_digit(entry.power, 10).unwrap_or('+'),
            None => '.',
        }
    });
    out
}

/// Material depth per cell, uncovered treasure marks, and blank dug-out dirt.
pub fn site(site: &DigSite) -> String {
    let layout = site.layout();
    grid(site.size(), |cell| match site.material_at(cell) {
        0 => layout.treasure_at(cell).map_or(' ', treasure_mark),
        depth => char::from_digit(depth.into(), 10).unwrap_or('+'),
    })
}
