use alloc::collections::VecDeque;
use alloc::vec::Vec;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::*;

/// One cell touched by a mining action and the power that reached it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternEntry {
    pub cell: Cell,
    pub power: Power,
}

/// Affected cells in discovery order, each cell at most once.
pub type MinePattern = Vec<PatternEntry>;

/// Power carried into the next hop.
///
/// Power holds while resistance is positive, otherwise it decays by `1 - resistance`.
pub const fn next_power(power: Power, resistance: Resistance) -> Power {
    if resistance > 0 {
        return power;
    }
    let next = power as i64 + resistance as i64 - 1;
    if next > 0 { next as Power } else { 0 }
}

/// Resistance carried into the next hop.
///
/// Trends toward zero by one per hop and never goes negative, so a negative starting
/// resistance only affects the first hop.
pub const fn next_resistance(resistance: Resistance) -> Resistance {
    if resistance > 0 { resistance - 1 } else { 0 }
}

/// Computes which cells a mining action at `origin` affects and with how much power.
///
/// Breadth-first relaxation over the unbounded 4-connected grid: a cell is recorded
/// with the greatest power any path delivers to it, and cells reached with zero power
/// are dropped. Cells are not clipped to any grid; callers filter them.
pub fn compute_pattern(origin: Cell, power: Power, resistance: Resistance) -> MinePattern {
    let mut pattern = MinePattern::new();
    // cell -> index into `pattern`
    let mut best: HashMap<Cell, usize> = HashMap::new();
    let mut to_visit = VecDeque::from([(origin, power, resistance)]);

    while let Some((cell, power, resistance)) = to_visit.pop_front() {
        if power == 0 {
            continue;
        }

        match best.get(&cell) {
            Some(&index) if pattern[index].power >= power => continue,
            Some(&index) => pattern[index].power = power,
            None => {
                best.insert(cell, pattern.len());
                pattern.push(PatternEntry { cell, power });
            }
        }

        let hop_power = next_power(power, resistance);
        if hop_power == 0 {
            continue;
        }
        let hop_resistance = next_resistance(resistance);

        to_visit.extend(
            neighbors4(cell)
                .filter(|neighbor| match best.get(neighbor) {
                    Some(&index) => pattern[index].power < hop_power,
                    None => true,
                })
                .map(|neighbor| (neighbor, hop_power, hop_resistance)),
        );
    }

    pattern
}
