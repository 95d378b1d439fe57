//! Gap elimination.
//!
//! With [`CompactionStrategy::FirstFit`] placement already keeps every group
//! day contiguous, so this stage only counts holes. With
//! [`CompactionStrategy::Swap`] it repairs holes left by scan placement:
//! per group day, the first hole takes the next movable cell after it when
//! that cell's teacher is free at the hole, until nothing moves.
//!
//! Cohort reservations never move and are never crossed.

use tracing::{debug, info};

use crate::models::{BlockRange, CompactionStrategy, Day, SlotKind};

use super::Engine;

/// What a compaction pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompactionOutcome {
    /// Cells moved into holes.
    pub moved: u32,
    /// Holes left afterwards, counted on the live ledger.
    pub holes: u32,
}

/// Runs the configured strategy. When cells move, the teacher grids and
/// ledger are updated and the caller must re-project.
pub fn compact(engine: &mut Engine, strategy: CompactionStrategy) -> CompactionOutcome {
    let moved = match strategy {
        CompactionStrategy::FirstFit => 0,
        CompactionStrategy::Swap => {
            let mut moved = 0;
            for group in 0..engine.groups.len() {
                for day in Day::ALL {
                    moved += compact_day(engine, group, day);
                }
            }
            moved
        }
    };
    let holes = count_holes(engine);
    info!(strategy = ?strategy, moved, holes, "compaction finished");
    CompactionOutcome { moved, holes }
}

/// Moves cells of one group day into holes until a fixed point.
fn compact_day(engine: &mut Engine, group: usize, day: Day) -> u32 {
    let bounds = engine.layout.shift_range(engine.groups[group].shift);
    let mut moved = 0;
    loop {
        let Some(span) = engine.ledger.group_span(group, day, bounds) else {
            return moved;
        };
        let mut changed = false;
        for hole in span.first + 1..span.last {
            if !engine.ledger.is_group_free(group, day, hole) {
                continue;
            }
            let Some(from) = next_occupied(engine, group, day, hole, span) else {
                break;
            };
            let Some(&occupant) = engine.ledger.occupant(group, day, from) else {
                continue;
            };
            if occupant.kind == SlotKind::Extracurricular {
                continue;
            }
            let teacher = occupant.teacher;
            if !engine.teacher_grids[teacher].is_free(day, hole)
                || engine.teachers[teacher].avoids(hole)
            {
                continue;
            }
            let Some(slot) = engine.teacher_grids[teacher].take(day, from) else {
                continue;
            };
            engine.teacher_grids[teacher].set(day, hole, slot);
            engine.ledger.relocate(group, day, from, hole);
            debug!(
                group = %engine.groups[group].nomenclature,
                ?day,
                from,
                to = hole,
                "moved cell into hole"
            );
            moved += 1;
            changed = true;
        }
        if !changed {
            return moved;
        }
    }
}

/// Next occupied block after `hole` within `span`. The caller refuses to
/// move a cohort reservation, so none is ever crossed.
fn next_occupied(
    engine: &Engine,
    group: usize,
    day: Day,
    hole: u32,
    span: BlockRange,
) -> Option<u32> {
    (hole + 1..=span.last).find(|&b| !engine.ledger.is_group_free(group, day, b))
}

fn count_holes(engine: &Engine) -> u32 {
    let mut holes = 0;
    for (g, group) in engine.groups.iter().enumerate() {
        let bounds = engine.layout.shift_range(group.shift);
        for day in Day::ALL {
            if let Some(span) = engine.ledger.group_span(g, day, bounds) {
                holes += span.len() - engine.ledger.group_hours(g, day);
            }
        }
    }
    holes
}
