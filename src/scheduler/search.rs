//! Slot search.
//!
//! Every assigner looks for windows the same way: generate candidate start
//! blocks, and take the first window whose blocks all pass a predicate.
//! [`first_window`] is that loop. The category-specific searches only
//! differ in the candidates they generate and the predicate they pass.
//!
//! # Modes
//!
//! - [`SearchMode::Gapless`]: candidates abut the group's occupied run for
//!   the day, or start at the shift start when the day is empty, so no group
//!   day ever gets an interior hole.
//! - [`SearchMode::Scan`]: every start in the shift, left to right. Holes
//!   can appear and are repaired afterwards by swap compaction.

use crate::models::{Block, BlockRange, Day};

use super::rules::{can_place, window_fits, SlotRequest};
use super::Engine;

/// How candidate windows are generated for a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    Gapless,
    Scan,
}

/// A committed or proposed window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub day: Day,
    pub blocks: BlockRange,
}

/// First window of `length` blocks, taken from `starts` in order, that lies
/// inside `bounds` and whose every block satisfies `admissible`.
pub fn first_window<I, F>(
    starts: I,
    length: u32,
    bounds: BlockRange,
    mut admissible: F,
) -> Option<BlockRange>
where
    I: IntoIterator<Item = Block>,
    F: FnMut(Block) -> bool,
{
    if length == 0 {
        return None;
    }
    starts
        .into_iter()
        .map(|start| BlockRange::starting_at(start, length))
        .find(|window| bounds.covers(window) && window.blocks().all(&mut admissible))
}

/// Leftmost window of `length` blocks on `day` where every block passes
/// [`can_place`].
pub fn find_contiguous(
    engine: &Engine,
    day: Day,
    req: &SlotRequest,
    length: u32,
) -> Option<BlockRange> {
    if !window_fits(engine, day, req, length) {
        return None;
    }
    let bounds = engine.layout.shift_range(engine.groups[req.group].shift);
    first_window(bounds.blocks(), length, bounds, |b| {
        can_place(engine, day, b, req)
    })
}

/// Window of `length` blocks on `day` that keeps the group day contiguous.
///
/// With a run on the day, the window must abut it: first the window ending
/// right before the run (when it fits inside the shift), then the window
/// starting right after it. On an empty day the window starts at the shift
/// start; later starts are only tried when the shift start is not admissible
/// for this teacher, so the day still has no hole once the window lands.
pub fn find_gapless(
    engine: &Engine,
    day: Day,
    req: &SlotRequest,
    length: u32,
) -> Option<BlockRange> {
    if !window_fits(engine, day, req, length) {
        return None;
    }
    let bounds = engine.layout.shift_range(engine.groups[req.group].shift);
    let starts = gapless_starts(engine, day, req.group, bounds, length);
    first_window(starts, length, bounds, |b| can_place(engine, day, b, req))
}

fn gapless_starts(
    engine: &Engine,
    day: Day,
    group: usize,
    bounds: BlockRange,
    length: u32,
) -> Vec<Block> {
    match engine.ledger.group_span(group, day, bounds) {
        None => bounds.blocks().collect(),
        Some(run) => {
            let mut starts = Vec::with_capacity(2);
            if run.first >= bounds.first + length {
                starts.push(run.first - length);
            }
            starts.push(run.last + 1);
            starts
        }
    }
}

/// Finds a window on the day with the fewest blocks already assigned to the
/// group. Ties go to the earlier day.
pub fn find_best_day(
    engine: &Engine,
    req: &SlotRequest,
    length: u32,
    mode: SearchMode,
) -> Option<Placement> {
    let mut best: Option<(u32, Placement)> = None;
    for day in Day::ALL {
        let window = match mode {
            SearchMode::Gapless => find_gapless(engine, day, req, length),
            SearchMode::Scan => find_contiguous(engine, day, req, length),
        };
        let Some(blocks) = window else {
            continue;
        };
        let load = engine.ledger.group_hours(req.group, day);
        if best.as_ref().map_or(true, |(l, _)| load < *l) {
            best = Some((load, Placement { day, blocks }));
        }
    }
    best.map(|(_, placement)| placement)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EngineConfig, Group, Subject, Teacher};

    fn engine() -> Engine {
        let config = EngineConfig::new(8, 7).with_shift_boundary(8);
        let subjects = vec![
            Subject::professional("PM1", 17).with_semester(1),
            Subject::common_core("MAT1", 4).with_semester(1),
        ];
        let groups = vec![Group::morning("101A", 1), Group::afternoon("101V", 1)];
        let teachers = vec![
            Teacher::new("Ana", 40).with_subject("PM1", &["101A", "101V"]),
            Teacher::new("Luis", 40)
                .with_subject("MAT1", &["101A"])
                .with_avoided_blocks(&[1]),
        ];
        Engine::new(config, subjects, groups, teachers).unwrap()
    }

    #[test]
    fn test_first_window_respects_bounds() {
        let bounds = BlockRange::new(1, 8);
        assert_eq!(
            first_window([7, 3], 3, bounds, |_| true),
            Some(BlockRange::new(3, 5))
        );
        assert_eq!(first_window([7], 3, bounds, |_| true), None);
        assert_eq!(first_window([1], 0, bounds, |_| true), None);
        assert_eq!(
            first_window(bounds.blocks(), 2, bounds, |b| b != 2),
            Some(BlockRange::new(3, 4))
        );
    }

    #[test]
    fn test_find_contiguous_leftmost() {
        let e = engine();
        let req = SlotRequest::new(0, 0, Some(0));
        assert_eq!(
            find_contiguous(&e, Day::Monday, &req, 4),
            Some(BlockRange::new(1, 4))
        );
        let afternoon = SlotRequest::new(0, 1, Some(0));
        assert_eq!(
            find_contiguous(&e, Day::Monday, &afternoon, 5),
            Some(BlockRange::new(8, 12))
        );
        // Daily cap of 5 for professional modules.
        assert_eq!(find_contiguous(&e, Day::Monday, &req, 6), None);
    }

    #[test]
    fn test_find_contiguous_skips_avoided_blocks() {
        let e = engine();
        let req = SlotRequest::new(1, 0, Some(1));
        assert_eq!(
            find_contiguous(&e, Day::Monday, &req, 2),
            Some(BlockRange::new(2, 3))
        );
    }

    #[test]
    fn test_gapless_empty_day_starts_at_shift_start() {
        let e = engine();
        let pm = SlotRequest::new(0, 0, Some(0));
        assert_eq!(
            find_gapless(&e, Day::Monday, &pm, 4),
            Some(BlockRange::new(1, 4))
        );
        let afternoon = SlotRequest::new(0, 1, Some(0));
        assert_eq!(
            find_gapless(&e, Day::Monday, &afternoon, 4),
            Some(BlockRange::new(8, 11))
        );

        // Luis avoids block 1, so the window falls back to the next start.
        let math = SlotRequest::new(1, 0, Some(1));
        assert_eq!(
            find_gapless(&e, Day::Monday, &math, 2),
            Some(BlockRange::new(2, 3))
        );
    }

    #[test]
    fn test_gapless_extends_the_run() {
        let mut e = engine();
        let pm = SlotRequest::new(0, 0, Some(0));
        e.place(Day::Monday, BlockRange::new(1, 4), pm);

        let math = SlotRequest::new(1, 0, Some(1));
        assert_eq!(
            find_gapless(&e, Day::Monday, &math, 2),
            Some(BlockRange::new(5, 6))
        );
    }

    #[test]
    fn test_gapless_fills_before_a_late_run() {
        let mut e = engine();
        let pm = SlotRequest::new(0, 0, Some(0));
        e.place(Day::Monday, BlockRange::new(5, 8), pm);

        let math = SlotRequest::new(1, 0, Some(1));
        assert_eq!(
            find_gapless(&e, Day::Monday, &math, 2),
            Some(BlockRange::new(3, 4))
        );
    }

    #[test]
    fn test_gapless_never_leaves_a_hole() {
        let mut e = engine();
        let pm = SlotRequest::new(0, 0, Some(0));
        e.place(Day::Monday, BlockRange::new(1, 4), pm);

        // Luis is busy at 5, so the only gap-free window is gone. A scan
        // still finds one further right.
        let math = SlotRequest::new(1, 0, Some(1));
        e.place_duty(Day::Monday, 5, 1, "Advising", None);
        assert_eq!(find_gapless(&e, Day::Monday, &math, 2), None);
        assert_eq!(
            find_contiguous(&e, Day::Monday, &math, 2),
            Some(BlockRange::new(6, 7))
        );
    }

    #[test]
    fn test_best_day_prefers_lighter_days() {
        let mut e = engine();
        let pm = SlotRequest::new(0, 0, Some(0));
        e.place(Day::Monday, BlockRange::new(1, 4), pm);

        let math = SlotRequest::new(1, 0, Some(1));
        let placement = find_best_day(&e, &math, 2, SearchMode::Gapless).unwrap();
        assert_eq!(placement.day, Day::Tuesday);
        // Luis avoids block 1.
        assert_eq!(placement.blocks, BlockRange::new(2, 3));
    }
}
