//! Tutoring assigner.
//!
//! Every group gets one tutoring block. Teachers who already teach the
//! group and still have tutoring hours go first (lightest load first), then
//! any other teacher with tutoring hours in input order. The block goes on
//! the group's lightest day that has a window.

use tracing::debug;

use crate::models::{Issue, IssueKind, SlotKind};
use crate::scheduler::engine::Engine;
use crate::scheduler::rules::SlotRequest;
use crate::scheduler::search::find_best_day;

pub(super) fn assign(engine: &mut Engine) {
    let offered: u32 = (0..engine.teachers.len())
        .map(|t| residual_hours(engine, t))
        .sum();
    if offered == 0 {
        debug!("no tutoring hours offered, skipping tutoring");
        return;
    }

    let mode = engine.search_mode();
    for group in 0..engine.groups.len() {
        let candidates = candidates(engine, group);
        if candidates.is_empty() {
            let issue = Issue::new(IssueKind::NoTutor, "no teacher has tutoring hours left")
                .with_subject(&engine.config.tutoring_activity)
                .with_group(&engine.groups[group].nomenclature)
                .with_hours(0, 1);
            engine.record(issue);
            continue;
        }

        let placed = candidates.iter().find_map(|&teacher| {
            let req = SlotRequest::tutoring(teacher, group);
            find_best_day(engine, &req, 1, mode).map(|p| (req, p))
        });
        match placed {
            Some((req, placement)) => engine.place(placement.day, placement.blocks, req),
            None => {
                let issue = Issue::new(IssueKind::TutoringUnplaced, "no free block for tutoring")
                    .with_subject(&engine.config.tutoring_activity)
                    .with_group(&engine.groups[group].nomenclature)
                    .with_hours(0, 1);
                engine.record(issue);
            }
        }
    }
}

/// Tutoring hours a teacher has not used yet.
fn residual_hours(engine: &Engine, teacher: usize) -> u32 {
    let name = &engine.config.tutoring_activity;
    engine.teachers[teacher]
        .reinforcement_hours(name)
        .saturating_sub(engine.held(teacher, SlotKind::Tutoring))
}

fn candidates(engine: &Engine, group: usize) -> Vec<usize> {
    let available: Vec<usize> = (0..engine.teachers.len())
        .filter(|&t| residual_hours(engine, t) > 0)
        .collect();
    let (mut preferred, others): (Vec<usize>, Vec<usize>) = available
        .into_iter()
        .partition(|&t| engine.ledger.teaches(t, group));
    preferred.sort_by_key(|&t| engine.ledger.teacher_load(t));
    preferred.extend(others);
    preferred
}
