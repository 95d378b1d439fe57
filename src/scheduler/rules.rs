//! Placement constraint checker.
//!
//! `can_place` answers whether one (day, block) cell may take a class for a
//! (teacher, group, subject) request. It has no side effects and is called
//! once per block of every candidate window, so every check is a map lookup.
//!
//! # Checks (short-circuit, in order)
//!
//! 1. Teacher cell is free
//! 2. Group cell is free (cohort reservations count as occupied)
//! 3. Block lies in the group's shift
//! 4. Block is not in the teacher's avoided set
//! 5. Subject semester matches the group
//! 6. Common-core subjects do not repeat on a day
//! 7. Per-day cap not yet reached
//!
//! Multi-block windows additionally go through [`window_fits`], which checks
//! the daily cap and the teacher's contracted hours for the window as a whole.

use crate::models::{Block, Day, SubjectCategory};

use super::Engine;

/// A (teacher, group, subject) placement request, by index.
///
/// `subject = None` requests a tutoring block: only checks 1-4 apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotRequest {
    pub teacher: usize,
    pub group: usize,
    pub subject: Option<usize>,
}

impl SlotRequest {
    pub fn new(teacher: usize, group: usize, subject: Option<usize>) -> Self {
        Self {
            teacher,
            group,
            subject,
        }
    }

    /// A tutoring request.
    pub fn tutoring(teacher: usize, group: usize) -> Self {
        Self::new(teacher, group, None)
    }
}

/// Whether `req` may occupy (day, block).
pub fn can_place(engine: &Engine, day: Day, block: Block, req: &SlotRequest) -> bool {
    let teacher = &engine.teachers[req.teacher];
    let group = &engine.groups[req.group];

    if !engine.teacher_grids[req.teacher].is_free(day, block) {
        return false;
    }
    if !engine.ledger.is_group_free(req.group, day, block) {
        return false;
    }
    if !engine.layout.is_valid_for(group.shift, block) {
        return false;
    }
    if teacher.avoids(block) {
        return false;
    }

    let Some(s) = req.subject else {
        return true;
    };
    let subject = &engine.subjects[s];
    if !subject.applies_to_semester(group.semester) {
        return false;
    }
    let today = engine.ledger.daily_count(s, req.group, day);
    if subject.category == SubjectCategory::CommonCore && today > 0 {
        return false;
    }
    today < subject.max_hours_per_day()
}

/// Whether a window of `length` blocks on `day` stays within the per-day
/// cap and the teacher's contracted hours.
pub fn window_fits(engine: &Engine, day: Day, req: &SlotRequest, length: u32) -> bool {
    let teacher = &engine.teachers[req.teacher];
    if engine.ledger.teacher_load(req.teacher) + length > teacher.contracted_weekly_hours {
        return false;
    }
    match req.subject {
        Some(s) => {
            engine.ledger.daily_count(s, req.group, day) + length
                <= engine.subjects[s].max_hours_per_day()
        }
        None => true,
    }
}
