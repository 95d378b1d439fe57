//! Reinforcement filler.
//!
//! Non-teaching duties only occupy the teacher grid. Avoided blocks are
//! unsuitable for classes but fine for duties, so each day offers them
//! first. Preferred blocks come last and stay open for teaching as long as
//! possible. Tutoring is excluded here; it was placed with a group.
//!
//! Hours still unfilled afterwards go to the configured general-support
//! activity, or are reported as an underloaded teacher.

use crate::models::{Block, Day, Issue, IssueKind, SlotKind};
use crate::scheduler::engine::Engine;

pub(super) fn assign(engine: &mut Engine) {
    for teacher in 0..engine.teachers.len() {
        fill_activities(engine, teacher);
        fill_contract(engine, teacher);
    }
}

fn fill_activities(engine: &mut Engine, teacher: usize) {
    let mut names: Vec<(String, Option<String>)> = Vec::new();
    for activity in &engine.teachers[teacher].reinforcement_activities {
        if activity.name != engine.config.tutoring_activity
            && !names.iter().any(|(n, _)| *n == activity.name)
        {
            names.push((activity.name.clone(), activity.abbreviation.clone()));
        }
    }

    for (name, abbreviation) in names {
        let required = engine.teachers[teacher].reinforcement_hours(&name);
        let held = engine.held_named(teacher, SlotKind::Reinforcement, &name);
        let placed = fill(engine, teacher, &name, &abbreviation, required.saturating_sub(held));
        if held + placed < required {
            let issue = Issue::new(
                IssueKind::ActivityShortfall,
                format!("placed {} of {} activity hours", held + placed, required),
            )
            .with_teacher(&engine.teachers[teacher].name)
            .with_subject(&name)
            .with_hours(held + placed, required);
            engine.record(issue);
        }
    }
}

fn fill_contract(engine: &mut Engine, teacher: usize) {
    let spare = engine.spare_hours(teacher);
    if spare == 0 {
        return;
    }
    if let Some(name) = engine.config.general_support_activity.clone() {
        fill(engine, teacher, &name, &None, spare);
    }

    let contracted = engine.teachers[teacher].contracted_weekly_hours;
    let load = engine.ledger.teacher_load(teacher);
    if load < contracted {
        let issue = Issue::new(
            IssueKind::UnderloadedTeacher,
            format!("assigned {} of {} contracted hours", load, contracted),
        )
        .with_teacher(&engine.teachers[teacher].name)
        .with_hours(load, contracted);
        engine.record(issue);
    }
}

/// Places up to `hours` duty blocks. Returns how many were placed.
fn fill(
    engine: &mut Engine,
    teacher: usize,
    name: &str,
    abbreviation: &Option<String>,
    hours: u32,
) -> u32 {
    let mut placed = 0;
    for day in Day::ALL {
        for block in duty_order(engine, teacher) {
            if placed == hours || engine.spare_hours(teacher) == 0 {
                return placed;
            }
            if engine.teacher_grids[teacher].is_free(day, block) {
                engine.place_duty(day, block, teacher, name, abbreviation.clone());
                placed += 1;
            }
        }
    }
    placed
}

/// Avoided blocks, then neutral blocks, then preferred blocks. Each part is
/// ascending.
fn duty_order(engine: &Engine, teacher: usize) -> Vec<Block> {
    let profile = &engine.teachers[teacher];
    let day = engine.layout.all();
    let (avoided, rest): (Vec<Block>, Vec<Block>) =
        day.blocks().partition(|&b| profile.avoids(b));
    let (preferred, neutral): (Vec<Block>, Vec<Block>) = rest
        .into_iter()
        .partition(|b| profile.preferred_blocks.contains(b));
    avoided.into_iter().chain(neutral).chain(preferred).collect()
}

#[cfg(test)]
mod tests {
    use crate::models::{Day, EngineConfig, IssueKind, Teacher};
    use crate::scheduler::Engine;

    fn config() -> EngineConfig {
        EngineConfig::new(8, 7).with_shift_boundary(8)
    }

    #[test]
    fn test_activity_bounded_by_contract() {
        let mut engine = Engine::new(
            config(),
            vec![],
            vec![],
            vec![Teacher::new("Ana", 3).with_reinforcement("Advising", 5)],
        )
        .unwrap();
        let report = engine.run().unwrap();

        let ana = report.teacher("Ana").unwrap();
        assert_eq!(ana.stats.hours_assigned, 3);
        let shortfall: Vec<_> = report.issues_of(IssueKind::ActivityShortfall).collect();
        assert_eq!(shortfall.len(), 1);
        assert_eq!(shortfall[0].missing(), 2);
    }

    #[test]
    fn test_duties_spill_into_next_day() {
        let mut engine = Engine::new(
            config(),
            vec![],
            vec![],
            vec![Teacher::new("Ana", 16).with_reinforcement("Advising", 16)],
        )
        .unwrap();
        let report = engine.run().unwrap();

        let stats = &report.teacher("Ana").unwrap();
        assert_eq!(stats.grid.occupied_on(Day::Monday), 14);
        assert_eq!(stats.grid.occupied_on(Day::Tuesday), 2);
        assert!(report.is_complete());
    }

    #[test]
    fn test_duties_leave_preferred_blocks_for_last() {
        let mut engine = Engine::new(
            EngineConfig::new(2, 2)
                .with_morning_end(2)
                .with_afternoon_start(3),
            vec![],
            vec![],
            vec![Teacher::new("Ana", 3)
                .with_reinforcement("Advising", 3)
                .with_avoided_blocks(&[4])
                .with_preferred_blocks(&[1, 2])],
        )
        .unwrap();
        let report = engine.run().unwrap();

        let ana = report.teacher("Ana").unwrap();
        let monday: Vec<u32> = ana
            .grid
            .occupied()
            .filter(|(d, _, _)| *d == Day::Monday)
            .map(|(_, b, _)| b)
            .collect();
        assert_eq!(monday, vec![1, 3, 4]);
    }

    #[test]
    fn test_tutoring_hours_are_not_filled_as_duties() {
        let mut engine = Engine::new(
            config(),
            vec![],
            vec![],
            vec![Teacher::new("Ana", 2).with_reinforcement("Tutoring", 2)],
        )
        .unwrap();
        let report = engine.run().unwrap();

        assert_eq!(report.teacher("Ana").unwrap().stats.hours_assigned, 0);
        assert_eq!(report.issues_of(IssueKind::UnderloadedTeacher).count(), 1);
    }
}
