//! Extracurricular assigner.
//!
//! Works per cohort (morning groups sharing a semester). Each requirement
//! gets one block per day on distinct days, searched from the last morning
//! block backward, at a block where the teacher and every cohort member are
//! free. The teacher cell carries the cohort label; projection fans it out
//! to the members.

use tracing::debug;

use crate::models::{Block, Cohort, Day, Issue, IssueKind, SlotKind, SubjectCategory};
use crate::scheduler::engine::{CohortEntry, Engine};
use crate::scheduler::search::{first_window, SearchMode};

/// Blocks a cohort needs for one activity.
#[derive(Debug, Clone, Copy)]
struct Requirement {
    /// Extracurricular subject, or `None` for the implicit weekly activity.
    subject: Option<usize>,
    hours: u32,
}

pub(super) fn assign(engine: &mut Engine) {
    for cohort in Cohort::all(&engine.groups) {
        let members = cohort.members(&engine.groups);
        for requirement in requirements(engine, cohort) {
            place_requirement(engine, cohort, &members, requirement);
        }
    }
}

/// Extracurricular subjects for the cohort's semester. Without any, an
/// implicit requirement applies as long as some teacher offers an activity.
fn requirements(engine: &Engine, cohort: Cohort) -> Vec<Requirement> {
    let explicit: Vec<Requirement> = engine
        .subjects
        .iter()
        .enumerate()
        .filter(|(_, s)| {
            s.category == SubjectCategory::Extracurricular && s.applies_to_semester(cohort.semester)
        })
        .map(|(i, s)| Requirement {
            subject: Some(i),
            hours: s.weekly_hours,
        })
        .collect();
    if !explicit.is_empty() {
        return explicit;
    }

    let offered = engine.teachers.iter().any(|t| t.extracurricular_hours() > 0);
    if offered && engine.config.extracurricular_weekly_hours > 0 {
        vec![Requirement {
            subject: None,
            hours: engine.config.extracurricular_weekly_hours,
        }]
    } else {
        Vec::new()
    }
}

fn place_requirement(
    engine: &mut Engine,
    cohort: Cohort,
    members: &[usize],
    requirement: Requirement,
) {
    let mut placed = 0;
    // Subject-backed requirements keep a single teacher per cohort.
    let mut owner = requirement
        .subject
        .and_then(|s| members.first().and_then(|&g| engine.ledger.owner(s, g)));

    for day in Day::ALL {
        if placed == requirement.hours {
            break;
        }
        let candidates: Vec<usize> = match owner {
            Some(t) => vec![t],
            None => (0..engine.teachers.len()).collect(),
        };
        for teacher in candidates {
            if residual_hours(engine, teacher) == 0 || engine.spare_hours(teacher) == 0 {
                continue;
            }
            let Some(block) = cohort_block(engine, day, teacher, members) else {
                continue;
            };
            let entry = entry_for(engine, requirement, teacher);
            engine.reserve_cohort(day, block, teacher, cohort, &entry);
            placed += 1;
            if requirement.subject.is_some() {
                owner = Some(teacher);
            }
            break;
        }
    }

    if placed < requirement.hours {
        let name = requirement
            .subject
            .map(|s| engine.subjects[s].id.clone())
            .unwrap_or_else(|| "extracurricular".to_string());
        let mut issue = Issue::new(
            IssueKind::ExtracurricularShortfall,
            format!(
                "{} received {} of {} blocks",
                cohort.label(),
                placed,
                requirement.hours
            ),
        )
        .with_subject(name)
        .with_group(cohort.label())
        .with_hours(placed, requirement.hours);
        if let Some(t) = owner {
            issue = issue.with_teacher(&engine.teachers[t].name);
        }
        engine.record(issue);
    }
}

/// Extracurricular hours a teacher has not used yet.
fn residual_hours(engine: &Engine, teacher: usize) -> u32 {
    engine.teachers[teacher]
        .extracurricular_hours()
        .saturating_sub(engine.held(teacher, SlotKind::Extracurricular))
}

/// Latest morning block where the teacher and all members are free. In
/// gapless mode the block must also extend every member's occupied run.
fn cohort_block(engine: &Engine, day: Day, teacher: usize, members: &[usize]) -> Option<Block> {
    let morning = engine.layout.morning();
    let grid = &engine.teacher_grids[teacher];
    let profile = &engine.teachers[teacher];
    let gapless = engine.search_mode() == SearchMode::Gapless;
    let window = first_window(morning.blocks().rev(), 1, morning, |b| {
        grid.is_free(day, b)
            && !profile.avoids(b)
            && members.iter().all(|&g| {
                engine.ledger.is_group_free(g, day, b)
                    && (!gapless || extends_run(engine, g, day, b))
            })
    });
    if window.is_none() {
        debug!(teacher = %profile.name, ?day, "no common morning block for cohort");
    }
    window.map(|w| w.first)
}

fn extends_run(engine: &Engine, group: usize, day: Day, block: Block) -> bool {
    match engine.ledger.group_span(group, day, engine.layout.morning()) {
        Some(span) => block + 1 == span.first || block == span.last + 1,
        None => true,
    }
}

fn entry_for(engine: &Engine, requirement: Requirement, teacher: usize) -> CohortEntry {
    if let Some(s) = requirement.subject {
        let subject = &engine.subjects[s];
        return CohortEntry {
            subject: Some(s),
            name: subject.name.clone(),
            abbreviation: subject.abbreviation.clone(),
        };
    }
    match engine.teachers[teacher]
        .extracurricular_activities
        .iter()
        .find(|a| a.hours > 0)
    {
        Some(activity) => CohortEntry {
            subject: None,
            name: activity.name.clone(),
            abbreviation: activity.abbreviation.clone(),
        },
        None => CohortEntry {
            subject: None,
            name: "Extracurricular".to_string(),
            abbreviation: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use crate::models::{Day, EngineConfig, Group, IssueKind, SlotKind, Subject, Teacher};
    use crate::scheduler::Engine;

    fn config() -> EngineConfig {
        EngineConfig::new(8, 7).with_shift_boundary(8)
    }

    #[test]
    fn test_implicit_requirement_uses_activity_name() {
        let mut engine = Engine::new(
            config(),
            vec![],
            vec![Group::morning("301A", 3), Group::afternoon("301V", 3)],
            vec![Teacher::new("Rosa", 3).with_extracurricular("Chess", 3)],
        )
        .unwrap();
        let report = engine.run().unwrap();

        let morning = &report.group("301A").unwrap().grid;
        assert_eq!(morning.occupied_count(), 3);
        let (_, block, slot) = morning.occupied().next().unwrap();
        assert_eq!(block, 8);
        assert_eq!(slot.subject_name.as_deref(), Some("Chess"));
        assert_eq!(slot.kind, SlotKind::Extracurricular);

        // Afternoon groups are not part of any cohort.
        assert_eq!(report.group("301V").unwrap().grid.occupied_count(), 0);
    }

    #[test]
    fn test_avoided_block_moves_reservation_earlier() {
        let mut engine = Engine::new(
            config(),
            vec![Subject::extracurricular("ART", 2).with_semester(1)],
            vec![Group::morning("101A", 1)],
            vec![Teacher::new("Rosa", 2)
                .with_extracurricular("Art", 2)
                .with_avoided_blocks(&[8])],
        )
        .unwrap();
        let report = engine.run().unwrap();

        let rosa = &report.teacher("Rosa").unwrap().grid;
        let cells: Vec<_> = rosa.occupied().map(|(d, b, _)| (d, b)).collect();
        assert_eq!(cells, vec![(Day::Monday, 7), (Day::Tuesday, 7)]);
    }

    #[test]
    fn test_missing_teacher_hours_is_a_shortfall() {
        let mut engine = Engine::new(
            config(),
            vec![Subject::extracurricular("SPORT", 3).with_semester(1)],
            vec![Group::morning("101A", 1)],
            vec![Teacher::new("Rosa", 10).with_extracurricular("Sports", 2)],
        )
        .unwrap();
        let report = engine.run().unwrap();

        let issues: Vec<_> = report
            .issues_of(IssueKind::ExtracurricularShortfall)
            .collect();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].placed, 2);
        assert_eq!(issues[0].group.as_deref(), Some("Semester 1"));
    }

    #[test]
    fn test_cohorts_get_separate_blocks_from_one_teacher() {
        let mut engine = Engine::new(
            config(),
            vec![Subject::extracurricular("SPORT", 1)],
            vec![Group::morning("101A", 1), Group::morning("301A", 3)],
            vec![Teacher::new("Rosa", 2).with_extracurricular("Sports", 2)],
        )
        .unwrap();
        let report = engine.run().unwrap();

        let rosa = &report.teacher("Rosa").unwrap().grid;
        let labels: Vec<_> = rosa
            .occupied()
            .map(|(d, b, s)| (d, b, s.peer_name.clone().unwrap_or_default()))
            .collect();
        assert_eq!(
            labels,
            vec![
                (Day::Monday, 7, "Semester 3".to_string()),
                (Day::Monday, 8, "Semester 1".to_string()),
            ]
        );
        assert!(report.coherence.is_clean(), "{:?}", report.coherence);
    }
}
