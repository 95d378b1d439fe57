//! Projection of teacher grids into group grids.
//!
//! Group grids are rebuilt from scratch on every projection. Class and
//! tutoring cells go to the named group; extracurricular cells fan out to
//! every member of the cohort they are labelled with. Teacher-only duties
//! have no group side. A cell outside the target group's shift is skipped
//! and reported.

use tracing::warn;

use crate::models::{Block, Cohort, Day, Issue, IssueKind, Slot, SlotKind};

use super::Engine;

/// What a projection pass did.
#[derive(Debug, Clone, Default)]
pub struct ProjectionOutcome {
    /// Group cells written.
    pub written: u32,
    /// Teacher cells that could not be mirrored.
    pub skipped: Vec<Issue>,
}

/// Rebuilds every group grid from the teacher grids.
pub fn project(engine: &mut Engine) -> ProjectionOutcome {
    let mut writes: Vec<(usize, Day, Block, Slot)> = Vec::new();
    let mut outcome = ProjectionOutcome::default();

    for (t, teacher) in engine.teachers.iter().enumerate() {
        for (day, block, slot) in engine.teacher_grids[t].occupied() {
            let mirrored = Slot {
                peer_name: Some(teacher.name.clone()),
                ..slot.clone()
            };
            match slot.kind {
                SlotKind::Extracurricular => {
                    let Some(semester) = slot.semester else {
                        continue;
                    };
                    for member in Cohort::new(semester).members(&engine.groups) {
                        writes.push((member, day, block, mirrored.clone()));
                    }
                }
                SlotKind::Class | SlotKind::Tutoring => {
                    let target = slot
                        .peer_name
                        .as_deref()
                        .and_then(|name| engine.group_position(name).ok());
                    match target {
                        Some(g) => writes.push((g, day, block, mirrored)),
                        None => outcome.skipped.push(
                            Issue::new(IssueKind::ProjectionSkipped, "cell names no known group")
                                .with_teacher(&teacher.name)
                                .with_subject(slot.subject_name.clone().unwrap_or_default()),
                        ),
                    }
                }
                SlotKind::Reinforcement | SlotKind::Free => {}
            }
        }
    }

    for grid in &mut engine.group_grids {
        grid.clear();
    }
    for (g, day, block, slot) in writes {
        let teacher = slot.peer_name.clone().unwrap_or_default();
        let subject = slot.subject_name.clone().unwrap_or_default();
        if engine.group_grids[g].set(day, block, slot) {
            outcome.written += 1;
        } else {
            let group = &engine.groups[g];
            warn!(
                group = %group.nomenclature,
                teacher = %teacher,
                ?day,
                block,
                "cell outside the group's shift"
            );
            outcome.skipped.push(
                Issue::new(
                    IssueKind::ProjectionSkipped,
                    format!("{day:?} block {block} is outside the {:?} shift", group.shift),
                )
                .with_teacher(teacher)
                .with_subject(subject)
                .with_group(&group.nomenclature),
            );
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BlockRange, EngineConfig, Group, Subject, Teacher};
    use crate::scheduler::engine::CohortEntry;
    use crate::scheduler::rules::SlotRequest;

    fn engine() -> Engine {
        Engine::new(
            EngineConfig::new(8, 7).with_shift_boundary(8),
            vec![Subject::common_core("MAT1", 4)
                .with_name("Math")
                .with_semester(1)],
            vec![
                Group::morning("101A", 1),
                Group::morning("101B", 1),
                Group::afternoon("101V", 1),
            ],
            vec![Teacher::new("Ana", 20)],
        )
        .unwrap()
    }

    #[test]
    fn test_class_mirrors_into_its_group() {
        let mut e = engine();
        e.place(
            Day::Monday,
            BlockRange::new(1, 2),
            SlotRequest::new(0, 0, Some(0)),
        );
        let outcome = project(&mut e);

        assert_eq!(outcome.written, 2);
        assert!(outcome.skipped.is_empty());
        let slot = e.group_grid("101A").unwrap().get(Day::Monday, 1).unwrap();
        assert_eq!(slot.subject_name.as_deref(), Some("Math"));
        assert_eq!(slot.peer_name.as_deref(), Some("Ana"));
        assert_eq!(e.group_grid("101B").unwrap().occupied_count(), 0);
    }

    #[test]
    fn test_cohort_cell_fans_out() {
        let mut e = engine();
        let entry = CohortEntry {
            subject: None,
            name: "Chess".into(),
            abbreviation: None,
        };
        e.reserve_cohort(Day::Friday, 8, 0, Cohort::new(1), &entry);
        let outcome = project(&mut e);

        assert_eq!(outcome.written, 2);
        for name in ["101A", "101B"] {
            let slot = e.group_grid(name).unwrap().get(Day::Friday, 8).unwrap();
            assert_eq!(slot.subject_name.as_deref(), Some("Chess"));
            assert_eq!(slot.kind, SlotKind::Extracurricular);
        }
        assert_eq!(e.group_grid("101V").unwrap().occupied_count(), 0);
    }

    #[test]
    fn test_out_of_shift_cell_is_skipped() {
        let mut e = engine();
        // Bypass the checker to simulate a corrupted teacher cell.
        let slot = Slot::occupied(SlotKind::Class, "Math").with_peer("101V");
        e.teacher_grids[0].set(Day::Monday, 2, slot);
        let outcome = project(&mut e);

        assert_eq!(outcome.written, 0);
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].group.as_deref(), Some("101V"));
    }

    #[test]
    fn test_duties_are_not_projected() {
        let mut e = engine();
        e.place_duty(Day::Monday, 3, 0, "Advising", None);
        let outcome = project(&mut e);
        assert_eq!(outcome.written, 0);
        assert!(outcome.skipped.is_empty());
    }
}
