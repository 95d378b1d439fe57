//! Category assigners.
//!
//! One handler per stage, dispatched by [`run_stage`]. Per-tuple stages
//! (professional module, common core) share the eligibility check in
//! [`remaining_hours`] and the shortfall report in [`report_shortfall`].
//!
//! All assigners are first-fit greedy: an increment that cannot be placed
//! is reported and the assigner moves on. Nothing is retried across stages.

mod common_core;
mod extracurricular;
mod professional;
mod reinforcement;
mod tutoring;

use crate::models::{Issue, IssueKind, SubjectCategory};

use super::engine::{Engine, Tuple};

/// Assignment stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Cohort-wide blocks anchored at the end of the morning.
    Extracurricular,
    ProfessionalModule,
    CommonCore,
    Tutoring,
    /// Teacher-only duties and leftover contracted hours.
    Reinforcement,
}

impl Stage {
    pub const ORDER: [Stage; 5] = [
        Stage::Extracurricular,
        Stage::ProfessionalModule,
        Stage::CommonCore,
        Stage::Tutoring,
        Stage::Reinforcement,
    ];

    /// Subject category scheduled per tuple by this stage.
    fn category(self) -> Option<SubjectCategory> {
        match self {
            Stage::ProfessionalModule => Some(SubjectCategory::ProfessionalModule),
            Stage::CommonCore => Some(SubjectCategory::CommonCore),
            _ => None,
        }
    }
}

/// Runs one stage to completion.
pub fn run_stage(engine: &mut Engine, stage: Stage) {
    match stage {
        Stage::Extracurricular => extracurricular::assign(engine),
        Stage::Tutoring => tutoring::assign(engine),
        Stage::Reinforcement => reinforcement::assign(engine),
        Stage::ProfessionalModule | Stage::CommonCore => {
            let tuples: Vec<Tuple> = engine
                .tuples
                .iter()
                .copied()
                .filter(|t| Some(engine.subjects[t.subject].category) == stage.category())
                .collect();
            for tuple in tuples {
                match stage {
                    Stage::ProfessionalModule => professional::assign(engine, tuple),
                    _ => common_core::assign(engine, tuple),
                }
            }
        }
    }
}

/// Hours still to place for a tuple, or `None` when it is ineligible or
/// already complete. Ineligible tuples are reported.
pub(crate) fn remaining_hours(engine: &mut Engine, tuple: Tuple) -> Option<u32> {
    let subject = &engine.subjects[tuple.subject];
    let group = &engine.groups[tuple.group];
    let teacher = &engine.teachers[tuple.teacher];

    let problem = if !subject.applies_to_semester(group.semester) {
        Some((
            IssueKind::SemesterMismatch,
            format!(
                "subject is for semester {} but group is in semester {}",
                subject.semester.unwrap_or_default(),
                group.semester
            ),
        ))
    } else if subject.category == SubjectCategory::ProfessionalModule
        && (differs(&teacher.specialty, &group.career) || differs(&subject.career, &group.career))
    {
        Some((
            IssueKind::SpecialtyMismatch,
            format!(
                "career '{}' does not match the module",
                group.career.as_deref().unwrap_or("-")
            ),
        ))
    } else {
        match engine.ledger.owner(tuple.subject, tuple.group) {
            Some(owner) if owner != tuple.teacher => Some((
                IssueKind::OwnedByOtherTeacher,
                format!("already taught by {}", engine.teachers[owner].name),
            )),
            _ => None,
        }
    };

    if let Some((kind, message)) = problem {
        let issue = Issue::new(kind, message)
            .with_teacher(&teacher.name)
            .with_subject(&subject.id)
            .with_group(&group.nomenclature)
            .with_hours(
                engine.ledger.weekly_count(tuple.subject, tuple.group),
                subject.weekly_hours,
            );
        engine.record(issue);
        return None;
    }

    let remaining = subject
        .weekly_hours
        .saturating_sub(engine.ledger.weekly_count(tuple.subject, tuple.group));
    (remaining > 0).then_some(remaining)
}

/// Reports a tuple that ended below its weekly hours.
pub(crate) fn report_shortfall(engine: &mut Engine, tuple: Tuple) {
    let subject = &engine.subjects[tuple.subject];
    let placed = engine.ledger.weekly_count(tuple.subject, tuple.group);
    if placed >= subject.weekly_hours {
        return;
    }
    let issue = Issue::new(
        IssueKind::Shortfall,
        format!("placed {} of {} weekly hours", placed, subject.weekly_hours),
    )
    .with_teacher(&engine.teachers[tuple.teacher].name)
    .with_subject(&subject.id)
    .with_group(&engine.groups[tuple.group].nomenclature)
    .with_hours(placed, subject.weekly_hours);
    engine.record(issue);
}

/// Both sides set and different.
fn differs(a: &Option<String>, b: &Option<String>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a != b)
}
