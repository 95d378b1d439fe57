//! Coherence validation and invariant audit.
//!
//! Cross-checks the two views after projection and re-derives the grid
//! invariants from the final grids. Read-only: violations are reported,
//! nothing is rolled back.
//!
//! # Checks
//!
//! | Check | Violation |
//! |-------|-----------|
//! | teacher cell has a matching group cell | `MissingInGroupGrid`, `MismatchedGroupCell`, `OutsideShift` |
//! | cohort cell reaches every member | `CohortFanOutMissing` |
//! | group cell has a matching teacher cell | `OrphanGroupCell` |
//! | per-day cap per (subject, group) | `DailyCapExceeded` |
//! | weekly hours per (subject, group) | `WeeklyHoursExceeded` |
//! | one teacher per (subject, group) | `SplitOwnership` |
//! | contracted hours per teacher | `ContractExceeded` |

use std::collections::{BTreeMap, BTreeSet};

use crate::models::{CoherenceReport, Cohort, Day, Slot, SlotKind, Violation, ViolationKind};

use super::Engine;

/// Runs every check and counts holes.
pub fn validate(engine: &Engine) -> CoherenceReport {
    let mut violations = Vec::new();
    check_teacher_side(engine, &mut violations);
    check_group_side(engine, &mut violations);
    audit_subject_pairs(engine, &mut violations);
    audit_contracts(engine, &mut violations);

    let holes = engine.group_grids.iter().map(|g| g.holes()).sum();
    CoherenceReport { violations, holes }
}

fn same_subject(a: &Slot, b: &Slot) -> bool {
    a.subject_name == b.subject_name && a.subject_id == b.subject_id
}

fn check_teacher_side(engine: &Engine, violations: &mut Vec<Violation>) {
    for (t, teacher) in engine.teachers.iter().enumerate() {
        for (day, block, slot) in engine.teacher_grids[t].occupied() {
            let subject = slot.subject_name.as_deref().unwrap_or_default();
            match slot.kind {
                SlotKind::Class | SlotKind::Tutoring => {
                    let peer = slot.peer_name.as_deref().unwrap_or_default();
                    let Ok(g) = engine.group_position(peer) else {
                        violations.push(Violation::new(
                            ViolationKind::MissingInGroupGrid,
                            &teacher.name,
                            format!("{day:?} block {block}: '{subject}' names unknown group '{peer}'"),
                        ));
                        continue;
                    };
                    let group = &engine.groups[g];
                    if !engine.layout.is_valid_for(group.shift, block) {
                        violations.push(Violation::new(
                            ViolationKind::OutsideShift,
                            &teacher.name,
                            format!("{day:?} block {block} is outside the shift of {peer}"),
                        ));
                        continue;
                    }
                    match engine.group_grids[g].get(day, block) {
                        Some(cell) if cell.is_free() => violations.push(Violation::new(
                            ViolationKind::MissingInGroupGrid,
                            &teacher.name,
                            format!("{day:?} block {block}: '{subject}' missing for {peer}"),
                        )),
                        Some(cell)
                            if !same_subject(cell, slot)
                                || cell.peer_name.as_deref() != Some(teacher.name.as_str()) =>
                        {
                            violations.push(Violation::new(
                                ViolationKind::MismatchedGroupCell,
                                &teacher.name,
                                format!("{day:?} block {block}: {peer} does not show '{subject}'"),
                            ))
                        }
                        _ => {}
                    }
                }
                SlotKind::Extracurricular => {
                    let Some(semester) = slot.semester else {
                        continue;
                    };
                    for g in Cohort::new(semester).members(&engine.groups) {
                        let matches = engine.group_grids[g].get(day, block).is_some_and(|cell| {
                            same_subject(cell, slot)
                                && cell.peer_name.as_deref() == Some(teacher.name.as_str())
                        });
                        if !matches {
                            violations.push(Violation::new(
                                ViolationKind::CohortFanOutMissing,
                                &engine.groups[g].nomenclature,
                                format!("{day:?} block {block}: '{subject}' missing"),
                            ));
                        }
                    }
                }
                SlotKind::Reinforcement | SlotKind::Free => {}
            }
        }
    }
}

fn check_group_side(engine: &Engine, violations: &mut Vec<Violation>) {
    for (g, group) in engine.groups.iter().enumerate() {
        for (day, block, cell) in engine.group_grids[g].occupied() {
            if cell.kind == SlotKind::Extracurricular {
                continue;
            }
            let matched = cell
                .peer_name
                .as_deref()
                .and_then(|name| engine.teacher_position(name).ok())
                .and_then(|t| engine.teacher_grids[t].get(day, block))
                .is_some_and(|slot| {
                    same_subject(slot, cell)
                        && slot.peer_name.as_deref() == Some(group.nomenclature.as_str())
                });
            if !matched {
                violations.push(Violation::new(
                    ViolationKind::OrphanGroupCell,
                    &group.nomenclature,
                    format!(
                        "{day:?} block {block}: '{}' has no teacher cell",
                        cell.subject_name.as_deref().unwrap_or_default()
                    ),
                ));
            }
        }
    }
}

/// Daily cap, weekly hours and single ownership, per (subject, group).
fn audit_subject_pairs(engine: &Engine, violations: &mut Vec<Violation>) {
    for (g, group) in engine.groups.iter().enumerate() {
        let mut daily: BTreeMap<(&str, Day), u32> = BTreeMap::new();
        let mut weekly: BTreeMap<&str, u32> = BTreeMap::new();
        let mut teachers: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();

        for (day, _, cell) in engine.group_grids[g].occupied() {
            let Some(id) = cell.subject_id.as_deref() else {
                continue;
            };
            *daily.entry((id, day)).or_insert(0) += 1;
            *weekly.entry(id).or_insert(0) += 1;
            if let Some(name) = cell.peer_name.as_deref() {
                teachers.entry(id).or_default().insert(name);
            }
        }

        for ((id, day), count) in daily {
            let Ok(subject) = engine.resolve_subject(Some(id)) else {
                continue;
            };
            if count > subject.max_hours_per_day() {
                violations.push(Violation::new(
                    ViolationKind::DailyCapExceeded,
                    &group.nomenclature,
                    format!(
                        "{id} has {count} blocks on {day:?}, cap is {}",
                        subject.max_hours_per_day()
                    ),
                ));
            }
        }
        for (id, count) in weekly {
            let Ok(subject) = engine.resolve_subject(Some(id)) else {
                continue;
            };
            if count > subject.weekly_hours {
                violations.push(Violation::new(
                    ViolationKind::WeeklyHoursExceeded,
                    &group.nomenclature,
                    format!("{id} has {count} blocks, requires {}", subject.weekly_hours),
                ));
            }
        }
        for (id, names) in teachers {
            if names.len() > 1 {
                violations.push(Violation::new(
                    ViolationKind::SplitOwnership,
                    &group.nomenclature,
                    format!(
                        "{id} is taught by {}",
                        names.into_iter().collect::<Vec<_>>().join(", ")
                    ),
                ));
            }
        }
    }
}

fn audit_contracts(engine: &Engine, violations: &mut Vec<Violation>) {
    for (t, teacher) in engine.teachers.iter().enumerate() {
        let held = engine.teacher_grids[t].occupied_count();
        if held > teacher.contracted_weekly_hours {
            violations.push(Violation::new(
                ViolationKind::ContractExceeded,
                &teacher.name,
                format!(
                    "holds {held} blocks, contracted for {}",
                    teacher.contracted_weekly_hours
                ),
            ));
        }
    }
}
