//! Timetable statistics.
//!
//! Per-group and per-teacher figures attached to the output documents,
//! per-(subject, group) placed/required summaries, and run-wide indicators.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Holes | Free blocks inside a group day's occupied span |
//! | Hours per day | Occupied group blocks per weekday |
//! | Percent complete | Assigned / contracted teacher hours, one decimal |
//! | Coverage | Placed / required curriculum hours over all pairs |
//! | Short days | Group days with 1 to 3 blocks |

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::info;

use crate::models::{
    Day, Grid, GroupStats, GroupTimetable, SubjectCategory, SubjectSummary, Teacher, TeacherStats,
    TeacherTimetable,
};

use super::{Engine, RunReport};

/// Group days with fewer blocks than this (but at least one) are short.
const SHORT_DAY_BLOCKS: u32 = 4;

/// Statistics of one group grid.
pub fn group_stats(grid: &Grid) -> GroupStats {
    let hours_per_day: BTreeMap<Day, u32> = Day::ALL
        .iter()
        .map(|&day| (day, grid.occupied_on(day)))
        .collect();
    let total_hours: u32 = hours_per_day.values().sum();
    let active_days = hours_per_day.values().filter(|&&h| h > 0).count();
    let average_per_active_day = if active_days == 0 {
        0.0
    } else {
        total_hours as f64 / active_days as f64
    };

    GroupStats {
        holes: grid.holes(),
        total_hours,
        hours_per_day,
        average_per_active_day,
    }
}

/// Statistics of one teacher grid.
pub fn teacher_stats(teacher: &Teacher, grid: &Grid) -> TeacherStats {
    let hours_assigned = grid.occupied_count();
    let hours_required = teacher.contracted_weekly_hours;
    let percent_complete = if hours_required == 0 {
        0.0
    } else {
        (hours_assigned as f64 / hours_required as f64 * 1000.0).round() / 10.0
    };
    TeacherStats {
        hours_assigned,
        hours_required,
        percent_complete,
    }
}

pub fn group_timetables(engine: &Engine) -> Vec<GroupTimetable> {
    engine
        .groups
        .iter()
        .zip(&engine.group_grids)
        .map(|(group, grid)| GroupTimetable {
            nomenclature: group.nomenclature.clone(),
            semester: group.semester,
            shift: group.shift,
            career: group.career.clone(),
            grid: grid.clone(),
            stats: group_stats(grid),
        })
        .collect()
}

pub fn teacher_timetables(engine: &Engine) -> Vec<TeacherTimetable> {
    engine
        .teachers
        .iter()
        .zip(&engine.teacher_grids)
        .map(|(teacher, grid)| TeacherTimetable {
            name: teacher.name.clone(),
            grid: grid.clone(),
            stats: teacher_stats(teacher, grid),
        })
        .collect()
}

/// Placed versus required hours for every scheduled (subject, group) pair:
/// the resolved class tuples plus any extracurricular pair that received
/// blocks. Ordered by subject then group input order.
pub fn subject_summaries(engine: &Engine) -> Vec<SubjectSummary> {
    let mut pairs: BTreeSet<(usize, usize)> = engine
        .tuples
        .iter()
        .filter(|t| engine.subjects[t.subject].category != SubjectCategory::Extracurricular)
        .filter(|t| engine.subjects[t.subject].applies_to_semester(engine.groups[t.group].semester))
        .map(|t| (t.subject, t.group))
        .collect();
    pairs.extend(engine.ledger.pairs().map(|(s, g, _)| (s, g)));

    pairs
        .into_iter()
        .map(|(s, g)| {
            let subject = &engine.subjects[s];
            SubjectSummary {
                subject_id: subject.id.clone(),
                subject_name: subject.name.clone(),
                group: engine.groups[g].nomenclature.clone(),
                teacher: engine
                    .ledger
                    .owner(s, g)
                    .map(|t| engine.teachers[t].name.clone()),
                placed: engine.ledger.weekly_count(s, g),
                required: subject.weekly_hours,
            }
        })
        .collect()
}

/// Run-wide indicators.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunKpi {
    pub hours_placed: u32,
    pub hours_required: u32,
    /// Placed / required curriculum hours (1.0 when nothing is required).
    pub coverage: f64,
    /// Mean teacher percent complete.
    pub avg_teacher_load: f64,
    pub holes: u32,
    /// (group, day) pairs with 1 to 3 blocks.
    pub short_days: Vec<(String, Day)>,
}

impl RunKpi {
    /// Computes indicators from a finished report.
    pub fn calculate(report: &RunReport) -> Self {
        let hours_placed: u32 = report.subjects.iter().map(|s| s.placed).sum();
        let hours_required: u32 = report.subjects.iter().map(|s| s.required).sum();
        let coverage = if hours_required == 0 {
            1.0
        } else {
            hours_placed as f64 / hours_required as f64
        };

        let contracted: Vec<f64> = report
            .teachers
            .iter()
            .filter(|t| t.stats.hours_required > 0)
            .map(|t| t.stats.percent_complete)
            .collect();
        let avg_teacher_load = if contracted.is_empty() {
            0.0
        } else {
            contracted.iter().sum::<f64>() / contracted.len() as f64
        };

        let short_days = report
            .groups
            .iter()
            .flat_map(|g| {
                g.stats
                    .hours_per_day
                    .iter()
                    .filter(|(_, h)| **h > 0 && **h < SHORT_DAY_BLOCKS)
                    .map(move |(&day, _)| (g.nomenclature.clone(), day))
            })
            .collect();

        Self {
            hours_placed,
            hours_required,
            coverage,
            avg_teacher_load,
            holes: report.coherence.holes,
            short_days,
        }
    }

    /// Whether the run meets the given quality thresholds.
    pub fn meets_thresholds(&self, min_coverage: f64, max_holes: u32) -> bool {
        self.coverage >= min_coverage && self.holes <= max_holes
    }
}

/// Logs run-wide figures and short group days.
pub fn log_summary(report: &RunReport) {
    let kpi = RunKpi::calculate(report);
    for (group, day) in &kpi.short_days {
        info!(
            group = %group,
            ?day,
            "fewer than {} blocks on this day",
            SHORT_DAY_BLOCKS
        );
    }
    info!(
        placed = kpi.hours_placed,
        required = kpi.hours_required,
        coverage = %format!("{:.1}%", kpi.coverage * 100.0),
        teacher_load = %format!("{:.1}%", kpi.avg_teacher_load),
        holes = kpi.holes,
        issues = report.issues.len(),
        violations = report.coherence.violations.len(),
        "run finished"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BlockRange, CoherenceReport, Slot, SlotKind};

    fn grid_with(cells: &[(Day, u32)]) -> Grid {
        let mut grid = Grid::new(BlockRange::new(1, 8));
        for &(day, block) in cells {
            grid.set(day, block, Slot::occupied(SlotKind::Class, "A"));
        }
        grid
    }

    #[test]
    fn test_group_stats() {
        let grid = grid_with(&[
            (Day::Monday, 1),
            (Day::Monday, 2),
            (Day::Monday, 4),
            (Day::Wednesday, 3),
        ]);
        let stats = group_stats(&grid);
        assert_eq!(stats.total_hours, 4);
        assert_eq!(stats.holes, 1);
        assert_eq!(stats.hours_per_day[&Day::Monday], 3);
        assert_eq!(stats.hours_per_day[&Day::Tuesday], 0);
        assert_eq!(stats.hours_per_day.len(), 5);
        assert!((stats.average_per_active_day - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_group_stats_empty() {
        let stats = group_stats(&grid_with(&[]));
        assert_eq!(stats.total_hours, 0);
        assert!((stats.average_per_active_day - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_teacher_percent_rounding() {
        let grid = grid_with(&[(Day::Monday, 1), (Day::Monday, 2)]);
        let stats = teacher_stats(&Teacher::new("Ana", 3), &grid);
        assert_eq!(stats.hours_assigned, 2);
        assert_eq!(stats.hours_required, 3);
        assert!((stats.percent_complete - 66.7).abs() < 1e-10);

        let idle = teacher_stats(&Teacher::new("Bea", 0), &grid);
        assert!((idle.percent_complete - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_run_kpi() {
        let grid = grid_with(&[(Day::Monday, 1), (Day::Monday, 2)]);
        let report = RunReport {
            groups: vec![GroupTimetable {
                nomenclature: "101A".into(),
                semester: 1,
                shift: crate::models::Shift::Morning,
                career: None,
                stats: group_stats(&grid),
                grid: grid.clone(),
            }],
            teachers: vec![TeacherTimetable {
                name: "Ana".into(),
                stats: teacher_stats(&Teacher::new("Ana", 4), &grid),
                grid,
            }],
            subjects: vec![SubjectSummary {
                subject_id: "MAT1".into(),
                subject_name: "Math".into(),
                group: "101A".into(),
                teacher: Some("Ana".into()),
                placed: 2,
                required: 4,
            }],
            issues: Vec::new(),
            coherence: CoherenceReport::default(),
            validation: Vec::new(),
        };

        let kpi = RunKpi::calculate(&report);
        assert_eq!(kpi.hours_placed, 2);
        assert!((kpi.coverage - 0.5).abs() < 1e-10);
        assert!((kpi.avg_teacher_load - 50.0).abs() < 1e-10);
        assert_eq!(kpi.short_days, vec![("101A".to_string(), Day::Monday)]);
        assert!(kpi.meets_thresholds(0.5, 0));
        assert!(!kpi.meets_thresholds(0.9, 0));
    }
}
