//! Run outcome models: issues, coherence violations, and the per-group /
//! per-teacher result documents handed to exporters.
//!
//! Output documents serialize with camelCase field names so any exporter
//! written against the historic JSON files keeps working.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{Day, Grid, Shift};

/// Error class of an [`Issue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueCategory {
    /// A referenced subject or group does not exist.
    Reference,
    /// Required hours could not be placed.
    Unsatisfied,
    /// A teacher cell could not be mirrored into a group grid.
    Projection,
}

/// Kind of non-fatal problem met during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueKind {
    UnknownSubject,
    UnknownGroup,
    /// Subject semester differs from the group's.
    SemesterMismatch,
    /// Professional module career differs from the group's career.
    SpecialtyMismatch,
    /// Another teacher already owns the (subject, group) pair.
    OwnedByOtherTeacher,
    /// A (subject, group) pair received fewer hours than required.
    Shortfall,
    /// A cohort received fewer extracurricular blocks than required.
    ExtracurricularShortfall,
    /// No teacher with spare tutoring hours could be found for a group.
    NoTutor,
    /// A tutor was found but no block fit.
    TutoringUnplaced,
    /// A teacher-only activity did not fit.
    ActivityShortfall,
    /// A teacher ended below the contracted load.
    UnderloadedTeacher,
    /// A teacher cell fell outside its group's shift.
    ProjectionSkipped,
}

impl IssueKind {
    pub fn category(self) -> IssueCategory {
        match self {
            IssueKind::UnknownSubject | IssueKind::UnknownGroup => IssueCategory::Reference,
            IssueKind::ProjectionSkipped => IssueCategory::Projection,
            _ => IssueCategory::Unsatisfied,
        }
    }
}

/// A non-fatal problem recorded during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub kind: IssueKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Hours placed (for shortfalls).
    pub placed: u32,
    /// Hours required (for shortfalls).
    pub required: u32,
    pub message: String,
}

impl Issue {
    pub fn new(kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            teacher: None,
            subject: None,
            group: None,
            placed: 0,
            required: 0,
            message: message.into(),
        }
    }

    pub fn with_teacher(mut self, teacher: impl Into<String>) -> Self {
        self.teacher = Some(teacher.into());
        self
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Records placed / required hours.
    pub fn with_hours(mut self, placed: u32, required: u32) -> Self {
        self.placed = placed;
        self.required = required;
        self
    }

    /// Hours still missing.
    pub fn missing(&self) -> u32 {
        self.required.saturating_sub(self.placed)
    }
}

/// Classification of coherence and invariant violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationKind {
    /// Teacher cell has no counterpart in the group grid.
    MissingInGroupGrid,
    /// Group cell disagrees on subject or teacher.
    MismatchedGroupCell,
    /// Group cell has no matching teacher cell.
    OrphanGroupCell,
    /// Cohort member lacks the extracurricular block.
    CohortFanOutMissing,
    /// Teacher cell points to a block outside the group's shift.
    OutsideShift,
    DailyCapExceeded,
    WeeklyHoursExceeded,
    /// More than one teacher teaches a (subject, group) pair.
    SplitOwnership,
    /// Teacher holds more blocks than contracted.
    ContractExceeded,
}

/// A coherence or invariant violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub kind: ViolationKind,
    /// Teacher or group the violation was found on.
    pub entity: String,
    pub message: String,
}

impl Violation {
    pub fn new(kind: ViolationKind, entity: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            entity: entity.into(),
            message: message.into(),
        }
    }
}

/// Result of cross-checking the two views.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoherenceReport {
    pub violations: Vec<Violation>,
    /// Interior holes across every group day.
    pub holes: u32,
}

impl CoherenceReport {
    /// Whether the views agree, every invariant holds, and no holes exist.
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty() && self.holes == 0
    }

    /// Violations of a given kind.
    pub fn count(&self, kind: ViolationKind) -> usize {
        self.violations.iter().filter(|v| v.kind == kind).count()
    }
}

/// Per-group statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupStats {
    pub holes: u32,
    pub total_hours: u32,
    pub hours_per_day: BTreeMap<Day, u32>,
    /// Mean hours over days with at least one block.
    pub average_per_active_day: f64,
}

/// A group's timetable with statistics.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupTimetable {
    pub nomenclature: String,
    pub semester: u32,
    pub shift: Shift,
    pub career: Option<String>,
    pub grid: Grid,
    pub stats: GroupStats,
}

/// Per-teacher statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherStats {
    pub hours_assigned: u32,
    pub hours_required: u32,
    /// Share of contracted hours assigned, one decimal (0 when none contracted).
    pub percent_complete: f64,
}

/// A teacher's timetable with statistics.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherTimetable {
    pub name: String,
    pub grid: Grid,
    pub stats: TeacherStats,
}

/// Placed versus required hours for one (subject, group) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectSummary {
    pub subject_id: String,
    pub subject_name: String,
    pub group: String,
    pub teacher: Option<String>,
    pub placed: u32,
    pub required: u32,
}
