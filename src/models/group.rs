//! Student group model.
//!
//! A group is the unit that receives classes. Morning groups sharing a
//! semester form a cohort, which is scheduled as one unit for
//! extracurricular activities.

use serde::{Deserialize, Serialize};

/// Shift a group attends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shift {
    #[serde(alias = "morning", alias = "Matutino")]
    Morning,
    #[serde(alias = "afternoon", alias = "Vespertino")]
    Afternoon,
}

/// A student group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    /// Unique group identifier (e.g. "101A").
    #[serde(alias = "nomenclatura")]
    pub nomenclature: String,
    /// Semester the group is in.
    #[serde(alias = "semestre")]
    pub semester: u32,
    /// Attended shift.
    #[serde(alias = "turno")]
    pub shift: Shift,
    /// Career / specialty, relevant to professional modules.
    #[serde(default, alias = "carrera", alias = "specialty")]
    pub career: Option<String>,
}

impl Group {
    /// Creates a new group.
    pub fn new(nomenclature: impl Into<String>, semester: u32, shift: Shift) -> Self {
        Self {
            nomenclature: nomenclature.into(),
            semester,
            shift,
            career: None,
        }
    }

    /// Creates a morning group.
    pub fn morning(nomenclature: impl Into<String>, semester: u32) -> Self {
        Self::new(nomenclature, semester, Shift::Morning)
    }

    /// Creates an afternoon group.
    pub fn afternoon(nomenclature: impl Into<String>, semester: u32) -> Self {
        Self::new(nomenclature, semester, Shift::Afternoon)
    }

    /// Sets the career.
    pub fn with_career(mut self, career: impl Into<String>) -> Self {
        self.career = Some(career.into());
        self
    }

    /// Whether this group belongs to `cohort`.
    pub fn in_cohort(&self, cohort: Cohort) -> bool {
        self.shift == Shift::Morning && self.semester == cohort.semester
    }
}

/// Morning groups sharing a semester.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cohort {
    pub semester: u32,
}

impl Cohort {
    pub fn new(semester: u32) -> Self {
        Self { semester }
    }

    /// Label written as the peer of a cohort-wide teacher cell.
    pub fn label(&self) -> String {
        format!("Semester {}", self.semester)
    }

    /// Distinct cohorts present in `groups`, ascending by semester.
    pub fn all(groups: &[Group]) -> Vec<Cohort> {
        let mut semesters: Vec<u32> = groups
            .iter()
            .filter(|g| g.shift == Shift::Morning)
            .map(|g| g.semester)
            .collect();
        semesters.sort_unstable();
        semesters.dedup();
        semesters.into_iter().map(Cohort::new).collect()
    }

    /// Indices of the member groups in `groups`.
    pub fn members(&self, groups: &[Group]) -> Vec<usize> {
        groups
            .iter()
            .enumerate()
            .filter(|(_, g)| g.in_cohort(*self))
            .map(|(i, _)| i)
            .collect()
    }
}
