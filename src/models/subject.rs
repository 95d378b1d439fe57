//! Subject model.
//!
//! A subject carries its weekly hour requirement and a category that
//! selects the placement policy and the per-day hour cap.

use serde::{Deserialize, Serialize};

/// Subject category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectCategory {
    /// Career-specific module taught in long blocks.
    #[serde(alias = "ProfessionalModule", alias = "modulo_profesional")]
    ProfessionalModule,
    /// General curriculum subject spread across the week.
    #[serde(alias = "CommonCore", alias = "tronco_comun")]
    CommonCore,
    /// Activity shared by a whole semester cohort.
    #[serde(alias = "Extracurricular")]
    Extracurricular,
}

/// A subject to be taught.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    /// Unique subject identifier.
    pub id: String,
    /// Display name written into timetable cells.
    #[serde(alias = "nombre")]
    pub name: String,
    /// Short name.
    #[serde(default, alias = "abreviatura")]
    pub abbreviation: Option<String>,
    /// Placement category.
    #[serde(alias = "tipo")]
    pub category: SubjectCategory,
    /// Required blocks per week for each group.
    #[serde(alias = "weeklyHours", alias = "horas_semanales")]
    pub weekly_hours: u32,
    /// Semester the subject belongs to. `None` = every semester.
    #[serde(default, alias = "semestre")]
    pub semester: Option<u32>,
    /// Career the subject belongs to (professional modules only).
    #[serde(default, alias = "carrera", alias = "specialty")]
    pub career: Option<String>,
    /// Chunk sizes for professional modules, placed in order.
    #[serde(default, alias = "recommendedBlockSizes")]
    pub recommended_block_sizes: Vec<u32>,
}

impl Subject {
    /// Creates a new subject. The name defaults to the id.
    pub fn new(id: impl Into<String>, category: SubjectCategory, weekly_hours: u32) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            abbreviation: None,
            category,
            weekly_hours,
            semester: None,
            career: None,
            recommended_block_sizes: Vec::new(),
        }
    }

    /// Creates a professional module.
    pub fn professional(id: impl Into<String>, weekly_hours: u32) -> Self {
        Self::new(id, SubjectCategory::ProfessionalModule, weekly_hours)
    }

    /// Creates a common-core subject.
    pub fn common_core(id: impl Into<String>, weekly_hours: u32) -> Self {
        Self::new(id, SubjectCategory::CommonCore, weekly_hours)
    }

    /// Creates an extracurricular subject.
    pub fn extracurricular(id: impl Into<String>, weekly_hours: u32) -> Self {
        Self::new(id, SubjectCategory::Extracurricular, weekly_hours)
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the abbreviation.
    pub fn with_abbreviation(mut self, abbreviation: impl Into<String>) -> Self {
        self.abbreviation = Some(abbreviation.into());
        self
    }

    /// Restricts the subject to a semester.
    pub fn with_semester(mut self, semester: u32) -> Self {
        self.semester = Some(semester);
        self
    }

    /// Sets the career.
    pub fn with_career(mut self, career: impl Into<String>) -> Self {
        self.career = Some(career.into());
        self
    }

    /// Sets the recommended chunk sizes.
    pub fn with_block_sizes(mut self, sizes: Vec<u32>) -> Self {
        self.recommended_block_sizes = sizes;
        self
    }

    /// Maximum blocks of this subject a group may receive in one day.
    pub fn max_hours_per_day(&self) -> u32 {
        match self.category {
            SubjectCategory::ProfessionalModule => 5,
            SubjectCategory::Extracurricular => 1,
            SubjectCategory::CommonCore if self.weekly_hours <= 2 => 1,
            SubjectCategory::CommonCore => 2,
        }
    }

    /// Whether the subject may be taught to a group in `semester`.
    #[inline]
    pub fn applies_to_semester(&self, semester: u32) -> bool {
        self.semester.map_or(true, |s| s == semester)
    }

    /// Ordered chunk sizes summing to `weekly_hours`.
    ///
    /// Walks `recommended_block_sizes`, clamping each to the hours still
    /// missing, then continues with chunks of 4 once the list runs out. A
    /// 17-hour subject takes a chunk of 5 whenever exactly 5 hours remain, so
    /// the usual plan ends `[.., 4, 5]` rather than `[.., 4, 1]`.
    pub fn block_plan(&self) -> Vec<u32> {
        let mut sizes = self
            .recommended_block_sizes
            .iter()
            .copied()
            .filter(|&size| size > 0);
        let mut plan = Vec::new();
        let mut remaining = self.weekly_hours;
        while remaining > 0 {
            let chunk = if self.weekly_hours == 17 && remaining == 5 {
                5
            } else {
                sizes.next().unwrap_or(DEFAULT_CHUNK).min(remaining)
            };
            plan.push(chunk);
            remaining -= chunk;
        }
        plan
    }
}

const DEFAULT_CHUNK: u32 = 4;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_builder() {
        let s = Subject::common_core("MAT1", 4)
            .with_name("Math")
            .with_abbreviation("MAT")
            .with_semester(1);

        assert_eq!(s.id, "MAT1");
        assert_eq!(s.name, "Math");
        assert_eq!(s.abbreviation.as_deref(), Some("MAT"));
        assert_eq!(s.category, SubjectCategory::CommonCore);
        assert!(s.applies_to_semester(1));
        assert!(!s.applies_to_semester(2));
    }

    #[test]
    fn test_semester_free_subject_applies_everywhere() {
        let s = Subject::extracurricular("SPORT", 3);
        assert!(s.applies_to_semester(1));
        assert!(s.applies_to_semester(6));
    }

    #[test]
    fn test_max_hours_per_day() {
        assert_eq!(Subject::professional("PM", 17).max_hours_per_day(), 5);
        assert_eq!(Subject::extracurricular("X", 3).max_hours_per_day(), 1);
        assert_eq!(Subject::common_core("A", 2).max_hours_per_day(), 1);
        assert_eq!(Subject::common_core("B", 1).max_hours_per_day(), 1);
        assert_eq!(Subject::common_core("C", 3).max_hours_per_day(), 2);
        assert_eq!(Subject::common_core("D", 5).max_hours_per_day(), 2);
    }

    #[test]
    fn test_block_plan_recommended() {
        let s = Subject::professional("PM", 17).with_block_sizes(vec![4, 4, 4, 5]);
        assert_eq!(s.block_plan(), vec![4, 4, 4, 5]);
    }

    #[test]
    fn test_block_plan_default() {
        assert_eq!(Subject::professional("A", 17).block_plan(), vec![4, 4, 4, 5]);
        assert_eq!(Subject::professional("B", 12).block_plan(), vec![4, 4, 4]);
        assert_eq!(Subject::professional("C", 10).block_plan(), vec![4, 4, 2]);
    }

    #[test]
    fn test_block_plan_seventeen_ends_with_five() {
        let s = Subject::professional("PM", 17).with_block_sizes(vec![4, 4, 4, 4]);
        assert_eq!(s.block_plan(), vec![4, 4, 4, 5]);

        let s = Subject::professional("PM", 17).with_block_sizes(vec![6, 6]);
        assert_eq!(s.block_plan(), vec![6, 6, 5]);
    }

    #[test]
    fn test_block_plan_clamped_to_weekly_hours() {
        let s = Subject::professional("PM", 6).with_block_sizes(vec![4, 4, 4]);
        assert_eq!(s.block_plan(), vec![4, 2]);
    }

    #[test]
    fn test_block_plan_topped_up() {
        let s = Subject::professional("PM", 10).with_block_sizes(vec![5, 0]);
        assert_eq!(s.block_plan(), vec![5, 4, 1]);
    }

    #[test]
    fn test_category_aliases() {
        let s: Subject = serde_json::from_str(
            r#"{"id": "M1", "nombre": "Modulo I", "tipo": "modulo_profesional", "horas_semanales": 17}"#,
        )
        .unwrap();
        assert_eq!(s.category, SubjectCategory::ProfessionalModule);
        assert_eq!(s.weekly_hours, 17);
        assert!(s.recommended_block_sizes.is_empty());
    }
}
