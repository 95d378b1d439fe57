//! Teacher model.
//!
//! Teachers are the resources classes are assigned to. Each teacher has a
//! contracted weekly load, the subjects they can teach (with the groups
//! they should teach them to), non-teaching activities, and block
//! preferences.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::Block;

/// A named non-teaching activity with a weekly hour allowance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(alias = "nombre")]
    pub name: String,
    #[serde(alias = "horas")]
    pub hours: u32,
    #[serde(default, alias = "abreviatura")]
    pub abbreviation: Option<String>,
}

impl Activity {
    pub fn new(name: impl Into<String>, hours: u32) -> Self {
        Self {
            name: name.into(),
            hours,
            abbreviation: None,
        }
    }
}

/// A subject a teacher can teach and the groups it should go to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeachableSubject {
    /// Referenced subject id. `None` when the source record lost it.
    #[serde(default, alias = "subjectId", alias = "id", alias = "materia")]
    pub subject_id: Option<String>,
    /// Groups (by nomenclature) this teacher should teach the subject to.
    #[serde(
        default,
        alias = "preferredGroupIds",
        alias = "grupos_preferidos_asignar"
    )]
    pub preferred_group_ids: Vec<String>,
}

impl TeachableSubject {
    pub fn new(subject_id: impl Into<String>, groups: Vec<String>) -> Self {
        Self {
            subject_id: Some(subject_id.into()),
            preferred_group_ids: groups,
        }
    }
}

/// A teacher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Teacher {
    /// Unique teacher name.
    #[serde(alias = "nombre")]
    pub name: String,
    /// Short name.
    #[serde(default, alias = "abreviatura")]
    pub abbreviation: Option<String>,
    /// Weekly blocks the teacher is contracted for.
    #[serde(
        default,
        alias = "contractedWeeklyHours",
        alias = "horas_semanales_totales"
    )]
    pub contracted_weekly_hours: u32,
    /// Teachable subjects.
    #[serde(default, alias = "materias")]
    pub subjects: Vec<TeachableSubject>,
    /// Career the teacher specialises in.
    #[serde(default, alias = "especialidad")]
    pub specialty: Option<String>,
    /// Academic reinforcement duties (tutoring among them).
    #[serde(
        default,
        alias = "reinforcementActivities",
        alias = "horas_fortalecimiento_academico"
    )]
    pub reinforcement_activities: Vec<Activity>,
    /// Extracurricular activities the teacher can lead.
    #[serde(
        default,
        alias = "extracurricularActivities",
        alias = "horas_extracurriculares"
    )]
    pub extracurricular_activities: Vec<Activity>,
    /// Blocks the teacher prefers to teach in.
    #[serde(default, alias = "preferredBlocks")]
    pub preferred_blocks: BTreeSet<Block>,
    /// Blocks unsuitable for teaching (non-teaching duties are fine).
    #[serde(
        default,
        alias = "avoidedBlocks",
        alias = "bloques_recomendados_no_asignar"
    )]
    pub avoided_blocks: BTreeSet<Block>,
}

impl Teacher {
    /// Creates a new teacher.
    pub fn new(name: impl Into<String>, contracted_weekly_hours: u32) -> Self {
        Self {
            name: name.into(),
            abbreviation: None,
            contracted_weekly_hours,
            subjects: Vec::new(),
            specialty: None,
            reinforcement_activities: Vec::new(),
            extracurricular_activities: Vec::new(),
            preferred_blocks: BTreeSet::new(),
            avoided_blocks: BTreeSet::new(),
        }
    }

    /// Adds a teachable subject for the given groups.
    pub fn with_subject(mut self, subject_id: impl Into<String>, groups: &[&str]) -> Self {
        self.subjects.push(TeachableSubject::new(
            subject_id,
            groups.iter().map(|g| g.to_string()).collect(),
        ));
        self
    }

    /// Sets the specialty.
    pub fn with_specialty(mut self, specialty: impl Into<String>) -> Self {
        self.specialty = Some(specialty.into());
        self
    }

    /// Adds a reinforcement activity.
    pub fn with_reinforcement(mut self, name: impl Into<String>, hours: u32) -> Self {
        self.reinforcement_activities.push(Activity::new(name, hours));
        self
    }

    /// Adds an extracurricular activity.
    pub fn with_extracurricular(mut self, name: impl Into<String>, hours: u32) -> Self {
        self.extracurricular_activities
            .push(Activity::new(name, hours));
        self
    }

    /// Marks blocks as unsuitable for teaching.
    pub fn with_avoided_blocks(mut self, blocks: &[Block]) -> Self {
        self.avoided_blocks.extend(blocks.iter().copied());
        self
    }

    /// Marks blocks as preferred.
    pub fn with_preferred_blocks(mut self, blocks: &[Block]) -> Self {
        self.preferred_blocks.extend(blocks.iter().copied());
        self
    }

    /// Whether the teacher should not teach in `block`.
    #[inline]
    pub fn avoids(&self, block: Block) -> bool {
        self.avoided_blocks.contains(&block)
    }

    /// Weekly hours of the named reinforcement activity (0 if absent).
    pub fn reinforcement_hours(&self, name: &str) -> u32 {
        self.reinforcement_activities
            .iter()
            .filter(|a| a.name == name)
            .map(|a| a.hours)
            .sum()
    }

    /// Total weekly extracurricular hours.
    pub fn extracurricular_hours(&self) -> u32 {
        self.extracurricular_activities.iter().map(|a| a.hours).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_teacher_builder() {
        let t = Teacher::new("Ana", 30)
            .with_subject("MAT1", &["101A", "101B"])
            .with_specialty("Programming")
            .with_reinforcement("Tutoring", 2)
            .with_reinforcement("Advising", 3)
            .with_extracurricular("Chess", 3)
            .with_avoided_blocks(&[1, 14])
            .with_preferred_blocks(&[3]);

        assert_eq!(t.name, "Ana");
        assert_eq!(t.contracted_weekly_hours, 30);
        assert_eq!(t.subjects.len(), 1);
        assert_eq!(t.subjects[0].subject_id.as_deref(), Some("MAT1"));
        assert_eq!(t.subjects[0].preferred_group_ids, vec!["101A", "101B"]);
        assert!(t.avoids(1));
        assert!(!t.avoids(2));
        assert!(t.preferred_blocks.contains(&3));
        assert_eq!(t.reinforcement_hours("Tutoring"), 2);
        assert_eq!(t.reinforcement_hours("Unknown"), 0);
        assert_eq!(t.extracurricular_hours(), 3);
    }

    #[test]
    fn test_teacher_legacy_document() {
        let json = r#"{
            "nombre": "Luis",
            "horas_semanales_totales": 20,
            "materias": [{"id": "M1", "grupos_preferidos_asignar": ["101A"]}, {}],
            "horas_fortalecimiento_academico": [{"nombre": "Tutoring", "horas": 1}],
            "bloques_recomendados_no_asignar": [7, 8]
        }"#;
        let t: Teacher = serde_json::from_str(json).unwrap();
        assert_eq!(t.contracted_weekly_hours, 20);
        assert_eq!(t.subjects[0].subject_id.as_deref(), Some("M1"));
        assert!(t.subjects[1].subject_id.is_none());
        assert!(t.avoids(8));
        assert!(t.extracurricular_activities.is_empty());
    }
}
