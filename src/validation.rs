//! Input validation for timetabling runs.
//!
//! Checks structural integrity of subjects, groups, teachers, and the block
//! configuration before scheduling. Detects:
//! - Invalid shift boundaries
//! - Duplicate IDs
//! - Subjects without weekly hours
//! - Dangling subject and group references
//! - Block preferences outside the day
//!
//! Only layout errors stop a run. Everything else is reported and the
//! affected tuples are skipped when the engine resolves them.

use crate::models::{BlockLayout, EngineConfig, Group, Subject, Teacher};
use serde::Serialize;
use std::collections::HashSet;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ValidationErrorKind {
    /// Shift boundaries cannot form a layout.
    InvalidLayout,
    /// Two entities share the same ID.
    DuplicateId,
    /// A subject requires zero weekly hours.
    InvalidHours,
    /// A teachable subject entry carries no subject id.
    MissingSubjectReference,
    /// A teacher references a subject that doesn't exist.
    InvalidSubjectReference,
    /// A teacher references a group that doesn't exist.
    InvalidGroupReference,
    /// A preferred or avoided block lies outside the day.
    InvalidBlock,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Whether this error prevents a run.
    pub fn is_fatal(&self) -> bool {
        self.kind == ValidationErrorKind::InvalidLayout
    }
}

/// Validates the input data for a timetabling run.
///
/// Checks:
/// 1. The configuration yields a block layout
/// 2. No duplicate subject IDs, group nomenclatures, or teacher names
/// 3. Every subject requires at least one weekly hour
/// 4. Every teachable subject names an existing subject
/// 5. Every preferred group exists
/// 6. Preferred / avoided blocks fall inside the day
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(
    subjects: &[Subject],
    groups: &[Group],
    teachers: &[Teacher],
    config: &EngineConfig,
) -> ValidationResult {
    let mut errors = Vec::new();

    let layout = match BlockLayout::from_config(config) {
        Ok(layout) => Some(layout),
        Err(e) => {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidLayout,
                e.to_string(),
            ));
            None
        }
    };

    let mut subject_ids = HashSet::new();
    for s in subjects {
        if !subject_ids.insert(s.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate subject ID: {}", s.id),
            ));
        }
        if s.weekly_hours == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidHours,
                format!("Subject '{}' requires no weekly hours", s.id),
            ));
        }
    }

    let mut group_ids = HashSet::new();
    for g in groups {
        if !group_ids.insert(g.nomenclature.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate group ID: {}", g.nomenclature),
            ));
        }
    }

    let mut teacher_names = HashSet::new();
    for t in teachers {
        if !teacher_names.insert(t.name.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate teacher name: {}", t.name),
            ));
        }

        for teachable in &t.subjects {
            match teachable.subject_id.as_deref() {
                None => errors.push(ValidationError::new(
                    ValidationErrorKind::MissingSubjectReference,
                    format!("Teacher '{}' lists a subject without an id", t.name),
                )),
                Some(id) if !subject_ids.contains(id) => errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidSubjectReference,
                    format!("Teacher '{}' references unknown subject '{}'", t.name, id),
                )),
                Some(_) => {}
            }

            for group in &teachable.preferred_group_ids {
                if !group_ids.contains(group.as_str()) {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::InvalidGroupReference,
                        format!("Teacher '{}' references unknown group '{}'", t.name, group),
                    ));
                }
            }
        }

        if let Some(layout) = layout {
            let day = layout.all();
            for &block in t.avoided_blocks.iter().chain(t.preferred_blocks.iter()) {
                if !day.contains(block) {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::InvalidBlock,
                        format!(
                            "Teacher '{}' lists block {} outside 1..={}",
                            t.name, block, layout.total_blocks
                        ),
                    ));
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TeachableSubject;

    fn config() -> EngineConfig {
        EngineConfig::new(8, 7).with_shift_boundary(8)
    }

    fn sample_subjects() -> Vec<Subject> {
        vec![
            Subject::common_core("MAT1", 4).with_semester(1),
            Subject::professional("PM1", 17).with_semester(1),
        ]
    }

    fn sample_groups() -> Vec<Group> {
        vec![Group::morning("101A", 1), Group::afternoon("101V", 1)]
    }

    fn sample_teachers() -> Vec<Teacher> {
        vec![
            Teacher::new("Ana", 30).with_subject("MAT1", &["101A", "101V"]),
            Teacher::new("Luis", 30)
                .with_subject("PM1", &["101A"])
                .with_avoided_blocks(&[1, 14]),
        ]
    }

    #[test]
    fn test_valid_input() {
        assert!(validate_input(
            &sample_subjects(),
            &sample_groups(),
            &sample_teachers(),
            &config()
        )
        .is_ok());
    }

    #[test]
    fn test_invalid_layout_is_fatal() {
        let errors = validate_input(
            &sample_subjects(),
            &sample_groups(),
            &sample_teachers(),
            &EngineConfig::new(0, 7),
        )
        .unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InvalidLayout && e.is_fatal()));
    }

    #[test]
    fn test_duplicate_ids() {
        let subjects = vec![Subject::common_core("A", 2), Subject::common_core("A", 3)];
        let groups = vec![Group::morning("101A", 1), Group::morning("101A", 2)];
        let teachers = vec![Teacher::new("Ana", 10), Teacher::new("Ana", 12)];

        let errors = validate_input(&subjects, &groups, &teachers, &config()).unwrap_err();
        let duplicates: Vec<_> = errors
            .iter()
            .filter(|e| e.kind == ValidationErrorKind::DuplicateId)
            .collect();
        assert_eq!(duplicates.len(), 3);
        assert!(duplicates.iter().all(|e| !e.is_fatal()));
    }

    #[test]
    fn test_zero_hours_subject() {
        let subjects = vec![Subject::common_core("A", 0)];
        let errors = validate_input(&subjects, &[], &[], &config()).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InvalidHours));
    }

    #[test]
    fn test_dangling_references() {
        let mut teacher = Teacher::new("Ana", 20)
            .with_subject("NOPE", &["101A"])
            .with_subject("MAT1", &["999Z"]);
        teacher.subjects.push(TeachableSubject {
            subject_id: None,
            preferred_group_ids: Vec::new(),
        });

        let errors =
            validate_input(&sample_subjects(), &sample_groups(), &[teacher], &config())
                .unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InvalidSubjectReference));
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InvalidGroupReference));
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::MissingSubjectReference));
    }

    #[test]
    fn test_block_outside_day() {
        let teacher = Teacher::new("Ana", 20).with_avoided_blocks(&[15]);
        let errors = validate_input(&[], &[], &[teacher], &config()).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InvalidBlock));
    }

    #[test]
    fn test_multiple_errors() {
        let subjects = vec![Subject::common_core("A", 0)];
        let teachers = vec![Teacher::new("Ana", 20).with_subject("B", &["X"])];
        let errors = validate_input(&subjects, &[], &teachers, &config()).unwrap_err();
        assert!(errors.len() >= 3);
    }
}
