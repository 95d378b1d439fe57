//! Timetabling engine.
//!
//! # Pipeline
//!
//! 1. Validate input and build the block layout (layout errors are fatal)
//! 2. Resolve (teacher, subject, group) tuples, skipping bad references
//! 3. Run the assigners: extracurricular, professional module, common core,
//!    tutoring, reinforcement
//! 4. Project teacher grids into group grids
//! 5. Compact (verify or swap, per configuration)
//! 6. Cross-check both views and audit invariants
//! 7. Compute statistics
//!
//! The engine owns every grid for the duration of a run. Assigners write
//! teacher grids and the occupancy ledger only; group grids are derived by
//! projection.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{ScheduleError, ScheduleResult};
use crate::models::{
    new_group_grid, new_teacher_grid, Block, BlockLayout, BlockRange, CoherenceReport, Cohort,
    CompactionStrategy, Day, EngineConfig, Grid, Group, GroupTimetable, Issue, IssueKind, Slot,
    SlotKind, Subject, SubjectSummary, Teacher, TeacherTimetable,
};
use crate::validation::{validate_input, ValidationError};

use super::assign::{self, Stage};
use super::ledger::{Ledger, Occupant};
use super::rules::SlotRequest;
use super::search::SearchMode;
use super::{coherence, compaction, projection, stats};

/// A resolved (teacher, subject, group) teaching assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tuple {
    pub teacher: usize,
    pub subject: usize,
    pub group: usize,
}

/// Label written into the cells of a cohort-wide reservation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CohortEntry {
    pub subject: Option<usize>,
    pub name: String,
    pub abbreviation: Option<String>,
}

/// Everything a run produces.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub groups: Vec<GroupTimetable>,
    pub teachers: Vec<TeacherTimetable>,
    pub subjects: Vec<SubjectSummary>,
    pub issues: Vec<Issue>,
    pub coherence: CoherenceReport,
    pub validation: Vec<ValidationError>,
}

impl RunReport {
    /// No issues and a clean coherence report.
    pub fn is_complete(&self) -> bool {
        self.issues.is_empty() && self.coherence.is_clean()
    }

    /// Timetable of a group.
    pub fn group(&self, nomenclature: &str) -> Option<&GroupTimetable> {
        self.groups.iter().find(|g| g.nomenclature == nomenclature)
    }

    /// Timetable of a teacher.
    pub fn teacher(&self, name: &str) -> Option<&TeacherTimetable> {
        self.teachers.iter().find(|t| t.name == name)
    }

    /// Issues of one kind.
    pub fn issues_of(&self, kind: IssueKind) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(move |i| i.kind == kind)
    }
}

/// The timetabling engine.
///
/// # Example
///
/// ```
/// use horario::models::{EngineConfig, Group, Subject, Teacher};
/// use horario::scheduler::Engine;
///
/// let config = EngineConfig::new(8, 7).with_shift_boundary(8);
/// let subjects = vec![Subject::common_core("MAT1", 4).with_semester(1)];
/// let groups = vec![Group::morning("101A", 1)];
/// let teachers = vec![Teacher::new("Ana", 4).with_subject("MAT1", &["101A"])];
///
/// let mut engine = Engine::new(config, subjects, groups, teachers).unwrap();
/// let report = engine.run().unwrap();
/// assert_eq!(report.group("101A").unwrap().stats.total_hours, 4);
/// ```
#[derive(Debug, Clone)]
pub struct Engine {
    pub(crate) config: EngineConfig,
    pub(crate) layout: BlockLayout,
    pub(crate) subjects: Vec<Subject>,
    pub(crate) groups: Vec<Group>,
    pub(crate) teachers: Vec<Teacher>,
    subject_index: HashMap<String, usize>,
    group_index: HashMap<String, usize>,
    teacher_index: HashMap<String, usize>,
    pub(crate) teacher_grids: Vec<Grid>,
    pub(crate) group_grids: Vec<Grid>,
    pub(crate) ledger: Ledger,
    pub(crate) issues: Vec<Issue>,
    pub(crate) tuples: Vec<Tuple>,
    validation: Vec<ValidationError>,
}

impl Engine {
    /// Validates the input and allocates empty grids.
    ///
    /// Fails only on an invalid block layout. Other validation problems are
    /// kept for the report; duplicate entities are dropped in favour of the
    /// first occurrence.
    pub fn new(
        config: EngineConfig,
        subjects: Vec<Subject>,
        groups: Vec<Group>,
        teachers: Vec<Teacher>,
    ) -> ScheduleResult<Self> {
        let validation = match validate_input(&subjects, &groups, &teachers, &config) {
            Ok(()) => Vec::new(),
            Err(errors) => errors,
        };
        if let Some(fatal) = validation.iter().find(|e| e.is_fatal()) {
            return Err(ScheduleError::Config(fatal.message.clone()));
        }
        for error in &validation {
            warn!(kind = ?error.kind, "{}", error.message);
        }
        let layout = BlockLayout::from_config(&config)?;

        let subjects = first_of_each(subjects, |s| s.id.clone());
        let groups = first_of_each(groups, |g| g.nomenclature.clone());
        let teachers = first_of_each(teachers, |t| t.name.clone());

        let subject_index = index_by(&subjects, |s| s.id.clone());
        let group_index = index_by(&groups, |g| g.nomenclature.clone());
        let teacher_index = index_by(&teachers, |t| t.name.clone());

        let mut engine = Self {
            config,
            layout,
            subjects,
            groups,
            teachers,
            subject_index,
            group_index,
            teacher_index,
            teacher_grids: Vec::new(),
            group_grids: Vec::new(),
            ledger: Ledger::default(),
            issues: Vec::new(),
            tuples: Vec::new(),
            validation,
        };
        engine.reset();
        Ok(engine)
    }

    /// Allocates fresh grids and an empty ledger.
    fn reset(&mut self) {
        self.teacher_grids = self
            .teachers
            .iter()
            .map(|_| new_teacher_grid(&self.layout))
            .collect();
        self.group_grids = self
            .groups
            .iter()
            .map(|g| new_group_grid(&self.layout, g))
            .collect();
        self.ledger = Ledger::new(self.teachers.len());
        self.issues.clear();
        self.tuples.clear();
    }

    /// Runs every stage and returns the report.
    ///
    /// Running again starts from empty grids and yields the same result.
    pub fn run(&mut self) -> ScheduleResult<RunReport> {
        self.reset();
        info!(
            subjects = self.subjects.len(),
            groups = self.groups.len(),
            teachers = self.teachers.len(),
            blocks = self.layout.total_blocks,
            "starting run"
        );

        self.tuples = self.resolve_tuples();
        for stage in Stage::ORDER {
            let before = self.issues.len();
            assign::run_stage(self, stage);
            info!(
                stage = ?stage,
                issues = self.issues.len() - before,
                "stage finished"
            );
        }

        let strategy = self.config.compaction;
        let mut projected = projection::project(self);
        let compacted = compaction::compact(self, strategy);
        if compacted.moved > 0 {
            projected = projection::project(self);
        }
        self.issues.extend(projected.skipped);
        info!(
            cells = projected.written,
            moved = compacted.moved,
            holes = compacted.holes,
            "projection finished"
        );

        let coherence = coherence::validate(self);
        for violation in &coherence.violations {
            warn!(
                kind = ?violation.kind,
                entity = %violation.entity,
                "{}",
                violation.message
            );
        }

        let report = RunReport {
            groups: stats::group_timetables(self),
            teachers: stats::teacher_timetables(self),
            subjects: stats::subject_summaries(self),
            issues: self.issues.clone(),
            coherence,
            validation: self.validation.clone(),
        };
        stats::log_summary(&report);
        Ok(report)
    }

    // --- lookups ---

    /// Resolves an optional subject reference.
    pub fn resolve_subject(&self, id: Option<&str>) -> ScheduleResult<&Subject> {
        self.subject_position(id).map(|i| &self.subjects[i])
    }

    /// Resolves a group by nomenclature.
    pub fn resolve_group(&self, nomenclature: &str) -> ScheduleResult<&Group> {
        self.group_position(nomenclature).map(|i| &self.groups[i])
    }

    /// Resolves a teacher by name.
    pub fn resolve_teacher(&self, name: &str) -> ScheduleResult<&Teacher> {
        self.teacher_position(name).map(|i| &self.teachers[i])
    }

    pub(crate) fn subject_position(&self, id: Option<&str>) -> ScheduleResult<usize> {
        let id = id.ok_or_else(|| ScheduleError::UnknownSubject("<missing id>".into()))?;
        self.subject_index
            .get(id)
            .copied()
            .ok_or_else(|| ScheduleError::UnknownSubject(id.to_string()))
    }

    pub(crate) fn group_position(&self, nomenclature: &str) -> ScheduleResult<usize> {
        self.group_index
            .get(nomenclature)
            .copied()
            .ok_or_else(|| ScheduleError::UnknownGroup(nomenclature.to_string()))
    }

    pub(crate) fn teacher_position(&self, name: &str) -> ScheduleResult<usize> {
        self.teacher_index
            .get(name)
            .copied()
            .ok_or_else(|| ScheduleError::UnknownTeacher(name.to_string()))
    }

    /// Block layout of this run.
    pub fn layout(&self) -> &BlockLayout {
        &self.layout
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// A teacher's grid.
    pub fn teacher_grid(&self, name: &str) -> Option<&Grid> {
        self.teacher_index.get(name).map(|&i| &self.teacher_grids[i])
    }

    /// A group's grid (empty until projection has run).
    pub fn group_grid(&self, nomenclature: &str) -> Option<&Grid> {
        self.group_index
            .get(nomenclature)
            .map(|&i| &self.group_grids[i])
    }

    /// Issues recorded so far.
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub(crate) fn search_mode(&self) -> SearchMode {
        match self.config.compaction {
            CompactionStrategy::FirstFit => SearchMode::Gapless,
            CompactionStrategy::Swap => SearchMode::Scan,
        }
    }

    /// Cells of a kind a teacher holds.
    pub(crate) fn held(&self, teacher: usize, kind: SlotKind) -> u32 {
        self.teacher_grids[teacher]
            .occupied()
            .filter(|(_, _, slot)| slot.kind == kind)
            .count() as u32
    }

    /// Cells of a kind and name a teacher holds.
    pub(crate) fn held_named(&self, teacher: usize, kind: SlotKind, name: &str) -> u32 {
        self.teacher_grids[teacher]
            .occupied()
            .filter(|(_, _, slot)| slot.kind == kind && slot.subject_name.as_deref() == Some(name))
            .count() as u32
    }

    /// Blocks a teacher may still take under the contract.
    pub(crate) fn spare_hours(&self, teacher: usize) -> u32 {
        self.teachers[teacher]
            .contracted_weekly_hours
            .saturating_sub(self.ledger.teacher_load(teacher))
    }

    pub(crate) fn record(&mut self, issue: Issue) {
        warn!(
            kind = ?issue.kind,
            teacher = issue.teacher.as_deref().unwrap_or("-"),
            subject = issue.subject.as_deref().unwrap_or("-"),
            group = issue.group.as_deref().unwrap_or("-"),
            "{}",
            issue.message
        );
        self.issues.push(issue);
    }

    // --- resolution ---

    /// Expands every teacher's teachable subjects into tuples. Unknown
    /// subjects and groups become reference issues and are skipped.
    fn resolve_tuples(&mut self) -> Vec<Tuple> {
        let mut tuples = Vec::new();
        let mut problems = Vec::new();

        for (t, teacher) in self.teachers.iter().enumerate() {
            for teachable in &teacher.subjects {
                let subject = match self.subject_position(teachable.subject_id.as_deref()) {
                    Ok(s) => s,
                    Err(e) => {
                        let mut issue = Issue::new(IssueKind::UnknownSubject, e.to_string())
                            .with_teacher(&teacher.name);
                        if let Some(id) = &teachable.subject_id {
                            issue = issue.with_subject(id);
                        }
                        problems.push(issue);
                        continue;
                    }
                };
                for nomenclature in &teachable.preferred_group_ids {
                    match self.group_position(nomenclature) {
                        Ok(group) => tuples.push(Tuple {
                            teacher: t,
                            subject,
                            group,
                        }),
                        Err(e) => problems.push(
                            Issue::new(IssueKind::UnknownGroup, e.to_string())
                                .with_teacher(&teacher.name)
                                .with_subject(&self.subjects[subject].id)
                                .with_group(nomenclature),
                        ),
                    }
                }
            }
        }

        for issue in problems {
            self.record(issue);
        }
        debug!(tuples = tuples.len(), "resolved teaching tuples");
        tuples
    }

    // --- placement primitives ---

    /// Commits a class (or tutoring, when `req.subject` is `None`) into the
    /// teacher grid and the ledger.
    pub(crate) fn place(&mut self, day: Day, blocks: BlockRange, req: SlotRequest) {
        let group = &self.groups[req.group];
        let slot = match req.subject {
            Some(s) => {
                let subject = &self.subjects[s];
                Slot::occupied(SlotKind::Class, &subject.name)
                    .with_subject_id(&subject.id)
                    .with_abbreviation(subject.abbreviation.clone())
            }
            None => Slot::occupied(SlotKind::Tutoring, &self.config.tutoring_activity),
        }
        .with_peer(&group.nomenclature)
        .with_semester(group.semester);

        let occupant = Occupant {
            teacher: req.teacher,
            subject: req.subject,
            kind: slot.kind,
        };
        debug!(
            teacher = %self.teachers[req.teacher].name,
            group = %group.nomenclature,
            subject = slot.subject_name.as_deref().unwrap_or("-"),
            ?day,
            first = blocks.first,
            last = blocks.last,
            "placed"
        );
        for block in blocks.blocks() {
            self.teacher_grids[req.teacher].set(day, block, slot.clone());
            self.ledger.record(req.group, day, block, occupant);
        }
        self.ledger.add_load(req.teacher, blocks.len());
    }

    /// Reserves one block for a whole cohort. The teacher cell carries the
    /// cohort label; every member group is marked occupied in the ledger.
    pub(crate) fn reserve_cohort(
        &mut self,
        day: Day,
        block: Block,
        teacher: usize,
        cohort: Cohort,
        entry: &CohortEntry,
    ) {
        let mut slot = Slot::occupied(SlotKind::Extracurricular, &entry.name)
            .with_abbreviation(entry.abbreviation.clone())
            .with_peer(cohort.label())
            .with_semester(cohort.semester);
        if let Some(s) = entry.subject {
            slot = slot.with_subject_id(&self.subjects[s].id);
        }
        self.teacher_grids[teacher].set(day, block, slot);

        let occupant = Occupant {
            teacher,
            subject: entry.subject,
            kind: SlotKind::Extracurricular,
        };
        for member in cohort.members(&self.groups) {
            self.ledger.record(member, day, block, occupant);
        }
        self.ledger.add_load(teacher, 1);
        debug!(
            teacher = %self.teachers[teacher].name,
            cohort = %cohort.label(),
            activity = %entry.name,
            ?day,
            block,
            "reserved cohort block"
        );
    }

    /// Commits a teacher-only duty block.
    pub(crate) fn place_duty(
        &mut self,
        day: Day,
        block: Block,
        teacher: usize,
        name: &str,
        abbreviation: Option<String>,
    ) {
        let slot = Slot::occupied(SlotKind::Reinforcement, name).with_abbreviation(abbreviation);
        if self.teacher_grids[teacher].set(day, block, slot) {
            self.ledger.add_load(teacher, 1);
        }
    }
}

fn first_of_each<T>(items: Vec<T>, key: impl Fn(&T) -> String) -> Vec<T> {
    let mut seen = HashSet::new();
    items.into_iter().filter(|item| seen.insert(key(item))).collect()
}

fn index_by<T>(items: &[T], key: impl Fn(&T) -> String) -> HashMap<String, usize> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| (key(item), i))
        .collect()
}
