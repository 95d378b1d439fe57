//! Timetabling domain models.
//!
//! Provides the input records (subjects, teachers, groups, configuration),
//! the block layout and grid containers, and the outcome documents of a run.
//!
//! # Domain Mappings
//!
//! | horario | Generic scheduling |
//! |---------|--------------------|
//! | Subject | Task (weekly demand) |
//! | Teacher | Resource with capacity = contracted hours |
//! | Group | Consumer whose calendar is its shift |
//! | Block | Discrete time slot |
//! | Grid | Per-resource schedule |

mod config;
mod grid;
mod group;
mod layout;
mod report;
mod subject;
mod teacher;

pub use config::{CompactionStrategy, EngineConfig};
pub use grid::{new_group_grid, new_teacher_grid, Day, Grid, Slot, SlotKind};
pub use group::{Cohort, Group, Shift};
pub use layout::{Block, BlockLayout, BlockRange};
pub use report::{
    CoherenceReport, GroupStats, GroupTimetable, Issue, IssueCategory, IssueKind,
    SubjectSummary, TeacherStats, TeacherTimetable, Violation, ViolationKind,
};
pub use subject::{Subject, SubjectCategory};
pub use teacher::{Activity, TeachableSubject, Teacher};
