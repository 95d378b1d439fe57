//! Weekly timetable construction.
//!
//! A greedy, first-fit pipeline over an [`Engine`] that owns every grid:
//! category assigners write teacher grids, projection derives group grids,
//! compaction and coherence validation finish the run, and statistics
//! summarise it.
//!
//! # Algorithm
//!
//! Each assigner places its increments one by one on the group's lightest
//! day that has an admissible window, without backtracking. Increments that
//! do not fit are reported as issues; the run always completes with a
//! partial, inspectable schedule.
//!
//! # Stats
//!
//! [`RunKpi`] computes run-wide indicators: curriculum coverage, average
//! teacher load, holes, and short group days.

mod assign;
mod coherence;
mod compaction;
mod engine;
mod ledger;
mod projection;
mod rules;
mod search;
mod stats;

pub use assign::Stage;
pub use compaction::CompactionOutcome;
pub use engine::{Engine, RunReport};
pub use projection::ProjectionOutcome;
pub use rules::SlotRequest;
pub use search::{Placement, SearchMode};
pub use stats::{group_stats, teacher_stats, RunKpi};

use crate::error::ScheduleResult;
use crate::models::{EngineConfig, Group, Subject, Teacher};

/// Builds an engine and runs it once.
pub fn run(
    config: EngineConfig,
    subjects: Vec<Subject>,
    groups: Vec<Group>,
    teachers: Vec<Teacher>,
) -> ScheduleResult<RunReport> {
    Engine::new(config, subjects, groups, teachers)?.run()
}
