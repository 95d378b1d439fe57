//! Weekly school timetable generation.
//!
//! Builds Monday-to-Friday timetables for teachers and student groups from
//! curriculum requirements, teacher availability, and a morning/afternoon
//! block layout. Placement is greedy and first-fit: every requirement that
//! cannot be met is reported, and a partial, inspectable schedule is always
//! produced.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Subject`, `Teacher`, `Group`, `Grid`,
//!   `BlockLayout`, `EngineConfig`, and the report documents
//! - **`validation`**: Input integrity checks (duplicate IDs, dangling
//!   references, bad layouts)
//! - **`scheduler`**: The `Engine`, its assigners, projection, compaction,
//!   coherence validation, and statistics
//! - **`io`**: JSON dataset loading and result export
//! - **`logging`**: `tracing-subscriber` setup for the binary and tests
//!
//! # Example
//!
//! ```
//! use horario::models::{EngineConfig, Group, Subject, Teacher};
//!
//! let report = horario::scheduler::run(
//!     EngineConfig::new(8, 7).with_shift_boundary(8),
//!     vec![Subject::professional("PM1", 17).with_semester(1)],
//!     vec![Group::morning("101A", 1)],
//!     vec![Teacher::new("Luis", 17).with_subject("PM1", &["101A"])],
//! )
//! .unwrap();
//!
//! assert_eq!(report.group("101A").unwrap().stats.total_hours, 17);
//! assert!(report.is_complete());
//! ```

pub mod error;
pub mod io;
pub mod logging;
pub mod models;
pub mod scheduler;
pub mod validation;

pub use error::{ScheduleError, ScheduleResult};
pub use scheduler::{Engine, RunReport};
