//! Engine configuration.
//!
//! Deserializes from the `config.json` document. Field aliases accept the
//! camelCase names used by exporters and the keys of the legacy data files.

use serde::{Deserialize, Serialize};

use super::Block;

/// How gaps in group days are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompactionStrategy {
    /// Placement always extends the group's occupied run, so compaction
    /// only verifies that no holes exist.
    #[default]
    #[serde(alias = "first-fit", alias = "firstFit")]
    FirstFit,
    /// Placement scans every window; a post-pass moves classes into holes.
    Swap,
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Blocks in the morning shift.
    #[serde(alias = "morningBlockCount", alias = "morningBlocks", alias = "bloques_matutino")]
    pub morning_block_count: u32,
    /// Blocks in the afternoon shift.
    #[serde(
        alias = "afternoonBlockCount",
        alias = "afternoonBlocks",
        alias = "bloques_vespertino"
    )]
    pub afternoon_block_count: u32,
    /// Single block shared by both shifts (shorthand for the two fields below).
    #[serde(default, alias = "shiftBoundaryBlock")]
    pub shift_boundary_block: Option<Block>,
    /// Last morning block.
    #[serde(default, alias = "morningEndBlock", alias = "bloque_fin_matutino")]
    pub morning_end_block: Option<Block>,
    /// First afternoon block.
    #[serde(
        default,
        alias = "afternoonStartBlock",
        alias = "bloque_inicio_vespertino"
    )]
    pub afternoon_start_block: Option<Block>,
    /// Weekly extracurricular blocks per cohort when no Extracurricular
    /// subject describes the requirement.
    #[serde(
        default = "default_extracurricular_hours",
        alias = "extracurricularWeeklyHours"
    )]
    pub extracurricular_weekly_hours: u32,
    /// Reinforcement activity name that denotes group tutoring.
    #[serde(default = "default_tutoring_activity", alias = "tutoringActivity")]
    pub tutoring_activity: String,
    /// Gap handling strategy.
    #[serde(default)]
    pub compaction: CompactionStrategy,
    /// Activity name used to fill contracted hours left over after every
    /// stage. `None` reports underloaded teachers instead.
    #[serde(default, alias = "generalSupportActivity")]
    pub general_support_activity: Option<String>,
}

fn default_extracurricular_hours() -> u32 {
    3
}

fn default_tutoring_activity() -> String {
    "Tutoring".to_string()
}

impl EngineConfig {
    /// Creates a configuration with the given shift sizes and defaults
    /// everywhere else.
    pub fn new(morning_block_count: u32, afternoon_block_count: u32) -> Self {
        Self {
            morning_block_count,
            afternoon_block_count,
            shift_boundary_block: None,
            morning_end_block: None,
            afternoon_start_block: None,
            extracurricular_weekly_hours: default_extracurricular_hours(),
            tutoring_activity: default_tutoring_activity(),
            compaction: CompactionStrategy::default(),
            general_support_activity: None,
        }
    }

    /// Sets the shared boundary block.
    pub fn with_shift_boundary(mut self, block: Block) -> Self {
        self.shift_boundary_block = Some(block);
        self
    }

    /// Sets the last morning block.
    pub fn with_morning_end(mut self, block: Block) -> Self {
        self.morning_end_block = Some(block);
        self
    }

    /// Sets the first afternoon block.
    pub fn with_afternoon_start(mut self, block: Block) -> Self {
        self.afternoon_start_block = Some(block);
        self
    }

    /// Sets the default weekly extracurricular requirement.
    pub fn with_extracurricular_hours(mut self, hours: u32) -> Self {
        self.extracurricular_weekly_hours = hours;
        self
    }

    /// Sets the tutoring activity name.
    pub fn with_tutoring_activity(mut self, name: impl Into<String>) -> Self {
        self.tutoring_activity = name.into();
        self
    }

    /// Sets the compaction strategy.
    pub fn with_compaction(mut self, strategy: CompactionStrategy) -> Self {
        self.compaction = strategy;
        self
    }

    /// Fills leftover contracted hours with the named activity.
    pub fn with_general_support(mut self, name: impl Into<String>) -> Self {
        self.general_support_activity = Some(name.into());
        self
    }
}
