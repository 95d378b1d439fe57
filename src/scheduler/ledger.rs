//! Live group-side occupancy.
//!
//! Group grids are only materialised by projection, but every placement
//! decision needs to know what a group already has. The ledger is updated
//! by the placement primitives and answers those questions in O(1):
//! who occupies (group, day, block), who owns a (subject, group) pair, and
//! how many blocks a pair has on a day and across the week.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::models::{Block, BlockRange, Day, SlotKind};

/// What sits in a group cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occupant {
    /// Teacher index.
    pub teacher: usize,
    /// Subject index; `None` for tutoring and implicit extracurriculars.
    pub subject: Option<usize>,
    pub kind: SlotKind,
}

#[derive(Debug, Clone, Default)]
pub struct Ledger {
    cells: HashMap<(usize, Day, Block), Occupant>,
    owners: HashMap<(usize, usize), usize>,
    daily: HashMap<(usize, usize, Day), u32>,
    weekly: BTreeMap<(usize, usize), u32>,
    group_day: HashMap<(usize, Day), u32>,
    taught: HashSet<(usize, usize)>,
    teacher_load: Vec<u32>,
}

impl Ledger {
    /// Creates an empty ledger for `teachers` teachers.
    pub fn new(teachers: usize) -> Self {
        Self {
            teacher_load: vec![0; teachers],
            ..Self::default()
        }
    }

    /// Occupant of a group cell.
    pub fn occupant(&self, group: usize, day: Day, block: Block) -> Option<&Occupant> {
        self.cells.get(&(group, day, block))
    }

    /// Whether a group cell is free.
    #[inline]
    pub fn is_group_free(&self, group: usize, day: Day, block: Block) -> bool {
        !self.cells.contains_key(&(group, day, block))
    }

    /// Records a group cell. Teacher load is tracked separately through
    /// [`Ledger::add_load`] because one teacher cell may cover a whole cohort.
    pub fn record(&mut self, group: usize, day: Day, block: Block, occupant: Occupant) {
        if let Some(subject) = occupant.subject {
            self.owners
                .entry((subject, group))
                .or_insert(occupant.teacher);
            *self.daily.entry((subject, group, day)).or_insert(0) += 1;
            *self.weekly.entry((subject, group)).or_insert(0) += 1;
        }
        if occupant.kind == SlotKind::Class {
            self.taught.insert((occupant.teacher, group));
        }
        *self.group_day.entry((group, day)).or_insert(0) += 1;
        self.cells.insert((group, day, block), occupant);
    }

    /// Moves a group cell within a day. Counts are unaffected.
    pub fn relocate(&mut self, group: usize, day: Day, from: Block, to: Block) -> Option<Occupant> {
        let occupant = self.cells.remove(&(group, day, from))?;
        self.cells.insert((group, day, to), occupant);
        Some(occupant)
    }

    /// Adds blocks to a teacher's load.
    pub fn add_load(&mut self, teacher: usize, blocks: u32) {
        if let Some(load) = self.teacher_load.get_mut(teacher) {
            *load += blocks;
        }
    }

    /// Blocks assigned to a teacher so far.
    pub fn teacher_load(&self, teacher: usize) -> u32 {
        self.teacher_load.get(teacher).copied().unwrap_or(0)
    }

    /// Teacher owning a (subject, group) pair.
    pub fn owner(&self, subject: usize, group: usize) -> Option<usize> {
        self.owners.get(&(subject, group)).copied()
    }

    /// Blocks of a subject a group has on a day.
    pub fn daily_count(&self, subject: usize, group: usize, day: Day) -> u32 {
        self.daily.get(&(subject, group, day)).copied().unwrap_or(0)
    }

    /// Blocks of a subject a group has across the week.
    pub fn weekly_count(&self, subject: usize, group: usize) -> u32 {
        self.weekly.get(&(subject, group)).copied().unwrap_or(0)
    }

    /// Occupied blocks of a group on a day.
    pub fn group_hours(&self, group: usize, day: Day) -> u32 {
        self.group_day.get(&(group, day)).copied().unwrap_or(0)
    }

    /// Whether a teacher already teaches a class to a group.
    pub fn teaches(&self, teacher: usize, group: usize) -> bool {
        self.taught.contains(&(teacher, group))
    }

    /// First and last occupied block of a group day within `bounds`.
    pub fn group_span(&self, group: usize, day: Day, bounds: BlockRange) -> Option<BlockRange> {
        let mut occupied = bounds
            .blocks()
            .filter(|&b| !self.is_group_free(group, day, b));
        let first = occupied.next()?;
        let last = occupied.last().unwrap_or(first);
        Some(BlockRange::new(first, last))
    }

    /// (subject, group, blocks) for every pair with placed blocks, ordered
    /// by subject then group index.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize, u32)> + '_ {
        self.weekly.iter().map(|(&(s, g), &n)| (s, g, n))
    }
}
