//! Weekly timetable grids.
//!
//! A grid holds one [`Slot`] per (day, block) over a block range: every
//! block of the day for teachers, the shift range for groups. For a
//! teacher-grid slot the peer is the group (or cohort label); for a
//! group-grid slot the peer is the teacher.

use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{Block, BlockLayout, BlockRange, Group};

/// School day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Day {
    /// Monday through Friday.
    pub const ALL: [Day; 5] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
    ];

    /// Position within the week (Monday = 0).
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// What occupies a slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotKind {
    #[default]
    Free,
    /// A professional-module or common-core class for one group.
    Class,
    /// A cohort-wide extracurricular block.
    Extracurricular,
    /// Group tutoring.
    Tutoring,
    /// A teacher-only duty (reinforcement activity or general support).
    Reinforcement,
}

/// A timetable cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    /// Subject or activity name. `None` = free.
    pub subject_name: Option<String>,
    /// Subject id for curriculum entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abbreviation: Option<String>,
    /// Group / cohort label (teacher grid) or teacher name (group grid).
    pub peer_name: Option<String>,
    pub semester: Option<u32>,
    pub kind: SlotKind,
}

impl Slot {
    /// A free slot.
    pub fn free() -> Self {
        Self::default()
    }

    /// An occupied slot of the given kind.
    pub fn occupied(kind: SlotKind, subject_name: impl Into<String>) -> Self {
        Self {
            subject_name: Some(subject_name.into()),
            kind,
            ..Self::default()
        }
    }

    /// Sets the subject id.
    pub fn with_subject_id(mut self, id: impl Into<String>) -> Self {
        self.subject_id = Some(id.into());
        self
    }

    /// Sets the abbreviation.
    pub fn with_abbreviation(mut self, abbreviation: Option<String>) -> Self {
        self.abbreviation = abbreviation;
        self
    }

    /// Sets the peer.
    pub fn with_peer(mut self, peer: impl Into<String>) -> Self {
        self.peer_name = Some(peer.into());
        self
    }

    /// Sets the semester.
    pub fn with_semester(mut self, semester: u32) -> Self {
        self.semester = Some(semester);
        self
    }

    /// Whether nothing is scheduled here.
    #[inline]
    pub fn is_free(&self) -> bool {
        self.subject_name.is_none()
    }
}

/// A Monday-to-Friday grid of slots over a block range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    range: BlockRange,
    days: Vec<Vec<Slot>>,
}

impl Grid {
    /// Allocates an all-free grid over `range`.
    pub fn new(range: BlockRange) -> Self {
        let width = range.len() as usize;
        Self {
            range,
            days: vec![vec![Slot::free(); width]; Day::ALL.len()],
        }
    }

    /// Blocks covered by this grid.
    #[inline]
    pub fn range(&self) -> BlockRange {
        self.range
    }

    #[inline]
    fn offset(&self, block: Block) -> Option<usize> {
        self.range
            .contains(block)
            .then(|| (block - self.range.first) as usize)
    }

    /// Slot at (day, block), `None` outside the range.
    pub fn get(&self, day: Day, block: Block) -> Option<&Slot> {
        let offset = self.offset(block)?;
        self.days[day.index()].get(offset)
    }

    /// Writes a slot. Returns `false` (and writes nothing) outside the range.
    pub fn set(&mut self, day: Day, block: Block, slot: Slot) -> bool {
        match self.offset(block) {
            Some(offset) => {
                self.days[day.index()][offset] = slot;
                true
            }
            None => false,
        }
    }

    /// Frees a slot, returning what was there.
    pub fn take(&mut self, day: Day, block: Block) -> Option<Slot> {
        let offset = self.offset(block)?;
        let slot = std::mem::take(&mut self.days[day.index()][offset]);
        (!slot.is_free()).then_some(slot)
    }

    /// Frees every slot.
    pub fn clear(&mut self) {
        for day in &mut self.days {
            day.iter_mut().for_each(|slot| *slot = Slot::free());
        }
    }

    /// Whether (day, block) is inside the range and free.
    #[inline]
    pub fn is_free(&self, day: Day, block: Block) -> bool {
        self.get(day, block).is_some_and(Slot::is_free)
    }

    /// (block, slot) pairs of a day, ascending.
    pub fn day(&self, day: Day) -> impl Iterator<Item = (Block, &Slot)> {
        let first = self.range.first;
        self.days[day.index()]
            .iter()
            .enumerate()
            .map(move |(i, slot)| (first + i as Block, slot))
    }

    /// Occupied (day, block, slot) triples in day, block order.
    pub fn occupied(&self) -> impl Iterator<Item = (Day, Block, &Slot)> {
        Day::ALL.into_iter().flat_map(move |day| {
            self.day(day)
                .filter(|(_, slot)| !slot.is_free())
                .map(move |(block, slot)| (day, block, slot))
        })
    }

    /// Occupied slots on a day.
    pub fn occupied_on(&self, day: Day) -> u32 {
        self.day(day).filter(|(_, s)| !s.is_free()).count() as u32
    }

    /// Occupied slots across the week.
    pub fn occupied_count(&self) -> u32 {
        Day::ALL.iter().map(|&d| self.occupied_on(d)).sum()
    }

    /// First and last occupied block of a day.
    pub fn occupied_span(&self, day: Day) -> Option<BlockRange> {
        let mut occupied = self
            .day(day)
            .filter(|(_, s)| !s.is_free())
            .map(|(b, _)| b);
        let first = occupied.next()?;
        let last = occupied.last().unwrap_or(first);
        Some(BlockRange::new(first, last))
    }

    /// Free blocks strictly inside the occupied span of a day.
    pub fn holes_on(&self, day: Day) -> u32 {
        match self.occupied_span(day) {
            Some(span) => span.len() - self.occupied_on(day),
            None => 0,
        }
    }

    /// Interior holes across the week.
    pub fn holes(&self) -> u32 {
        Day::ALL.iter().map(|&d| self.holes_on(d)).sum()
    }
}

impl Serialize for Grid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let days: BTreeMap<Day, BTreeMap<Block, &Slot>> = Day::ALL
            .iter()
            .map(|&day| (day, self.day(day).collect()))
            .collect();
        days.serialize(serializer)
    }
}

/// Allocates an empty teacher grid spanning every block of the day.
pub fn new_teacher_grid(layout: &BlockLayout) -> Grid {
    Grid::new(layout.all())
}

/// Allocates an empty group grid spanning the group's shift.
pub fn new_group_grid(layout: &BlockLayout, group: &Group) -> Grid {
    Grid::new(layout.shift_range(group.shift))
}
