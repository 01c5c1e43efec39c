//! Team-synergy stacks as seen by effect expressions.
//!
//! Synergy aggregation itself happens outside this crate; expressions only
//! ever ask "how many stacks of synergy X does this entity have".

/// Identifier of one team synergy (affinity or class line).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SynergyId(pub u16);

/// Synergy stacks of one entity, kept sorted by id so iteration order is
/// stable across runs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SynergySet {
    stacks: Vec<(SynergyId, u32)>,
}

impl SynergySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the stack count for a synergy, keeping entries sorted.
    pub fn set(&mut self, synergy: SynergyId, count: u32) {
        match self.stacks.binary_search_by_key(&synergy, |(id, _)| *id) {
            Ok(pos) => self.stacks[pos].1 = count,
            Err(pos) => self.stacks.insert(pos, (synergy, count)),
        }
    }

    pub fn count(&self, synergy: SynergyId) -> u32 {
        self.stacks
            .binary_search_by_key(&synergy, |(id, _)| *id)
            .map(|pos| self.stacks[pos].1)
            .unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SynergyId, u32)> + '_ {
        self.stacks.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }
}
