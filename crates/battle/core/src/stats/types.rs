//! Combat stat identifiers and the fixed-size stat table.
//!
//! Stats are stored in arrays indexed by the enum ordinal rather than in
//! hash maps: iteration order is then a compile-time property, which keeps
//! stat aggregation replay-deterministic.

use strum::EnumCount;

use super::fixed::FixedPoint;

/// Closed set of combat stats a buff or debuff can target.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumCount,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatType {
    MaxHealth,
    CurrentHealth,
    /// Flat health gained per time step.
    HealthRegeneration,
    /// Percentage of health gain effects actually applied.
    HealthGainEfficiency,
    /// Attack completion percentage per second (100 = one attack per second).
    AttackSpeed,
    AttackPhysicalDamage,
    AttackEnergyDamage,
    PhysicalResist,
    EnergyResist,
    /// Percentage chance for attacks to be on target.
    HitChance,
    /// Percentage chance to dodge incoming attacks.
    AttackDodgeChance,
    CritChance,
    CritAmplification,
    /// Movement speed in subunits per time step.
    MoveSpeed,
}

impl StatType {
    /// Ordinal used to index stat tables and buff/debuff buckets.
    pub const fn as_index(self) -> usize {
        self as usize
    }
}

/// Which layer of an entity's stats an expression operand reads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatEvaluationType {
    /// Template stats before any attached effect contributes.
    Base,
    /// Stats after live aggregation of buffs, debuffs and synergies.
    #[default]
    Live,
}

/// One complete stat table, every [`StatType`] mapped to a value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatsData {
    values: [FixedPoint; StatType::COUNT],
}

impl StatsData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, stat: StatType) -> FixedPoint {
        self.values[stat.as_index()]
    }

    pub fn set(&mut self, stat: StatType, value: FixedPoint) {
        self.values[stat.as_index()] = value;
    }

    /// Builder-style setter used when assembling test and template tables.
    pub fn with(mut self, stat: StatType, value: FixedPoint) -> Self {
        self.set(stat, value);
        self
    }
}

/// Base and live stat tables of one entity, captured together.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FullStatsData {
    pub base: StatsData,
    pub live: StatsData,
}

impl FullStatsData {
    pub fn get(&self, stat: StatType, evaluation: StatEvaluationType) -> FixedPoint {
        match evaluation {
            StatEvaluationType::Base => self.base.get(stat),
            StatEvaluationType::Live => self.live.get(stat),
        }
    }
}
