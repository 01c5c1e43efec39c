//! Closed sub-category enums for attached effects.
//!
//! Each enum here is the sub-discriminant of one keyed effect category.
//! They are deliberately small and bounded so category indices can be
//! plain arrays indexed by ordinal instead of hash maps.

/// Positive states shut down some detrimental functionality for the receiver.
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
pub enum PositiveState {
    /// Attached detrimental effects are disabled for the duration.
    /// Which ones is controlled by the effect's immuned-type list.
    Immune,
    /// Blocks incoming effect packages that carry a detrimental effect.
    EffectPackageBlock,
    /// Health cannot be reduced to zero.
    Indomitable,
    /// Cannot be damaged.
    Invulnerable,
    /// Cannot be blinded.
    Truesight,
    /// Cannot be targeted by enemies.
    Untargetable,
}

/// Negative states shut down some functionality of the receiver.
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
pub enum NegativeState {
    /// Forces focus onto a combat unit, if possible.
    Focused,
    /// Cannot attack, move, activate omega abilities or gain energy.
    Frozen,
    /// Cannot attack, move or activate omega abilities.
    Stun,
    /// Cannot use attack abilities.
    Disarm,
    /// Misses all attack abilities.
    Blind,
    /// Cannot move.
    Root,
    /// Cannot activate omega abilities.
    Silenced,
    /// Cannot gain energy from any source.
    Lethargic,
    /// Cannot dodge.
    Clumsy,
    /// Forced to target the unit that applied the taunt.
    Taunted,
    /// Forced to move towards the sender; cannot attack.
    Charm,
}

/// Which plane of the board the receiver occupies.
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
pub enum PlaneChange {
    Airborne,
    Underground,
}

/// Predefined stacking conditions.
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
pub enum ConditionType {
    /// Pure damage based on max health; debuffs health gain at max stacks.
    Poison,
    /// Physical echo damage; reduces crit amplification at max stacks.
    Wound,
    /// Energy damage from missing health; ignites at max stacks.
    Burn,
    /// Reduces attack speed; freezes at max stacks.
    Frost,
}

/// Damage flavour of damage-dealing effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumCount)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DamageType {
    Physical,
    Energy,
    /// Ignores all resistances.
    Pure,
}

/// Heal flavour of health-gain effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumCount)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HealType {
    Normal,
    /// Ignores health gain efficiency modifiers.
    Pure,
}

/// How a re-applied effect interacts with an already-attached sibling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OverlapProcessType {
    #[default]
    None,
    /// All instances contribute.
    Sum,
    /// Only the highest instance contributes.
    Highest,
    /// Instances merge into a stack counter.
    Stacking,
    /// Instances merge, refreshing the duration.
    Merge,
}
