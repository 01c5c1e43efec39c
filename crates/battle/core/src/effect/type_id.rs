//! Effect type identity: category tag plus category-specific sub-discriminant.

use std::fmt;

use crate::stats::StatType;

use super::enums::{ConditionType, DamageType, HealType, NegativeState, PlaneChange, PositiveState};

/// Uniquely identifies what kind of effect a definition produces.
///
/// The variant is the primary category; the payload (where present) is the
/// category's sub-discriminant. Both together are the identity used for
/// category indexing, immunity checks and same-type grouping.
///
/// [`EffectType`] is the generated payload-free discriminant enum; use it
/// when only the category matters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::EnumDiscriminants)]
#[strum_discriminants(name(EffectType))]
#[strum_discriminants(derive(Hash, strum::Display, strum::EnumCount, strum::EnumIter))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectTypeId {
    // ========================================================================
    // Attached-effect categories
    // ========================================================================
    PositiveState(PositiveState),
    NegativeState(NegativeState),
    /// Modifies a stat in a positive way.
    Buff(StatType),
    /// Modifies a stat in a negative way.
    Debuff(StatType),
    PlaneChange(PlaneChange),
    Condition(ConditionType),
    /// Adds effects or attributes to the sender's future effect packages.
    Empower,
    /// Subtracts attributes from the sender's future effect packages.
    Disempower,
    DamageOverTime(DamageType),
    EnergyBurnOverTime,
    EnergyGainOverTime,
    HealOverTime(HealType),
    HyperGainOverTime,
    HyperBurnOverTime,
    /// Takes the receiver down once its health drops below a threshold.
    Execute,
    /// Teleports the receiver after a delay.
    Blink,

    // ========================================================================
    // Instant (non-attached) kinds, listed so dispatch stays a closed sum
    // ========================================================================
    InstantDamage(DamageType),
    InstantHeal(HealType),
    InstantEnergyBurn,
    InstantEnergyGain,
    Cleanse,
}

impl EffectTypeId {
    /// The payload-free category tag.
    pub fn kind(&self) -> EffectType {
        EffectType::from(self)
    }

    /// The targeted stat, for the categories that have one.
    pub fn stat(&self) -> Option<StatType> {
        match self {
            Self::Buff(stat) | Self::Debuff(stat) => Some(*stat),
            _ => None,
        }
    }

    /// True for the categories stored and aged by the attached-effects
    /// container; instant kinds are applied once and never attached.
    pub fn is_attachable(&self) -> bool {
        !matches!(
            self,
            Self::InstantDamage(_)
                | Self::InstantHeal(_)
                | Self::InstantEnergyBurn
                | Self::InstantEnergyGain
                | Self::Cleanse
        )
    }

    /// True for categories whose magnitude is captured from an expression
    /// snapshot (currently buffs and debuffs).
    pub fn uses_captured_value(&self) -> bool {
        matches!(self, Self::Buff(_) | Self::Debuff(_))
    }
}

impl fmt::Display for EffectTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PositiveState(state) => write!(f, "PositiveState({state})"),
            Self::NegativeState(state) => write!(f, "NegativeState({state})"),
            Self::Buff(stat) => write!(f, "Buff({stat})"),
            Self::Debuff(stat) => write!(f, "Debuff({stat})"),
            Self::PlaneChange(plane) => write!(f, "PlaneChange({plane})"),
            Self::Condition(condition) => write!(f, "Condition({condition})"),
            Self::DamageOverTime(damage) => write!(f, "DamageOverTime({damage})"),
            Self::HealOverTime(heal) => write!(f, "HealOverTime({heal})"),
            Self::InstantDamage(damage) => write!(f, "InstantDamage({damage})"),
            Self::InstantHeal(heal) => write!(f, "InstantHeal({heal})"),
            other => write!(f, "{}", EffectType::from(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_includes_sub_discriminant() {
        assert_eq!(
            EffectTypeId::NegativeState(NegativeState::Root),
            EffectTypeId::NegativeState(NegativeState::Root)
        );
        assert_ne!(
            EffectTypeId::NegativeState(NegativeState::Root),
            EffectTypeId::NegativeState(NegativeState::Stun)
        );
        assert_ne!(
            EffectTypeId::Buff(StatType::AttackSpeed),
            EffectTypeId::Debuff(StatType::AttackSpeed)
        );
    }

    #[test]
    fn kind_strips_payload() {
        assert_eq!(
            EffectTypeId::Buff(StatType::AttackSpeed).kind(),
            EffectTypeId::Buff(StatType::MaxHealth).kind()
        );
    }

    #[test]
    fn instant_kinds_are_not_attachable() {
        assert!(EffectTypeId::Execute.is_attachable());
        assert!(!EffectTypeId::Cleanse.is_attachable());
        assert!(!EffectTypeId::InstantDamage(DamageType::Pure).is_attachable());
    }
}
