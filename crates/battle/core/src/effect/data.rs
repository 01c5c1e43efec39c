//! Immutable effect definitions.
//!
//! An [`EffectData`] is produced outside this crate (by the data-definition
//! loader) and shared by every attached instance of that effect. Nothing in
//! here mutates after construction.

use arrayvec::ArrayVec;

use crate::config::SimConfig;
use crate::stats::StatType;
use crate::time::TIME_INFINITE;

use super::enums::{
    ConditionType, DamageType, HealType, NegativeState, OverlapProcessType, PlaneChange,
    PositiveState,
};
use super::expression::EffectExpression;
use super::type_id::EffectTypeId;

/// Lifetime policy of an effect: when does an attached instance expire.
///
/// An effect is bounded either by a duration (`duration_ms`), by a number of
/// activations (`is_consumable` + `activations_until_expiry`), or by a
/// number of effect-package blocks (`blocks_until_expiry`). [`TIME_INFINITE`]
/// means unbounded on that axis.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectLifetime {
    /// Expiry bounded by activation count rather than duration.
    pub is_consumable: bool,

    /// Total activations before a consumable effect expires.
    pub activations_until_expiry: i32,

    /// Only every n-th lifetime activation actually fires.
    pub consumable_activation_frequency: i32,

    /// How many times the effect may block another effect before expiring.
    pub blocks_until_expiry: i32,

    /// Duration in milliseconds; only used when not consumable.
    pub duration_ms: i32,

    /// How often an over-time effect activates. Zero means the effect is
    /// evaluated once against live stats and never re-captured.
    pub frequency_ms: i32,

    /// Cap for the instance stack counter.
    pub max_stacks: i32,

    /// Cleansed automatically when the stack counter hits `max_stacks`.
    pub cleanse_at_max_stacks: bool,

    /// How a re-applied instance from the same ability merges with siblings.
    pub overlap_process_type: OverlapProcessType,
}

impl Default for EffectLifetime {
    fn default() -> Self {
        Self {
            is_consumable: false,
            activations_until_expiry: TIME_INFINITE,
            consumable_activation_frequency: 1,
            blocks_until_expiry: TIME_INFINITE,
            duration_ms: TIME_INFINITE,
            frequency_ms: SimConfig::DEFAULT_EFFECT_FREQUENCY_MS,
            max_stacks: TIME_INFINITE,
            cleanse_at_max_stacks: false,
            overlap_process_type: OverlapProcessType::None,
        }
    }
}

impl EffectLifetime {
    /// Duration-bounded lifetime with default frequency.
    pub fn with_duration_ms(duration_ms: i32) -> Self {
        Self {
            duration_ms,
            ..Self::default()
        }
    }

    /// Activation-bounded lifetime.
    pub fn consumable(activations_until_expiry: i32) -> Self {
        Self {
            is_consumable: true,
            activations_until_expiry,
            ..Self::default()
        }
    }
}

/// Immutable, shared definition of one effect.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectData {
    pub type_id: EffectTypeId,
    pub lifetime: EffectLifetime,

    /// The value of this effect, resolved at capture time.
    pub expression: EffectExpression,

    /// Whether cleanse abilities may remove instances of this effect.
    pub can_cleanse: bool,

    /// For `PositiveState(Immune)` only: the effect types this immunity
    /// covers. Empty means immune to everything detrimental.
    pub immuned_effect_types: ArrayVec<EffectTypeId, { SimConfig::MAX_IMMUNED_TYPES }>,
}

impl EffectData {
    pub fn new(type_id: EffectTypeId, expression: EffectExpression) -> Self {
        Self {
            type_id,
            lifetime: EffectLifetime::default(),
            expression,
            can_cleanse: true,
            immuned_effect_types: ArrayVec::new(),
        }
    }

    // ===== constructors for the common categories =====

    pub fn buff(stat: StatType, expression: EffectExpression, duration_ms: i32) -> Self {
        Self::new(EffectTypeId::Buff(stat), expression).with_duration_ms(duration_ms)
    }

    pub fn debuff(stat: StatType, expression: EffectExpression, duration_ms: i32) -> Self {
        Self::new(EffectTypeId::Debuff(stat), expression).with_duration_ms(duration_ms)
    }

    pub fn positive_state(state: PositiveState, duration_ms: i32) -> Self {
        Self::new(EffectTypeId::PositiveState(state), EffectExpression::value(0))
            .with_duration_ms(duration_ms)
    }

    pub fn negative_state(state: NegativeState, duration_ms: i32) -> Self {
        Self::new(EffectTypeId::NegativeState(state), EffectExpression::value(0))
            .with_duration_ms(duration_ms)
    }

    pub fn plane_change(plane_change: PlaneChange, duration_ms: i32) -> Self {
        Self::new(EffectTypeId::PlaneChange(plane_change), EffectExpression::value(0))
            .with_duration_ms(duration_ms)
    }

    pub fn condition(condition: ConditionType, expression: EffectExpression, duration_ms: i32) -> Self {
        Self::new(EffectTypeId::Condition(condition), expression).with_duration_ms(duration_ms)
    }

    pub fn damage_over_time(
        damage_type: DamageType,
        expression: EffectExpression,
        duration_ms: i32,
    ) -> Self {
        Self::new(EffectTypeId::DamageOverTime(damage_type), expression)
            .with_duration_ms(duration_ms)
    }

    pub fn heal_over_time(heal_type: HealType, expression: EffectExpression, duration_ms: i32) -> Self {
        Self::new(EffectTypeId::HealOverTime(heal_type), expression).with_duration_ms(duration_ms)
    }

    pub fn energy_burn_over_time(expression: EffectExpression, duration_ms: i32) -> Self {
        Self::new(EffectTypeId::EnergyBurnOverTime, expression).with_duration_ms(duration_ms)
    }

    /// Immunity to everything detrimental.
    pub fn immunity(duration_ms: i32) -> Self {
        Self::positive_state(PositiveState::Immune, duration_ms)
    }

    /// Immunity restricted to an explicit list of effect types.
    pub fn immunity_to<I>(immuned_types: I, duration_ms: i32) -> Self
    where
        I: IntoIterator<Item = EffectTypeId>,
    {
        let mut data = Self::positive_state(PositiveState::Immune, duration_ms);
        data.immuned_effect_types.extend(immuned_types);
        data
    }

    // ===== builder-style modifiers =====

    pub fn with_duration_ms(mut self, duration_ms: i32) -> Self {
        self.lifetime.duration_ms = duration_ms;
        self
    }

    pub fn with_frequency_ms(mut self, frequency_ms: i32) -> Self {
        self.lifetime.frequency_ms = frequency_ms;
        self
    }

    pub fn with_lifetime(mut self, lifetime: EffectLifetime) -> Self {
        self.lifetime = lifetime;
        self
    }

    pub fn with_blocks_until_expiry(mut self, blocks: i32) -> Self {
        self.lifetime.blocks_until_expiry = blocks;
        self
    }

    pub fn non_cleansable(mut self) -> Self {
        self.can_cleanse = false;
        self
    }

    /// A static-frequency effect captures its value once against live stats
    /// and is never periodically re-evaluated.
    pub fn has_static_frequency(&self) -> bool {
        self.lifetime.frequency_ms == 0
    }
}
