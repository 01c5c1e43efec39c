//! One attached occurrence of an effect on a receiver.

use std::fmt;

use tracing::{error, warn};

use crate::effect::{
    DataSource, DataSourceSet, EffectData, EffectTypeId, EntityDataForExpression,
    ExpressionStatsSource,
};
use crate::entity::EntityId;
use crate::env::{CaptureError, ExpressionEnv};
use crate::stats::{FixedPoint, FullStatsData, StatsData};
use crate::time::{TIME_INFINITE, ms_to_time_steps};

use super::arena::EffectHandle;

/// Lifecycle of an attached instance.
///
/// `Active → Destroyed` happens the moment an expiry condition is detected
/// and immediately removes the instance from its category index. The
/// instance stays in the canonical list until the sweep erases it, so
/// one-tick-late observers still see it during the grace period.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectLifecycle {
    #[default]
    Active,
    Destroyed,
}

/// Mutable runtime state of one attached effect.
///
/// Created when an effect is attached to a receiver and owned exclusively
/// by that receiver's container. All counters are advanced by the external
/// tick driver; this type only knows how to interpret them.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttachedEffectState {
    /// Immutable definition shared by every instance of this effect.
    pub effect_data: EffectData,

    /// The entity which applied this effect. Can be a projectile or zone.
    pub sender_id: EntityId,

    /// The original combat unit behind `sender_id`; equal to it when the
    /// effect came straight from a combat unit.
    pub combat_unit_sender_id: EntityId,

    /// Name of the ability that attached this effect; grouping key for
    /// same-ability stacking decisions.
    pub ability_name: String,

    /// Sender stats captured at cast time.
    pub sender_stats: StatsData,

    /// Nested instances spawned by this effect (empower bundles). A child
    /// is only reachable through its parent, never from the canonical list.
    pub children: Vec<EffectHandle>,

    /// Parent of this effect, if this instance is part of a bundle.
    pub parent: Option<EffectHandle>,

    pub lifecycle: EffectLifecycle,

    /// Result of the last expression capture, for buffs and debuffs.
    pub captured_effect_value: Option<FixedPoint>,

    /// Previous stack values, kept for stacking overlap processing.
    pub history_all_stack_values: Vec<FixedPoint>,

    /// Most recent change to the captured value.
    pub last_delta_value: FixedPoint,

    /// Duration converted to time steps ([`TIME_INFINITE`] = forever).
    pub duration_time_steps: i32,

    /// Activation frequency converted to time steps.
    pub frequency_time_steps: i32,

    pub current_time_steps: i32,
    pub current_blocks: i32,

    /// Activations done; only meaningful for consumable effects.
    pub current_activations: i32,

    /// Total activations this instance lived through, including the ones
    /// skipped by the consumable activation frequency.
    pub total_activations_lifetime: i32,

    pub current_stacks_count: i32,

    /// Time step at which physical erasure becomes permitted; `-1` means
    /// remove on the very next sweep with no grace tick.
    pub time_step_when_destroy: i32,
}

impl AttachedEffectState {
    pub fn new(
        sender_id: EntityId,
        effect_data: EffectData,
        ability_name: impl Into<String>,
    ) -> Self {
        let mut state = Self {
            effect_data,
            sender_id,
            combat_unit_sender_id: sender_id,
            ability_name: ability_name.into(),
            sender_stats: StatsData::new(),
            children: Vec::new(),
            parent: None,
            lifecycle: EffectLifecycle::Active,
            captured_effect_value: None,
            history_all_stack_values: Vec::new(),
            last_delta_value: FixedPoint::ZERO,
            duration_time_steps: TIME_INFINITE,
            frequency_time_steps: 0,
            current_time_steps: 0,
            current_blocks: 0,
            current_activations: 0,
            total_activations_lifetime: 0,
            current_stacks_count: 1,
            time_step_when_destroy: -1,
        };
        state.update_cached_time_steps();
        state
    }

    /// Sets the combat unit behind a projectile/zone sender.
    pub fn with_combat_unit_sender(mut self, combat_unit_sender_id: EntityId) -> Self {
        self.combat_unit_sender_id = combat_unit_sender_id;
        self
    }

    /// Records the sender's stats as they were at cast time.
    pub fn with_sender_stats(mut self, sender_stats: StatsData) -> Self {
        self.sender_stats = sender_stats;
        self
    }

    /// Refreshes the cached ms-to-time-step conversions from the definition.
    pub fn update_cached_time_steps(&mut self) {
        self.duration_time_steps = ms_to_time_steps(self.effect_data.lifetime.duration_ms);
        self.frequency_time_steps = ms_to_time_steps(self.effect_data.lifetime.frequency_ms);
    }

    /// Resets the current duration/activation counters.
    pub fn reset_current_lifetime(&mut self) {
        self.current_time_steps = 0;
        self.current_blocks = 0;
        self.current_activations = 0;
        self.total_activations_lifetime = 0;
    }

    /// True iff this instance is not nested inside another effect's bundle.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// True iff this instance has not been marked for destruction.
    pub fn is_valid(&self) -> bool {
        self.lifecycle != EffectLifecycle::Destroyed
    }

    /// Still indexed for aggregation purposes.
    pub fn is_logically_active(&self) -> bool {
        self.lifecycle == EffectLifecycle::Active
    }

    /// Logically dead but still observable in the canonical list until the
    /// sweep reaches it.
    pub fn is_pending_erasure(&self) -> bool {
        self.lifecycle == EffectLifecycle::Destroyed
    }

    /// Expiry bounded by activation count rather than duration.
    pub fn is_consumable(&self) -> bool {
        self.effect_data.lifetime.is_consumable
    }

    /// Only root attached effects can be cleansed, and only when their
    /// definition allows it.
    pub fn can_cleanse(&self) -> bool {
        self.is_root() && self.effect_data.can_cleanse
    }

    /// Whether the current lifetime activation actually fires.
    pub fn can_activate_consumable(&self) -> bool {
        self.total_activations_lifetime % self.effect_data.lifetime.consumable_activation_frequency
            == 0
    }

    /// Has any expiry condition been met.
    pub fn is_expired(&self) -> bool {
        let lifetime = &self.effect_data.lifetime;

        if self.is_consumable() {
            if lifetime.activations_until_expiry == TIME_INFINITE {
                // Lives forever.
                return false;
            }
            if self.current_activations >= lifetime.activations_until_expiry {
                return true;
            }
        }

        if lifetime.blocks_until_expiry != TIME_INFINITE
            && self.current_blocks >= lifetime.blocks_until_expiry
        {
            return true;
        }

        if self.duration_time_steps == TIME_INFINITE {
            return false;
        }

        self.current_time_steps >= self.duration_time_steps
    }

    /// Last captured magnitude, zero if never captured.
    pub fn captured_value(&self) -> FixedPoint {
        self.captured_effect_value.unwrap_or(FixedPoint::ZERO)
    }

    /// Evaluates the magnitude expression and stores the result in
    /// `captured_effect_value`.
    ///
    /// Static-frequency effects read live stats; dynamic effects read the
    /// previous-live stats from the world cache. When the effect is a buff
    /// or debuff on stat X and the expression reads the receiver, this
    /// instance's previous captured value is backed out of X first, so a
    /// periodically re-captured "N% of my own buffed stat" can never
    /// compound itself.
    ///
    /// Unresolvable data sources degrade the captured value to zero and
    /// log a diagnostic; capture never fails outward.
    pub fn capture_effect_value(&mut self, env: &ExpressionEnv<'_>, receiver_id: EntityId) {
        let referenced = self.effect_data.expression.required_sources();
        let use_previous_live_stats = !self.effect_data.has_static_frequency();

        let entity_data = |id: EntityId| -> Result<EntityDataForExpression, CaptureError> {
            let stats = env.stats()?;
            let base = stats
                .base_stats(id)
                .ok_or(CaptureError::EntityNotFound(id))?;
            let live = if use_previous_live_stats {
                stats.previous_live_stats(id)
            } else {
                stats.live_stats(id)
            }
            .ok_or(CaptureError::EntityNotFound(id))?;
            Ok(EntityDataForExpression {
                stats: FullStatsData { base, live },
                synergies: stats.synergies(id),
            })
        };

        let mut all_requirements_available = true;
        let mut stats_source = ExpressionStatsSource::default();

        // The receiver snapshot is always assembled, whether or not the
        // expression reads it.
        match entity_data(receiver_id) {
            Ok(mut receiver_data) => {
                if referenced.contains(DataSourceSet::RECEIVER) {
                    match self.effect_data.type_id {
                        EffectTypeId::Buff(stat) => {
                            let without_self = receiver_data.stats.live.get(stat) - self.captured_value();
                            receiver_data.stats.live.set(stat, without_self);
                        }
                        EffectTypeId::Debuff(stat) => {
                            let without_self = receiver_data.stats.live.get(stat) + self.captured_value();
                            receiver_data.stats.live.set(stat, without_self);
                        }
                        ref type_id => {
                            error!(effect_type = %type_id, "unsupported effect type for value capture");
                        }
                    }
                }
                stats_source.set(DataSource::Receiver, receiver_data);
            }
            Err(err) => {
                warn!(receiver = %receiver_id, %err, "failed to get receiver stats for value capture");
                all_requirements_available = false;
            }
        }

        if referenced.contains(DataSourceSet::SENDER) {
            match entity_data(self.combat_unit_sender_id) {
                Ok(sender_data) => stats_source.set(DataSource::Sender, sender_data),
                Err(err) => {
                    warn!(sender = %self.combat_unit_sender_id, %err, "failed to get sender stats for value capture");
                    all_requirements_available = false;
                }
            }
        }

        if referenced.contains(DataSourceSet::SENDER_FOCUS) {
            let focus_id = env
                .focus()
                .ok()
                .and_then(|focus| focus.focus_target(self.combat_unit_sender_id))
                .filter(|id| {
                    env.stats()
                        .map(|stats| stats.has_entity(*id))
                        .unwrap_or(false)
                });

            match focus_id.map(entity_data) {
                Some(Ok(focus_data)) => stats_source.set(DataSource::SenderFocus, focus_data),
                Some(Err(err)) => {
                    warn!(sender = %self.combat_unit_sender_id, %err, "failed to get stats of sender current focus");
                    all_requirements_available = false;
                }
                None => {
                    let err = CaptureError::SenderFocusUnavailable(self.combat_unit_sender_id);
                    warn!(%err, "failed to get stats of sender current focus");
                    all_requirements_available = false;
                }
            }
        }

        self.captured_effect_value = Some(if all_requirements_available {
            self.effect_data.expression.evaluate(&stats_source)
        } else {
            FixedPoint::ZERO
        });
    }
}

impl fmt::Display for AttachedEffectState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{type = {}, combat_unit_sender_id = {}, children = {}, state = {}",
            self.effect_data.type_id,
            self.combat_unit_sender_id,
            self.children.len(),
            self.lifecycle,
        )?;

        if self.is_consumable() {
            write!(
                f,
                ", current_activations = {}, activations_until_expiry = {}",
                self.current_activations, self.effect_data.lifetime.activations_until_expiry
            )?;
        }

        if self.effect_data.lifetime.blocks_until_expiry != TIME_INFINITE {
            write!(
                f,
                ", current_blocks = {}, blocks_until_expiry = {}",
                self.current_blocks, self.effect_data.lifetime.blocks_until_expiry
            )?;
        }

        write!(
            f,
            ", current_time_steps = {}, duration_time_steps = {}, current_stacks_count = {}, captured_value = {}}}",
            self.current_time_steps,
            self.duration_time_steps,
            self.current_stacks_count,
            self.captured_value(),
        )
    }
}
