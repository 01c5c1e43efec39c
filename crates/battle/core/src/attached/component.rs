//! Per-combatant container for attached effects.
//!
//! The container owns every instance attached to one combatant and keeps
//! two views of them: the canonical insertion-ordered list used for
//! iteration, grouping and the expiry sweep, and per-category indices used
//! by stat aggregation and targeting. An instance is reachable from a
//! category index iff it is logically active; after being marked Destroyed
//! it stays in the canonical list until the sweep erases it.
//!
//! All keyed indices are fixed-size arrays indexed by the sub-enum ordinal.
//! Nothing here iterates a hash map: replay-identical output requires that
//! every iteration order is a deterministic function of attach order.

use std::collections::BTreeMap;

use strum::EnumCount;

use crate::effect::{
    ConditionType, EffectType, EffectTypeId, NegativeState, PlaneChange, PositiveState,
};
use crate::entity::EntityId;
use crate::env::RemovalQueue;
use crate::stats::StatType;

use super::arena::{EffectArena, EffectHandle};
use super::state::{AttachedEffectState, EffectLifecycle};

// Every category must be wired into the dispatch below. If this assert
// fires, a new EffectTypeId variant was added without deciding where it
// is stored.
const _: () = assert!(EffectType::COUNT == 21);

/// Result of grouping same-type root effects by originating ability.
///
/// Abilities with at least two attached instances land in `same_ability`
/// (new casts of those abilities stack with their siblings); everything
/// else is tracked independently in `different_ability`.
#[derive(Clone, Debug, Default)]
pub struct AbilityGrouping {
    /// Ability name → all instances from that ability (two or more).
    pub same_ability: BTreeMap<String, Vec<EffectHandle>>,

    /// Instances whose ability name is unique among the matches.
    pub different_ability: Vec<EffectHandle>,

    /// Total number of matching root instances.
    pub total: usize,
}

/// All attached effects of one combatant, partitioned into category indices.
#[derive(Clone, Debug)]
pub struct AttachedEffectsComponent {
    owner: EntityId,

    arena: EffectArena,

    /// Canonical insertion-ordered list of all root instances, Active or
    /// pending erasure.
    attached_effects: Vec<EffectHandle>,

    active_positive_states: [Vec<EffectHandle>; PositiveState::COUNT],
    active_negative_states: [Vec<EffectHandle>; NegativeState::COUNT],
    active_plane_changes: [Vec<EffectHandle>; PlaneChange::COUNT],
    active_conditions: [Vec<EffectHandle>; ConditionType::COUNT],

    active_buffs: [Vec<EffectHandle>; StatType::COUNT],
    active_debuffs: [Vec<EffectHandle>; StatType::COUNT],

    active_empowers: Vec<EffectHandle>,
    active_disempowers: Vec<EffectHandle>,
    active_damages_over_time: Vec<EffectHandle>,
    active_energy_burns_over_time: Vec<EffectHandle>,
    active_energy_gains_over_time: Vec<EffectHandle>,
    active_heals_over_time: Vec<EffectHandle>,
    active_hyper_gains_over_time: Vec<EffectHandle>,
    active_hyper_burns_over_time: Vec<EffectHandle>,
    active_executes: Vec<EffectHandle>,
    active_blinks: Vec<EffectHandle>,
}

fn erase_value(bucket: &mut Vec<EffectHandle>, handle: EffectHandle) {
    bucket.retain(|existing| *existing != handle);
}

fn contains_value(bucket: &[EffectHandle], handle: EffectHandle) -> bool {
    bucket.contains(&handle)
}

/// Non-empty bucket as a slice, `None` once the last instance left it.
fn bucket_view(bucket: &[EffectHandle]) -> Option<&[EffectHandle]> {
    if bucket.is_empty() { None } else { Some(bucket) }
}

impl AttachedEffectsComponent {
    pub fn new(owner: EntityId) -> Self {
        Self {
            owner,
            arena: EffectArena::new(),
            attached_effects: Vec::new(),
            active_positive_states: std::array::from_fn(|_| Vec::new()),
            active_negative_states: std::array::from_fn(|_| Vec::new()),
            active_plane_changes: std::array::from_fn(|_| Vec::new()),
            active_conditions: std::array::from_fn(|_| Vec::new()),
            active_buffs: std::array::from_fn(|_| Vec::new()),
            active_debuffs: std::array::from_fn(|_| Vec::new()),
            active_empowers: Vec::new(),
            active_disempowers: Vec::new(),
            active_damages_over_time: Vec::new(),
            active_energy_burns_over_time: Vec::new(),
            active_energy_gains_over_time: Vec::new(),
            active_heals_over_time: Vec::new(),
            active_hyper_gains_over_time: Vec::new(),
            active_hyper_burns_over_time: Vec::new(),
            active_executes: Vec::new(),
            active_blinks: Vec::new(),
        }
    }

    pub fn owner(&self) -> EntityId {
        self.owner
    }

    // ========================================================================
    // Instance storage
    // ========================================================================

    /// Stores a new root instance and appends it to the canonical list.
    /// The instance is not indexed yet; call [`Self::add_to_active`].
    pub fn attach(&mut self, state: AttachedEffectState) -> EffectHandle {
        debug_assert!(state.parent.is_none(), "children are attached via attach_child");
        let handle = self.arena.insert(state);
        self.attached_effects.push(handle);
        handle
    }

    /// Stores and immediately indexes a new root instance.
    pub fn attach_active(&mut self, state: AttachedEffectState) -> EffectHandle {
        let handle = self.attach(state);
        self.add_to_active(handle);
        handle
    }

    /// Stores a nested instance under `parent`. Children never enter the
    /// canonical list; their lifetime is handled by the parent.
    pub fn attach_child(
        &mut self,
        parent: EffectHandle,
        mut state: AttachedEffectState,
    ) -> Option<EffectHandle> {
        if !self.arena.contains(parent) {
            return None;
        }
        state.parent = Some(parent);
        let handle = self.arena.insert(state);
        if let Some(parent_state) = self.arena.get_mut(parent) {
            parent_state.children.push(handle);
        }
        Some(handle)
    }

    pub fn get(&self, handle: EffectHandle) -> Option<&AttachedEffectState> {
        self.arena.get(handle)
    }

    pub fn get_mut(&mut self, handle: EffectHandle) -> Option<&mut AttachedEffectState> {
        self.arena.get_mut(handle)
    }

    /// The canonical insertion-ordered list of root instances.
    pub fn attached_effects(&self) -> &[EffectHandle] {
        &self.attached_effects
    }

    // ========================================================================
    // Category index dispatch
    // ========================================================================

    /// Indexes the instance into its category bucket, preserving attach
    /// order. Instant (non-attached) kinds are deliberately a no-op.
    pub fn add_to_active(&mut self, handle: EffectHandle) {
        let Some(type_id) = self.arena.get(handle).map(|state| state.effect_data.type_id) else {
            return;
        };

        match type_id {
            EffectTypeId::PositiveState(state) => {
                self.active_positive_states[state as usize].push(handle);
            }
            EffectTypeId::NegativeState(state) => {
                self.active_negative_states[state as usize].push(handle);
            }
            EffectTypeId::Buff(stat) => self.active_buffs[stat.as_index()].push(handle),
            EffectTypeId::Debuff(stat) => self.active_debuffs[stat.as_index()].push(handle),
            EffectTypeId::PlaneChange(plane) => {
                self.active_plane_changes[plane as usize].push(handle);
            }
            EffectTypeId::Condition(condition) => {
                self.active_conditions[condition as usize].push(handle);
            }
            EffectTypeId::Empower => self.active_empowers.push(handle),
            EffectTypeId::Disempower => self.active_disempowers.push(handle),
            EffectTypeId::DamageOverTime(_) => self.active_damages_over_time.push(handle),
            EffectTypeId::EnergyBurnOverTime => self.active_energy_burns_over_time.push(handle),
            EffectTypeId::EnergyGainOverTime => self.active_energy_gains_over_time.push(handle),
            EffectTypeId::HealOverTime(_) => self.active_heals_over_time.push(handle),
            EffectTypeId::HyperGainOverTime => self.active_hyper_gains_over_time.push(handle),
            EffectTypeId::HyperBurnOverTime => self.active_hyper_burns_over_time.push(handle),
            EffectTypeId::Execute => self.active_executes.push(handle),
            EffectTypeId::Blink => self.active_blinks.push(handle),

            EffectTypeId::InstantDamage(_)
            | EffectTypeId::InstantHeal(_)
            | EffectTypeId::InstantEnergyBurn
            | EffectTypeId::InstantEnergyGain
            | EffectTypeId::Cleanse => {}
        }
    }

    /// Removes the instance from its category bucket by identity.
    /// Idempotent: removing an absent instance is a no-op, because under
    /// deferred destruction a caller cannot always know the membership.
    pub fn remove_from_active(&mut self, handle: EffectHandle) {
        let Some(type_id) = self.arena.get(handle).map(|state| state.effect_data.type_id) else {
            return;
        };

        match type_id {
            EffectTypeId::PositiveState(state) => {
                erase_value(&mut self.active_positive_states[state as usize], handle);
            }
            EffectTypeId::NegativeState(state) => {
                erase_value(&mut self.active_negative_states[state as usize], handle);
            }
            EffectTypeId::Buff(stat) => erase_value(&mut self.active_buffs[stat.as_index()], handle),
            EffectTypeId::Debuff(stat) => {
                erase_value(&mut self.active_debuffs[stat.as_index()], handle);
            }
            EffectTypeId::PlaneChange(plane) => {
                erase_value(&mut self.active_plane_changes[plane as usize], handle);
            }
            EffectTypeId::Condition(condition) => {
                erase_value(&mut self.active_conditions[condition as usize], handle);
            }
            EffectTypeId::Empower => erase_value(&mut self.active_empowers, handle),
            EffectTypeId::Disempower => erase_value(&mut self.active_disempowers, handle),
            EffectTypeId::DamageOverTime(_) => {
                erase_value(&mut self.active_damages_over_time, handle);
            }
            EffectTypeId::EnergyBurnOverTime => {
                erase_value(&mut self.active_energy_burns_over_time, handle);
            }
            EffectTypeId::EnergyGainOverTime => {
                erase_value(&mut self.active_energy_gains_over_time, handle);
            }
            EffectTypeId::HealOverTime(_) => erase_value(&mut self.active_heals_over_time, handle),
            EffectTypeId::HyperGainOverTime => {
                erase_value(&mut self.active_hyper_gains_over_time, handle);
            }
            EffectTypeId::HyperBurnOverTime => {
                erase_value(&mut self.active_hyper_burns_over_time, handle);
            }
            EffectTypeId::Execute => erase_value(&mut self.active_executes, handle),
            EffectTypeId::Blink => erase_value(&mut self.active_blinks, handle),

            EffectTypeId::InstantDamage(_)
            | EffectTypeId::InstantHeal(_)
            | EffectTypeId::InstantEnergyBurn
            | EffectTypeId::InstantEnergyGain
            | EffectTypeId::Cleanse => {}
        }
    }

    /// Category-aware membership predicate; false for instant kinds.
    pub fn is_in_active(&self, handle: EffectHandle) -> bool {
        let Some(type_id) = self.arena.get(handle).map(|state| state.effect_data.type_id) else {
            return false;
        };

        match type_id {
            EffectTypeId::PositiveState(state) => {
                contains_value(&self.active_positive_states[state as usize], handle)
            }
            EffectTypeId::NegativeState(state) => {
                contains_value(&self.active_negative_states[state as usize], handle)
            }
            EffectTypeId::Buff(stat) => contains_value(&self.active_buffs[stat.as_index()], handle),
            EffectTypeId::Debuff(stat) => {
                contains_value(&self.active_debuffs[stat.as_index()], handle)
            }
            EffectTypeId::PlaneChange(plane) => {
                contains_value(&self.active_plane_changes[plane as usize], handle)
            }
            EffectTypeId::Condition(condition) => {
                contains_value(&self.active_conditions[condition as usize], handle)
            }
            EffectTypeId::Empower => contains_value(&self.active_empowers, handle),
            EffectTypeId::Disempower => contains_value(&self.active_disempowers, handle),
            EffectTypeId::DamageOverTime(_) => {
                contains_value(&self.active_damages_over_time, handle)
            }
            EffectTypeId::EnergyBurnOverTime => {
                contains_value(&self.active_energy_burns_over_time, handle)
            }
            EffectTypeId::EnergyGainOverTime => {
                contains_value(&self.active_energy_gains_over_time, handle)
            }
            EffectTypeId::HealOverTime(_) => contains_value(&self.active_heals_over_time, handle),
            EffectTypeId::HyperGainOverTime => {
                contains_value(&self.active_hyper_gains_over_time, handle)
            }
            EffectTypeId::HyperBurnOverTime => {
                contains_value(&self.active_hyper_burns_over_time, handle)
            }
            EffectTypeId::Execute => contains_value(&self.active_executes, handle),
            EffectTypeId::Blink => contains_value(&self.active_blinks, handle),

            EffectTypeId::InstantDamage(_)
            | EffectTypeId::InstantHeal(_)
            | EffectTypeId::InstantEnergyBurn
            | EffectTypeId::InstantEnergyGain
            | EffectTypeId::Cleanse => false,
        }
    }

    // ========================================================================
    // Bucket accessors
    // ========================================================================

    pub fn positive_states(&self, state: PositiveState) -> Option<&[EffectHandle]> {
        bucket_view(&self.active_positive_states[state as usize])
    }

    pub fn negative_states(&self, state: NegativeState) -> Option<&[EffectHandle]> {
        bucket_view(&self.active_negative_states[state as usize])
    }

    pub fn plane_changes(&self, plane: PlaneChange) -> Option<&[EffectHandle]> {
        bucket_view(&self.active_plane_changes[plane as usize])
    }

    pub fn conditions(&self, condition: ConditionType) -> Option<&[EffectHandle]> {
        bucket_view(&self.active_conditions[condition as usize])
    }

    pub fn buffs(&self, stat: StatType) -> Option<&[EffectHandle]> {
        bucket_view(&self.active_buffs[stat.as_index()])
    }

    pub fn debuffs(&self, stat: StatType) -> Option<&[EffectHandle]> {
        bucket_view(&self.active_debuffs[stat.as_index()])
    }

    pub fn empowers(&self) -> &[EffectHandle] {
        &self.active_empowers
    }

    pub fn disempowers(&self) -> &[EffectHandle] {
        &self.active_disempowers
    }

    pub fn damages_over_time(&self) -> &[EffectHandle] {
        &self.active_damages_over_time
    }

    pub fn energy_burns_over_time(&self) -> &[EffectHandle] {
        &self.active_energy_burns_over_time
    }

    pub fn energy_gains_over_time(&self) -> &[EffectHandle] {
        &self.active_energy_gains_over_time
    }

    pub fn heals_over_time(&self) -> &[EffectHandle] {
        &self.active_heals_over_time
    }

    pub fn hyper_gains_over_time(&self) -> &[EffectHandle] {
        &self.active_hyper_gains_over_time
    }

    pub fn hyper_burns_over_time(&self) -> &[EffectHandle] {
        &self.active_hyper_burns_over_time
    }

    pub fn executes(&self) -> &[EffectHandle] {
        &self.active_executes
    }

    pub fn blinks(&self) -> &[EffectHandle] {
        &self.active_blinks
    }

    // ========================================================================
    // Presence predicates
    // ========================================================================

    pub fn has_positive_state(&self, state: PositiveState) -> bool {
        self.positive_states(state).is_some()
    }

    pub fn has_negative_state(&self, state: NegativeState) -> bool {
        self.negative_states(state).is_some()
    }

    pub fn has_plane_change(&self, plane: PlaneChange) -> bool {
        self.plane_changes(plane).is_some()
    }

    pub fn has_condition(&self, condition: ConditionType) -> bool {
        self.conditions(condition).is_some()
    }

    pub fn has_buff_for(&self, stat: StatType) -> bool {
        self.buffs(stat).is_some()
    }

    pub fn has_debuff_for(&self, stat: StatType) -> bool {
        self.debuffs(stat).is_some()
    }

    pub fn has_energy_burn(&self) -> bool {
        !self.active_energy_burns_over_time.is_empty()
    }

    pub fn has_execute(&self) -> bool {
        !self.active_executes.is_empty()
    }

    pub fn has_blink(&self) -> bool {
        !self.active_blinks.is_empty()
    }

    // ========================================================================
    // Immunity
    // ========================================================================

    /// True iff an active Immune positive state covers `type_id`. An Immune
    /// instance with an empty allow list is immune to everything.
    pub fn has_immunity_to(&self, type_id: &EffectTypeId) -> bool {
        let Some(immunes) = self.positive_states(PositiveState::Immune) else {
            return false;
        };

        immunes
            .iter()
            .filter_map(|handle| self.arena.get(*handle))
            .any(|state| {
                state.effect_data.immuned_effect_types.is_empty()
                    || state.effect_data.immuned_effect_types.contains(type_id)
            })
    }

    pub fn has_immunity_to_negative_state(&self, state: NegativeState) -> bool {
        self.has_immunity_to(&EffectTypeId::NegativeState(state))
    }

    pub fn has_non_immunized_negative_state(&self, state: NegativeState) -> bool {
        self.has_negative_state(state) && !self.has_immunity_to_negative_state(state)
    }

    /// True iff any active Immune instance has an empty allow list.
    pub fn has_immunity_to_all_detrimental_effects(&self) -> bool {
        self.positive_states(PositiveState::Immune)
            .is_some_and(|immunes| {
                immunes
                    .iter()
                    .filter_map(|handle| self.arena.get(*handle))
                    .any(|state| state.effect_data.immuned_effect_types.is_empty())
            })
    }

    // ========================================================================
    // Cleanse queries
    // ========================================================================

    fn collect_cleansable<'a>(
        &self,
        buckets: impl IntoIterator<Item = &'a Vec<EffectHandle>>,
    ) -> Vec<EffectHandle> {
        let mut cleansable = Vec::new();
        for bucket in buckets {
            for handle in bucket {
                if self
                    .arena
                    .get(*handle)
                    .is_some_and(AttachedEffectState::can_cleanse)
                {
                    cleansable.push(*handle);
                }
            }
        }
        cleansable
    }

    /// Fresh snapshot of all cleansable debuffs; safe to iterate while the
    /// caller removes entries from the live store.
    pub fn all_cleansable_debuffs(&self) -> Vec<EffectHandle> {
        self.collect_cleansable(&self.active_debuffs)
    }

    pub fn all_cleansable_negative_states(&self) -> Vec<EffectHandle> {
        self.collect_cleansable(&self.active_negative_states)
    }

    pub fn all_cleansable_conditions(&self) -> Vec<EffectHandle> {
        self.collect_cleansable(&self.active_conditions)
    }

    pub fn all_cleansable_dots(&self) -> Vec<EffectHandle> {
        self.collect_cleansable([&self.active_damages_over_time])
    }

    pub fn all_cleansable_energy_burns_over_time(&self) -> Vec<EffectHandle> {
        self.collect_cleansable([&self.active_energy_burns_over_time])
    }

    // ========================================================================
    // Grouping
    // ========================================================================

    /// Groups all root, active instances of `type_id` by ability name.
    ///
    /// Two passes: the first filters and tallies occurrence counts per
    /// ability name; the second buckets every instance whose ability name
    /// tallied at least twice into `same_ability` and the rest into
    /// `different_ability`. Only root effects are considered, as the
    /// lifetime of children is handled by their parent.
    pub fn root_effects_of_type_per_ability(&self, type_id: &EffectTypeId) -> AbilityGrouping {
        let mut same_type: Vec<(EffectHandle, &str)> = Vec::new();
        let mut ability_name_counts: BTreeMap<&str, usize> = BTreeMap::new();

        for handle in &self.attached_effects {
            let Some(state) = self.arena.get(*handle) else {
                continue;
            };
            if !state.is_root() || !state.is_valid() {
                continue;
            }
            if state.effect_data.type_id == *type_id {
                same_type.push((*handle, state.ability_name.as_str()));
                *ability_name_counts.entry(state.ability_name.as_str()).or_default() += 1;
            }
        }

        let mut grouping = AbilityGrouping {
            total: same_type.len(),
            ..AbilityGrouping::default()
        };

        for (handle, ability_name) in same_type {
            if ability_name_counts.get(ability_name).copied().unwrap_or(0) >= 2 {
                grouping
                    .same_ability
                    .entry(ability_name.to_owned())
                    .or_default()
                    .push(handle);
            } else {
                grouping.different_ability.push(handle);
            }
        }

        grouping
    }

    // ========================================================================
    // Destruction
    // ========================================================================

    /// The `Active → Destroyed` transition: un-indexes the instance (and
    /// its children) immediately and records when the sweep may erase it.
    ///
    /// A negative `delay_time_steps` requests erasure on the very next
    /// sweep, with no grace tick.
    pub fn mark_destroyed(
        &mut self,
        handle: EffectHandle,
        current_time_step: i32,
        delay_time_steps: i32,
    ) {
        let Some(state) = self.arena.get(handle) else {
            return;
        };
        if state.is_pending_erasure() {
            return;
        }

        self.remove_from_active(handle);

        let children = self.arena.get(handle).map(|state| state.children.clone());
        for child in children.into_iter().flatten() {
            self.mark_destroyed(child, current_time_step, delay_time_steps);
        }

        let time_step_when_destroy = if delay_time_steps < 0 {
            -1
        } else {
            current_time_step + delay_time_steps
        };
        if let Some(state) = self.arena.get_mut(handle) {
            state.lifecycle = EffectLifecycle::Destroyed;
            state.time_step_when_destroy = time_step_when_destroy;
        }
    }

    /// End-of-step sweep: physically erases Destroyed instances whose grace
    /// period has elapsed. With `always_destroy_delayed` every Destroyed
    /// instance goes regardless of its recorded time step.
    pub fn erase_destroyed_effects(&mut self, current_time_step: i32, always_destroy_delayed: bool) {
        let mut erased: Vec<EffectHandle> = Vec::new();

        self.attached_effects.retain(|handle| {
            let Some(state) = self.arena.get(*handle) else {
                // Not in the arena anymore; drop the dangling entry.
                return false;
            };
            if state.lifecycle != EffectLifecycle::Destroyed {
                return true;
            }

            let must_be_destroyed = always_destroy_delayed
                || state.time_step_when_destroy < 0
                || current_time_step >= state.time_step_when_destroy;
            if must_be_destroyed {
                erased.push(*handle);
            }
            !must_be_destroyed
        });

        for handle in erased {
            let children = self
                .arena
                .get(handle)
                .map(|state| state.children.clone())
                .unwrap_or_default();
            for child in children {
                self.arena.remove(child);
            }
            self.arena.remove(handle);
        }
    }

    /// Requests destruction of every active instance of `state` through the
    /// effect-management collaborator, delayed by one time step.
    pub fn remove_negative_state_next_time_step(
        &self,
        negative_state: NegativeState,
        queue: &mut dyn RemovalQueue,
    ) {
        // On the next time step.
        const DESTROY_DELAY: i32 = 1;

        let Some(states_to_remove) = self.negative_states(negative_state) else {
            return;
        };
        for handle in states_to_remove.to_vec() {
            queue.remove_attached_effect(self.owner, handle, DESTROY_DELAY);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::{DamageType, EffectData, EffectExpression, HealType};
    use crate::time::TIME_INFINITE;
    use strum::IntoEnumIterator;

    fn component() -> AttachedEffectsComponent {
        AttachedEffectsComponent::new(EntityId(7))
    }

    fn instance(type_id: EffectTypeId) -> AttachedEffectState {
        AttachedEffectState::new(
            EntityId(1),
            EffectData::new(type_id, EffectExpression::value(1)).with_duration_ms(2000),
            "some_ability",
        )
    }

    fn every_attachable_type_id() -> Vec<EffectTypeId> {
        let mut type_ids = Vec::new();
        for state in PositiveState::iter() {
            type_ids.push(EffectTypeId::PositiveState(state));
        }
        for state in NegativeState::iter() {
            type_ids.push(EffectTypeId::NegativeState(state));
        }
        for plane in PlaneChange::iter() {
            type_ids.push(EffectTypeId::PlaneChange(plane));
        }
        for condition in ConditionType::iter() {
            type_ids.push(EffectTypeId::Condition(condition));
        }
        for stat in StatType::iter() {
            type_ids.push(EffectTypeId::Buff(stat));
            type_ids.push(EffectTypeId::Debuff(stat));
        }
        type_ids.extend([
            EffectTypeId::Empower,
            EffectTypeId::Disempower,
            EffectTypeId::DamageOverTime(DamageType::Physical),
            EffectTypeId::EnergyBurnOverTime,
            EffectTypeId::EnergyGainOverTime,
            EffectTypeId::HealOverTime(HealType::Normal),
            EffectTypeId::HyperGainOverTime,
            EffectTypeId::HyperBurnOverTime,
            EffectTypeId::Execute,
            EffectTypeId::Blink,
        ]);
        type_ids
    }

    #[test]
    fn category_round_trip_for_every_type() {
        for type_id in every_attachable_type_id() {
            let mut component = component();
            let handle = component.attach(instance(type_id));
            assert!(!component.is_in_active(handle), "{type_id}");

            component.add_to_active(handle);
            assert!(component.is_in_active(handle), "{type_id}");

            component.remove_from_active(handle);
            assert!(!component.is_in_active(handle), "{type_id}");
        }
    }

    #[test]
    fn instant_kinds_never_index() {
        let mut component = component();
        let handle = component.attach(instance(EffectTypeId::Cleanse));
        component.add_to_active(handle);
        assert!(!component.is_in_active(handle));
    }

    #[test]
    fn removing_absent_instance_is_a_noop() {
        let mut component = component();
        let handle = component.attach(instance(EffectTypeId::Execute));
        component.remove_from_active(handle);
        component.remove_from_active(handle);
        assert!(!component.is_in_active(handle));
    }

    #[test]
    fn keyed_bucket_disappears_when_emptied() {
        let mut component = component();
        let handle =
            component.attach_active(instance(EffectTypeId::NegativeState(NegativeState::Stun)));
        assert!(component.has_negative_state(NegativeState::Stun));

        component.remove_from_active(handle);
        assert!(component.negative_states(NegativeState::Stun).is_none());
        assert!(!component.has_negative_state(NegativeState::Stun));
    }

    #[test]
    fn buckets_preserve_attach_order() {
        let mut component = component();
        let first = component.attach_active(instance(EffectTypeId::Execute));
        let second = component.attach_active(instance(EffectTypeId::Execute));
        let third = component.attach_active(instance(EffectTypeId::Execute));
        assert_eq!(component.executes(), &[first, second, third]);

        component.remove_from_active(second);
        assert_eq!(component.executes(), &[first, third]);
    }

    #[test]
    fn same_ability_grouping_threshold() {
        let type_id = EffectTypeId::DamageOverTime(DamageType::Pure);
        let mut component = component();
        let from_a_1 = component.attach_active(AttachedEffectState::new(
            EntityId(1),
            EffectData::new(type_id, EffectExpression::value(5)),
            "ability_a",
        ));
        let from_a_2 = component.attach_active(AttachedEffectState::new(
            EntityId(2),
            EffectData::new(type_id, EffectExpression::value(5)),
            "ability_a",
        ));
        let from_b = component.attach_active(AttachedEffectState::new(
            EntityId(3),
            EffectData::new(type_id, EffectExpression::value(5)),
            "ability_b",
        ));
        // Different type id, must not be counted.
        component.attach_active(instance(EffectTypeId::Execute));

        let grouping = component.root_effects_of_type_per_ability(&type_id);
        assert_eq!(grouping.total, 3);
        assert_eq!(grouping.same_ability.len(), 1);
        assert_eq!(grouping.same_ability["ability_a"], vec![from_a_1, from_a_2]);
        assert_eq!(grouping.different_ability, vec![from_b]);
    }

    #[test]
    fn grouping_skips_destroyed_instances() {
        let type_id = EffectTypeId::Blink;
        let mut component = component();
        let kept = component.attach_active(instance(type_id));
        let destroyed = component.attach_active(instance(type_id));
        component.mark_destroyed(destroyed, 0, -1);

        let grouping = component.root_effects_of_type_per_ability(&type_id);
        assert_eq!(grouping.total, 1);
        assert_eq!(grouping.different_ability, vec![kept]);
    }

    #[test]
    fn absolute_immunity_covers_everything() {
        let mut component = component();
        component.attach_active(AttachedEffectState::new(
            EntityId(1),
            EffectData::immunity(TIME_INFINITE),
            "sanctuary",
        ));

        assert!(component.has_immunity_to(&EffectTypeId::NegativeState(NegativeState::Charm)));
        assert!(component.has_immunity_to(&EffectTypeId::Buff(StatType::AttackSpeed)));
        assert!(component.has_immunity_to_all_detrimental_effects());
    }

    #[test]
    fn targeted_immunity_covers_only_listed_types() {
        let mut component = component();
        component.attach_active(AttachedEffectState::new(
            EntityId(1),
            EffectData::immunity_to(
                [EffectTypeId::NegativeState(NegativeState::Root)],
                TIME_INFINITE,
            ),
            "unstoppable",
        ));

        assert!(component.has_immunity_to_negative_state(NegativeState::Root));
        assert!(!component.has_immunity_to(&EffectTypeId::Buff(StatType::AttackSpeed)));
        assert!(!component.has_immunity_to_negative_state(NegativeState::Stun));
        assert!(!component.has_immunity_to_all_detrimental_effects());
    }

    #[test]
    fn cleansable_filtering() {
        let mut component = component();
        let cleansable = component.attach_active(AttachedEffectState::new(
            EntityId(1),
            EffectData::debuff(StatType::AttackSpeed, EffectExpression::value(10), 4000),
            "chill",
        ));
        component.attach_active(AttachedEffectState::new(
            EntityId(1),
            EffectData::debuff(StatType::MoveSpeed, EffectExpression::value(10), 4000)
                .non_cleansable(),
            "permafrost",
        ));

        assert_eq!(component.all_cleansable_debuffs(), vec![cleansable]);
    }

    #[test]
    fn cleanse_skips_child_instances() {
        let mut component = component();
        let parent = component.attach_active(instance(EffectTypeId::Empower));
        let child = component
            .attach_child(
                parent,
                AttachedEffectState::new(
                    EntityId(1),
                    EffectData::debuff(StatType::AttackSpeed, EffectExpression::value(5), 4000),
                    "bundled_slow",
                ),
            )
            .unwrap();
        component.add_to_active(child);

        // The child is indexed for aggregation but not cleansable.
        assert!(component.is_in_active(child));
        assert!(component.all_cleansable_debuffs().is_empty());
    }
}
