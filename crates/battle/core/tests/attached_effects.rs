//! End-to-end scenarios for the attached-effects engine, driven through
//! fake world oracles the way the outer simulation crates drive it.

use std::collections::BTreeMap;

use battle_core::{
    AttachedEffectState, AttachedEffectsComponent, EffectData, EffectExpression, EffectHandle,
    EffectTypeId, EntityId, ExpressionEnv, FixedPoint, FocusOracle, NegativeState, RemovalQueue,
    StatType, StatsData, StatsOracle, TIME_INFINITE,
};

/// Minimal world: per-entity stat tables the test mutates between steps.
#[derive(Default)]
struct FakeWorld {
    base: BTreeMap<EntityId, StatsData>,
    live: BTreeMap<EntityId, StatsData>,
    previous_live: BTreeMap<EntityId, StatsData>,
    focus: BTreeMap<EntityId, EntityId>,
}

impl FakeWorld {
    fn spawn(&mut self, id: EntityId, base: StatsData) {
        self.base.insert(id, base);
        self.live.insert(id, base);
        self.previous_live.insert(id, base);
    }
}

impl StatsOracle for FakeWorld {
    fn has_entity(&self, id: EntityId) -> bool {
        self.base.contains_key(&id)
    }

    fn base_stats(&self, id: EntityId) -> Option<StatsData> {
        self.base.get(&id).copied()
    }

    fn live_stats(&self, id: EntityId) -> Option<StatsData> {
        self.live.get(&id).copied()
    }

    fn previous_live_stats(&self, id: EntityId) -> Option<StatsData> {
        self.previous_live.get(&id).copied()
    }
}

impl FocusOracle for FakeWorld {
    fn focus_target(&self, sender: EntityId) -> Option<EntityId> {
        self.focus.get(&sender).copied()
    }
}

#[derive(Default)]
struct RecordingQueue {
    requests: Vec<(EntityId, EffectHandle, i32)>,
}

impl RemovalQueue for RecordingQueue {
    fn remove_attached_effect(&mut self, entity: EntityId, effect: EffectHandle, delay_time_steps: i32) {
        self.requests.push((entity, effect, delay_time_steps));
    }
}

const RECEIVER: EntityId = EntityId(1);
const SENDER: EntityId = EntityId(2);
const FOCUS: EntityId = EntityId(3);

#[test]
fn periodic_self_referential_buff_does_not_compound() {
    let mut world = FakeWorld::default();
    world.spawn(
        RECEIVER,
        StatsData::new().with(StatType::AttackSpeed, FixedPoint::from_int(100)),
    );

    // 5% of the receiver's own attack speed, re-captured every step.
    let mut state = AttachedEffectState::new(
        SENDER,
        EffectData::buff(
            StatType::AttackSpeed,
            EffectExpression::percentage_of_receiver_stat(5, StatType::AttackSpeed),
            TIME_INFINITE,
        ),
        "swift_strikes",
    );

    for _ in 0..5 {
        state.capture_effect_value(&ExpressionEnv::new(Some(&world), None), RECEIVER);
        assert_eq!(state.captured_value(), FixedPoint::from_int(5));

        // The world aggregates the buff into live stats after each step.
        let buffed = FixedPoint::from_int(100) + state.captured_value();
        world
            .live
            .get_mut(&RECEIVER)
            .unwrap()
            .set(StatType::AttackSpeed, buffed);
        world.previous_live.insert(RECEIVER, world.live[&RECEIVER]);
    }
}

#[test]
fn static_frequency_reads_live_stats_dynamic_reads_previous() {
    let mut world = FakeWorld::default();
    world.spawn(
        RECEIVER,
        StatsData::new().with(StatType::MaxHealth, FixedPoint::from_int(500)),
    );
    world.spawn(
        SENDER,
        StatsData::new().with(StatType::MaxHealth, FixedPoint::from_int(1000)),
    );
    // Diverge the two layers for the sender so the test can tell which one
    // capture consulted.
    world
        .live
        .get_mut(&SENDER)
        .unwrap()
        .set(StatType::MaxHealth, FixedPoint::from_int(2000));

    let expression = EffectExpression::percentage_of_sender_stat(10, StatType::MaxHealth);

    let mut static_capture = AttachedEffectState::new(
        SENDER,
        EffectData::damage_over_time(
            battle_core::DamageType::Pure,
            expression.clone(),
            4000,
        )
        .with_frequency_ms(0),
        "rend",
    );
    static_capture.capture_effect_value(&ExpressionEnv::new(Some(&world), None), RECEIVER);
    assert_eq!(static_capture.captured_value(), FixedPoint::from_int(200));

    let mut dynamic_capture = AttachedEffectState::new(
        SENDER,
        EffectData::damage_over_time(battle_core::DamageType::Pure, expression, 4000)
            .with_frequency_ms(100),
        "rend",
    );
    dynamic_capture.capture_effect_value(&ExpressionEnv::new(Some(&world), None), RECEIVER);
    assert_eq!(dynamic_capture.captured_value(), FixedPoint::from_int(100));
}

#[test]
fn missing_sender_focus_degrades_captured_value_to_zero() {
    let mut world = FakeWorld::default();
    world.spawn(RECEIVER, StatsData::new());
    world.spawn(SENDER, StatsData::new());

    let mut state = AttachedEffectState::new(
        SENDER,
        EffectData::damage_over_time(
            battle_core::DamageType::Energy,
            EffectExpression::sender_focus_stat(StatType::MaxHealth),
            4000,
        ),
        "spite",
    );

    // No focus target registered for the sender.
    state.capture_effect_value(&ExpressionEnv::with_all(&world, &world), RECEIVER);
    assert_eq!(state.captured_value(), FixedPoint::ZERO);

    // Once a focus exists the same instance captures normally.
    world.spawn(
        FOCUS,
        StatsData::new().with(StatType::MaxHealth, FixedPoint::from_int(750)),
    );
    world.focus.insert(SENDER, FOCUS);
    state.capture_effect_value(&ExpressionEnv::with_all(&world, &world), RECEIVER);
    assert_eq!(state.captured_value(), FixedPoint::from_int(750));
}

#[test]
fn deferred_destruction_keeps_instance_until_its_time_step() {
    let mut component = AttachedEffectsComponent::new(RECEIVER);
    let handle = component.attach_active(AttachedEffectState::new(
        SENDER,
        EffectData::negative_state(NegativeState::Stun, 2000),
        "concussion",
    ));

    // Destroyed at step 5 with a two-step grace window.
    component.mark_destroyed(handle, 5, 2);
    assert!(!component.has_negative_state(NegativeState::Stun));
    assert!(component.get(handle).is_some_and(|s| s.is_pending_erasure()));

    component.erase_destroyed_effects(5, false);
    component.erase_destroyed_effects(6, false);
    assert_eq!(component.attached_effects(), &[handle]);

    component.erase_destroyed_effects(7, false);
    assert!(component.attached_effects().is_empty());
    assert!(component.get(handle).is_none());
}

#[test]
fn negative_delay_erases_on_next_sweep() {
    let mut component = AttachedEffectsComponent::new(RECEIVER);
    let handle = component.attach_active(AttachedEffectState::new(
        SENDER,
        EffectData::negative_state(NegativeState::Blind, 2000),
        "flashbang",
    ));

    component.mark_destroyed(handle, 5, -1);
    component.erase_destroyed_effects(5, false);
    assert!(component.get(handle).is_none());
}

#[test]
fn battle_end_sweep_ignores_grace_windows() {
    let mut component = AttachedEffectsComponent::new(RECEIVER);
    let handle = component.attach_active(AttachedEffectState::new(
        SENDER,
        EffectData::negative_state(NegativeState::Root, 2000),
        "entangle",
    ));

    component.mark_destroyed(handle, 5, 100);
    component.erase_destroyed_effects(5, true);
    assert!(component.get(handle).is_none());
}

#[test]
fn children_are_destroyed_and_erased_with_their_parent() {
    let mut component = AttachedEffectsComponent::new(RECEIVER);
    let parent = component.attach_active(AttachedEffectState::new(
        SENDER,
        EffectData::new(EffectTypeId::Empower, EffectExpression::value(0)),
        "warcry",
    ));
    let child = component
        .attach_child(
            parent,
            AttachedEffectState::new(
                SENDER,
                EffectData::buff(StatType::AttackSpeed, EffectExpression::value(10), 2000),
                "warcry",
            ),
        )
        .unwrap();
    component.add_to_active(child);
    assert!(component.has_buff_for(StatType::AttackSpeed));

    component.mark_destroyed(parent, 3, 0);
    assert!(!component.has_buff_for(StatType::AttackSpeed));

    component.erase_destroyed_effects(3, false);
    assert!(component.get(parent).is_none());
    assert!(component.get(child).is_none());
}

#[test]
fn removal_queue_drives_next_step_negative_state_removal() {
    let mut component = AttachedEffectsComponent::new(RECEIVER);
    let stunned_1 = component.attach_active(AttachedEffectState::new(
        SENDER,
        EffectData::negative_state(NegativeState::Stun, TIME_INFINITE),
        "hammer_blow",
    ));
    let stunned_2 = component.attach_active(AttachedEffectState::new(
        EntityId(9),
        EffectData::negative_state(NegativeState::Stun, TIME_INFINITE),
        "shockwave",
    ));
    component.attach_active(AttachedEffectState::new(
        SENDER,
        EffectData::negative_state(NegativeState::Silenced, TIME_INFINITE),
        "gag_order",
    ));

    let mut queue = RecordingQueue::default();
    component.remove_negative_state_next_time_step(NegativeState::Stun, &mut queue);
    assert_eq!(
        queue.requests,
        vec![(RECEIVER, stunned_1, 1), (RECEIVER, stunned_2, 1)]
    );

    // The effect-management system applies the requests on the current step.
    for (_, handle, delay) in queue.requests {
        component.mark_destroyed(handle, 10, delay);
    }
    assert!(!component.has_negative_state(NegativeState::Stun));
    assert!(component.has_negative_state(NegativeState::Silenced));

    component.erase_destroyed_effects(10, false);
    assert_eq!(component.attached_effects().len(), 3);
    component.erase_destroyed_effects(11, false);
    assert_eq!(component.attached_effects().len(), 1);
}

#[test]
fn identical_attach_sequences_produce_identical_timelines() {
    let build = || {
        let mut component = AttachedEffectsComponent::new(RECEIVER);
        for (sender, ability) in [(2u32, "venom"), (4, "venom"), (3, "plague")] {
            component.attach_active(AttachedEffectState::new(
                EntityId(sender),
                EffectData::damage_over_time(
                    battle_core::DamageType::Physical,
                    EffectExpression::value(7),
                    6000,
                ),
                ability,
            ));
        }
        component
    };

    let first = build();
    let second = build();
    assert_eq!(first.attached_effects(), second.attached_effects());
    assert_eq!(first.damages_over_time(), second.damages_over_time());

    let type_id = EffectTypeId::DamageOverTime(battle_core::DamageType::Physical);
    let first_grouping = first.root_effects_of_type_per_ability(&type_id);
    let second_grouping = second.root_effects_of_type_per_ability(&type_id);
    assert_eq!(first_grouping.same_ability, second_grouping.same_ability);
    assert_eq!(first_grouping.different_ability, second_grouping.different_ability);
    assert_eq!(first_grouping.total, 3);
}
