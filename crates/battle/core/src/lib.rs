//! Deterministic status-effect engine for the battle simulation.
//!
//! This crate models everything a combatant can have attached to it during
//! a battle: buffs, debuffs, states, conditions, over-time effects, and the
//! bookkeeping around their lifetimes. It is pure state and rules. The tick
//! driver, combat resolution, and entity framework live in outer crates and
//! reach in through the oracle traits in [`env`].
//!
//! Determinism is the governing constraint. All arithmetic uses the
//! [`stats::FixedPoint`] type, every collection iterates in a
//! platform-independent order, and the same inputs always produce the same
//! attached-effect timeline.
//!
//! # Layout
//! - [`stats`]: fixed-point arithmetic, stat tables, synergies
//! - [`effect`]: effect definitions, the type-id taxonomy, value expressions
//! - [`attached`]: runtime instances and the per-combatant container
//! - [`env`]: oracle seams to the surrounding world
//! - [`time`]: time-step conversions

pub mod attached;
pub mod config;
pub mod effect;
pub mod entity;
pub mod env;
pub mod stats;
pub mod time;

pub use attached::{
    AbilityGrouping, AttachedEffectState, AttachedEffectsComponent, EffectArena, EffectHandle,
    EffectLifecycle,
};
pub use config::SimConfig;
pub use effect::{
    ConditionType, DamageType, DataSource, DataSourceSet, EffectData, EffectExpression,
    EffectLifetime, EffectType, EffectTypeId, EntityDataForExpression, ExpressionStatsSource,
    HealType, NegativeState, Operation, OverlapProcessType, PlaneChange, PositiveState,
};
pub use entity::EntityId;
pub use env::{CaptureError, ExpressionEnv, FocusOracle, OracleError, RemovalQueue, StatsOracle};
pub use stats::{
    FixedPoint, FullStatsData, StatEvaluationType, StatType, StatsData, SynergyId, SynergySet,
};
pub use time::{MS_PER_TIME_STEP, TIME_INFINITE, ms_to_time_steps, time_steps_to_ms};
