//! Traits describing the world collaborators this crate consumes.
//!
//! The entity/component framework that owns combatants lives outside this
//! crate. Value capture and deferred removal only touch it through the
//! oracle seams defined here, so the engine stays testable with plain
//! in-memory fakes.

use crate::attached::EffectHandle;
use crate::entity::EntityId;
use crate::stats::{StatsData, SynergySet};

/// Read access to per-entity statistics and synergies.
pub trait StatsOracle {
    /// Whether the entity currently exists in the world.
    fn has_entity(&self, id: EntityId) -> bool;

    /// Template stats before live aggregation.
    fn base_stats(&self, id: EntityId) -> Option<StatsData>;

    /// Stats after aggregation for the current time step.
    fn live_stats(&self, id: EntityId) -> Option<StatsData>;

    /// Live stats as of the previous time step, from the world cache.
    /// Dynamic (periodically re-captured) effects read these to avoid
    /// ordering dependencies within one step.
    fn previous_live_stats(&self, id: EntityId) -> Option<StatsData>;

    /// Synergy stacks of the entity; empty set when none.
    fn synergies(&self, id: EntityId) -> SynergySet {
        let _ = id;
        SynergySet::new()
    }
}

/// Resolves the current focus target of a sender.
pub trait FocusOracle {
    fn focus_target(&self, sender: EntityId) -> Option<EntityId>;
}

/// Deferred-removal collaborator.
///
/// Callers that want an effect gone on a later time step hand the request
/// to the effect-management system instead of mutating the container
/// directly; see `AttachedEffectsComponent::remove_negative_state_next_time_step`.
pub trait RemovalQueue {
    fn remove_attached_effect(&mut self, entity: EntityId, effect: EffectHandle, delay_time_steps: i32);
}

/// A required oracle was not provided to the environment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    #[error("stats oracle not available")]
    StatsNotAvailable,
    #[error("focus oracle not available")]
    FocusNotAvailable,
}

/// Why a value capture could not resolve all of its data sources.
///
/// Capture never propagates these: they are logged and the captured value
/// degrades to zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CaptureError {
    #[error(transparent)]
    Oracle(#[from] OracleError),
    #[error("entity {0} has no stats in the world")]
    EntityNotFound(EntityId),
    #[error("sender {0} has no valid focus target")]
    SenderFocusUnavailable(EntityId),
}

/// Aggregates the oracles value capture needs.
#[derive(Clone, Copy)]
pub struct ExpressionEnv<'a> {
    stats: Option<&'a dyn StatsOracle>,
    focus: Option<&'a dyn FocusOracle>,
}

impl<'a> ExpressionEnv<'a> {
    pub fn new(stats: Option<&'a dyn StatsOracle>, focus: Option<&'a dyn FocusOracle>) -> Self {
        Self { stats, focus }
    }

    pub fn with_all(stats: &'a dyn StatsOracle, focus: &'a dyn FocusOracle) -> Self {
        Self::new(Some(stats), Some(focus))
    }

    pub fn empty() -> Self {
        Self::new(None, None)
    }

    /// Returns the stats oracle, or an error if not available.
    pub fn stats(&self) -> Result<&'a dyn StatsOracle, OracleError> {
        self.stats.ok_or(OracleError::StatsNotAvailable)
    }

    /// Returns the focus oracle, or an error if not available.
    pub fn focus(&self) -> Result<&'a dyn FocusOracle, OracleError> {
        self.focus.ok_or(OracleError::FocusNotAvailable)
    }
}
