//! Attached-effect instances and their per-combatant container.

mod arena;
mod component;
mod state;

pub use arena::{EffectArena, EffectHandle};
pub use component::{AbilityGrouping, AttachedEffectsComponent};
pub use state::{AttachedEffectState, EffectLifecycle};
