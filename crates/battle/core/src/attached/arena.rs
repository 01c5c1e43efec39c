//! Generational arena owning attached-effect instances.
//!
//! External systems hold [`EffectHandle`]s instead of references, so a
//! handle kept across the deferred-destruction window can never dangle:
//! once the slot is reused the stale handle simply resolves to `None`.
//! Slot reuse follows a LIFO free list, which is deterministic.

use std::fmt;

use super::state::AttachedEffectState;

/// Stable identity of one attached-effect instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectHandle {
    index: u32,
    generation: u32,
}

impl fmt::Display for EffectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "effect@{}v{}", self.index, self.generation)
    }
}

#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct Slot {
    generation: u32,
    value: Option<AttachedEffectState>,
}

/// Owns every instance (roots and children) of one container.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl EffectArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, state: AttachedEffectState) -> EffectHandle {
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.value = Some(state);
                EffectHandle {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    value: Some(state),
                });
                EffectHandle {
                    index,
                    generation: 0,
                }
            }
        }
    }

    /// Frees the slot; the generation bump invalidates outstanding handles.
    pub fn remove(&mut self, handle: EffectHandle) -> Option<AttachedEffectState> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation || slot.value.is_none() {
            return None;
        }
        let state = slot.value.take();
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        state
    }

    pub fn get(&self, handle: EffectHandle) -> Option<&AttachedEffectState> {
        let slot = self.slots.get(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.value.as_ref()
    }

    pub fn get_mut(&mut self, handle: EffectHandle) -> Option<&mut AttachedEffectState> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.value.as_mut()
    }

    pub fn contains(&self, handle: EffectHandle) -> bool {
        self.get(handle).is_some()
    }

    /// Number of live instances.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
