/// Simulation configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// How often over-time effects activate by default, in milliseconds.
    pub default_effect_frequency_ms: i32,
}

impl SimConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum number of entries in an Immune effect's allow list.
    /// An empty list means immunity to everything.
    pub const MAX_IMMUNED_TYPES: usize = 8;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_EFFECT_FREQUENCY_MS: i32 = 100;

    pub fn new() -> Self {
        Self {
            default_effect_frequency_ms: Self::DEFAULT_EFFECT_FREQUENCY_MS,
        }
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::new()
    }
}
