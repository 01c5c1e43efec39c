//! Fixed-point numerics, stat tables and synergy stacks.
mod fixed;
mod synergy;
mod types;

pub use fixed::FixedPoint;
pub use synergy::{SynergyId, SynergySet};
pub use types::{FullStatsData, StatEvaluationType, StatType, StatsData};
