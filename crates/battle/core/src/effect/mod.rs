//! Effect definitions: categories, identity, expressions and lifetimes.
mod data;
mod enums;
mod expression;
mod type_id;

pub use data::{EffectData, EffectLifetime};
pub use enums::{
    ConditionType, DamageType, HealType, NegativeState, OverlapProcessType, PlaneChange,
    PositiveState,
};
pub use expression::{
    DataSource, DataSourceSet, EffectExpression, EntityDataForExpression, ExpressionStatsSource,
    Operation,
};
pub use type_id::{EffectType, EffectTypeId};
