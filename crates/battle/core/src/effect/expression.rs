//! Fixed-point effect magnitude expressions.
//!
//! An [`EffectExpression`] is a small tree evaluated against a snapshot of
//! sender/receiver/sender-focus statistics. Evaluation is pure: the caller
//! (value capture) is responsible for assembling the snapshot and for
//! deciding what happens when a required data source cannot be resolved.

use crate::stats::{FixedPoint, FullStatsData, StatEvaluationType, StatType, SynergyId, SynergySet};

/// Named data sources an expression operand can read from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumCount)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DataSource {
    /// The entity the effect is attached to.
    Receiver,
    /// The combat unit that attached the effect.
    Sender,
    /// Whoever the sender is currently focusing.
    SenderFocus,
}

impl DataSource {
    const fn as_index(self) -> usize {
        self as usize
    }

    pub const fn as_set(self) -> DataSourceSet {
        match self {
            Self::Receiver => DataSourceSet::RECEIVER,
            Self::Sender => DataSourceSet::SENDER,
            Self::SenderFocus => DataSourceSet::SENDER_FOCUS,
        }
    }
}

bitflags::bitflags! {
    /// Set of data sources an expression requires to evaluate.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct DataSourceSet: u8 {
        const RECEIVER = 1 << 0;
        const SENDER = 1 << 1;
        const SENDER_FOCUS = 1 << 2;
    }
}

/// Everything an expression can read about one entity.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityDataForExpression {
    pub stats: FullStatsData,
    pub synergies: SynergySet,
}

/// Snapshot of all entity data assembled for one evaluation.
#[derive(Clone, Debug, Default)]
pub struct ExpressionStatsSource {
    sources: [Option<EntityDataForExpression>; 3],
}

impl ExpressionStatsSource {
    pub fn set(&mut self, source: DataSource, data: EntityDataForExpression) {
        self.sources[source.as_index()] = Some(data);
    }

    pub fn get(&self, source: DataSource) -> Option<&EntityDataForExpression> {
        self.sources[source.as_index()].as_ref()
    }

    pub fn contains(&self, required: DataSourceSet) -> bool {
        !(required.contains(DataSourceSet::RECEIVER) && self.get(DataSource::Receiver).is_none()
            || required.contains(DataSourceSet::SENDER) && self.get(DataSource::Sender).is_none()
            || required.contains(DataSourceSet::SENDER_FOCUS)
                && self.get(DataSource::SenderFocus).is_none())
    }
}

/// Combining operation over sub-expressions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Operation {
    Add,
    Sub,
    Mul,
    Div,
    Min,
    Max,
}

/// Expression tree resolving an effect's numeric magnitude.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectExpression {
    /// Fixed literal value.
    Value(FixedPoint),

    /// A stat read from one data source.
    Stat {
        stat: StatType,
        evaluation: StatEvaluationType,
        source: DataSource,
    },

    /// A percentage of a stat read from one data source.
    StatPercentage {
        percent: FixedPoint,
        stat: StatType,
        evaluation: StatEvaluationType,
        source: DataSource,
    },

    /// Stack count of a synergy on one data source.
    SynergyCount {
        synergy: SynergyId,
        source: DataSource,
    },

    /// Operation over two or more sub-expressions.
    Operation {
        op: Operation,
        operands: Vec<EffectExpression>,
    },
}

impl EffectExpression {
    /// Literal whole-number magnitude.
    pub fn value(value: i64) -> Self {
        Self::Value(FixedPoint::from_int(value))
    }

    /// `percent`% of the receiver's live `stat`.
    pub fn percentage_of_receiver_stat(percent: i64, stat: StatType) -> Self {
        Self::StatPercentage {
            percent: FixedPoint::from_int(percent),
            stat,
            evaluation: StatEvaluationType::Live,
            source: DataSource::Receiver,
        }
    }

    /// `percent`% of the sender's live `stat`.
    pub fn percentage_of_sender_stat(percent: i64, stat: StatType) -> Self {
        Self::StatPercentage {
            percent: FixedPoint::from_int(percent),
            stat,
            evaluation: StatEvaluationType::Live,
            source: DataSource::Sender,
        }
    }

    /// The sender-focus live `stat`.
    pub fn sender_focus_stat(stat: StatType) -> Self {
        Self::Stat {
            stat,
            evaluation: StatEvaluationType::Live,
            source: DataSource::SenderFocus,
        }
    }

    /// Every data source this expression reads.
    pub fn required_sources(&self) -> DataSourceSet {
        match self {
            Self::Value(_) => DataSourceSet::empty(),
            Self::Stat { source, .. }
            | Self::StatPercentage { source, .. }
            | Self::SynergyCount { source, .. } => source.as_set(),
            Self::Operation { operands, .. } => operands
                .iter()
                .fold(DataSourceSet::empty(), |set, operand| {
                    set | operand.required_sources()
                }),
        }
    }

    /// Evaluates the expression against an assembled snapshot.
    ///
    /// Missing data sources and division by zero degrade to zero; callers
    /// that need to distinguish "zero" from "unresolvable" check
    /// [`ExpressionStatsSource::contains`] first.
    pub fn evaluate(&self, stats_source: &ExpressionStatsSource) -> FixedPoint {
        match self {
            Self::Value(value) => *value,

            Self::Stat {
                stat,
                evaluation,
                source,
            } => stats_source
                .get(*source)
                .map(|data| data.stats.get(*stat, *evaluation))
                .unwrap_or(FixedPoint::ZERO),

            Self::StatPercentage {
                percent,
                stat,
                evaluation,
                source,
            } => stats_source
                .get(*source)
                .map(|data| percent.percentage_of(data.stats.get(*stat, *evaluation)))
                .unwrap_or(FixedPoint::ZERO),

            Self::SynergyCount { synergy, source } => stats_source
                .get(*source)
                .map(|data| FixedPoint::from_int(i64::from(data.synergies.count(*synergy))))
                .unwrap_or(FixedPoint::ZERO),

            Self::Operation { op, operands } => {
                let mut values = operands.iter().map(|operand| operand.evaluate(stats_source));
                let Some(first) = values.next() else {
                    return FixedPoint::ZERO;
                };
                values.fold(first, |acc, value| match op {
                    Operation::Add => acc + value,
                    Operation::Sub => acc - value,
                    Operation::Mul => acc * value,
                    Operation::Div => acc / value,
                    Operation::Min => acc.min(value),
                    Operation::Max => acc.max(value),
                })
            }
        }
    }
}
