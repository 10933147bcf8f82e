//! Tunables the engine reads on every settlement.

use serde::Deserialize;

/// What to do when a settlement would push a box counter (`sent` on trip
/// close, `empty` on truck empty) below zero.
///
/// Historical data carries boxes that were never recorded as dispatched, so
/// the default tolerates the drift: the counter is floored at zero and a
/// warning is logged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentDriftPolicy {
    #[default]
    Tolerate,
    Strict,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub sent_drift: SentDriftPolicy,
    /// Seller commission on the expected amount, in thousandths.
    pub commission_per_mille: i64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            sent_drift: SentDriftPolicy::Tolerate,
            commission_per_mille: 8,
        }
    }
}
