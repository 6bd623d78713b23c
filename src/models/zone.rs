use serde::{Deserialize, Serialize};

use crate::domain::Direction;

/// What pattern produced the zone
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display,
)]
pub enum ZoneKind {
    #[strum(serialize = "Bullish Order Block")]
    BullishOrderBlock,
    #[strum(serialize = "Bearish Order Block")]
    BearishOrderBlock,
    #[strum(serialize = "Bullish Imbalance")]
    BullishImbalance,
    #[strum(serialize = "Bearish Imbalance")]
    BearishImbalance,
    /// Order block whose displacement leg also contains an imbalance gap
    #[strum(serialize = "Unicorn Setup")]
    UnicornSetup,
}

impl ZoneKind {
    /// Stable id prefix, combined with the formation candle index
    pub fn id_prefix(&self) -> &'static str {
        match self {
            ZoneKind::BullishOrderBlock | ZoneKind::BearishOrderBlock => "ob",
            ZoneKind::BullishImbalance | ZoneKind::BearishImbalance => "fvg",
            ZoneKind::UnicornSetup => "uni",
        }
    }
}

/// Lifecycle status. Transitions only ever move forward:
/// Fresh -> Tested -> Broken.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display,
)]
pub enum ZoneStatus {
    Fresh,
    Tested,
    Broken,
}

/// Realized outcome from the forward scan (lookahead labeling)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display,
)]
pub enum ZoneOutcome {
    Unresolved,
    Win,
    Loss,
}

/// A detected supply/demand region with its lifecycle and confluence score.
/// Produced fresh on every invocation; the caller owns the collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: String,
    pub kind: ZoneKind,
    pub direction: Direction,
    pub price_top: f64,
    pub price_bottom: f64,
    /// Candle time of formation (unix seconds)
    pub formed_at: i64,
    pub status: ZoneStatus,
    pub outcome: ZoneOutcome,
    /// Time of the first re-entry, when the zone has been tested
    pub first_tested_at: Option<i64>,
    /// Confluence-weighted score, 0..=100
    pub score: u8,
    /// Human-readable reason tags, in evaluation order
    pub confluence: Vec<String>,
}

impl Zone {
    pub fn midpoint(&self) -> f64 {
        (self.price_top + self.price_bottom) / 2.0
    }

    pub fn height(&self) -> f64 {
        self.price_top - self.price_bottom
    }

    pub fn contains(&self, price: f64) -> bool {
        price >= self.price_bottom && price <= self.price_top
    }
}
