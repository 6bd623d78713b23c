use serde::{Deserialize, Serialize};

/// Direction of a zone, marker or structural trend flag
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display,
)]
pub enum Direction {
    Bullish,
    Bearish,
}

/// Directional trend of a timeframe. Unlike [`Direction`] this can be flat:
/// a flat trend neither aligns with nor opposes a zone.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display,
)]
pub enum Trend {
    Bullish,
    Bearish,
    Flat,
}

impl Trend {
    /// Trend from a price delta (sign test)
    pub fn from_delta(delta: f64) -> Trend {
        if delta > 0.0 {
            Trend::Bullish
        } else if delta < 0.0 {
            Trend::Bearish
        } else {
            Trend::Flat
        }
    }

    pub fn agrees_with(&self, direction: Direction) -> bool {
        matches!(
            (self, direction),
            (Trend::Bullish, Direction::Bullish) | (Trend::Bearish, Direction::Bearish)
        )
    }

    pub fn opposes(&self, direction: Direction) -> bool {
        matches!(
            (self, direction),
            (Trend::Bullish, Direction::Bearish) | (Trend::Bearish, Direction::Bullish)
        )
    }
}
