use serde::{Deserialize, Serialize};

use crate::domain::{Direction, Trend};
use crate::models::liquidity::LiquidityLevel;

/// Volatility class from the ATR against the instrument's thresholds
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display,
)]
pub enum VolatilityClass {
    #[strum(serialize = "LOW")]
    Low,
    #[strum(serialize = "MEDIUM")]
    Medium,
    #[strum(serialize = "HIGH")]
    High,
}

/// Where the current close sits relative to the 50-bar equilibrium midpoint
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display,
)]
pub enum PricePosition {
    Premium,
    Discount,
}

/// Three-phase daily bucket derived purely from the current UTC hour,
/// independent of price action.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display,
)]
pub enum SessionPhase {
    Accumulation,
    Manipulation,
    Distribution,
}

impl SessionPhase {
    /// Fixed, non-overlapping hour ranges: 0-6 / 7-12 / 13-23 UTC
    pub fn from_utc_hour(hour: u32) -> SessionPhase {
        match hour {
            0..=6 => SessionPhase::Accumulation,
            7..=12 => SessionPhase::Manipulation,
            _ => SessionPhase::Distribution,
        }
    }
}

/// Cross-asset divergence signal supplied by the external correlation
/// service. Absence means "no alignment bonus", never an error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DivergenceSignal {
    pub direction: Direction,
    pub strength: f64,
}

/// Optional historical trade tally folded into the realized win-rate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeHistory {
    pub wins: u32,
    pub losses: u32,
}

/// Aggregate directional snapshot for one invocation. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiasSnapshot {
    pub entry_trend: Trend,
    pub mid_trend: Trend,
    pub high_trend: Trend,
    /// Structural-trend flag state after the detector pass
    pub structural_trend: Direction,
    pub price_position: PricePosition,
    pub volatility: VolatilityClass,
    pub session: SessionPhase,
    /// wins / (wins + losses) over resolved, high-scoring zones; None when
    /// nothing resolved
    pub win_rate: Option<f64>,
    pub levels: Vec<LiquidityLevel>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_phase_boundaries() {
        assert_eq!(SessionPhase::from_utc_hour(0), SessionPhase::Accumulation);
        assert_eq!(SessionPhase::from_utc_hour(6), SessionPhase::Accumulation);
        assert_eq!(SessionPhase::from_utc_hour(7), SessionPhase::Manipulation);
        assert_eq!(SessionPhase::from_utc_hour(12), SessionPhase::Manipulation);
        assert_eq!(SessionPhase::from_utc_hour(13), SessionPhase::Distribution);
        assert_eq!(SessionPhase::from_utc_hour(23), SessionPhase::Distribution);
    }
}
