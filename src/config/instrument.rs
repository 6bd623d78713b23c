//! Per-instrument calibration and engine behavior toggles

use serde::{Deserialize, Serialize};

/// Absolute ATR thresholds separating the volatility classes. These are
/// instrument-scale values: the defaults are calibrated for a major FX pair
/// quoted to four decimals and are meaningless for, say, an index future.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InstrumentProfile {
    // ATR below this is classed LOW
    pub volatility_low_threshold: f64,
    // ATR above this is classed HIGH
    pub volatility_high_threshold: f64,
}

impl Default for InstrumentProfile {
    fn default() -> Self {
        // EURUSD-style pip scale: 5 pips / 15 pips
        Self {
            volatility_low_threshold: 0.0005,
            volatility_high_threshold: 0.0015,
        }
    }
}

/// How zone outcomes are labeled.
///
/// `Retrospective` is the charting default: every
/// candidate is resolved against the entire supplied series, so recent zones
/// carry Win/Loss labels that only future candles justified. `Causal` still
/// resolves Fresh/Tested/Broken statuses (those are facts as of the last
/// supplied candle) but never assigns a Win/Loss outcome, so nothing in the
/// result claims a live predictive signal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelingMode {
    #[default]
    Retrospective,
    Causal,
}

/// Caller-supplied engine settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    pub instrument: InstrumentProfile,
    pub labeling: LabelingMode,
}
