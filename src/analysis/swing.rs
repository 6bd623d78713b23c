//! 5-candle fractal swing tracking.
//!
//! The tracker keeps only the most recent confirmed swing high/low plus the
//! running structural-trend flag; it is the one piece of mutable state
//! threaded through the detector pass.

use crate::config::ANALYSIS;
use crate::domain::{Candle, Direction};

/// Index `center` is a swing high when its high strictly exceeds the two
/// candles on each side.
pub fn is_swing_high(candles: &[Candle], center: usize) -> bool {
    let wing = ANALYSIS.detectors.fractal_wing;
    if center < wing || center + wing >= candles.len() {
        return false;
    }
    let h = candles[center].high;
    (1..=wing).all(|k| h > candles[center - k].high && h > candles[center + k].high)
}

/// Symmetric fractal test on lows
pub fn is_swing_low(candles: &[Candle], center: usize) -> bool {
    let wing = ANALYSIS.detectors.fractal_wing;
    if center < wing || center + wing >= candles.len() {
        return false;
    }
    let l = candles[center].low;
    (1..=wing).all(|k| l < candles[center - k].low && l < candles[center + k].low)
}

#[derive(Debug, Clone)]
pub struct SwingTracker {
    /// Most recent confirmed swing high, cleared when a break consumes it
    pub last_swing_high: Option<f64>,
    pub last_swing_low: Option<f64>,
    /// Running structural-trend flag, flipped by ChoCh events
    pub structural_trend: Direction,
}

impl SwingTracker {
    pub fn new(seed: Direction) -> Self {
        Self {
            last_swing_high: None,
            last_swing_low: None,
            structural_trend: seed,
        }
    }

    /// Advance to loop index `i`. A fractal centered two candles back is
    /// fully confirmed once the loop reaches `i`, so only confirmed swings
    /// ever become reference levels.
    pub fn observe(&mut self, candles: &[Candle], i: usize) {
        let wing = ANALYSIS.detectors.fractal_wing;
        if i < 2 * wing {
            return;
        }
        let center = i - wing;
        if is_swing_high(candles, center) {
            self.last_swing_high = Some(candles[center].high);
        }
        if is_swing_low(candles, center) {
            self.last_swing_low = Some(candles[center].low);
        }
    }

    pub fn consume_high(&mut self) {
        self.last_swing_high = None;
    }

    pub fn consume_low(&mut self) {
        self.last_swing_low = None;
    }
}
