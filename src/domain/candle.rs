use serde::{Deserialize, Serialize};

// Define the CandleType enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandleType {
    Bullish,
    Bearish,
}

/// A single OHLC bar. `time` is the bar's open timestamp in unix seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

// Implement methods for the Candle struct
impl Candle {
    // A constructor for convenience
    pub fn new(time: i64, open: f64, high: f64, low: f64, close: f64) -> Self {
        Candle {
            time,
            open,
            high,
            low,
            close,
        }
    }

    // A method to determine the type of candle
    pub fn get_type(&self) -> CandleType {
        if self.close >= self.open {
            CandleType::Bullish
        } else {
            CandleType::Bearish
        }
    }

    pub fn is_bullish(&self) -> bool {
        self.get_type() == CandleType::Bullish
    }

    pub fn is_bearish(&self) -> bool {
        self.get_type() == CandleType::Bearish
    }

    /// Absolute size of the candle body
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    // Returns the low and high of the candle body as a tuple
    pub fn body_range(&self) -> (f64, f64) {
        match self.get_type() {
            CandleType::Bullish => (self.open, self.close),
            CandleType::Bearish => (self.close, self.open),
        }
    }

    /// True range against the previous candle's close
    pub fn true_range(&self, prev_close: f64) -> f64 {
        let hl = self.high - self.low;
        let hc = (self.high - prev_close).abs();
        let lc = (self.low - prev_close).abs();
        hl.max(hc).max(lc)
    }

    /// Does the candle's full range intersect `[bottom, top]`?
    pub fn intersects(&self, bottom: f64, top: f64) -> bool {
        self.low <= top && self.high >= bottom
    }
}
