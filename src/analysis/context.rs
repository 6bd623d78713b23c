//! Context builder: ATR, per-timeframe trend, volatility class, equilibrium,
//! session liquidity levels and the daily session phase. Computed once per
//! invocation before the detector pass.

use crate::config::{ANALYSIS, InstrumentProfile};
use crate::domain::{Candle, Trend};
use crate::models::{LevelStyle, LiquidityLevel, PricePosition, SessionPhase, VolatilityClass};
use crate::utils::maths_utils::{get_max, get_min, mean};
use crate::utils::time_utils::{SECS_PER_DAY, utc_day_start, utc_hour};

/// Everything the detectors and scorer read but never write.
#[derive(Debug, Clone)]
pub struct MarketContext {
    pub atr: f64,
    pub entry_trend: Trend,
    pub mid_trend: Trend,
    pub high_trend: Trend,
    pub volatility: VolatilityClass,
    /// Midpoint of the 50-bar highest-high / lowest-low range
    pub equilibrium: f64,
    pub price_position: PricePosition,
    pub session: SessionPhase,
    pub levels: Vec<LiquidityLevel>,
    // Raw reference prices kept separately so the sweep detector does not
    // have to parse labels back out of the level list
    pub prior_day_high: Option<f64>,
    pub prior_day_low: Option<f64>,
    pub session_high: Option<f64>,
    pub session_low: Option<f64>,
}

/// Build the context for one invocation. The caller has already verified
/// `entry.len() >= ANALYSIS.min_candles_for_analysis`.
pub fn build_context(
    entry: &[Candle],
    mid: &[Candle],
    high_tf: &[Candle],
    instrument: &InstrumentProfile,
) -> MarketContext {
    let cfg = &ANALYSIS.context;
    let last = entry[entry.len() - 1];

    let atr = average_true_range(entry, cfg.atr_period);

    let entry_trend = trend_over(entry, cfg.entry_trend_lookback);
    let mid_trend = htf_trend(mid, entry_trend);
    let high_trend = htf_trend(high_tf, entry_trend);

    let volatility = if atr < instrument.volatility_low_threshold {
        VolatilityClass::Low
    } else if atr > instrument.volatility_high_threshold {
        VolatilityClass::High
    } else {
        VolatilityClass::Medium
    };

    let tail = &entry[entry.len() - cfg.equilibrium_lookback..];
    let highs: Vec<f64> = tail.iter().map(|c| c.high).collect();
    let lows: Vec<f64> = tail.iter().map(|c| c.low).collect();
    let equilibrium = (get_max(&highs) + get_min(&lows)) / 2.0;
    let price_position = if last.close > equilibrium {
        PricePosition::Premium
    } else {
        PricePosition::Discount
    };

    let session = SessionPhase::from_utc_hour(utc_hour(last.time));

    let day_start = utc_day_start(last.time);
    let prior_day = range_extremes(entry, day_start - SECS_PER_DAY, day_start);
    let session_range = range_extremes(
        entry,
        day_start,
        day_start + (cfg.session_range_end_hour as i64) * 3600,
    );
    let session_open = entry.iter().find(|c| c.time >= day_start).map(|c| c.open);

    let mut levels = Vec::new();
    if let Some((pdh, pdl)) = prior_day {
        levels.push(LiquidityLevel::new(pdh, "Prev Day High", LevelStyle::Solid));
        levels.push(LiquidityLevel::new(pdl, "Prev Day Low", LevelStyle::Solid));
    }
    if let Some((sh, sl)) = session_range {
        levels.push(LiquidityLevel::new(sh, "Session High", LevelStyle::Dashed));
        levels.push(LiquidityLevel::new(sl, "Session Low", LevelStyle::Dashed));
    }
    if let Some(open) = session_open {
        levels.push(LiquidityLevel::new(open, "Session Open", LevelStyle::Dotted));
    }

    MarketContext {
        atr,
        entry_trend,
        mid_trend,
        high_trend,
        volatility,
        equilibrium,
        price_position,
        session,
        levels,
        prior_day_high: prior_day.map(|(h, _)| h),
        prior_day_low: prior_day.map(|(_, l)| l),
        session_high: session_range.map(|(h, _)| h),
        session_low: session_range.map(|(_, l)| l),
    }
}

/// Simple (non-exponential) mean of true range over the last `period` bars
fn average_true_range(candles: &[Candle], period: usize) -> f64 {
    let start = candles.len() - period;
    let ranges: Vec<f64> = (start..candles.len())
        .map(|i| candles[i].true_range(candles[i - 1].close))
        .collect();
    mean(&ranges)
}

/// Sign of close[last] - open[last - lookback]
fn trend_over(candles: &[Candle], lookback: usize) -> Trend {
    let last = candles.len() - 1;
    Trend::from_delta(candles[last].close - candles[last - lookback].open)
}

/// Higher-timeframe trend on its own series, falling back to the entry
/// trend when the series is too short.
fn htf_trend(candles: &[Candle], fallback: Trend) -> Trend {
    let lookback = ANALYSIS.context.htf_trend_lookback;
    if candles.len() > lookback {
        trend_over(candles, lookback)
    } else {
        fallback
    }
}

/// (high, low) extremes over candles with `start <= time < end`
fn range_extremes(candles: &[Candle], start: i64, end: i64) -> Option<(f64, f64)> {
    let mut high = f64::NEG_INFINITY;
    let mut low = f64::INFINITY;
    let mut seen = false;
    for c in candles.iter().filter(|c| c.time >= start && c.time < end) {
        high = high.max(c.high);
        low = low.min(c.low);
        seen = true;
    }
    seen.then_some((high, low))
}
