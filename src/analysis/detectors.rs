//! Event detectors: liquidity sweeps, imbalance gaps, structural breaks and
//! order blocks with displacement. One forward pass over the entry series;
//! each detector runs independently per index, reading the shared swing
//! tracker and emitting candidates/markers.

use crate::analysis::context::MarketContext;
use crate::analysis::swing::SwingTracker;
use crate::config::ANALYSIS;
use crate::domain::{Candle, Direction, Trend};
use crate::models::{MarkerIndex, MarkerKind, MarkerStrength, StructuralMarker, ZoneKind};

/// A zone candidate with the raw flags the scorer reads
#[derive(Debug, Clone)]
pub struct ZoneCandidate {
    pub kind: ZoneKind,
    pub direction: Direction,
    pub price_top: f64,
    pub price_bottom: f64,
    pub formed_index: usize,
    pub formed_at: i64,
    /// Origin candle swept the prior 5-candle extreme
    pub swept_liquidity: bool,
    pub displacement: bool,
    /// Displacement leg contains a nested qualifying imbalance gap
    pub unicorn: bool,
    /// A BOS/ChoCh fired inside the candidate's displacement window
    pub broke_structure: bool,
}

#[derive(Debug)]
pub struct DetectorOutput {
    pub candidates: Vec<ZoneCandidate>,
    pub markers: MarkerIndex,
    /// Structural-trend flag state after the pass
    pub structural_trend: Direction,
}

/// Run every detector over `entry`, index `warmup .. len - 2`.
pub fn run_detectors(entry: &[Candle], ctx: &MarketContext) -> DetectorOutput {
    let cfg = &ANALYSIS.detectors;
    let len = entry.len();

    let mut markers = MarkerIndex::new();
    let mut candidates: Vec<ZoneCandidate> = Vec::new();

    // Seed the structural flag from the entry trend so the first break
    // against the prevailing trend reads as a change of character.
    let seed = if ctx.entry_trend == Trend::Bearish {
        Direction::Bearish
    } else {
        Direction::Bullish
    };
    let mut tracker = SwingTracker::new(seed);

    for i in cfg.warmup_candles..len.saturating_sub(cfg.fractal_wing) {
        tracker.observe(entry, i);
        detect_sweep(entry, i, ctx, &mut markers);
        detect_imbalance(entry, i, ctx, &mut candidates);
        detect_structural_break(entry, i, ctx, &mut tracker, &mut markers);
        detect_order_block(entry, i, ctx, &mut candidates);
    }

    // Associate break markers with each candidate's displacement window
    for cand in candidates.iter_mut() {
        let window_end = (cand.formed_index + cfg.displacement_max_candles).min(len - 1);
        cand.broke_structure =
            markers.break_in_range(entry[cand.formed_index].time, entry[window_end].time);
    }

    log::debug!(
        "detector pass: {} candidates, {} markers, structural trend {}",
        candidates.len(),
        markers.len(),
        tracker.structural_trend
    );

    DetectorOutput {
        candidates,
        markers,
        structural_trend: tracker.structural_trend,
    }
}

/// Price pierces a reference level by less than one ATR and the candle
/// closes back through its open (rejection).
fn detect_sweep(entry: &[Candle], i: usize, ctx: &MarketContext, markers: &mut MarkerIndex) {
    let cfg = &ANALYSIS.detectors;
    let c = &entry[i];
    let max_overshoot = ctx.atr * cfg.sweep_max_overshoot_atr;

    // High-side sweep: stops above a high get harvested, price rejects down
    for level in [ctx.prior_day_high, ctx.session_high].into_iter().flatten() {
        if c.high > level && c.high - level < max_overshoot && c.close < c.open {
            if markers.any_within(c.time, cfg.sweep_dedup_secs) {
                return;
            }
            let strength = if c.close < level {
                MarkerStrength::Strong
            } else {
                MarkerStrength::Standard
            };
            markers.push(StructuralMarker {
                time: c.time,
                direction: Direction::Bearish,
                kind: MarkerKind::Sweep,
                strength,
            });
            return;
        }
    }

    // Low-side sweep
    for level in [ctx.prior_day_low, ctx.session_low].into_iter().flatten() {
        if c.low < level && level - c.low < max_overshoot && c.close > c.open {
            if markers.any_within(c.time, cfg.sweep_dedup_secs) {
                return;
            }
            let strength = if c.close > level {
                MarkerStrength::Strong
            } else {
                MarkerStrength::Standard
            };
            markers.push(StructuralMarker {
                time: c.time,
                direction: Direction::Bullish,
                kind: MarkerKind::Sweep,
                strength,
            });
            return;
        }
    }
}

/// 3-candle gap (FVG): candle `i`'s high below candle `i+2`'s low, or the
/// inverse, with gap size above half an ATR. Older imbalances are discarded
/// as stale.
fn detect_imbalance(
    entry: &[Candle],
    i: usize,
    ctx: &MarketContext,
    candidates: &mut Vec<ZoneCandidate>,
) {
    let cfg = &ANALYSIS.detectors;
    let len = entry.len();
    if i + 2 >= len {
        return;
    }
    // The zone belongs to the middle candle of the three
    let formed_index = i + 1;
    if formed_index + cfg.imbalance_recency_candles < len {
        return;
    }

    let min_gap = ctx.atr * cfg.imbalance_min_atr;
    let first = &entry[i];
    let third = &entry[i + 2];

    if third.low - first.high > min_gap {
        candidates.push(ZoneCandidate {
            kind: ZoneKind::BullishImbalance,
            direction: Direction::Bullish,
            price_top: third.low,
            price_bottom: first.high,
            formed_index,
            formed_at: entry[formed_index].time,
            swept_liquidity: false,
            displacement: false,
            unicorn: false,
            broke_structure: false,
        });
    } else if first.low - third.high > min_gap {
        candidates.push(ZoneCandidate {
            kind: ZoneKind::BearishImbalance,
            direction: Direction::Bearish,
            price_top: first.low,
            price_bottom: third.high,
            formed_index,
            formed_at: entry[formed_index].time,
            swept_liquidity: false,
            displacement: false,
            unicorn: false,
            broke_structure: false,
        });
    }
}

/// Close decisively clears the tracked swing in the direction of the
/// candle's body: BOS when the structural flag agrees, ChoCh when it
/// disagrees (flipping the flag). The consumed swing is cleared either way
/// so the same level cannot re-trigger.
fn detect_structural_break(
    entry: &[Candle],
    i: usize,
    ctx: &MarketContext,
    tracker: &mut SwingTracker,
    markers: &mut MarkerIndex,
) {
    let cfg = &ANALYSIS.detectors;
    let c = &entry[i];
    let buffer = ctx.atr * cfg.break_buffer_atr;
    let strong = ctx.atr * cfg.break_strong_atr;

    if let Some(swing_high) = tracker.last_swing_high
        && c.is_bullish()
        && c.close > swing_high + buffer
    {
        let kind = if tracker.structural_trend == Direction::Bullish {
            MarkerKind::Bos
        } else {
            tracker.structural_trend = Direction::Bullish;
            MarkerKind::Choch
        };
        tracker.consume_high();
        if !markers.break_within(c.time, cfg.break_dedup_secs) {
            let strength = if c.close > swing_high + strong {
                MarkerStrength::Strong
            } else {
                MarkerStrength::Standard
            };
            markers.push(StructuralMarker {
                time: c.time,
                direction: Direction::Bullish,
                kind,
                strength,
            });
        }
    }

    if let Some(swing_low) = tracker.last_swing_low
        && c.is_bearish()
        && c.close < swing_low - buffer
    {
        let kind = if tracker.structural_trend == Direction::Bearish {
            MarkerKind::Bos
        } else {
            tracker.structural_trend = Direction::Bearish;
            MarkerKind::Choch
        };
        tracker.consume_low();
        if !markers.break_within(c.time, cfg.break_dedup_secs) {
            let strength = if c.close < swing_low - strong {
                MarkerStrength::Strong
            } else {
                MarkerStrength::Standard
            };
            markers.push(StructuralMarker {
                time: c.time,
                direction: Direction::Bearish,
                kind,
                strength,
            });
        }
    }
}

/// Origin candle whose body runs counter to the following 1-3 candles,
/// where one follow-through candle displaces (body above 0.8 ATR, closing
/// beyond the origin extreme). Zone extremes are the origin candle's range.
fn detect_order_block(
    entry: &[Candle],
    i: usize,
    ctx: &MarketContext,
    candidates: &mut Vec<ZoneCandidate>,
) {
    let cfg = &ANALYSIS.detectors;
    let len = entry.len();
    let origin = &entry[i];
    // A zero-body origin has no counter direction
    if origin.body() == 0.0 {
        return;
    }
    let min_body = ctx.atr * cfg.displacement_body_atr;
    let last_follow = (i + cfg.displacement_max_candles).min(len - 1);

    if origin.is_bearish() {
        let mut leg_end = None;
        for j in (i + 1)..=last_follow {
            let c = &entry[j];
            if !c.is_bullish() {
                break;
            }
            if c.body() > min_body && c.close > origin.high {
                leg_end = Some(j);
                break;
            }
        }
        if let Some(j) = leg_end {
            let swept = prior_extreme_low(entry, i, cfg.origin_sweep_lookback)
                .is_some_and(|prior_low| origin.low < prior_low);
            let unicorn = leg_contains_bullish_gap(entry, i, j, ctx);
            candidates.push(ZoneCandidate {
                kind: if unicorn {
                    ZoneKind::UnicornSetup
                } else {
                    ZoneKind::BullishOrderBlock
                },
                direction: Direction::Bullish,
                price_top: origin.high,
                price_bottom: origin.low,
                formed_index: i,
                formed_at: origin.time,
                swept_liquidity: swept,
                displacement: true,
                unicorn,
                broke_structure: false,
            });
        }
    } else {
        let mut leg_end = None;
        for j in (i + 1)..=last_follow {
            let c = &entry[j];
            if !c.is_bearish() {
                break;
            }
            if c.body() > min_body && c.close < origin.low {
                leg_end = Some(j);
                break;
            }
        }
        if let Some(j) = leg_end {
            let swept = prior_extreme_high(entry, i, cfg.origin_sweep_lookback)
                .is_some_and(|prior_high| origin.high > prior_high);
            let unicorn = leg_contains_bearish_gap(entry, i, j, ctx);
            candidates.push(ZoneCandidate {
                kind: if unicorn {
                    ZoneKind::UnicornSetup
                } else {
                    ZoneKind::BearishOrderBlock
                },
                direction: Direction::Bearish,
                price_top: origin.high,
                price_bottom: origin.low,
                formed_index: i,
                formed_at: origin.time,
                swept_liquidity: swept,
                displacement: true,
                unicorn,
                broke_structure: false,
            });
        }
    }
}

fn prior_extreme_low(entry: &[Candle], i: usize, lookback: usize) -> Option<f64> {
    if i < lookback {
        return None;
    }
    entry[i - lookback..i]
        .iter()
        .map(|c| c.low)
        .fold(None, |acc: Option<f64>, low| {
            Some(acc.map_or(low, |a| a.min(low)))
        })
}

fn prior_extreme_high(entry: &[Candle], i: usize, lookback: usize) -> Option<f64> {
    if i < lookback {
        return None;
    }
    entry[i - lookback..i]
        .iter()
        .map(|c| c.high)
        .fold(None, |acc: Option<f64>, high| {
            Some(acc.map_or(high, |a| a.max(high)))
        })
}

/// Is there a qualifying bullish 3-candle gap anywhere inside the leg
/// `[start, end]`?
fn leg_contains_bullish_gap(entry: &[Candle], start: usize, end: usize, ctx: &MarketContext) -> bool {
    let min_gap = ctx.atr * ANALYSIS.detectors.imbalance_min_atr;
    (start..=end.saturating_sub(2)).any(|m| entry[m + 2].low - entry[m].high > min_gap)
}

fn leg_contains_bearish_gap(entry: &[Candle], start: usize, end: usize, ctx: &MarketContext) -> bool {
    let min_gap = ctx.atr * ANALYSIS.detectors.imbalance_min_atr;
    (start..=end.saturating_sub(2)).any(|m| entry[m].low - entry[m + 2].high > min_gap)
}
