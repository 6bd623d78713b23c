//! Zone scorer: a deterministic weighted confluence sum clamped to [0, 100].
//! Every applied bonus/penalty appends its reason tag in evaluation order;
//! the ordered tag list is part of the observable contract.

use crate::analysis::context::MarketContext;
use crate::analysis::detectors::ZoneCandidate;
use crate::config::ANALYSIS;
use crate::domain::Direction;
use crate::models::{DivergenceSignal, PricePosition};

pub const TAG_FULL_ALIGNMENT: &str = "3-timeframe trend alignment";
pub const TAG_DUAL_ALIGNMENT: &str = "entry + mid timeframe alignment";
pub const TAG_ENTRY_ALIGNMENT: &str = "entry timeframe alignment";
pub const TAG_COUNTER_TREND: &str = "counter-trend";
pub const TAG_LIQUIDITY_SWEEP: &str = "liquidity sweep";
pub const TAG_STRUCTURAL_BREAK: &str = "structural break";
pub const TAG_DISPLACEMENT: &str = "displacement";
pub const TAG_UNICORN: &str = "unicorn overlap";
pub const TAG_PREMIUM_DISCOUNT: &str = "premium/discount alignment";
pub const TAG_DIVERGENCE: &str = "cross-asset divergence";

pub fn score_zone(
    candidate: &ZoneCandidate,
    ctx: &MarketContext,
    divergence: Option<&DivergenceSignal>,
) -> (u8, Vec<String>) {
    let w = &ANALYSIS.weights;
    let dir = candidate.direction;

    let mut score: i32 = 0;
    let mut confluence: Vec<String> = Vec::new();
    let mut apply = |points: i32, tag: &str| {
        score += points;
        confluence.push(tag.to_string());
    };

    // Timeframe alignment first; the counter-trend penalty can dominate
    if ctx.entry_trend.agrees_with(dir) {
        if ctx.mid_trend.agrees_with(dir) && ctx.high_trend.agrees_with(dir) {
            apply(w.full_alignment, TAG_FULL_ALIGNMENT);
        } else if ctx.mid_trend.agrees_with(dir) {
            apply(w.dual_alignment, TAG_DUAL_ALIGNMENT);
        } else {
            apply(w.entry_alignment, TAG_ENTRY_ALIGNMENT);
        }
    } else if ctx.entry_trend.opposes(dir) {
        apply(-w.counter_trend_penalty, TAG_COUNTER_TREND);
    }

    if candidate.swept_liquidity {
        apply(w.liquidity_sweep, TAG_LIQUIDITY_SWEEP);
    }
    if candidate.broke_structure {
        apply(w.structural_break, TAG_STRUCTURAL_BREAK);
    }
    if candidate.displacement {
        apply(w.displacement, TAG_DISPLACEMENT);
    }
    if candidate.unicorn {
        apply(w.unicorn_overlap, TAG_UNICORN);
    }

    // Bullish zones are better bought at a discount, bearish sold at a premium
    let discounted = matches!(
        (dir, ctx.price_position),
        (Direction::Bullish, PricePosition::Discount) | (Direction::Bearish, PricePosition::Premium)
    );
    if discounted {
        apply(w.premium_discount, TAG_PREMIUM_DISCOUNT);
    }

    if let Some(signal) = divergence
        && signal.direction == dir
        && signal.strength > 0.0
    {
        apply(w.divergence, TAG_DIVERGENCE);
    }

    (score.clamp(0, 100) as u8, confluence)
}
