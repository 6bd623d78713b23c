//! Zone lifecycle resolver.
//!
//! Each candidate is scanned forward over every candle after its formation
//! index, to the end of the supplied series. This is deliberate lookahead:
//! the labels are retrospective chart annotations, not live signals. The
//! causal labeling mode keeps the status transitions (facts as of the last
//! supplied candle) but never assigns a Win/Loss outcome.

use crate::config::{ANALYSIS, LabelingMode};
use crate::domain::{Candle, Direction};
use crate::models::{ZoneOutcome, ZoneStatus};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LifecycleResolution {
    pub status: ZoneStatus,
    pub outcome: ZoneOutcome,
    pub first_tested_at: Option<i64>,
}

/// Resolve one zone against the candles after `formed_index`.
///
/// Status only ever moves forward (Fresh -> Tested -> Broken). The scan
/// stops as soon as an outcome is decided, so a zone that wins while Tested
/// keeps that status even if later candles would have broken it.
pub fn resolve(
    direction: Direction,
    price_top: f64,
    price_bottom: f64,
    formed_index: usize,
    candles: &[Candle],
    labeling: LabelingMode,
) -> LifecycleResolution {
    let midpoint = (price_top + price_bottom) / 2.0;
    let rr = ANALYSIS.output.target_reward_ratio;
    // Reward target from the midpoint, risking midpoint-to-far-edge
    let target = match direction {
        Direction::Bullish => midpoint + rr * (midpoint - price_bottom),
        Direction::Bearish => midpoint - rr * (price_top - midpoint),
    };

    let mut status = ZoneStatus::Fresh;
    let mut outcome = ZoneOutcome::Unresolved;
    let mut first_tested_at = None;

    for c in candles.iter().skip(formed_index + 1) {
        // A close fully through the zone invalidates it
        let broken = match direction {
            Direction::Bullish => c.close < price_bottom,
            Direction::Bearish => c.close > price_top,
        };
        if broken {
            status = ZoneStatus::Broken;
            if labeling == LabelingMode::Retrospective {
                outcome = ZoneOutcome::Loss;
            }
            break;
        }

        if status == ZoneStatus::Fresh && c.intersects(price_bottom, price_top) {
            status = ZoneStatus::Tested;
            first_tested_at = Some(c.time);
        }

        if status == ZoneStatus::Tested {
            let target_hit = match direction {
                Direction::Bullish => c.high >= target,
                Direction::Bearish => c.low <= target,
            };
            if target_hit {
                if labeling == LabelingMode::Retrospective {
                    outcome = ZoneOutcome::Win;
                }
                break;
            }
        }
    }

    LifecycleResolution {
        status,
        outcome,
        first_tested_at,
    }
}
