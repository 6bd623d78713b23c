//! Engine entry point. One `analyze` call is a pure function of its input:
//! no clocks, no I/O, no caches, so the same candles always produce the
//! same result.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::context::build_context;
use crate::analysis::detectors::run_detectors;
use crate::analysis::{lifecycle, scoring};
use crate::config::{ANALYSIS, EngineSettings};
use crate::domain::Candle;
use crate::models::{
    BiasSnapshot, DivergenceSignal, LiquidityLevel, StructuralMarker, TradeHistory, Zone,
    ZoneOutcome,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("invalid {series} series: {reason}")]
    InvalidInput {
        series: &'static str,
        reason: String,
    },
}

/// Three parallel OHLC views of the same instrument, ordered oldest first.
/// The divergence signal and trade history are optional caller-side inputs.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisInput<'a> {
    pub entry: &'a [Candle],
    pub mid: &'a [Candle],
    pub high: &'a [Candle],
    pub divergence: Option<DivergenceSignal>,
    pub history: Option<TradeHistory>,
}

/// Complete result of one invocation: four independent collections. Zones
/// are newest first, capped; the bias is `None` only when there was too
/// little data to analyze.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructureAnalysis {
    pub zones: Vec<Zone>,
    pub markers: Vec<StructuralMarker>,
    pub levels: Vec<LiquidityLevel>,
    pub bias: Option<BiasSnapshot>,
}

pub struct StructureEngine {
    settings: EngineSettings,
}

impl Default for StructureEngine {
    fn default() -> Self {
        Self::new(EngineSettings::default())
    }
}

impl StructureEngine {
    pub fn new(settings: EngineSettings) -> Self {
        Self { settings }
    }

    /// Run the full pipeline over one snapshot of candle data.
    ///
    /// Malformed candles are an error; a well-formed but short entry series
    /// yields an empty result instead.
    pub fn analyze(&self, input: &AnalysisInput<'_>) -> Result<StructureAnalysis, EngineError> {
        validate_series("entry", input.entry)?;
        validate_series("mid", input.mid)?;
        validate_series("high", input.high)?;

        if input.entry.len() < ANALYSIS.min_candles_for_analysis {
            log::info!(
                "skipping analysis: {} entry candles, need {}",
                input.entry.len(),
                ANALYSIS.min_candles_for_analysis
            );
            return Ok(StructureAnalysis::default());
        }

        let entry = input.entry;
        let ctx = build_context(entry, input.mid, input.high, &self.settings.instrument);
        let detected = run_detectors(entry, &ctx);

        let mut zones: Vec<Zone> = detected
            .candidates
            .iter()
            .map(|cand| {
                let resolution = lifecycle::resolve(
                    cand.direction,
                    cand.price_top,
                    cand.price_bottom,
                    cand.formed_index,
                    entry,
                    self.settings.labeling,
                );
                let (score, confluence) = scoring::score_zone(cand, &ctx, input.divergence.as_ref());
                Zone {
                    id: format!("{}-{}", cand.kind.id_prefix(), cand.formed_index),
                    kind: cand.kind,
                    direction: cand.direction,
                    price_top: cand.price_top,
                    price_bottom: cand.price_bottom,
                    formed_at: cand.formed_at,
                    status: resolution.status,
                    outcome: resolution.outcome,
                    first_tested_at: resolution.first_tested_at,
                    score,
                    confluence,
                }
            })
            .collect();

        // Win-rate is tallied over everything that resolved, before the
        // display filter throws low scorers away
        let win_rate = realized_win_rate(&zones, input.history);

        let out = &ANALYSIS.output;
        let recency_cutoff = entry[entry.len() - out.recency_override_candles].time;
        zones.retain(|z| z.score > out.min_zone_score || z.formed_at >= recency_cutoff);
        zones.sort_by_key(|z| std::cmp::Reverse(z.formed_at));
        zones.truncate(out.max_zones);

        log::debug!(
            "analysis complete: {} zones retained, {} markers, win rate {:?}",
            zones.len(),
            detected.markers.len(),
            win_rate
        );

        let bias = BiasSnapshot {
            entry_trend: ctx.entry_trend,
            mid_trend: ctx.mid_trend,
            high_trend: ctx.high_trend,
            structural_trend: detected.structural_trend,
            price_position: ctx.price_position,
            volatility: ctx.volatility,
            session: ctx.session,
            win_rate,
            levels: ctx.levels.clone(),
        };

        Ok(StructureAnalysis {
            zones,
            markers: detected.markers.into_markers(),
            levels: ctx.levels,
            bias: Some(bias),
        })
    }
}

fn validate_series(series: &'static str, candles: &[Candle]) -> Result<(), EngineError> {
    for (i, c) in candles.iter().enumerate() {
        if ![c.open, c.high, c.low, c.close].iter().all(|p| p.is_finite()) {
            return Err(EngineError::InvalidInput {
                series,
                reason: format!("non-finite price at index {i}"),
            });
        }
        if c.high < c.low {
            return Err(EngineError::InvalidInput {
                series,
                reason: format!("high below low at index {i}"),
            });
        }
    }
    for ((i, a), (_, b)) in candles.iter().enumerate().tuple_windows() {
        if b.time <= a.time {
            return Err(EngineError::InvalidInput {
                series,
                reason: format!("non-ascending timestamp at index {}", i + 1),
            });
        }
    }
    Ok(())
}

/// wins / (wins + losses) over resolved high-scoring zones, folded together
/// with the optional caller-supplied tally. `None` when nothing resolved.
fn realized_win_rate(zones: &[Zone], history: Option<TradeHistory>) -> Option<f64> {
    let min_score = ANALYSIS.output.win_rate_min_score;
    let mut tally = history.unwrap_or_default();
    for z in zones.iter().filter(|z| z.score >= min_score) {
        match z.outcome {
            ZoneOutcome::Win => tally.wins += 1,
            ZoneOutcome::Loss => tally.losses += 1,
            ZoneOutcome::Unresolved => {}
        }
    }
    let total = tally.wins + tally.losses;
    (total > 0).then(|| f64::from(tally.wins) / f64::from(total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LabelingMode;
    use crate::domain::{Direction, Trend};
    use crate::models::{
        PricePosition, SessionPhase, VolatilityClass, ZoneKind, ZoneStatus,
    };

    const INTERVAL: i64 = 1800;
    // 2024-01-01 00:00:00 UTC
    const START: i64 = 1_704_067_200;

    fn flat_candle(i: usize, price: f64, range: f64) -> Candle {
        Candle::new(
            START + (i as i64) * INTERVAL,
            price,
            price + range,
            price - range,
            price,
        )
    }

    fn flat_series(n: usize, price: f64, range: f64) -> Vec<Candle> {
        (0..n).map(|i| flat_candle(i, price, range)).collect()
    }

    // Tiny LCG, enough to make a deterministic but non-trivial price walk
    struct Lcg(u64);

    impl Lcg {
        fn next_unit(&mut self) -> f64 {
            self.0 = self
                .0
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            ((self.0 >> 11) as f64) / ((1u64 << 53) as f64)
        }
    }

    fn walk_series(n: usize, seed: u64) -> Vec<Candle> {
        let mut rng = Lcg(seed);
        let mut price = 1.1000;
        (0..n)
            .map(|i| {
                let open = price;
                let close = price + (rng.next_unit() - 0.5) * 0.0020;
                let high = open.max(close) + rng.next_unit() * 0.0005;
                let low = open.min(close) - rng.next_unit() * 0.0005;
                price = close;
                Candle::new(START + (i as i64) * INTERVAL, open, high, low, close)
            })
            .collect()
    }

    // 140 quiet FX candles with one engineered bullish order block: bearish
    // origin at 130 sweeping the prior lows, displacement at 131, a re-entry
    // wick at 132 that also tags the 1:2 target.
    fn order_block_fixture() -> Vec<Candle> {
        let mut entry = flat_series(140, 1.1000, 0.0001);
        entry[130].open = 1.1000;
        entry[130].close = 1.0996;
        entry[130].high = 1.1001;
        entry[130].low = 1.0995;

        entry[131].open = 1.1002;
        entry[131].close = 1.1012;
        entry[131].high = 1.1013;
        entry[131].low = 1.1002;

        entry[132].open = 1.1005;
        entry[132].close = 1.1003;
        entry[132].high = 1.1006;
        entry[132].low = 1.1000;
        entry
    }

    #[test]
    fn test_short_series_yields_empty_result() {
        let entry = flat_series(99, 1.1000, 0.0001);
        let result = StructureEngine::default()
            .analyze(&AnalysisInput {
                entry: &entry,
                mid: &entry,
                high: &entry,
                divergence: None,
                history: None,
            })
            .unwrap();
        assert!(result.zones.is_empty());
        assert!(result.markers.is_empty());
        assert!(result.levels.is_empty());
        assert!(result.bias.is_none());
    }

    #[test]
    fn test_malformed_candles_are_rejected() {
        let engine = StructureEngine::default();
        let good = flat_series(120, 1.1000, 0.0001);

        let mut nan = good.clone();
        nan[5].close = f64::NAN;
        let err = engine
            .analyze(&AnalysisInput {
                entry: &nan,
                mid: &good,
                high: &good,
                divergence: None,
                history: None,
            })
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput { series: "entry", .. }));

        let mut inverted = good.clone();
        inverted[7].high = inverted[7].low - 0.0001;
        let err = engine
            .analyze(&AnalysisInput {
                entry: &good,
                mid: &inverted,
                high: &good,
                divergence: None,
                history: None,
            })
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput { series: "mid", .. }));

        let mut stuck = good.clone();
        stuck[10].time = stuck[9].time;
        let err = engine
            .analyze(&AnalysisInput {
                entry: &good,
                mid: &good,
                high: &stuck,
                divergence: None,
                history: None,
            })
            .unwrap_err();
        match err {
            EngineError::InvalidInput { series, reason } => {
                assert_eq!(series, "high");
                assert!(reason.contains("index 10"));
            }
        }
    }

    #[test]
    fn test_engineered_order_block_end_to_end() {
        let entry = order_block_fixture();
        let mid = flat_series(60, 1.1000, 0.0001);
        let high = flat_series(30, 1.1000, 0.0001);

        let result = StructureEngine::default()
            .analyze(&AnalysisInput {
                entry: &entry,
                mid: &mid,
                high: &high,
                divergence: None,
                history: None,
            })
            .unwrap();

        assert_eq!(result.zones.len(), 1);
        let zone = &result.zones[0];
        assert_eq!(zone.id, "ob-130");
        assert_eq!(zone.kind, ZoneKind::BullishOrderBlock);
        assert_eq!(zone.direction, Direction::Bullish);
        assert!((zone.price_top - 1.1001).abs() < 1e-9);
        assert!((zone.price_bottom - 1.0995).abs() < 1e-9);
        // The displacement candle stays above the zone; candle 132 wicks
        // back in and its high already reaches the 1:2 target
        assert_eq!(zone.status, ZoneStatus::Tested);
        assert_eq!(zone.outcome, ZoneOutcome::Win);
        assert_eq!(zone.first_tested_at, Some(entry[132].time));
        // Swept prior lows + displacement + discount entry, no trend help
        assert_eq!(zone.score, 35);
        assert_eq!(
            zone.confluence,
            vec![
                scoring::TAG_LIQUIDITY_SWEEP,
                scoring::TAG_DISPLACEMENT,
                scoring::TAG_PREMIUM_DISCOUNT
            ]
        );

        assert!(result.markers.is_empty());

        // Levels come back as their own collection, not only inside the bias
        let labels: Vec<&str> = result.levels.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Prev Day High",
                "Prev Day Low",
                "Session High",
                "Session Low",
                "Session Open"
            ]
        );

        let bias = result.bias.unwrap();
        assert_eq!(bias.entry_trend, Trend::Flat);
        assert_eq!(bias.structural_trend, Direction::Bullish);
        assert_eq!(bias.volatility, VolatilityClass::Low);
        assert_eq!(bias.price_position, PricePosition::Discount);
        // Last candle sits at 21:30 UTC
        assert_eq!(bias.session, SessionPhase::Distribution);
        assert_eq!(bias.win_rate, None);
        assert_eq!(bias.levels, result.levels);
    }

    #[test]
    fn test_old_low_score_zone_is_dropped() {
        // Same order-block shape but 110 candles back: it scores below the
        // display threshold and is too old for the recency override
        let mut entry = flat_series(140, 1.1000, 0.0001);
        entry[30].open = 1.1000;
        entry[30].close = 1.0996;
        entry[30].high = 1.1001;
        entry[30].low = 1.0995;

        entry[31].open = 1.1002;
        entry[31].close = 1.1012;
        entry[31].high = 1.1013;
        entry[31].low = 1.1000;

        entry[32].open = 1.1005;
        entry[32].close = 1.1003;
        entry[32].high = 1.1006;
        entry[32].low = 1.1000;

        let result = StructureEngine::default()
            .analyze(&AnalysisInput {
                entry: &entry,
                mid: &entry,
                high: &entry,
                divergence: None,
                history: None,
            })
            .unwrap();
        assert!(result.zones.is_empty());
    }

    #[test]
    fn test_causal_labeling_withholds_outcomes() {
        let entry = order_block_fixture();
        let settings = EngineSettings {
            labeling: LabelingMode::Causal,
            ..EngineSettings::default()
        };
        let result = StructureEngine::new(settings)
            .analyze(&AnalysisInput {
                entry: &entry,
                mid: &entry,
                high: &entry,
                divergence: None,
                history: None,
            })
            .unwrap();

        assert_eq!(result.zones.len(), 1);
        let zone = &result.zones[0];
        // Statuses are facts as of the last candle; outcomes are withheld
        assert_eq!(zone.status, ZoneStatus::Tested);
        assert_eq!(zone.outcome, ZoneOutcome::Unresolved);
        assert_eq!(zone.first_tested_at, Some(entry[132].time));
    }

    #[test]
    fn test_history_tally_feeds_win_rate() {
        let entry = order_block_fixture();
        let result = StructureEngine::default()
            .analyze(&AnalysisInput {
                entry: &entry,
                mid: &entry,
                high: &entry,
                divergence: None,
                history: Some(TradeHistory { wins: 3, losses: 1 }),
            })
            .unwrap();
        // The engineered zone scores below the tally threshold, so the
        // caller-supplied history is the whole sample
        assert_eq!(result.bias.unwrap().win_rate, Some(0.75));
    }

    #[test]
    fn test_win_rate_score_threshold() {
        let zone = |score: u8, outcome: ZoneOutcome| Zone {
            id: "ob-1".into(),
            kind: ZoneKind::BullishOrderBlock,
            direction: Direction::Bullish,
            price_top: 1.1,
            price_bottom: 1.0,
            formed_at: 0,
            status: ZoneStatus::Tested,
            outcome,
            first_tested_at: None,
            score,
            confluence: vec![],
        };
        let zones = vec![
            zone(65, ZoneOutcome::Win),
            zone(64, ZoneOutcome::Win), // below the threshold: ignored
            zone(70, ZoneOutcome::Loss),
            zone(90, ZoneOutcome::Unresolved),
        ];
        assert_eq!(realized_win_rate(&zones, None), Some(0.5));
        assert_eq!(realized_win_rate(&[], None), None);
        assert_eq!(
            realized_win_rate(&zones, Some(TradeHistory { wins: 3, losses: 0 })),
            Some(0.8)
        );
    }

    #[test]
    fn test_analysis_is_deterministic() {
        let entry = walk_series(200, 42);
        let mid = walk_series(60, 7);
        let high = walk_series(30, 99);
        let engine = StructureEngine::default();
        let input = AnalysisInput {
            entry: &entry,
            mid: &mid,
            high: &high,
            divergence: None,
            history: None,
        };

        let a = engine.analyze(&input).unwrap();
        let b = engine.analyze(&input).unwrap();
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_output_shaping_invariants() {
        for seed in [1u64, 42, 1337] {
            let entry = walk_series(300, seed);
            let result = StructureEngine::default()
                .analyze(&AnalysisInput {
                    entry: &entry,
                    mid: &entry,
                    high: &entry,
                    divergence: None,
                    history: None,
                })
                .unwrap();

            let out = &ANALYSIS.output;
            assert!(result.zones.len() <= out.max_zones);
            let cutoff = entry[entry.len() - out.recency_override_candles].time;
            for zone in &result.zones {
                assert!(
                    zone.score > out.min_zone_score || zone.formed_at >= cutoff,
                    "zone {} (score {}) passed neither gate",
                    zone.id,
                    zone.score
                );
            }
            // Newest first
            for pair in result.zones.windows(2) {
                assert!(pair[0].formed_at >= pair[1].formed_at);
            }
        }
    }
}
