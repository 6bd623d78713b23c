//! Analysis and computation configuration

/// Settings for the context builder (ATR, trends, equilibrium, session levels)
pub struct ContextSettings {
    // Number of bars averaged for the ATR
    pub atr_period: usize,
    // Entry-timeframe trend lookback (close[last] vs open[last - n])
    pub entry_trend_lookback: usize,
    // Higher-timeframe trend lookback on that timeframe's own series
    pub htf_trend_lookback: usize,
    // Bars scanned for the highest-high / lowest-low equilibrium midpoint
    pub equilibrium_lookback: usize,
    // UTC hour (exclusive) closing the 00:00-based session range window
    pub session_range_end_hour: u32,
}

/// Settings for the per-index event detectors
pub struct DetectorSettings {
    // First index of the detector pass (earlier bars are warm-up context)
    pub warmup_candles: usize,
    // Candles on each side of a fractal swing point
    pub fractal_wing: usize,
    // A sweep must pierce its reference level by less than this many ATRs
    pub sweep_max_overshoot_atr: f64,
    // Suppress a sweep if any marker already exists within this window
    pub sweep_dedup_secs: i64,
    // Minimum 3-candle gap size, as a fraction of ATR
    pub imbalance_min_atr: f64,
    // Imbalance zones older than this many candles are discarded as stale
    pub imbalance_recency_candles: usize,
    // Close must clear the tracked swing by this fraction of ATR to break it
    pub break_buffer_atr: f64,
    // A break clearing the swing by this fraction of ATR is tagged strong
    pub break_strong_atr: f64,
    // Suppress a BOS/ChoCh marker if another break exists within this window
    pub break_dedup_secs: i64,
    // Minimum follow-through body (fraction of ATR) to count as displacement
    pub displacement_body_atr: f64,
    // How many candles after the origin may carry the displacement
    pub displacement_max_candles: usize,
    // Lookback for the origin-candle liquidity-sweep flag
    pub origin_sweep_lookback: usize,
}

/// Confluence score weights. Bonuses and penalties are applied in the order
/// they are declared here; the clamp to [0, 100] happens last.
pub struct ScoreWeights {
    pub full_alignment: i32,
    pub dual_alignment: i32,
    pub entry_alignment: i32,
    pub counter_trend_penalty: i32,
    pub liquidity_sweep: i32,
    pub structural_break: i32,
    pub displacement: i32,
    pub unicorn_overlap: i32,
    pub premium_discount: i32,
    pub divergence: i32,
}

/// Settings shaping the returned collections
pub struct OutputSettings {
    // Zones must score strictly above this to be returned...
    pub min_zone_score: u8,
    // ...unless they formed within this many candles of the series end
    pub recency_override_candles: usize,
    // Most recent zones retained, newest first
    pub max_zones: usize,
    // Zones below this formation score are excluded from the win-rate tally
    pub win_rate_min_score: u8,
    // Reward multiple on the midpoint-to-far-edge risk for a Win label
    pub target_reward_ratio: f64,
}

/// The Master Analysis Configuration
pub struct AnalysisConfig {
    // Minimum number of entry-timeframe candles for any analysis at all.
    // Below this the engine returns an empty result, not an error.
    pub min_candles_for_analysis: usize,

    // Sub-groups
    pub context: ContextSettings,
    pub detectors: DetectorSettings,
    pub weights: ScoreWeights,
    pub output: OutputSettings,
}

pub const ANALYSIS: AnalysisConfig = AnalysisConfig {
    min_candles_for_analysis: 100,

    context: ContextSettings {
        atr_period: 14,
        entry_trend_lookback: 50,
        htf_trend_lookback: 20,
        equilibrium_lookback: 50,
        session_range_end_hour: 6,
    },

    detectors: DetectorSettings {
        warmup_candles: 20,
        fractal_wing: 2,
        sweep_max_overshoot_atr: 1.0,
        sweep_dedup_secs: 30 * 60,
        imbalance_min_atr: 0.5,
        imbalance_recency_candles: 50,
        break_buffer_atr: 0.1,
        break_strong_atr: 0.25,
        break_dedup_secs: 15 * 60,
        displacement_body_atr: 0.8,
        displacement_max_candles: 3,
        origin_sweep_lookback: 5,
    },

    weights: ScoreWeights {
        full_alignment: 30,
        dual_alignment: 20,
        entry_alignment: 10,
        counter_trend_penalty: 25,
        liquidity_sweep: 15,
        structural_break: 15,
        displacement: 10,
        unicorn_overlap: 15,
        premium_discount: 10,
        divergence: 5,
    },

    output: OutputSettings {
        min_zone_score: 60,
        recency_override_candles: 20,
        max_zones: 30,
        win_rate_min_score: 65,
        target_reward_ratio: 2.0,
    },
};
