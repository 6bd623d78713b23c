// Result models for the market-structure engine
// These modules contain pure output types independent of any UI/visualization

pub mod bias;
pub mod liquidity;
pub mod marker;
pub mod zone;

// Re-export key types for convenience
pub use bias::{
    BiasSnapshot, DivergenceSignal, PricePosition, SessionPhase, TradeHistory, VolatilityClass,
};
pub use liquidity::{LevelStyle, LiquidityLevel};
pub use marker::{MarkerIndex, MarkerKind, MarkerStrength, StructuralMarker};
pub use zone::{Zone, ZoneKind, ZoneOutcome, ZoneStatus};
