//! Deterministic market-structure analysis over OHLC candle series.
//!
//! Feed the engine three parallel views of the same instrument (entry, mid
//! and high timeframe) and it returns ranked supply/demand zones, structural
//! markers (BOS / ChoCh / liquidity sweeps), session liquidity levels and an
//! aggregate bias snapshot. Everything is computed fresh per call from the
//! candles alone; no clocks, no I/O, no hidden state.
//!
//! ```no_run
//! use structure_scout::{AnalysisInput, StructureEngine};
//! # let (entry, mid, high) = (vec![], vec![], vec![]);
//!
//! let engine = StructureEngine::default();
//! let result = engine.analyze(&AnalysisInput {
//!     entry: &entry,
//!     mid: &mid,
//!     high: &high,
//!     divergence: None,
//!     history: None,
//! })?;
//! for zone in &result.zones {
//!     println!("{} [{:.5}, {:.5}] score {}", zone.id, zone.price_bottom, zone.price_top, zone.score);
//! }
//! # Ok::<(), structure_scout::EngineError>(())
//! ```

pub mod analysis;
pub mod config;
pub mod domain;
pub mod engine;
pub mod models;
pub mod utils;

pub use config::{EngineSettings, InstrumentProfile, LabelingMode};
pub use domain::{Candle, Direction, Trend};
pub use engine::{AnalysisInput, EngineError, StructureAnalysis, StructureEngine};
