//! The analysis engine: input validation and the context -> detectors ->
//! scoring -> lifecycle pipeline, plus output shaping.

pub mod core;

pub use core::{AnalysisInput, EngineError, StructureAnalysis, StructureEngine};
