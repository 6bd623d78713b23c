use serde::{Deserialize, Serialize};

/// Rendering hint for a reference level overlay
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display,
)]
pub enum LevelStyle {
    Solid,
    Dashed,
    Dotted,
}

/// A horizontal reference level (prior-day extreme, session range, session
/// open). Stateless; recomputed on every invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiquidityLevel {
    pub price: f64,
    pub label: String,
    pub style: LevelStyle,
}

impl LiquidityLevel {
    pub fn new(price: f64, label: impl Into<String>, style: LevelStyle) -> Self {
        Self {
            price,
            label: label.into(),
            style,
        }
    }
}
