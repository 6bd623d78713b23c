use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::Direction;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display,
)]
pub enum MarkerKind {
    Sweep,
    #[strum(serialize = "BOS")]
    Bos,
    #[strum(serialize = "ChoCh")]
    Choch,
}

impl MarkerKind {
    pub fn is_structural_break(&self) -> bool {
        matches!(self, MarkerKind::Bos | MarkerKind::Choch)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display,
)]
pub enum MarkerStrength {
    Standard,
    Strong,
}

/// A point-in-time structural annotation on the entry-timeframe chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralMarker {
    pub time: i64,
    pub direction: Direction,
    pub kind: MarkerKind,
    pub strength: MarkerStrength,
}

/// Markers emitted so far, indexed by time for windowed dedup queries.
/// The BTreeMap makes "anything within N seconds of t?" a range scan rather
/// than a walk over every marker emitted so far.
#[derive(Debug, Default)]
pub struct MarkerIndex {
    by_time: BTreeMap<i64, Vec<MarkerKind>>,
    markers: Vec<StructuralMarker>,
}

impl MarkerIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, marker: StructuralMarker) {
        self.by_time.entry(marker.time).or_default().push(marker.kind);
        self.markers.push(marker);
    }

    /// Any marker of any kind within `window` seconds of `time`?
    pub fn any_within(&self, time: i64, window: i64) -> bool {
        self.by_time
            .range((time - window)..=(time + window))
            .next()
            .is_some()
    }

    /// Any BOS/ChoCh marker within `window` seconds of `time`?
    pub fn break_within(&self, time: i64, window: i64) -> bool {
        self.by_time
            .range((time - window)..=(time + window))
            .any(|(_, kinds)| kinds.iter().any(|k| k.is_structural_break()))
    }

    /// Any BOS/ChoCh marker inside the inclusive `[from, to]` time range?
    pub fn break_in_range(&self, from: i64, to: i64) -> bool {
        self.by_time
            .range(from..=to)
            .any(|(_, kinds)| kinds.iter().any(|k| k.is_structural_break()))
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Consume the index, yielding markers in emission (chronological) order
    pub fn into_markers(self) -> Vec<StructuralMarker> {
        self.markers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sweep_at(time: i64) -> StructuralMarker {
        StructuralMarker {
            time,
            direction: Direction::Bearish,
            kind: MarkerKind::Sweep,
            strength: MarkerStrength::Standard,
        }
    }

    #[test]
    fn test_windowed_queries() {
        let mut index = MarkerIndex::new();
        index.push(sweep_at(10_000));

        assert!(index.any_within(10_000, 0));
        assert!(index.any_within(11_800, 1800));
        assert!(!index.any_within(11_801, 1800));
        // Sweeps are not structural breaks
        assert!(!index.break_within(10_000, 1800));

        index.push(StructuralMarker {
            time: 12_000,
            direction: Direction::Bullish,
            kind: MarkerKind::Bos,
            strength: MarkerStrength::Strong,
        });
        assert!(index.break_within(12_500, 900));
        assert!(index.break_in_range(11_000, 13_000));
        assert!(!index.break_in_range(13_000, 14_000));
    }

    #[test]
    fn test_emission_order_preserved() {
        let mut index = MarkerIndex::new();
        index.push(sweep_at(5_000));
        index.push(sweep_at(9_000));
        let markers = index.into_markers();
        assert_eq!(markers.len(), 2);
        assert!(markers[0].time < markers[1].time);
    }
}
