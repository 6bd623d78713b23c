use chrono::{DateTime, Timelike, Utc};

pub const SECS_PER_DAY: i64 = 86_400;

/// Unix timestamp of 00:00:00 UTC on the day containing `ts`
pub fn utc_day_start(ts: i64) -> i64 {
    ts - ts.rem_euclid(SECS_PER_DAY)
}

/// UTC hour-of-day (0..=23) for a unix timestamp
pub fn utc_hour(ts: i64) -> u32 {
    DateTime::<Utc>::from_timestamp(ts, 0)
        .map(|dt| dt.hour())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_start_and_hour() {
        // 2024-01-02 07:30:00 UTC
        let ts = 1_704_180_600;
        assert_eq!(utc_day_start(ts), 1_704_153_600);
        assert_eq!(utc_hour(ts), 7);
        // Midnight maps to itself
        assert_eq!(utc_day_start(1_704_153_600), 1_704_153_600);
        assert_eq!(utc_hour(1_704_153_600), 0);
    }
}
