use serde::{Deserialize, Serialize};

/// The four published metrics. Always recomputed in full.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticsSnapshot {
    /// Total distinct completion records.
    pub completed_count: u32,
    /// Days on which every current tracker was completed.
    pub ideal_days: u32,
    /// Share of trackers completed today, 0-100.
    pub average_completion_percent: u32,
    /// Longest run of consecutive days with at least one completion.
    pub best_streak: u32,
}

impl StatisticsSnapshot {
    /// True when there is nothing to show yet.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_zero() {
        let s = StatisticsSnapshot::default();
        assert!(s.is_empty());
        assert_eq!(s.best_streak, 0);
    }

    #[test]
    fn test_serializes_with_field_names() {
        let s = StatisticsSnapshot {
            completed_count: 4,
            ideal_days: 1,
            average_completion_percent: 50,
            best_streak: 3,
        };
        let json = serde_json::to_value(s).unwrap();
        assert_eq!(json["best_streak"], 3);
        assert_eq!(json["average_completion_percent"], 50);
        assert!(!s.is_empty());
    }
}
