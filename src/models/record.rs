use super::TrackerId;
use crate::calendar::Day;
use serde::{Deserialize, Serialize};

/// A fact that `tracker_id` was completed on `day`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub tracker_id: TrackerId,
    pub day: Day,
}

impl CompletionRecord {
    pub fn new(tracker_id: TrackerId, day: Day) -> Self {
        Self { tracker_id, day }
    }
}
