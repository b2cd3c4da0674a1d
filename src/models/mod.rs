pub mod category;
pub mod record;
pub mod statistics;
pub mod tracker;

pub use category::{group_into_categories, sort_for_display, TrackerCategory};
pub use record::CompletionRecord;
pub use statistics::StatisticsSnapshot;
pub use tracker::{Tracker, TrackerId};
