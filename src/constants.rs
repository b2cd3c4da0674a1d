/// Title of the synthetic category that surfaces pinned trackers.
pub const PINNED_CATEGORY_TITLE: &str = "Pinned";

/// Category for trackers that were never assigned one.
pub const DEFAULT_CATEGORY_TITLE: &str = "Important";

/// Maximum tracker title length
pub const MAX_TRACKER_TITLE_LEN: usize = 100;

/// Maximum category title length
pub const MAX_CATEGORY_TITLE_LEN: usize = 100;

/// Upper bound of `StatisticsSnapshot::average_completion_percent`
pub const MAX_PERCENT: u32 = 100;

/// Database file name inside the platform data directory
pub const DB_FILE_NAME: &str = "habitual.db";

/// Primary key of the single derived statistics row
pub const STATISTICS_ROW_ID: i64 = 1;
