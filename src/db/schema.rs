pub const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS trackers (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    color TEXT NOT NULL,
    emoji TEXT NOT NULL,
    schedule TEXT NOT NULL,
    is_pinned INTEGER NOT NULL DEFAULT 0,
    creation_date TEXT,
    original_category TEXT
);

CREATE TABLE IF NOT EXISTS completion_records (
    tracker_id TEXT NOT NULL REFERENCES trackers(id) ON DELETE CASCADE,
    day TEXT NOT NULL,
    PRIMARY KEY (tracker_id, day)
);

CREATE TABLE IF NOT EXISTS statistics (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    completed_count INTEGER NOT NULL,
    ideal_days INTEGER NOT NULL,
    average_completion_percent INTEGER NOT NULL,
    best_streak INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_completion_records_day ON completion_records(day);
";
