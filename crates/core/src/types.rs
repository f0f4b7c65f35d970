/// All database primary keys are SQLite INTEGER.
pub type DbId = i64;

/// Physical locker number, `1..=LOCKER_COUNT`.
pub type LockerNo = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
