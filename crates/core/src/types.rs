/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All stored timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Minute of the organisation's local wall-clock day, `0..1440`.
pub type MinuteOfDay = i32;
