/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Optimistic-concurrency token. Starts at 1 and only ever grows.
pub type Version = i32;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
