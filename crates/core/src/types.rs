/// All document identifiers are random UUIDs assigned at insert time.
pub type DbId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Allocate a fresh document identifier.
pub fn new_id() -> DbId {
    uuid::Uuid::new_v4()
}
