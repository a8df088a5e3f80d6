use uuid::Uuid;

/// Video primary keys are UUIDv7, assigned when a record is inserted.
pub type VideoId = Uuid;

/// User primary keys. The authenticated principal is identified by one of these.
pub type UserId = Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Parse a client-supplied identifier. Returns `None` for anything that is not
/// a well-formed UUID.
pub fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}
