/// Store-assigned note identifier. Opaque to this core; a draft has none
/// until the first save.
pub type NoteId = uuid::Uuid;

/// Identity-provider user id. Scopes a note namespace in the store.
pub type UserId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
