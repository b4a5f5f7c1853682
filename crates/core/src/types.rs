/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// String-keyed map that keeps insertion order; a repeated key keeps the
/// last value written.
pub type OrderedMap = indexmap::IndexMap<String, String>;
