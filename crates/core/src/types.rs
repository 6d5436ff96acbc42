/// Document ids are strings: store-assigned UUIDs, millisecond ticks, or
/// tick-plus-suffix forms like `1718700000123a`. Opaque everywhere.
pub type DocId = String;

/// The signed-in user's opaque identifier. Every collection is partitioned
/// by it; there is no cross-owner visibility.
pub type OwnerId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
