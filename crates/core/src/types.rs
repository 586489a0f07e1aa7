/// Company ids are opaque strings assigned by the upstream store.
pub type CompanyId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
