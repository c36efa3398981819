/// Milliseconds since the Unix epoch.
pub type Timestamp = i64;

pub type SessionId = String;
pub type StoreKey = String;
pub type ErrorMessage = String;
