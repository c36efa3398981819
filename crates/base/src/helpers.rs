use chrono::Utc;

use crate::entities::Timestamp;

pub fn now_timestamp() -> Timestamp {
    Utc::now().timestamp_millis()
}
