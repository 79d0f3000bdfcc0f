use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Last known subscriber count of one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterEntry {
    #[serde(rename = "courseName")]
    pub course_display_name: String,
    #[serde(rename = "groupName")]
    pub group_display_name: String,
    pub count: u64,
    pub last_update: DateTime<Utc>,
}
