use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "usr_id")]
    pub id: i32,
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub surname: String,
    pub created_at: DateTime<Utc>,
    /// Unset until the first successful update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}
