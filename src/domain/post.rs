use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::unix_millis;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub user_id: String,
    pub content: String,
    pub image: Option<String>,
    /// Display date, e.g. `Oct 18, 2026`.
    pub date: String,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub comments: u64,
    pub timestamp: i64,
}

impl Post {
    pub fn new(user_id: &str, content: String, image: Option<String>, at: OffsetDateTime) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            content,
            image,
            date: display_date(at),
            likes: 0,
            comments: 0,
            timestamp: unix_millis(at),
        }
    }
}

fn display_date(at: OffsetDateTime) -> String {
    let format = format_description!("[month repr:short] [day padding:none], [year]");
    at.format(&format).unwrap_or_default()
}
