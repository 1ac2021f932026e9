use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::post::Post;
use crate::domain::user::AuthorSnapshot;

/// Entry in `spinBin`: the winning post as it looked when the wheel stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpinBinEntry {
    /// Id of the won post. The same post can be won more than once.
    pub id: String,
    pub author: AuthorSnapshot,
    pub content: String,
    pub image: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub spun_at: OffsetDateTime,
}

impl SpinBinEntry {
    pub fn won(post: &Post, author: AuthorSnapshot, spun_at: OffsetDateTime) -> Self {
        Self {
            id: post.id.clone(),
            author,
            content: post.content.clone(),
            image: post.image.clone(),
            spun_at,
        }
    }
}

/// One slice of the wheel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WheelSegment {
    pub label: String,
    pub post: Post,
    pub author: AuthorSnapshot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpinBinStats {
    pub total: usize,
    pub with_images: usize,
    pub unique_authors: usize,
}
