use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::unix_millis;
use crate::domain::user::User;

/// Entry in `post_comments_<postId>`. Author fields are a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub user_id: String,
    pub username: String,
    pub handle: String,
    #[serde(default)]
    pub profile_image: Option<String>,
    pub text: String,
    pub timestamp: i64,
}

impl Comment {
    pub fn new(author: &User, text: String, at: OffsetDateTime) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: author.id.clone(),
            username: author.username.clone(),
            handle: author.handle.clone(),
            profile_image: author.profile_image.clone(),
            text,
            timestamp: unix_millis(at),
        }
    }
}

/// The `post_likes_<postId>` document.
///
/// `users` is authoritative. `count` is kept for the stored shape and is
/// recomputed from `users` whenever the document passes through here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeSet {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub users: Vec<String>,
}

impl LikeSet {
    pub fn contains(&self, user_id: &str) -> bool {
        self.users.iter().any(|id| id == user_id)
    }

    /// Drop duplicate ids (first occurrence wins) and resync `count`.
    pub fn normalize(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.users.retain(|id| seen.insert(id.clone()));
        self.count = self.users.len() as u64;
    }

    /// Returns whether `user_id` likes the post afterwards.
    pub fn toggle(&mut self, user_id: &str) -> bool {
        self.normalize();
        let liked = if self.contains(user_id) {
            self.users.retain(|id| id != user_id);
            false
        } else {
            self.users.push(user_id.to_string());
            true
        };
        self.count = self.users.len() as u64;
        liked
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LikeStatus {
    pub liked: bool,
    pub count: u64,
}
