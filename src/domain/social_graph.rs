use serde::{Deserialize, Serialize};

use crate::domain::user::{AuthorSnapshot, User};

/// Entry in `friends_<userId>`. One-directional: nothing keeps the other
/// user's list in step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Friend {
    pub id: String,
    pub username: String,
    pub handle: String,
    #[serde(default)]
    pub profile_image: Option<String>,
}

impl From<&User> for Friend {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            handle: user.handle.clone(),
            profile_image: user.profile_image.clone(),
        }
    }
}

impl From<&Friend> for AuthorSnapshot {
    fn from(friend: &Friend) -> Self {
        Self {
            id: friend.id.clone(),
            username: friend.username.clone(),
            handle: friend.handle.clone(),
            profile_image: friend.profile_image.clone(),
        }
    }
}
