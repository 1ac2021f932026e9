//! Storage key scheme. These names are the on-device document boundary and
//! must not change.

pub const USERS: &str = "users";
pub const CURRENT_USER: &str = "currentUser";
pub const SPIN_BIN: &str = "spinBin";

pub fn posts(user_id: &str) -> String {
    format!("posts_{}", user_id)
}

pub fn friends(user_id: &str) -> String {
    format!("friends_{}", user_id)
}

pub fn post_comments(post_id: &str) -> String {
    format!("post_comments_{}", post_id)
}

pub fn post_likes(post_id: &str) -> String {
    format!("post_likes_{}", post_id)
}

pub fn bio(user_id: &str) -> String {
    format!("bio_{}", user_id)
}

/// Image documents are keyed by username, not id.
pub fn profile_image(username: &str) -> String {
    format!("profileImage_{}", username)
}

pub fn cover_image(username: &str) -> String {
    format!("coverImage_{}", username)
}
