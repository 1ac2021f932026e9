use crate::app::error::{AppError, AppResult};
use crate::domain::social_graph::Friend;
use crate::domain::user::{Session, User};
use crate::infra::documents::DocumentStore;
use crate::infra::keys;

#[derive(Clone)]
pub struct SocialService {
    store: DocumentStore,
}

impl SocialService {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    pub async fn list_friends(&self, user_id: &str) -> AppResult<Vec<Friend>> {
        self.store.load_list(&keys::friends(user_id)).await
    }

    /// Add `friend_id` to the session user's list. Returns `false` when they
    /// were already there. The other user's list is not touched.
    pub async fn add_friend(&self, session: &Session, friend_id: &str) -> AppResult<bool> {
        if friend_id == session.user_id() {
            return Err(AppError::validation("You cannot add yourself as a friend"));
        }

        let users: Vec<User> = self.store.load_list(keys::USERS).await?;
        let friend = users
            .iter()
            .find(|user| user.id == friend_id)
            .map(Friend::from)
            .ok_or_else(|| AppError::not_found("User not found"))?;

        let added = self
            .store
            .mutate_list(&keys::friends(session.user_id()), move |friends: &mut Vec<Friend>| {
                if friends.iter().any(|existing| existing.id == friend.id) {
                    return Ok(false);
                }
                friends.push(friend);
                Ok(true)
            })
            .await?;

        if added {
            tracing::info!(user_id = %session.user_id(), friend_id = %friend_id, "added friend");
        }
        Ok(added)
    }

    pub async fn remove_friend(&self, session: &Session, friend_id: &str) -> AppResult<bool> {
        self.store
            .mutate_list(&keys::friends(session.user_id()), |friends: &mut Vec<Friend>| {
                let before = friends.len();
                friends.retain(|friend| friend.id != friend_id);
                Ok(friends.len() != before)
            })
            .await
    }
}

/// Friends whose username or handle contains `query`, ignoring case. An empty
/// query keeps everyone.
pub fn filter_friends(friends: &[Friend], query: &str) -> Vec<Friend> {
    let query = query.to_lowercase();
    friends
        .iter()
        .filter(|friend| {
            friend.username.to_lowercase().contains(&query)
                || friend.handle.to_lowercase().contains(&query)
        })
        .cloned()
        .collect()
}
