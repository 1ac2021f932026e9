use time::OffsetDateTime;

use crate::app::error::{AppError, AppResult};
use crate::domain::engagement::{Comment, LikeSet, LikeStatus};
use crate::domain::user::Session;
use crate::infra::documents::DocumentStore;
use crate::infra::keys;

#[derive(Clone)]
pub struct EngagementService {
    store: DocumentStore,
}

impl EngagementService {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    /// `liked` is always false without a viewer.
    pub async fn like_status(&self, post_id: &str, viewer: Option<&Session>) -> AppResult<LikeStatus> {
        let mut likes: LikeSet = self
            .store
            .load_one_or_default(&keys::post_likes(post_id))
            .await?;
        likes.normalize();

        Ok(LikeStatus {
            liked: viewer.is_some_and(|session| likes.contains(session.user_id())),
            count: likes.count,
        })
    }

    /// Like the post if the session user has not, otherwise take the like
    /// back. Set membership and count change in the same write.
    pub async fn toggle_like(&self, session: &Session, post_id: &str) -> AppResult<LikeStatus> {
        let user_id = session.user_id();
        let status = self
            .store
            .mutate_one(&keys::post_likes(post_id), |likes: &mut LikeSet| {
                let liked = likes.toggle(user_id);
                Ok(LikeStatus {
                    liked,
                    count: likes.count,
                })
            })
            .await?;

        tracing::debug!(
            user_id = %user_id,
            post_id = %post_id,
            liked = status.liked,
            count = status.count,
            "toggled like"
        );
        Ok(status)
    }

    pub async fn list_comments(&self, post_id: &str) -> AppResult<Vec<Comment>> {
        self.store.load_list(&keys::post_comments(post_id)).await
    }

    /// Prepend a comment by the session user. The author's current username,
    /// handle and avatar are copied into the comment.
    pub async fn add_comment(&self, session: &Session, post_id: &str, text: &str) -> AppResult<Comment> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::validation("Comment cannot be empty"));
        }

        let comment = Comment::new(&session.user, text.to_string(), OffsetDateTime::now_utc());
        let stored = comment.clone();
        self.store
            .mutate_list(&keys::post_comments(post_id), move |comments: &mut Vec<Comment>| {
                comments.insert(0, stored);
                Ok(())
            })
            .await?;

        tracing::debug!(user_id = %session.user_id(), post_id = %post_id, comment_id = %comment.id, "added comment");
        Ok(comment)
    }

    /// Authors can delete their own comments only.
    pub async fn delete_comment(
        &self,
        session: &Session,
        post_id: &str,
        comment_id: &str,
    ) -> AppResult<bool> {
        let user_id = session.user_id();
        self.store
            .mutate_list(&keys::post_comments(post_id), |comments: &mut Vec<Comment>| {
                let before = comments.len();
                comments.retain(|comment| !(comment.id == comment_id && comment.user_id == user_id));
                Ok(comments.len() != before)
            })
            .await
    }
}
