use std::sync::Arc;
use time::OffsetDateTime;

use crate::app::error::{AppError, AppResult};
use crate::domain::post::Post;
use crate::domain::user::Session;
use crate::infra::device::{Navigator, Route};
use crate::infra::documents::DocumentStore;
use crate::infra::keys;

/// Post being composed. Edits that would push the content past `max_chars`
/// are refused and leave the draft as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    content: String,
    image: Option<String>,
    max_chars: usize,
}

impl PostDraft {
    pub fn new(max_chars: usize) -> Self {
        Self {
            content: String::new(),
            image: None,
            max_chars,
        }
    }

    /// Returns `false` when `text` is too long.
    pub fn set_content(&mut self, text: &str) -> bool {
        if text.chars().count() > self.max_chars {
            return false;
        }
        self.content = text.to_string();
        true
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }

    pub fn remaining(&self) -> usize {
        self.max_chars.saturating_sub(self.char_count())
    }

    pub fn attach_image(&mut self, uri: impl Into<String>) {
        self.image = Some(uri.into());
    }

    pub fn remove_image(&mut self) {
        self.image = None;
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty() && self.image.is_none()
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.image = None;
    }
}

#[derive(Clone)]
pub struct PostService {
    store: DocumentStore,
    navigator: Arc<dyn Navigator>,
    max_chars: usize,
}

impl PostService {
    pub fn new(store: DocumentStore, navigator: Arc<dyn Navigator>, max_chars: usize) -> Self {
        Self {
            store,
            navigator,
            max_chars,
        }
    }

    pub fn draft(&self) -> PostDraft {
        PostDraft::new(self.max_chars)
    }

    /// Publish `draft` as the session user and reset it. The configured limit
    /// applies whatever limit the draft was built with.
    pub async fn create_post(&self, session: &Session, draft: &mut PostDraft) -> AppResult<Post> {
        if draft.is_empty() {
            return Err(AppError::validation(
                "Please add some content or an image to your post",
            ));
        }
        if draft.char_count() > self.max_chars {
            return Err(AppError::validation(format!(
                "Posts can be at most {} characters",
                self.max_chars
            )));
        }

        let post = Post::new(
            session.user_id(),
            draft.content().trim().to_string(),
            draft.image.clone(),
            OffsetDateTime::now_utc(),
        );
        self.add_post(session.user_id(), post.clone()).await?;
        tracing::info!(user_id = %session.user_id(), post_id = %post.id, "created post");

        draft.clear();
        self.navigator.navigate(Route::Back);
        Ok(post)
    }

    /// Prepend `post` to the owner's list; lists are newest first.
    pub async fn add_post(&self, user_id: &str, post: Post) -> AppResult<()> {
        self.store
            .mutate_list(&keys::posts(user_id), move |posts: &mut Vec<Post>| {
                posts.insert(0, post);
                Ok(())
            })
            .await
    }

    pub async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<Post>> {
        self.store.load_list(&keys::posts(user_id)).await
    }

    pub async fn get_post(&self, owner_id: &str, post_id: &str) -> AppResult<Option<Post>> {
        let posts = self.list_by_user(owner_id).await?;
        Ok(posts.into_iter().find(|post| post.id == post_id))
    }

    /// Only the session user's own posts can be deleted. Likes and comments
    /// stored under the post id are kept.
    pub async fn delete_post(&self, session: &Session, post_id: &str) -> AppResult<bool> {
        self.store
            .mutate_list(&keys::posts(session.user_id()), |posts: &mut Vec<Post>| {
                let before = posts.len();
                posts.retain(|post| post.id != post_id);
                Ok(posts.len() != before)
            })
            .await
    }

    pub fn view_image(&self, image: Option<&str>) {
        if let Some(uri) = image {
            self.navigator.navigate(Route::ImageViewer {
                image_uri: uri.to_string(),
            });
        }
    }
}
