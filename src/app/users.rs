use std::sync::Arc;
use uuid::Uuid;

use crate::app::error::{AppError, AppResult};
use crate::app::social::SocialService;
use crate::domain::post::Post;
use crate::domain::social_graph::Friend;
use crate::domain::user::{ImageSlot, ProfileField, Session, User};
use crate::infra::device::{ImagePicker, Navigator, PickedImage, Route};
use crate::infra::documents::DocumentStore;
use crate::infra::keys;

#[derive(Clone)]
pub struct UserService {
    store: DocumentStore,
    image_picker: Arc<dyn ImagePicker>,
    navigator: Arc<dyn Navigator>,
    min_password_len: usize,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub handle: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default)]
pub struct PasswordChange {
    pub current: String,
    pub new: String,
    pub confirm: String,
}

/// Everything the profile screen shows for one user.
#[derive(Debug, Clone)]
pub struct ProfileView {
    pub user: User,
    pub is_own: bool,
    pub bio: Option<String>,
    pub profile_image: Option<String>,
    pub cover_image: Option<String>,
    pub friends: Vec<Friend>,
    pub posts: Vec<Post>,
}

impl UserService {
    pub fn new(
        store: DocumentStore,
        image_picker: Arc<dyn ImagePicker>,
        navigator: Arc<dyn Navigator>,
        min_password_len: usize,
    ) -> Self {
        Self {
            store,
            image_picker,
            navigator,
            min_password_len,
        }
    }

    pub async fn register(&self, new_user: NewUser) -> AppResult<User> {
        let username = new_user.username.trim().to_string();
        let email = new_user.email.trim().to_string();
        ProfileField::Username.validate(&username)?;
        ProfileField::Handle.validate(&new_user.handle)?;
        ProfileField::Email.validate(&email)?;
        self.check_password_length(&new_user.password)?;

        let user = User {
            id: Uuid::new_v4().to_string(),
            username,
            handle: new_user.handle,
            email,
            password: new_user.password,
            role: "user".to_string(),
            banned: false,
            suspended: false,
            profile_image: None,
            cover_image: None,
        };

        let created = user.clone();
        self.store
            .mutate_list(keys::USERS, move |users: &mut Vec<User>| {
                let username = user.username.to_lowercase();
                let email = user.email.to_lowercase();
                if users.iter().any(|u| u.username.to_lowercase() == username) {
                    return Err(AppError::validation("Username already taken"));
                }
                if users.iter().any(|u| u.email.to_lowercase() == email) {
                    return Err(AppError::validation("Email already registered"));
                }
                users.push(user);
                Ok(())
            })
            .await?;

        tracing::info!(user_id = %created.id, username = %created.username, "registered user");
        Ok(created)
    }

    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        self.store.load_list(keys::USERS).await
    }

    pub async fn get_user(&self, user_id: &str) -> AppResult<Option<User>> {
        let users = self.list_users().await?;
        Ok(users.into_iter().find(|user| user.id == user_id))
    }

    /// Removes the `users` row only. Posts, friends, comments and likes that
    /// mention the user are left in place.
    pub async fn delete_user(&self, user_id: &str) -> AppResult<bool> {
        let removed = self
            .store
            .mutate_list(keys::USERS, |users: &mut Vec<User>| {
                let before = users.len();
                users.retain(|user| user.id != user_id);
                Ok(users.len() != before)
            })
            .await?;

        let session: Option<Session> = self.store.load_one(keys::CURRENT_USER).await?;
        if session.is_some_and(|session| session.user_id() == user_id) {
            self.store.remove(keys::CURRENT_USER).await?;
        }

        Ok(removed)
    }

    pub async fn update_field(
        &self,
        session: &Session,
        field: ProfileField,
        value: &str,
    ) -> AppResult<Session> {
        field.validate(value)?;
        self.check_unique(session.user_id(), field, value).await?;

        let mut updated = session.clone();
        field.apply(&mut updated.user, value.to_string());
        self.write_user(updated).await
    }

    pub async fn change_password(
        &self,
        session: &Session,
        change: PasswordChange,
    ) -> AppResult<Session> {
        if change.current.is_empty() || change.new.is_empty() || change.confirm.is_empty() {
            return Err(AppError::validation("All fields are required"));
        }
        if change.current != session.user.password {
            return Err(AppError::validation("Current password is incorrect"));
        }
        if change.new != change.confirm {
            return Err(AppError::validation("New passwords do not match"));
        }
        self.check_password_length(&change.new)?;
        if change.new == change.current {
            return Err(AppError::validation(
                "New password must be different from current password",
            ));
        }

        let mut updated = session.clone();
        updated.user.password = change.new;
        self.write_user(updated).await
    }

    pub async fn bio(&self, user_id: &str) -> AppResult<Option<String>> {
        self.store.load_text(&keys::bio(user_id)).await
    }

    pub async fn set_bio(&self, session: &Session, bio: &str) -> AppResult<()> {
        self.store.save_text(&keys::bio(session.user_id()), bio).await
    }

    /// Ask the picker for an image and store it in `slot`. `Ok(None)` when the
    /// user backed out of the picker.
    pub async fn pick_image(&self, session: &Session, slot: ImageSlot) -> AppResult<Option<Session>> {
        let uri = match self.image_picker.pick().await {
            PickedImage::Selected(uri) => uri,
            PickedImage::Cancelled => {
                tracing::debug!("image picker cancelled");
                return Ok(None);
            }
            PickedImage::Failed(reason) => {
                tracing::warn!(reason = %reason, "image picker failed");
                return Err(AppError::image_picker("Failed to pick image"));
            }
        };

        self.ensure_listed(session.user_id()).await?;
        self.store
            .save_text(&image_key(slot, &session.user.username), &uri)
            .await?;

        let mut updated = session.clone();
        slot.apply(&mut updated.user, Some(uri));
        self.write_user(updated).await.map(Some)
    }

    /// Clearing an empty slot is a no-op apart from rewriting the same state.
    pub async fn clear_image(&self, session: &Session, slot: ImageSlot) -> AppResult<Session> {
        self.ensure_listed(session.user_id()).await?;
        self.store
            .remove(&image_key(slot, &session.user.username))
            .await?;

        let mut updated = session.clone();
        slot.apply(&mut updated.user, None);
        self.write_user(updated).await
    }

    /// Profile of `viewed_user_id`, or of the session user when it is `None`,
    /// equal to the session user, or unknown.
    pub async fn profile(
        &self,
        session: &Session,
        viewed_user_id: Option<&str>,
    ) -> AppResult<ProfileView> {
        let other = match viewed_user_id {
            Some(id) if id != session.user_id() => self.get_user(id).await?,
            _ => None,
        };
        let is_own = other.is_none();
        let user = other.unwrap_or_else(|| session.user.clone());

        let friends = SocialService::new(self.store.clone())
            .list_friends(&user.id)
            .await?;
        let posts: Vec<Post> = self.store.load_list(&keys::posts(&user.id)).await?;
        let bio = self.bio(&user.id).await?;
        let profile_image = self
            .store
            .load_text(&image_key(ImageSlot::Profile, &user.username))
            .await?
            .or_else(|| user.profile_image.clone());
        let cover_image = self
            .store
            .load_text(&image_key(ImageSlot::Cover, &user.username))
            .await?
            .or_else(|| user.cover_image.clone());

        Ok(ProfileView {
            user,
            is_own,
            bio,
            profile_image,
            cover_image,
            friends,
            posts,
        })
    }

    pub fn open_profile(&self, user_id: &str) {
        self.navigator.navigate(Route::Profile {
            viewed_user_id: user_id.to_string(),
        });
    }

    /// Usernames and emails stay unique across `users`, ignoring case.
    async fn check_unique(&self, user_id: &str, field: ProfileField, value: &str) -> AppResult<()> {
        let value = value.to_lowercase();
        let users = self.list_users().await?;
        let mut others = users.iter().filter(|user| user.id != user_id);
        match field {
            ProfileField::Username => {
                if others.any(|user| user.username.to_lowercase() == value) {
                    return Err(AppError::validation("Username already taken"));
                }
            }
            ProfileField::Email => {
                if others.any(|user| user.email.to_lowercase() == value) {
                    return Err(AppError::validation("Email already registered"));
                }
            }
            ProfileField::Handle => {}
        }
        Ok(())
    }

    async fn ensure_listed(&self, user_id: &str) -> AppResult<()> {
        if self.get_user(user_id).await?.is_none() {
            tracing::warn!(user_id = %user_id, "edit for a user missing from users");
            return Err(AppError::not_found("User not found"));
        }
        Ok(())
    }

    fn check_password_length(&self, password: &str) -> AppResult<()> {
        if password.chars().count() < self.min_password_len {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters long",
                self.min_password_len
            )));
        }
        Ok(())
    }

    /// Write `currentUser`, then the matching `users` row. The two writes are
    /// separate: if the second fails the documents disagree until the next
    /// successful edit. A session whose user is no longer in `users` writes
    /// nothing.
    async fn write_user(&self, updated: Session) -> AppResult<Session> {
        self.ensure_listed(updated.user_id()).await?;
        self.store.save_one(keys::CURRENT_USER, &updated).await?;

        let row = updated.user.clone();
        let result = self
            .store
            .mutate_list(keys::USERS, move |users: &mut Vec<User>| {
                let existing = users
                    .iter_mut()
                    .find(|user| user.id == row.id)
                    .ok_or_else(|| AppError::not_found("User not found"))?;
                *existing = row;
                Ok(())
            })
            .await;

        if let Err(err) = result {
            tracing::warn!(
                user_id = %updated.user_id(),
                error = %err,
                "currentUser updated but users row was not"
            );
            return Err(err);
        }

        Ok(updated)
    }
}

fn image_key(slot: ImageSlot, username: &str) -> String {
    match slot {
        ImageSlot::Profile => keys::profile_image(username),
        ImageSlot::Cover => keys::cover_image(username),
    }
}
