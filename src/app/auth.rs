use std::sync::Arc;

use crate::app::error::{AppError, AppResult};
use crate::domain::user::{Session, User};
use crate::infra::device::{Navigator, Route};
use crate::infra::documents::DocumentStore;
use crate::infra::keys;

#[derive(Clone)]
pub struct AuthService {
    store: DocumentStore,
    navigator: Arc<dyn Navigator>,
}

impl AuthService {
    pub fn new(store: DocumentStore, navigator: Arc<dyn Navigator>) -> Self {
        Self { store, navigator }
    }

    /// `identifier` is a username or an email, compared case-insensitively.
    pub async fn login(&self, identifier: &str, password: &str) -> AppResult<Session> {
        let identifier = identifier.trim();
        if identifier.is_empty() || password.is_empty() {
            return Err(AppError::validation(
                "Please enter both username or email and password!",
            ));
        }

        let needle = identifier.to_lowercase();
        let users: Vec<User> = self.store.load_list(keys::USERS).await?;
        let user = users
            .into_iter()
            .find(|user| {
                let identity = user.username.to_lowercase() == needle
                    || user.email.to_lowercase() == needle;
                identity && user.password == password
            })
            .ok_or_else(|| AppError::unauthorized("Invalid Username/Email or Password"))?;

        if user.banned {
            tracing::info!(user_id = %user.id, "login refused for banned account");
            return Err(AppError::forbidden(
                "Your account has been banned by an administrator",
            ));
        }
        if user.suspended {
            tracing::info!(user_id = %user.id, "login refused for suspended account");
            return Err(AppError::forbidden(
                "Your account is suspended, please come back later",
            ));
        }

        let session = Session::new(user);
        self.store.save_one(keys::CURRENT_USER, &session).await?;
        tracing::info!(user_id = %session.user_id(), "logged in");

        self.navigator.navigate(Route::HomePage);
        Ok(session)
    }

    pub async fn logout(&self) -> AppResult<()> {
        self.store.remove(keys::CURRENT_USER).await?;
        tracing::info!("logged out");
        self.navigator.navigate(Route::WelcomePage);
        Ok(())
    }

    /// A missing `currentUser`, or one without the login marker, means
    /// nobody is logged in.
    pub async fn current_session(&self) -> AppResult<Option<Session>> {
        let session: Option<Session> = self.store.load_one(keys::CURRENT_USER).await?;
        Ok(session.filter(|session| session.is_logged_in))
    }

    /// `action` completes the message "You must be logged in to ...".
    pub async fn require_session(&self, action: &str) -> AppResult<Session> {
        self.current_session()
            .await?
            .ok_or_else(|| AppError::unauthorized(format!("You must be logged in to {}", action)))
    }
}
