//! Linear-scan user search and `@mention` autocompletion.

use crate::app::error::AppResult;
use crate::domain::user::User;
use crate::infra::documents::DocumentStore;
use crate::infra::keys;

#[derive(Clone)]
pub struct SearchService {
    store: DocumentStore,
}

impl SearchService {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    pub async fn search_users(&self, query: &str) -> AppResult<Vec<User>> {
        let users: Vec<User> = self.store.load_list(keys::USERS).await?;
        Ok(search_users(&users, query))
    }

    pub async fn mention_suggestions(&self, text: &str, exclude_user_id: &str) -> AppResult<Vec<User>> {
        let users: Vec<User> = self.store.load_list(keys::USERS).await?;
        Ok(mention_suggestions(&users, text, exclude_user_id))
    }
}

/// Users whose username contains `query`, or whose handle equals it with or
/// without the leading `@` on either side. Case-insensitive; storage order is
/// kept. A blank query matches nobody.
pub fn search_users(users: &[User], query: &str) -> Vec<User> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }
    let bare_query = strip_at(&query);

    users
        .iter()
        .filter(|user| {
            let username = user.username.to_lowercase();
            let handle = user.handle.to_lowercase();
            username.contains(&query)
                || handle == query
                || strip_at(&handle) == query
                || strip_at(&handle) == bare_query
        })
        .cloned()
        .collect()
}

/// Suggestions for the `@token` at the end of `text`, excluding
/// `exclude_user_id`. A bare `@` suggests everyone.
pub fn mention_suggestions(users: &[User], text: &str, exclude_user_id: &str) -> Vec<User> {
    let Some(token) = trailing_mention(text) else {
        return Vec::new();
    };
    let token = token.to_lowercase();

    users
        .iter()
        .filter(|user| user.id != exclude_user_id)
        .filter(|user| {
            token.is_empty()
                || user.username.to_lowercase().contains(&token)
                || user.handle.to_lowercase().contains(&token)
        })
        .cloned()
        .collect()
}

/// The text after the last `@`, if it has not been ended by whitespace.
fn trailing_mention(text: &str) -> Option<&str> {
    let at = text.rfind('@')?;
    let token = &text[at + 1..];
    if token.chars().any(char::is_whitespace) {
        None
    } else {
        Some(token)
    }
}

fn strip_at(value: &str) -> &str {
    value.strip_prefix('@').unwrap_or(value)
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MentionState {
    #[default]
    Idle,
    /// Token typed after `@` so far; empty right after the `@`.
    Suggesting(String),
}

/// Mention autocompletion for one comment box.
#[derive(Debug, Clone, Default)]
pub struct MentionSession {
    text: String,
    state: MentionState,
}

impl MentionSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn state(&self) -> &MentionState {
        &self.state
    }

    /// Feed the whole current contents of the input.
    pub fn input(&mut self, text: &str) -> &MentionState {
        self.text = text.to_string();
        self.state = match trailing_mention(text) {
            Some(token) => MentionState::Suggesting(token.to_string()),
            None => MentionState::Idle,
        };
        &self.state
    }

    pub fn suggestions(&self, users: &[User], exclude_user_id: &str) -> Vec<User> {
        match self.state {
            MentionState::Idle => Vec::new(),
            MentionState::Suggesting(_) => mention_suggestions(users, &self.text, exclude_user_id),
        }
    }

    /// Replace the trailing `@token` with `@username ` and go back to idle.
    /// Does nothing while idle.
    pub fn accept(&mut self, user: &User) -> &str {
        if let MentionState::Suggesting(_) = self.state {
            if let Some(at) = self.text.rfind('@') {
                self.text.truncate(at);
                self.text.push('@');
                self.text.push_str(&user.username);
                self.text.push(' ');
            }
            self.state = MentionState::Idle;
        }
        &self.text
    }
}
