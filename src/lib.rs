pub mod app;
pub mod config;
pub mod domain;
pub mod infra;

use anyhow::Result;
use std::sync::Arc;

use crate::app::{
    auth::AuthService, engagement::EngagementService, posts::PostService, search::SearchService,
    social::SocialService, spin::SpinService, users::UserService,
};
use crate::config::{AppConfig, StoreBackend};
use crate::infra::device::{FixedImagePicker, ImagePicker, Navigator, TracingNavigator};
use crate::infra::documents::DocumentStore;
use crate::infra::store::{FileStore, MemoryStore};

#[derive(Clone)]
pub struct AppState {
    pub store: DocumentStore,
    pub navigator: Arc<dyn Navigator>,
    pub image_picker: Arc<dyn ImagePicker>,
    pub post_max_chars: usize,
    pub min_password_len: usize,
    pub wheel_segments: usize,
}

impl AppState {
    pub fn new(store: DocumentStore, config: &AppConfig) -> Self {
        Self {
            store,
            navigator: Arc::new(TracingNavigator),
            image_picker: Arc::new(FixedImagePicker::cancelled()),
            post_max_chars: config.post_max_chars,
            min_password_len: config.min_password_len,
            wheel_segments: config.wheel_segments,
        }
    }

    /// Build the state over the backend named in `config`.
    pub async fn open(config: &AppConfig) -> Result<Self> {
        let store = match config.store_backend {
            StoreBackend::File => DocumentStore::new(FileStore::open(&config.store_path).await?),
            StoreBackend::Memory => DocumentStore::new(MemoryStore::new()),
        };
        Ok(Self::new(store, config))
    }

    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = navigator;
        self
    }

    pub fn with_image_picker(mut self, image_picker: Arc<dyn ImagePicker>) -> Self {
        self.image_picker = image_picker;
        self
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(self.store.clone(), self.navigator.clone())
    }

    pub fn users(&self) -> UserService {
        UserService::new(
            self.store.clone(),
            self.image_picker.clone(),
            self.navigator.clone(),
            self.min_password_len,
        )
    }

    pub fn posts(&self) -> PostService {
        PostService::new(self.store.clone(), self.navigator.clone(), self.post_max_chars)
    }

    pub fn engagement(&self) -> EngagementService {
        EngagementService::new(self.store.clone())
    }

    pub fn social(&self) -> SocialService {
        SocialService::new(self.store.clone())
    }

    pub fn search(&self) -> SearchService {
        SearchService::new(self.store.clone())
    }

    pub fn spin(&self) -> SpinService {
        SpinService::new(self.store.clone(), self.wheel_segments)
    }
}
