#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use spinsocial::app::spin::Wheel;
use spinsocial::app::users::NewUser;
use spinsocial::config::AppConfig;
use spinsocial::domain::spin::WheelSegment;
use spinsocial::domain::user::{Session, User};
use spinsocial::infra::device::{ImagePicker, Navigator, PickedImage, Route};
use spinsocial::infra::documents::DocumentStore;
use spinsocial::infra::store::{KeyValueStore, MemoryStore};
use spinsocial::AppState;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const DEFAULT_PASSWORD: &str = "testpassword123";

// ---------------------------------------------------------------------------
// Collaborator doubles
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<Route> {
        self.routes.lock().unwrap().last().cloned()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.routes.lock().unwrap().push(route);
    }
}

pub struct ScriptedPicker {
    outcome: Mutex<PickedImage>,
}

impl ScriptedPicker {
    pub fn new(outcome: PickedImage) -> Self {
        Self {
            outcome: Mutex::new(outcome),
        }
    }

    pub fn set(&self, outcome: PickedImage) {
        *self.outcome.lock().unwrap() = outcome;
    }
}

#[async_trait]
impl ImagePicker for ScriptedPicker {
    async fn pick(&self) -> PickedImage {
        self.outcome.lock().unwrap().clone()
    }
}

/// Wheel that always stops on the same index.
pub struct FixedWheel(pub usize);

impl Wheel for FixedWheel {
    fn spin(&self, _segments: &[WheelSegment]) -> usize {
        self.0
    }
}

/// Memory backend whose writes to selected keys (or everything) can be made
/// to fail.
#[derive(Clone, Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    failing_keys: Arc<Mutex<HashSet<String>>>,
    down: Arc<Mutex<bool>>,
}

impl FlakyStore {
    pub fn fail_writes_to(&self, key: &str) {
        self.failing_keys.lock().unwrap().insert(key.to_string());
    }

    pub fn go_down(&self) {
        *self.down.lock().unwrap() = true;
    }

    pub fn heal(&self) {
        self.failing_keys.lock().unwrap().clear();
        *self.down.lock().unwrap() = false;
    }

    fn check_up(&self) -> Result<()> {
        if *self.down.lock().unwrap() {
            return Err(anyhow!("device storage unreachable"));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FlakyStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.check_up()?;
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.check_up()?;
        if self.failing_keys.lock().unwrap().contains(key) {
            return Err(anyhow!("write to {} failed", key));
        }
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.check_up()?;
        self.inner.remove(key).await
    }

    async fn keys(&self) -> Result<Vec<String>> {
        self.check_up()?;
        self.inner.keys().await
    }
}

// ---------------------------------------------------------------------------
// TestApp: a fresh in-memory app per test
// ---------------------------------------------------------------------------

pub struct TestApp {
    pub state: AppState,
    pub backend: FlakyStore,
    pub navigator: Arc<RecordingNavigator>,
    pub picker: Arc<ScriptedPicker>,
}

pub fn app() -> TestApp {
    TestApp::new()
}

impl TestApp {
    pub fn new() -> Self {
        let backend = FlakyStore::default();
        let navigator = Arc::new(RecordingNavigator::default());
        let picker = Arc::new(ScriptedPicker::new(PickedImage::Cancelled));

        let config = AppConfig::default();
        let state = AppState::new(DocumentStore::new(backend.clone()), &config)
            .with_navigator(navigator.clone())
            .with_image_picker(picker.clone());

        Self {
            state,
            backend,
            navigator,
            picker,
        }
    }

    /// Raw document as stored, for asserting on the persisted shape.
    pub async fn raw(&self, key: &str) -> Option<serde_json::Value> {
        let raw = self.backend.get(key).await.unwrap()?;
        Some(serde_json::from_str(&raw).unwrap())
    }

    pub async fn raw_text(&self, key: &str) -> Option<String> {
        self.backend.get(key).await.unwrap()
    }

    pub async fn seed(&self, key: &str, value: serde_json::Value) {
        self.backend.set(key, value.to_string()).await.unwrap();
    }

    pub async fn create_user(&self, name: &str) -> User {
        self.state
            .users()
            .register(NewUser {
                username: name.to_string(),
                handle: format!("@{}", name),
                email: format!("{}@example.com", name),
                password: DEFAULT_PASSWORD.to_string(),
            })
            .await
            .unwrap()
    }

    pub async fn login(&self, user: &User) -> Session {
        self.state
            .auth()
            .login(&user.username, DEFAULT_PASSWORD)
            .await
            .unwrap()
    }

    pub async fn create_user_and_login(&self, name: &str) -> Session {
        let user = self.create_user(name).await;
        self.login(&user).await
    }

    pub async fn stored_users(&self) -> Vec<User> {
        self.state.users().list_users().await.unwrap()
    }
}
