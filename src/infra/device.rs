//! Device-side collaborators the data layer calls out to.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickedImage {
    /// Local URI of the chosen image.
    Selected(String),
    Cancelled,
    Failed(String),
}

#[async_trait]
pub trait ImagePicker: Send + Sync {
    async fn pick(&self) -> PickedImage;
}

/// Picker that always returns the same outcome. The CLI's `set-avatar` takes
/// the URI from the command line; with no URI it reports a cancel.
#[derive(Debug, Clone)]
pub struct FixedImagePicker {
    outcome: PickedImage,
}

impl FixedImagePicker {
    pub fn selecting(uri: impl Into<String>) -> Self {
        Self {
            outcome: PickedImage::Selected(uri.into()),
        }
    }

    pub fn cancelled() -> Self {
        Self {
            outcome: PickedImage::Cancelled,
        }
    }
}

#[async_trait]
impl ImagePicker for FixedImagePicker {
    async fn pick(&self) -> PickedImage {
        self.outcome.clone()
    }
}

/// Named route plus its parameter payload, e.g.
/// `{"route":"Profile","params":{"viewedUserId":"42"}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "route", content = "params")]
pub enum Route {
    HomePage,
    WelcomePage,
    Back,
    #[serde(rename_all = "camelCase")]
    Profile { viewed_user_id: String },
    #[serde(rename_all = "camelCase")]
    ImageViewer { image_uri: String },
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Navigator for headless use: records transitions in the log only.
#[derive(Debug, Clone, Default)]
pub struct TracingNavigator;

impl Navigator for TracingNavigator {
    fn navigate(&self, route: Route) {
        match serde_json::to_string(&route) {
            Ok(payload) => tracing::info!(route = %payload, "navigate"),
            Err(err) => tracing::warn!(error = %err, "failed to encode route"),
        }
    }
}
