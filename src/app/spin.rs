use futures::future::try_join_all;
use rand::Rng;
use std::collections::HashSet;
use time::OffsetDateTime;

use crate::app::error::{AppError, AppResult};
use crate::domain::post::Post;
use crate::domain::social_graph::Friend;
use crate::domain::spin::{SpinBinEntry, SpinBinStats, WheelSegment};
use crate::domain::user::{AuthorSnapshot, Session};
use crate::infra::documents::DocumentStore;
use crate::infra::keys;

/// The spinning wheel widget. Given a non-empty slice of segments, returns the
/// index it stopped on.
pub trait Wheel: Send + Sync {
    fn spin(&self, segments: &[WheelSegment]) -> usize;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RandomWheel;

impl Wheel for RandomWheel {
    fn spin(&self, segments: &[WheelSegment]) -> usize {
        rand::thread_rng().gen_range(0..segments.len())
    }
}

#[derive(Clone)]
pub struct SpinService {
    store: DocumentStore,
    max_segments: usize,
}

impl SpinService {
    pub fn new(store: DocumentStore, max_segments: usize) -> Self {
        Self {
            store,
            max_segments,
        }
    }

    /// Wheel segments for the session user: friends' posts in friend-list
    /// order, then their own, newest first per owner, capped at the configured
    /// segment count.
    pub async fn segments(&self, session: &Session) -> AppResult<Vec<WheelSegment>> {
        let friends: Vec<Friend> = self
            .store
            .load_list(&keys::friends(session.user_id()))
            .await?;

        let mut owners: Vec<AuthorSnapshot> = friends.iter().map(AuthorSnapshot::from).collect();
        owners.push(AuthorSnapshot::from(&session.user));

        let post_lists = try_join_all(owners.iter().map(|owner| {
            let key = keys::posts(&owner.id);
            let store = self.store.clone();
            async move { store.load_list::<Post>(&key).await }
        }))
        .await?;

        let segments = owners
            .into_iter()
            .zip(post_lists)
            .flat_map(|(author, posts)| {
                posts.into_iter().map(move |post| (author.clone(), post))
            })
            .take(self.max_segments)
            .enumerate()
            .map(|(index, (author, post))| WheelSegment {
                label: format!("Post #{}", index + 1),
                post,
                author,
            })
            .collect();

        Ok(segments)
    }

    /// Spin once and keep the winner in the spin bin. `Ok(None)` when there
    /// is nothing to spin for.
    pub async fn spin(&self, session: &Session, wheel: &dyn Wheel) -> AppResult<Option<SpinBinEntry>> {
        let segments = self.segments(session).await?;
        if segments.is_empty() {
            return Ok(None);
        }

        let index = wheel.spin(&segments);
        let winner = segments
            .get(index)
            .ok_or_else(|| AppError::validation("The wheel stopped outside its segments"))?;
        tracing::info!(
            user_id = %session.user_id(),
            segment = %winner.label,
            post_id = %winner.post.id,
            "wheel stopped"
        );

        self.record_win(winner).await.map(Some)
    }

    /// Snapshot the segment's post and author at the head of `spinBin`.
    pub async fn record_win(&self, segment: &WheelSegment) -> AppResult<SpinBinEntry> {
        let entry = SpinBinEntry::won(&segment.post, segment.author.clone(), OffsetDateTime::now_utc());
        let stored = entry.clone();
        self.store
            .mutate_list(keys::SPIN_BIN, move |bin: &mut Vec<SpinBinEntry>| {
                bin.insert(0, stored);
                Ok(())
            })
            .await?;
        Ok(entry)
    }

    pub async fn list(&self) -> AppResult<Vec<SpinBinEntry>> {
        self.store.load_list(keys::SPIN_BIN).await
    }

    /// Removes every entry for the post `id`.
    pub async fn delete_entry(&self, id: &str) -> AppResult<bool> {
        self.store
            .mutate_list(keys::SPIN_BIN, |bin: &mut Vec<SpinBinEntry>| {
                let before = bin.len();
                bin.retain(|entry| entry.id != id);
                Ok(bin.len() != before)
            })
            .await
    }

    pub async fn clear(&self) -> AppResult<()> {
        let empty: Vec<SpinBinEntry> = Vec::new();
        self.store.save_list(keys::SPIN_BIN, &empty).await?;
        tracing::info!("spin bin cleared");
        Ok(())
    }

    pub async fn stats(&self) -> AppResult<SpinBinStats> {
        let bin = self.list().await?;
        let authors: HashSet<&str> = bin.iter().map(|entry| entry.author.id.as_str()).collect();
        Ok(SpinBinStats {
            total: bin.len(),
            with_images: bin.iter().filter(|entry| entry.image.is_some()).count(),
            unique_authors: authors.len(),
        })
    }
}
