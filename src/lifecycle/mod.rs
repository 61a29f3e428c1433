//! Per-variation lifecycle operations
//!
//! State machine per variation: Draft -> Scheduled -> Published, with
//! Draft -> Published allowed directly (scheduling is optional). Published
//! is terminal: no edit, no deletion, no re-scheduling. Every operation is
//! a read-modify-write over one aggregate: load, locate the variation,
//! apply the transition, recompute the derived aggregate status, persist
//! the full aggregate via replace.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::{Error, Result};
use crate::models::{Platform, PostStatus, Remix};
use crate::normalize;
use crate::publisher::PostPublisher;
use crate::store::RemixStore;

/// Applies lifecycle transitions to variations within a remix aggregate
pub struct LifecycleManager<S, P> {
    store: Arc<S>,
    publisher: Arc<P>,
}

impl<S, P> LifecycleManager<S, P>
where
    S: RemixStore,
    P: PostPublisher,
{
    /// Create a manager over an aggregate store and a publish collaborator
    pub fn new(store: Arc<S>, publisher: Arc<P>) -> Self {
        Self { store, publisher }
    }

    /// Replace a variation's content
    ///
    /// Allowed in Draft or Scheduled; a published variation is immutable.
    /// Content is normalized and the derived fields (hashtags, character
    /// count) are recomputed; status does not change.
    pub async fn edit_variation(
        &self,
        remix_id: &str,
        owner_id: &str,
        variation_id: &str,
        content: &str,
    ) -> Result<Remix> {
        let mut remix = self.load(remix_id, owner_id).await?;
        let variation = find_mut(&mut remix, variation_id)?;
        if variation.is_published() {
            return Err(Error::conflict("cannot edit a published variation"));
        }

        variation.set_content(normalize::normalize_post_content(content));
        self.persist(remix).await
    }

    /// Schedule a variation for auto-publishing
    ///
    /// `scheduled_for` must be an RFC 3339 timestamp. Re-scheduling while
    /// already Scheduled overwrites the time; a published variation cannot
    /// be scheduled again.
    pub async fn schedule_variation(
        &self,
        remix_id: &str,
        owner_id: &str,
        variation_id: &str,
        scheduled_for: &str,
    ) -> Result<Remix> {
        let at = DateTime::parse_from_rfc3339(scheduled_for)
            .map_err(|_| Error::validation(format!("invalid schedule time: {scheduled_for}")))?
            .with_timezone(&Utc);

        let mut remix = self.load(remix_id, owner_id).await?;
        let variation = find_mut(&mut remix, variation_id)?;
        if variation.is_published() {
            return Err(Error::conflict("cannot schedule a published variation"));
        }

        variation.status = PostStatus::Scheduled;
        variation.scheduled_for = Some(at);
        info!(remix_id, variation_id, scheduled_for = %at, "variation scheduled");
        self.persist(remix).await
    }

    /// Publish a variation through the external publish API
    ///
    /// Only LinkedIn variations are publishable through this path. On
    /// success the variation becomes Published with `published_at` set,
    /// `scheduled_for` cleared, and its id appended to the aggregate's
    /// publish history. On failure no state is persisted; the variation
    /// stays as it was (a Scheduled one remains eligible for the watcher).
    pub async fn publish_variation(
        &self,
        remix_id: &str,
        owner_id: &str,
        variation_id: &str,
        credential: &str,
    ) -> Result<Remix> {
        let mut remix = self.load(remix_id, owner_id).await?;
        let variation = find_mut(&mut remix, variation_id)?;

        if variation.platform != Platform::Linkedin {
            return Err(Error::UnsupportedPlatform(format!(
                "only linkedin variations can be published, got {}",
                variation.platform
            )));
        }
        if variation.is_published() {
            return Err(Error::conflict("variation is already published"));
        }

        let published_at = self.publisher.publish(&variation.content, credential).await?;

        variation.status = PostStatus::Published;
        variation.published_at = Some(published_at);
        variation.scheduled_for = None;
        remix.record_publish(variation_id, published_at);
        info!(remix_id, variation_id, %published_at, "variation published");
        self.persist(remix).await
    }

    /// Remove a variation from the aggregate
    ///
    /// Published variations are not deletable. Removing a variation also
    /// drops its id from the publish history so history stays consistent
    /// with membership; that discards the publish record for the deleted
    /// variation.
    pub async fn delete_variation(
        &self,
        remix_id: &str,
        owner_id: &str,
        variation_id: &str,
    ) -> Result<Remix> {
        let mut remix = self.load(remix_id, owner_id).await?;
        let variation = remix
            .find_variation(variation_id)
            .ok_or_else(|| Error::not_found(format!("variation {variation_id}")))?;
        if variation.is_published() {
            return Err(Error::conflict("cannot delete a published variation"));
        }

        remix.variations.retain(|v| v.id != variation_id);
        remix.published_variation_ids.retain(|id| id != variation_id);
        self.persist(remix).await
    }

    /// Delete a whole aggregate
    ///
    /// Allowed only while the resolved aggregate status is Draft.
    pub async fn delete_remix(&self, remix_id: &str, owner_id: &str) -> Result<()> {
        let remix = self.load(remix_id, owner_id).await?;
        if remix.status != PostStatus::Draft {
            return Err(Error::conflict(format!(
                "cannot delete a {} remix",
                remix.status
            )));
        }
        self.store.delete(remix_id, owner_id).await
    }

    /// All aggregates for an owner, newest first
    pub async fn list_remixes(&self, owner_id: &str) -> Result<Vec<Remix>> {
        if !normalize::has_content(owner_id) {
            return Err(Error::validation("owner id is required"));
        }
        self.store.query(owner_id).await
    }

    async fn load(&self, remix_id: &str, owner_id: &str) -> Result<Remix> {
        self.store
            .read(remix_id, owner_id)
            .await?
            .ok_or_else(|| Error::not_found(format!("remix {remix_id}")))
    }

    /// Recompute the derived status and replace the stored aggregate
    async fn persist(&self, mut remix: Remix) -> Result<Remix> {
        remix.refresh_status();
        self.store.replace(&remix.id, &remix.owner_id, &remix).await?;
        Ok(remix)
    }
}

fn find_mut<'a>(
    remix: &'a mut Remix,
    variation_id: &str,
) -> Result<&'a mut crate::models::Variation> {
    remix
        .find_variation_mut(variation_id)
        .ok_or_else(|| Error::not_found(format!("variation {variation_id}")))
}
