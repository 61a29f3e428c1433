//! Fan-out variation generation
//!
//! One source text becomes five independently-constrained variations:
//! four LinkedIn angles and one tweet. All completion calls run
//! concurrently; any single failure aborts the whole operation and nothing
//! is persisted.

pub mod prompts;

use std::sync::Arc;

use futures::future::try_join_all;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::models::{Remix, Variation};
use crate::normalize;
use crate::provider::CompletionProvider;
use crate::store::RemixStore;

pub use prompts::{generation_tasks, GenerationTask};

/// Generates remix aggregates from free-form source text
pub struct RemixGenerator<P, S> {
    provider: Arc<P>,
    store: Arc<S>,
}

impl<P, S> RemixGenerator<P, S>
where
    P: CompletionProvider,
    S: RemixStore,
{
    /// Create a generator over a completion provider and an aggregate store
    pub fn new(provider: Arc<P>, store: Arc<S>) -> Self {
        Self { provider, store }
    }

    /// Generate the full variation set and persist a new draft aggregate
    ///
    /// All-or-nothing: the five completion tasks run concurrently and a
    /// single failure fails the whole call with no store write. A store
    /// failure after successful generation surfaces as
    /// [`Error::Persistence`], distinct from [`Error::Generation`].
    pub async fn generate(&self, source_content: &str, owner_id: &str) -> Result<Remix> {
        if !normalize::has_content(source_content) {
            return Err(Error::validation("source content is required"));
        }
        if !normalize::has_content(owner_id) {
            return Err(Error::validation("owner id is required"));
        }

        let tasks = prompts::generation_tasks();
        info!(owner_id, task_count = tasks.len(), "generating variations");

        let futures = tasks.iter().map(|task| self.run_task(*task, source_content));
        let variations = try_join_all(futures).await?;

        let remix = Remix::new(owner_id, source_content, variations);
        self.store
            .upsert(&remix)
            .await
            .map_err(|e| Error::persistence(format!("generated but not saved: {e}")))?;

        info!(remix_id = %remix.id, "remix persisted");
        Ok(remix)
    }

    /// Run one generation task and assemble its draft variation
    async fn run_task(&self, task: GenerationTask, source_content: &str) -> Result<Variation> {
        let prompt = task.build_prompt(source_content);
        let raw = self
            .provider
            .complete(
                prompts::SYSTEM_PROMPT,
                &prompt,
                task.max_tokens(),
                prompts::TEMPERATURE,
            )
            .await?;

        let content = normalize::normalize_post_content(&raw);
        debug!(
            platform = %task.platform,
            angle = %task.angle,
            characters = content.chars().count(),
            "variation generated"
        );

        Ok(Variation::new(task.platform, task.angle, content))
    }
}
