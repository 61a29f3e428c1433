//! remixer - Social post remix engine
//!
//! Turns one block of free-form source text into several platform-tailored
//! post variants, each with its own lifecycle (draft, scheduled, published)
//! and a best-effort auto-publish watcher for due schedules.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration management and settings
//! - [`models`] - Core data structures and status resolution
//! - [`normalize`] - Deterministic post-text normalization
//! - [`provider`] - Text-completion provider client
//! - [`generator`] - Fan-out variation generation
//! - [`store`] - Aggregate store contract
//! - [`publisher`] - Post publishing collaborator
//! - [`lifecycle`] - Per-variation state machine operations
//! - [`watcher`] - Auto-publish watcher
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use remixer::config::Config;
//! use remixer::generator::RemixGenerator;
//! use remixer::lifecycle::LifecycleManager;
//! use remixer::provider::OpenAiProvider;
//! use remixer::publisher::LinkedInPublisher;
//! use remixer::store::MemoryRemixStore;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     config.validate()?;
//!     config.logging.init_tracing();
//!
//!     let provider = Arc::new(OpenAiProvider::new(config.provider)?);
//!     let store = Arc::new(MemoryRemixStore::new());
//!     let publisher = Arc::new(LinkedInPublisher::new(config.publisher)?);
//!
//!     let generator = RemixGenerator::new(provider, store.clone());
//!     let lifecycle = Arc::new(LifecycleManager::new(store, publisher));
//!
//!     let remix = generator.generate("We shipped a caching layer", "alice").await?;
//!     println!("{} variations generated", remix.variations.len());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod generator;
pub mod lifecycle;
pub mod models;
pub mod normalize;
pub mod provider;
pub mod publisher;
pub mod store;
pub mod watcher;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{Error, ErrorCategory, Result};
    pub use crate::generator::RemixGenerator;
    pub use crate::lifecycle::LifecycleManager;
    pub use crate::models::{Angle, Platform, PostStatus, Remix, Variation};
    pub use crate::provider::{CompletionProvider, OpenAiProvider};
    pub use crate::publisher::{LinkedInPublisher, PostPublisher};
    pub use crate::store::{MemoryRemixStore, RemixStore};
    pub use crate::watcher::AutoPublishWatcher;
}

// Direct re-exports for convenience
pub use models::{Angle, Platform, PostStatus, Remix, Variation};
