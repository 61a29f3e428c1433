//! Common test utilities
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use remixer::error::{Error, Result};
use remixer::models::{Angle, Platform, Remix, Variation};
use remixer::provider::CompletionProvider;
use remixer::publisher::PostPublisher;

/// Completion provider double returning canned per-task output
#[derive(Default)]
pub struct FakeProvider {
    pub calls: AtomicUsize,
    pub fail_all: AtomicBool,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let provider = Self::default();
        provider.fail_all.store(true, Ordering::SeqCst);
        provider
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionProvider for FakeProvider {
    async fn complete(
        &self,
        _system: &str,
        user: &str,
        max_tokens: u32,
        _temperature: f32,
    ) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_all.load(Ordering::SeqCst) {
            return Err(Error::generation("provider unavailable"));
        }
        if max_tokens == 300 {
            Ok("Caching layer shipped 🚀 #rustlang #infra".to_string())
        } else if user.contains("educational") {
            Ok("## Lessons\nWhat our caching layer taught us.".to_string())
        } else if user.contains("question") {
            Ok("Is your cache actually helping?".to_string())
        } else if user.contains("practical") {
            Ok("Three steps we took to ship the cache.".to_string())
        } else {
            Ok("The day our caching layer went live.".to_string())
        }
    }
}

/// Publisher double: counts calls, optionally fails
#[derive(Default)]
pub struct FakePublisher {
    pub calls: AtomicUsize,
    pub fail: AtomicBool,
}

impl FakePublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let publisher = Self::default();
        publisher.fail.store(true, Ordering::SeqCst);
        publisher
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PostPublisher for FakePublisher {
    async fn publish(&self, _content: &str, _credential: &str) -> Result<DateTime<Utc>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            Err(Error::publish("ugcPosts error: Service Unavailable"))
        } else {
            Ok(Utc::now())
        }
    }
}

/// Build a draft remix with one LinkedIn and one Twitter variation
pub fn draft_remix(owner: &str) -> Remix {
    Remix::new(
        owner,
        "Our team shipped a new caching layer",
        vec![
            Variation::new(Platform::Linkedin, Angle::Narrative, "long-form post"),
            Variation::new(Platform::Twitter, Angle::Narrative, "tweet #infra"),
        ],
    )
}
