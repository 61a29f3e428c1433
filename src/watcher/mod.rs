//! Best-effort auto-publish watcher
//!
//! Periodically scans an owner's aggregates for scheduled variations whose
//! time has elapsed and pushes each through the same publish path a manual
//! trigger uses. A process-local in-flight marker set keyed by
//! (remix id, variation id) prevents a scan cycle (or an overlapping one)
//! from double-submitting while a publish call is outstanding.
//!
//! No durability is provided across process restarts: the watcher depends
//! on the host process staying resident and the aggregate collection being
//! refreshed on every scan.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, Mutex, RwLock};
use tracing::{info, warn};

use crate::error::Result;
use crate::lifecycle::LifecycleManager;
use crate::models::PostStatus;
use crate::publisher::PostPublisher;
use crate::store::RemixStore;

/// Configuration for the auto-publish watcher
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct WatcherConfig {
    /// Seconds between scans when running as a loop
    pub interval_secs: u64,

    /// Whether to scan immediately when the loop starts
    pub scan_on_start: bool,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            interval_secs: 60,
            scan_on_start: true,
        }
    }
}

/// Events emitted by the watcher
#[derive(Debug, Clone)]
pub enum WatcherEvent {
    /// A due variation was published
    Published {
        remix_id: String,
        variation_id: String,
        published_at: DateTime<Utc>,
    },

    /// A due variation failed to publish; it stays Scheduled and is
    /// eligible again on a future scan
    PublishFailed {
        remix_id: String,
        variation_id: String,
        error: String,
    },

    /// A scan cycle finished
    ScanCompleted { report: ScanReport },
}

/// Outcome of one scan cycle
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    /// Due items observed (including ones already in flight)
    pub due: usize,
    /// Publishes that succeeded this cycle
    pub published: usize,
    /// Publishes that failed this cycle
    pub failed: usize,
    /// Due items skipped because an earlier cycle still owns them
    pub in_flight: usize,
}

/// Watcher status information
#[derive(Debug, Clone)]
pub struct WatcherStatus {
    pub is_running: bool,
    pub interval_secs: u64,
    pub in_flight: usize,
}

/// Scans aggregates and auto-publishes due scheduled variations
pub struct AutoPublishWatcher<S, P> {
    config: WatcherConfig,
    store: Arc<S>,
    lifecycle: Arc<LifecycleManager<S, P>>,
    in_flight: Mutex<HashSet<(String, String)>>,
    event_sender: broadcast::Sender<WatcherEvent>,
    is_running: Arc<RwLock<bool>>,
}

impl<S, P> AutoPublishWatcher<S, P>
where
    S: RemixStore,
    P: PostPublisher,
{
    /// Create a watcher over a store and the shared lifecycle manager
    pub fn new(config: WatcherConfig, store: Arc<S>, lifecycle: Arc<LifecycleManager<S, P>>) -> Self {
        let (event_sender, _) = broadcast::channel(100);
        Self {
            config,
            store,
            lifecycle,
            in_flight: Mutex::new(HashSet::new()),
            event_sender,
            is_running: Arc::new(RwLock::new(false)),
        }
    }

    /// Create with default config
    pub fn with_defaults(store: Arc<S>, lifecycle: Arc<LifecycleManager<S, P>>) -> Self {
        Self::new(WatcherConfig::default(), store, lifecycle)
    }

    /// Subscribe to watcher events
    pub fn subscribe(&self) -> broadcast::Receiver<WatcherEvent> {
        self.event_sender.subscribe()
    }

    /// Run one scan cycle over an owner's aggregates
    ///
    /// Loads the collection fresh, clears in-flight markers for pairs the
    /// load shows as no longer due (published, unscheduled, or deleted),
    /// then publishes each remaining due pair at most once. Per-item
    /// failures are reported, not propagated; the scan always completes.
    pub async fn scan(&self, owner_id: &str, credential: &str) -> Result<ScanReport> {
        let now = Utc::now();
        let remixes = self.store.query(owner_id).await?;

        // Due pairs per this fresh load.
        let mut due: Vec<(String, String)> = Vec::new();
        for remix in &remixes {
            for variation in &remix.variations {
                if variation.is_due(now) {
                    due.push((remix.id.clone(), variation.id.clone()));
                }
            }
        }

        let mut report = ScanReport {
            due: due.len(),
            ..Default::default()
        };

        // Marker upkeep and claim, atomic relative to this scan.
        let claimed: Vec<(String, String)> = {
            let mut in_flight = self.in_flight.lock().await;

            // A marker whose pair the fresh load no longer shows as due has
            // reached a terminal state (or was deleted); drop it.
            in_flight.retain(|pair| {
                let still_due = due.contains(pair);
                let still_loaded = remixes.iter().any(|r| {
                    r.id == pair.0
                        && r.variations
                            .iter()
                            .any(|v| v.id == pair.1 && v.status == PostStatus::Scheduled)
                });
                still_due && still_loaded
            });

            due.iter()
                .filter(|pair| in_flight.insert((*pair).clone()))
                .cloned()
                .collect()
        };
        report.in_flight = report.due - claimed.len();

        for (remix_id, variation_id) in claimed {
            match self
                .lifecycle
                .publish_variation(&remix_id, owner_id, &variation_id, credential)
                .await
            {
                Ok(remix) => {
                    report.published += 1;
                    let published_at = remix
                        .find_variation(&variation_id)
                        .and_then(|v| v.published_at)
                        .unwrap_or(now);
                    info!(%remix_id, %variation_id, "auto-published due variation");
                    let _ = self.event_sender.send(WatcherEvent::Published {
                        remix_id,
                        variation_id,
                        published_at,
                    });
                    // Marker stays until the next fresh load observes the
                    // published state.
                }
                Err(e) => {
                    report.failed += 1;
                    warn!(%remix_id, %variation_id, error = %e, "auto-publish failed");
                    // The call completed; release the marker so the next
                    // scan retries the still-Scheduled variation.
                    self.in_flight
                        .lock()
                        .await
                        .remove(&(remix_id.clone(), variation_id.clone()));
                    let _ = self.event_sender.send(WatcherEvent::PublishFailed {
                        remix_id,
                        variation_id,
                        error: e.to_string(),
                    });
                }
            }
        }

        let _ = self.event_sender.send(WatcherEvent::ScanCompleted {
            report: report.clone(),
        });
        Ok(report)
    }

    /// Run the scan loop until stopped
    ///
    /// A failed scan cycle is logged and the loop keeps going; the startup
    /// scan is no different.
    pub async fn run(&self, owner_id: &str, credential: &str) -> Result<()> {
        *self.is_running.write().await = true;

        if self.config.scan_on_start {
            if let Err(e) = self.scan(owner_id, credential).await {
                warn!(error = %e, "scan cycle failed");
            }
        }

        while *self.is_running.read().await {
            tokio::select! {
                _ = tokio::time::sleep(std::time::Duration::from_secs(self.config.interval_secs)) => {
                    if let Err(e) = self.scan(owner_id, credential).await {
                        warn!(error = %e, "scan cycle failed");
                    }
                }
                _ = self.wait_for_stop() => {
                    break;
                }
            }
        }

        Ok(())
    }

    /// Stop the scan loop
    pub async fn stop(&self) {
        *self.is_running.write().await = false;
    }

    /// Check if the loop is running
    pub async fn is_running(&self) -> bool {
        *self.is_running.read().await
    }

    /// Get watcher status
    pub async fn status(&self) -> WatcherStatus {
        WatcherStatus {
            is_running: *self.is_running.read().await,
            interval_secs: self.config.interval_secs,
            in_flight: self.in_flight.lock().await.len(),
        }
    }

    async fn wait_for_stop(&self) {
        loop {
            if !*self.is_running.read().await {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::lifecycle::testing::MockPublisher;
    use crate::models::{Angle, Platform, Remix, Variation};
    use crate::store::MemoryRemixStore;
    use async_trait::async_trait;

    /// Store double whose every operation fails, as during an outage
    struct UnavailableStore;

    #[async_trait]
    impl RemixStore for UnavailableStore {
        async fn upsert(&self, _remix: &Remix) -> Result<()> {
            Err(Error::persistence("store offline"))
        }

        async fn read(&self, _id: &str, _owner_id: &str) -> Result<Option<Remix>> {
            Err(Error::persistence("store offline"))
        }

        async fn replace(&self, _id: &str, _owner_id: &str, _remix: &Remix) -> Result<()> {
            Err(Error::persistence("store offline"))
        }

        async fn delete(&self, _id: &str, _owner_id: &str) -> Result<()> {
            Err(Error::persistence("store offline"))
        }

        async fn query(&self, _owner_id: &str) -> Result<Vec<Remix>> {
            Err(Error::persistence("store offline"))
        }
    }

    struct Fixture {
        store: Arc<MemoryRemixStore>,
        publisher: Arc<MockPublisher>,
        watcher: AutoPublishWatcher<MemoryRemixStore, MockPublisher>,
    }

    fn fixture(publisher: MockPublisher) -> Fixture {
        let store = Arc::new(MemoryRemixStore::new());
        let publisher = Arc::new(publisher);
        let lifecycle = Arc::new(LifecycleManager::new(store.clone(), publisher.clone()));
        let watcher = AutoPublishWatcher::with_defaults(store.clone(), lifecycle);
        Fixture {
            store,
            publisher,
            watcher,
        }
    }

    async fn seed_scheduled(store: &MemoryRemixStore, offset_minutes: i64) -> (String, String) {
        let mut remix = Remix::new(
            "alice",
            "source",
            vec![Variation::new(
                Platform::Linkedin,
                Angle::Educational,
                "post",
            )],
        );
        remix.variations[0].status = PostStatus::Scheduled;
        remix.variations[0].scheduled_for =
            Some(Utc::now() + chrono::Duration::minutes(offset_minutes));
        remix.refresh_status();
        store.upsert(&remix).await.unwrap();
        (remix.id.clone(), remix.variations[0].id.clone())
    }

    #[tokio::test]
    async fn test_scan_publishes_due_variation() {
        let f = fixture(MockPublisher::new());
        let (remix_id, variation_id) = seed_scheduled(&f.store, -5).await;

        let report = f.watcher.scan("alice", "token").await.unwrap();
        assert_eq!(report.due, 1);
        assert_eq!(report.published, 1);
        assert_eq!(report.failed, 0);

        let stored = f.store.read(&remix_id, "alice").await.unwrap().unwrap();
        assert_eq!(stored.status, PostStatus::Published);
        let v = stored.find_variation(&variation_id).unwrap();
        assert_eq!(v.status, PostStatus::Published);
        assert!(v.scheduled_for.is_none());
    }

    #[tokio::test]
    async fn test_scan_skips_future_schedules() {
        let f = fixture(MockPublisher::new());
        seed_scheduled(&f.store, 30).await;

        let report = f.watcher.scan("alice", "token").await.unwrap();
        assert_eq!(report.due, 0);
        assert_eq!(f.publisher.call_count(), 0);
    }

    #[tokio::test]
    async fn test_repeated_observation_publishes_once() {
        let f = fixture(MockPublisher::new());
        let (remix_id, _) = seed_scheduled(&f.store, -5).await;

        f.watcher.scan("alice", "token").await.unwrap();
        let second = f.watcher.scan("alice", "token").await.unwrap();

        assert_eq!(second.due, 0);
        assert_eq!(f.publisher.call_count(), 1);
        let stored = f.store.read(&remix_id, "alice").await.unwrap().unwrap();
        assert_eq!(stored.published_variation_ids.len(), 1);
        // Second scan observed the terminal state and released the marker.
        assert_eq!(f.watcher.status().await.in_flight, 0);
    }

    #[tokio::test]
    async fn test_failed_publish_stays_scheduled_and_retries() {
        let f = fixture(MockPublisher::failing());
        let (remix_id, variation_id) = seed_scheduled(&f.store, -5).await;

        let report = f.watcher.scan("alice", "token").await.unwrap();
        assert_eq!(report.failed, 1);

        let stored = f.store.read(&remix_id, "alice").await.unwrap().unwrap();
        let v = stored.find_variation(&variation_id).unwrap();
        assert_eq!(v.status, PostStatus::Scheduled);

        // Next cycle retries the still-Scheduled variation.
        let report = f.watcher.scan("alice", "token").await.unwrap();
        assert_eq!(report.due, 1);
        assert_eq!(f.publisher.call_count(), 2);
    }

    #[tokio::test]
    async fn test_scan_emits_events() {
        let f = fixture(MockPublisher::new());
        seed_scheduled(&f.store, -5).await;
        let mut receiver = f.watcher.subscribe();

        f.watcher.scan("alice", "token").await.unwrap();

        let event = receiver.try_recv().unwrap();
        assert!(matches!(event, WatcherEvent::Published { .. }));
        let event = receiver.try_recv().unwrap();
        match event {
            WatcherEvent::ScanCompleted { report } => assert_eq!(report.published, 1),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_startup_scan_failure_keeps_loop_alive() {
        let store = Arc::new(UnavailableStore);
        let publisher = Arc::new(MockPublisher::new());
        let lifecycle = Arc::new(LifecycleManager::new(store.clone(), publisher));
        let watcher = Arc::new(AutoPublishWatcher::new(
            WatcherConfig {
                interval_secs: 60,
                scan_on_start: true,
            },
            store,
            lifecycle,
        ));

        let handle = tokio::spawn({
            let watcher = watcher.clone();
            async move { watcher.run("alice", "token").await }
        });

        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert!(watcher.is_running().await);

        watcher.stop().await;
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_stop_flag() {
        let f = fixture(MockPublisher::new());
        assert!(!f.watcher.is_running().await);
        f.watcher.stop().await;
        assert!(!f.watcher.is_running().await);
    }
}
