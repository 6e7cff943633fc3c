use async_trait::async_trait;
use chrono::Utc;
use media_request_client::{ClientError, MediaRequestService};
use media_request_models::{RequestCounts, SensorKind, SensorState};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

/// Sensors re-polled whenever the request service reports a change
pub const REFRESHED_SENSORS: [SensorKind; 4] = [
    SensorKind::Pending,
    SensorKind::Movies,
    SensorKind::Tv,
    SensorKind::Total,
];

/// The host's "re-evaluate this entity now" call
#[async_trait]
pub trait EntityUpdater: Send + Sync {
    async fn update_entity(&self, entity_id: &str) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RefreshReport {
    pub updated: usize,
    pub failed: usize,
}

/// Asks the host to re-poll sensor entities, one after the other.
///
/// Holds no state of its own, so concurrent and repeated calls are fine.
#[derive(Clone)]
pub struct SensorRefreshTrigger {
    updater: Arc<dyn EntityUpdater>,
}

impl SensorRefreshTrigger {
    pub fn new(updater: Arc<dyn EntityUpdater>) -> Self {
        Self { updater }
    }

    /// Refresh the four request sensors
    pub async fn refresh(&self) -> RefreshReport {
        self.refresh_kinds(&REFRESHED_SENSORS).await
    }

    pub async fn refresh_kinds(&self, kinds: &[SensorKind]) -> RefreshReport {
        debug!("Updating sensors");
        let mut report = RefreshReport::default();

        for kind in kinds {
            match self.updater.update_entity(kind.entity_id()).await {
                Ok(()) => report.updated += 1,
                Err(e) => {
                    warn!(entity_id = kind.entity_id(), error = %e, "Sensor update failed");
                    report.failed += 1;
                }
            }
        }

        report
    }
}

/// How long one `GET /request/count` answer serves the four request sensors
pub const REQUEST_COUNTS_TTL: Duration = Duration::from_secs(5);

/// Latest sensor values, fetched from the request service on each update.
///
/// The four request sensors share one counts call; its answer is reused for
/// `REQUEST_COUNTS_TTL` so a full refresh hits the service once.
pub struct RequestSensors {
    service: Arc<dyn MediaRequestService>,
    states: RwLock<BTreeMap<SensorKind, SensorState>>,
    counts: Mutex<Option<(Instant, RequestCounts)>>,
    counts_ttl: Duration,
}

impl RequestSensors {
    pub fn new(service: Arc<dyn MediaRequestService>) -> Self {
        Self::with_counts_ttl(service, REQUEST_COUNTS_TTL)
    }

    pub fn with_counts_ttl(service: Arc<dyn MediaRequestService>, counts_ttl: Duration) -> Self {
        let states = SensorKind::ALL
            .into_iter()
            .map(|kind| (kind, SensorState::unknown(kind)))
            .collect();
        Self {
            service,
            states: RwLock::new(states),
            counts: Mutex::new(None),
            counts_ttl,
        }
    }

    async fn request_counts(&self) -> Result<RequestCounts, ClientError> {
        // held across the fetch so concurrent updates wait for one answer
        let mut cached = self.counts.lock().await;
        if let Some((fetched_at, counts)) = cached.as_ref() {
            if fetched_at.elapsed() < self.counts_ttl {
                return Ok(counts.clone());
            }
        }

        let counts = self.service.request_counts().await?;
        *cached = Some((Instant::now(), counts.clone()));
        Ok(counts)
    }

    pub async fn snapshot(&self) -> Vec<SensorState> {
        self.states.read().await.values().cloned().collect()
    }

    pub async fn get(&self, kind: SensorKind) -> Option<SensorState> {
        self.states.read().await.get(&kind).cloned()
    }

    /// Fetch the current value of one sensor and store it
    pub async fn update(&self, kind: SensorKind) -> Result<u64, ClientError> {
        let value = match kind {
            SensorKind::Pending => self.request_counts().await?.pending,
            SensorKind::Movies => self.request_counts().await?.movie,
            SensorKind::Tv => self.request_counts().await?.tv,
            SensorKind::Total => self.request_counts().await?.total,
            SensorKind::Issues => self.service.issue_counts().await?.open,
        };

        let mut states = self.states.write().await;
        let state = states.entry(kind).or_insert_with(|| SensorState::unknown(kind));
        state.value = Some(value);
        state.last_updated = Some(Utc::now());

        debug!(entity_id = kind.entity_id(), value = value, "Sensor updated");
        Ok(value)
    }
}

#[async_trait]
impl EntityUpdater for RequestSensors {
    async fn update_entity(&self, entity_id: &str) -> anyhow::Result<()> {
        let kind = SensorKind::from_entity_id(entity_id)
            .ok_or_else(|| anyhow::anyhow!("Unknown sensor entity: {}", entity_id))?;
        self.update(kind).await?;
        Ok(())
    }
}
