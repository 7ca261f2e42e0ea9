//! Optional persistence sink for estimate audit records.
//!
//! Writes are fire-and-forget from the request path: a failed or slow
//! insert is logged and dropped, never surfaced to the client.

use crate::config::PersistenceConfig;
use crate::types::EstimateRecord;
use anyhow::{Context, Result};
use async_trait::async_trait;
use mongodb::{Client, Collection};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Destination for estimate records.
///
/// Each insert is an independent, unordered append; records are never
/// read back or updated by this service.
#[async_trait]
pub trait EstimateSink: Send + Sync {
    /// Append one record.
    async fn insert(&self, record: EstimateRecord) -> Result<()>;
}

/// MongoDB-backed sink.
pub struct MongoSink {
    collection: Collection<EstimateRecord>,
}

impl MongoSink {
    /// Connect to the configured MongoDB deployment.
    ///
    /// Called only when persistence is enabled; a bad connection
    /// string is startup-fatal.
    pub async fn connect(config: &PersistenceConfig) -> Result<Self> {
        let uri = config
            .mongo_uri
            .as_deref()
            .context("Persistence enabled but no MONGO_URI configured")?;

        let client = Client::with_uri_str(uri)
            .await
            .context("Failed to create MongoDB client")?;
        let collection = client
            .database(&config.database)
            .collection::<EstimateRecord>(&config.collection);

        info!(
            database = %config.database,
            collection = %config.collection,
            "Persistence sink connected"
        );

        Ok(Self { collection })
    }
}

#[async_trait]
impl EstimateSink for MongoSink {
    async fn insert(&self, record: EstimateRecord) -> Result<()> {
        self.collection
            .insert_one(&record)
            .await
            .context("Failed to insert estimate record")?;

        debug!(
            email = record.email.as_deref().unwrap_or("-"),
            status = record.result.status.as_str(),
            "Estimate record persisted"
        );

        Ok(())
    }
}

/// Hand a record to the sink without blocking the response.
///
/// The insert runs in its own task under `timeout`; any error or
/// timeout is logged at warn and otherwise ignored.
pub fn record_estimate(sink: Arc<dyn EstimateSink>, record: EstimateRecord, timeout: Duration) {
    tokio::spawn(async move {
        match tokio::time::timeout(timeout, sink.insert(record)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                warn!(error = %e, "Estimate record insert failed");
            }
            Err(_) => {
                warn!(timeout_ms = timeout.as_millis() as u64, "Estimate record insert timed out");
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LoadRequest, ScoreResult};
    use std::sync::atomic::{AtomicU64, Ordering};

    struct CountingSink {
        inserts: AtomicU64,
        fail: bool,
    }

    #[async_trait]
    impl EstimateSink for CountingSink {
        async fn insert(&self, _record: EstimateRecord) -> Result<()> {
            self.inserts.fetch_add(1, Ordering::Relaxed);
            if self.fail {
                anyhow::bail!("sink unavailable")
            }
            Ok(())
        }
    }

    fn record() -> EstimateRecord {
        EstimateRecord::new(LoadRequest::new(60, 2, "Math"), ScoreResult::from_score(0.5))
    }

    #[tokio::test]
    async fn test_record_estimate_runs_the_insert() {
        let sink = Arc::new(CountingSink {
            inserts: AtomicU64::new(0),
            fail: false,
        });

        record_estimate(sink.clone(), record(), Duration::from_millis(500));
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(sink.inserts.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_failing_insert_does_not_panic_or_propagate() {
        let sink = Arc::new(CountingSink {
            inserts: AtomicU64::new(0),
            fail: true,
        });

        // Nothing to assert beyond "this returns and the task swallows
        // the error"; the response path never sees it.
        record_estimate(sink.clone(), record(), Duration::from_millis(500));
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(sink.inserts.load(Ordering::Relaxed), 1);
    }
}
