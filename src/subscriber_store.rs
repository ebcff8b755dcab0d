//! Append-only subscriber list kept as a single JSON array on disk.
//!
//! Every append rewrites the whole file. Appends are serialised inside the
//! process; separate processes sharing the file can still lose updates.
//! Existing elements are carried over as raw JSON, so records written by older
//! deployments (string coordinates, extra keys) survive an append unchanged.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::domain::{NewSubscription, SubscriptionRecord};

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("Failed to access the subscriber file: {0}")]
    Io(#[from] std::io::Error),
    #[error("The subscriber file is not a valid subscriber list: {0}")]
    Corrupt(#[from] serde_json::Error),
}

pub struct SubscriberStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl SubscriberStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Typed view of the file. Fails on elements this service did not write.
    #[tracing::instrument(name = "Loading subscribers", skip(self), fields(path = %self.path.display()))]
    pub async fn load(&self) -> Result<Vec<SubscriptionRecord>, StoreError> {
        let bytes = self.read().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn read(&self) -> Result<Vec<u8>, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(b"[]".to_vec()),
            Err(e) => Err(e.into()),
        }
    }

    /// Stamps the subscription and appends it. `ts` never goes backwards
    /// relative to the last stored record.
    #[tracing::instrument(
        name = "Saving new subscriber",
        skip(self, subscription),
        fields(path = %self.path.display())
    )]
    pub async fn append(
        &self,
        subscription: NewSubscription,
    ) -> Result<SubscriptionRecord, StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut subscribers: Vec<Value> = serde_json::from_slice(&self.read().await?)?;
        let now = Utc::now();
        let ts = match subscribers.last().and_then(stored_ts) {
            Some(last) if last > now => last,
            _ => now,
        };

        let record = SubscriptionRecord::new(subscription, ts);
        subscribers.push(serde_json::to_value(&record)?);
        self.write(&subscribers).await?;

        tracing::info!(subscribers = subscribers.len(), "Subscriber saved");
        Ok(record)
    }

    async fn write(&self, subscribers: &[Value]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let contents = serde_json::to_vec_pretty(subscribers)?;
        let staging = self.path.with_extension("json.tmp");
        tokio::fs::write(&staging, contents).await?;
        tokio::fs::rename(&staging, &self.path).await?;
        Ok(())
    }
}

/// Older files stamped `ts` as `...+00:00Z`; anything unreadable is ignored.
fn stored_ts(record: &Value) -> Option<DateTime<Utc>> {
    let raw = record.get("ts")?.as_str()?;
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw.trim_end_matches('Z')))
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}
