//! Other-services directory service
//!
//! Keeps the directory used to resolve OTHERS services in memory and
//! refreshes it from a CSV file or the external directory service.

use std::{io::Read, sync::Arc};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use shared::{OtherServiceDirectory, OtherServiceInfo};
use tokio::sync::RwLock;

use crate::config::DirectoryConfig;
use crate::error::{AppError, AppResult};
use crate::external::directory::DirectoryRecord;
use crate::external::DirectoryClient;

/// Where the directory was loaded from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectorySource {
    Static,
    Csv,
    Remote,
}

/// Loaded directory with its load time
#[derive(Debug, Clone, Serialize)]
pub struct DirectorySnapshot {
    pub source: DirectorySource,
    pub loaded_at: Option<DateTime<Utc>>,
    pub entries: Vec<OtherServiceInfo>,
}

#[derive(Debug)]
struct DirectoryState {
    directory: OtherServiceDirectory,
    source: DirectorySource,
    loaded_at: Option<DateTime<Utc>>,
    /// Last refresh attempt, successful or not
    last_attempt: Option<DateTime<Utc>>,
}

/// Directory service shared by request handlers
#[derive(Clone)]
pub struct DirectoryService {
    state: Arc<RwLock<DirectoryState>>,
    client: Option<DirectoryClient>,
    csv_path: Option<String>,
    refresh_after: Duration,
}

impl DirectoryService {
    /// Create a DirectoryService from configuration. Nothing is loaded until
    /// [`DirectoryService::refresh`] or the first stale read.
    pub fn from_config(config: &DirectoryConfig) -> Self {
        let client = config
            .url
            .clone()
            .map(|url| DirectoryClient::new(url, config.api_key.clone()));
        Self {
            state: Arc::new(RwLock::new(DirectoryState {
                directory: OtherServiceDirectory::new(),
                source: DirectorySource::Static,
                loaded_at: None,
                last_attempt: None,
            })),
            client,
            csv_path: config.csv_path.clone(),
            refresh_after: Duration::seconds(config.refresh_secs.max(0)),
        }
    }

    /// Create a DirectoryService with a fixed directory that never refreshes
    pub fn with_directory(directory: OtherServiceDirectory) -> Self {
        Self {
            state: Arc::new(RwLock::new(DirectoryState {
                directory,
                source: DirectorySource::Static,
                loaded_at: Some(Utc::now()),
                last_attempt: None,
            })),
            client: None,
            csv_path: None,
            refresh_after: Duration::zero(),
        }
    }

    fn has_source(&self) -> bool {
        self.client.is_some() || self.csv_path.is_some()
    }

    /// Reload the directory from its configured source
    pub async fn refresh(&self) -> AppResult<usize> {
        if self.has_source() {
            self.state.write().await.last_attempt = Some(Utc::now());
        }
        let (directory, source) = if let Some(client) = &self.client {
            (client.fetch_directory().await?, DirectorySource::Remote)
        } else if let Some(path) = &self.csv_path {
            let bytes = tokio::fs::read(path)
                .await
                .map_err(|e| AppError::Configuration(format!("cannot read {}: {}", path, e)))?;
            (parse_directory_csv(bytes.as_slice())?, DirectorySource::Csv)
        } else {
            return Ok(self.state.read().await.directory.len());
        };

        let count = directory.len();
        let mut state = self.state.write().await;
        state.directory = directory;
        state.source = source;
        state.loaded_at = Some(Utc::now());
        tracing::info!(entries = count, source = ?source, "Other-services directory loaded");
        Ok(count)
    }

    /// A source is retried at most once per `refresh_secs`, whether the last
    /// attempt succeeded or failed
    fn is_stale(&self, last_attempt: Option<DateTime<Utc>>) -> bool {
        if !self.has_source() {
            return false;
        }
        match last_attempt {
            None => true,
            Some(at) => Utc::now() - at >= self.refresh_after,
        }
    }

    /// Current directory, refreshed first when stale. A failed refresh keeps
    /// serving the previous directory.
    pub async fn current(&self) -> OtherServiceDirectory {
        let last_attempt = self.state.read().await.last_attempt;
        if self.is_stale(last_attempt) {
            if let Err(e) = self.refresh().await {
                tracing::warn!("Directory refresh failed, serving previous copy: {}", e);
            }
        }
        self.state.read().await.directory.clone()
    }

    pub async fn snapshot(&self) -> DirectorySnapshot {
        let directory = self.current().await;
        let state = self.state.read().await;
        DirectorySnapshot {
            source: state.source,
            loaded_at: state.loaded_at,
            entries: directory.entries().into_iter().cloned().collect(),
        }
    }
}

/// Parse a directory CSV with a header row of
/// `service_code,label,transport_mode,full_groupage`
pub fn parse_directory_csv<R: Read>(reader: R) -> AppResult<OtherServiceDirectory> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut directory = OtherServiceDirectory::new();
    for (line, record) in csv_reader.deserialize::<DirectoryRecord>().enumerate() {
        let record = record.map_err(|e| AppError::Validation {
            field: format!("directory row {}", line + 1),
            message: e.to_string(),
        })?;
        if record.service_code.trim().is_empty() {
            continue;
        }
        directory.insert(OtherServiceInfo::from(record));
    }
    Ok(directory)
}
