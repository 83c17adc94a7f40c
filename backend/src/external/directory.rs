//! Other-services directory client
//!
//! Fetches the list of "other" services with their transport mode and
//! full/groupage flag from the external directory service.

use reqwest::Client;
use serde::Deserialize;
use shared::{LoadType, OtherServiceDirectory, OtherServiceInfo, TransportMode};

use crate::error::{AppError, AppResult};

/// Directory service API client
#[derive(Clone)]
pub struct DirectoryClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

/// Directory service record
#[derive(Debug, Deserialize)]
pub(crate) struct DirectoryRecord {
    #[serde(alias = "code")]
    pub service_code: String,
    #[serde(alias = "service_name", alias = "name")]
    pub label: String,
    pub transport_mode: String,
    #[serde(default)]
    pub full_groupage: Option<String>,
}

impl From<DirectoryRecord> for OtherServiceInfo {
    fn from(record: DirectoryRecord) -> Self {
        OtherServiceInfo {
            service_code: record.service_code.trim().to_string(),
            label: record.label,
            transport_mode: TransportMode::from(record.transport_mode),
            full_groupage: record
                .full_groupage
                .filter(|v| !v.trim().is_empty())
                .map(LoadType::from),
        }
    }
}

/// Directory service response envelope
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DirectoryResponse {
    List(Vec<DirectoryRecord>),
    Wrapped { data: Vec<DirectoryRecord> },
}

impl DirectoryClient {
    /// Create a new DirectoryClient
    pub fn new(base_url: String, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url,
            api_key,
        }
    }

    /// Fetch the full other-services directory
    pub async fn fetch_directory(&self) -> AppResult<OtherServiceDirectory> {
        let url = format!("{}/other-services", self.base_url.trim_end_matches('/'));

        let mut request = self.client.get(&url);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::DirectoryService(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::DirectoryService(format!("{} - {}", status, body)));
        }

        let data: DirectoryResponse = response
            .json()
            .await
            .map_err(|e| AppError::DirectoryService(format!("invalid response: {}", e)))?;

        let records = match data {
            DirectoryResponse::List(records) => records,
            DirectoryResponse::Wrapped { data } => data,
        };

        Ok(records.into_iter().map(OtherServiceInfo::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_conversion() {
        let record: DirectoryRecord = serde_json::from_str(
            r#"{"code":"SEA-LCL","name":"Sea groupage","transport_mode":"sea","full_groupage":"Groupage"}"#,
        )
        .unwrap();
        let info = OtherServiceInfo::from(record);
        assert_eq!(info.service_code, "SEA-LCL");
        assert_eq!(info.transport_mode, TransportMode::Sea);
        assert_eq!(info.full_groupage, Some(LoadType::Groupage));
    }

    #[test]
    fn test_wrapped_response_shape() {
        let body = r#"{"data":[{"service_code":"CUS","label":"Customs","transport_mode":"ROAD","full_groupage":""}]}"#;
        let parsed: DirectoryResponse = serde_json::from_str(body).unwrap();
        let DirectoryResponse::Wrapped { data } = parsed else {
            panic!("expected wrapped response");
        };
        let info = OtherServiceInfo::from(data.into_iter().next().unwrap());
        assert_eq!(info.full_groupage, None);
    }
}
