//! Common types used across the enquiry platform

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Service type as selected in the enquiry wizard
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum ServiceType {
    Air,
    Fcl,
    Lcl,
    /// Generic category; the concrete cargo shape comes from the
    /// other-services directory entry for the service code
    Others,
}

impl ServiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Air => "AIR",
            ServiceType::Fcl => "FCL",
            ServiceType::Lcl => "LCL",
            ServiceType::Others => "OTHERS",
        }
    }
}

impl std::fmt::Display for ServiceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ServiceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AIR" => Ok(ServiceType::Air),
            "FCL" => Ok(ServiceType::Fcl),
            "LCL" => Ok(ServiceType::Lcl),
            "OTHERS" => Ok(ServiceType::Others),
            other => Err(format!("Unknown service type: {}", other)),
        }
    }
}

/// Resolved transport category governing which cargo fields apply
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum EffectiveServiceType {
    Air,
    Fcl,
    Lcl,
}

impl EffectiveServiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EffectiveServiceType::Air => "AIR",
            EffectiveServiceType::Fcl => "FCL",
            EffectiveServiceType::Lcl => "LCL",
        }
    }
}

impl std::fmt::Display for EffectiveServiceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Direction of a shipment leg
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Trade {
    Export,
    Import,
}

/// Measurement unit for dimension rows
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum DimensionUnit {
    Centimeter,
    Inch,
}

impl DimensionUnit {
    pub fn label(&self) -> &'static str {
        match self {
            DimensionUnit::Centimeter => "Centimeter",
            DimensionUnit::Inch => "Inch",
        }
    }
}

/// Transport mode reported by the other-services directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransportMode {
    Sea,
    Air,
    Other(String),
}

impl From<String> for TransportMode {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "SEA" => TransportMode::Sea,
            "AIR" => TransportMode::Air,
            _ => TransportMode::Other(value),
        }
    }
}

impl From<TransportMode> for String {
    fn from(value: TransportMode) -> Self {
        match value {
            TransportMode::Sea => "SEA".to_string(),
            TransportMode::Air => "AIR".to_string(),
            TransportMode::Other(s) => s,
        }
    }
}

/// Full-container or groupage flag reported by the other-services directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LoadType {
    Full,
    Groupage,
    Other(String),
}

impl From<String> for LoadType {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "FULL" => LoadType::Full,
            "GROUPAGE" => LoadType::Groupage,
            _ => LoadType::Other(value),
        }
    }
}

impl From<LoadType> for String {
    fn from(value: LoadType) -> Self {
        match value {
            LoadType::Full => "FULL".to_string(),
            LoadType::Groupage => "GROUPAGE".to_string(),
            LoadType::Other(s) => s,
        }
    }
}

/// Directory metadata for an "other" service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OtherServiceInfo {
    pub service_code: String,
    pub label: String,
    pub transport_mode: TransportMode,
    pub full_groupage: Option<LoadType>,
}

/// Lookup of other-services metadata keyed by service code
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct OtherServiceDirectory {
    entries: HashMap<String, OtherServiceInfo>,
}

impl OtherServiceDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, info: OtherServiceInfo) {
        self.entries.insert(info.service_code.clone(), info);
    }

    pub fn get(&self, service_code: &str) -> Option<&OtherServiceInfo> {
        self.entries.get(service_code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by service code
    pub fn entries(&self) -> Vec<&OtherServiceInfo> {
        let mut entries: Vec<_> = self.entries.values().collect();
        entries.sort_by(|a, b| a.service_code.cmp(&b.service_code));
        entries
    }
}

impl FromIterator<OtherServiceInfo> for OtherServiceDirectory {
    fn from_iter<I: IntoIterator<Item = OtherServiceInfo>>(iter: I) -> Self {
        let mut directory = Self::new();
        for info in iter {
            directory.insert(info);
        }
        directory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_mode_parsing_is_case_insensitive() {
        assert_eq!(TransportMode::from("sea".to_string()), TransportMode::Sea);
        assert_eq!(TransportMode::from(" Air ".to_string()), TransportMode::Air);
        assert_eq!(
            TransportMode::from("ROAD".to_string()),
            TransportMode::Other("ROAD".to_string())
        );
    }

    #[test]
    fn test_load_type_round_trips_through_json() {
        let json = serde_json::to_string(&LoadType::Groupage).unwrap();
        assert_eq!(json, "\"GROUPAGE\"");
        let parsed: LoadType = serde_json::from_str("\"full\"").unwrap();
        assert_eq!(parsed, LoadType::Full);
    }

    #[test]
    fn test_service_type_wire_names() {
        assert_eq!(serde_json::to_string(&ServiceType::Others).unwrap(), "\"OTHERS\"");
        assert_eq!("lcl".parse::<ServiceType>().unwrap(), ServiceType::Lcl);
        assert!("ROAD".parse::<ServiceType>().is_err());
    }
}
