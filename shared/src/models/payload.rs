//! Wire-format request payload for enquiry create/update
//!
//! Weight and volume figures are fixed-precision strings; the backend
//! expects strings, not JSON numbers, for these fields.

use serde::{Deserialize, Serialize};

use crate::types::{DimensionUnit, ServiceType, Trade};

/// One normalized entry of the `services[]` array
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServicePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub service: ServiceType,
    /// Always null for OTHERS services
    pub trade: Option<Trade>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub pickup: bool,
    pub pickup_location: Option<String>,
    pub delivery: bool,
    pub delivery_location: Option<String>,
    #[serde(flatten)]
    pub cargo: CargoPayload,
}

/// Cargo fields, shaped by the effective service type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum CargoPayload {
    Fcl(FclCargoPayload),
    Air(AirCargoPayload),
    Lcl(LclCargoPayload),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FclCargoPayload {
    pub fcl_details: Vec<ContainerPayload>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContainerPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub container_type: Option<String>,
    pub no_of_containers: u32,
    /// 2 decimal places
    pub gross_weight: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AirCargoPayload {
    pub no_of_packages: u32,
    /// 2 decimal places
    pub gross_weight: String,
    /// Rounded to 3 decimal places
    pub volume_weight: f64,
    /// 2 decimal places
    pub chargeable_weight: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimension_details: Option<Vec<DimensionPayload>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LclCargoPayload {
    pub no_of_packages: u32,
    /// 2 decimal places
    pub gross_weight: String,
    /// 1 decimal place
    pub volume: String,
    /// 1 decimal place
    pub chargeable_volume: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimension_details: Option<Vec<DimensionPayload>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DimensionPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub pieces: u32,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub value: f64,
    /// Rounded to 3 decimal places
    pub volume_weight: f64,
    pub unit: Option<DimensionUnit>,
}
