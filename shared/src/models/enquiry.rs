//! Enquiry form models: service legs, cargo lines and dimension rows

use serde::{Deserialize, Serialize};

use crate::types::{DimensionUnit, ServiceType, Trade};

/// One leg of an enquiry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceDetail {
    #[serde(default)]
    pub id: Option<i64>,
    pub service: ServiceType,
    /// Only meaningful for `ServiceType::Others`
    #[serde(default)]
    pub service_code: Option<String>,
    #[serde(default)]
    pub service_name: Option<String>,
    #[serde(default)]
    pub trade: Option<Trade>,
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub pickup: bool,
    #[serde(default)]
    pub pickup_location: Option<String>,
    #[serde(default)]
    pub delivery: bool,
    #[serde(default)]
    pub delivery_location: Option<String>,
    #[serde(default)]
    pub cargo: CargoDetail,
    #[serde(default)]
    pub fcl_details: Vec<ContainerDetail>,
    #[serde(default)]
    pub dimensions: Vec<DimensionRow>,
    #[serde(default)]
    pub dimension_unit: Option<DimensionUnit>,
}

impl ServiceDetail {
    pub fn new(service: ServiceType) -> Self {
        Self {
            id: None,
            service,
            service_code: None,
            service_name: None,
            trade: None,
            origin: None,
            destination: None,
            pickup: false,
            pickup_location: None,
            delivery: false,
            delivery_location: None,
            cargo: CargoDetail::default(),
            fcl_details: Vec::new(),
            dimensions: Vec::new(),
            dimension_unit: None,
        }
    }

    /// Create an "other" service leg for a directory service code
    pub fn other(service_code: impl Into<String>) -> Self {
        Self {
            service_code: Some(service_code.into()),
            ..Self::new(ServiceType::Others)
        }
    }
}

/// Scalar cargo line for AIR and LCL services
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CargoDetail {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub no_of_packages: Option<u32>,
    /// Kilograms
    #[serde(default)]
    pub gross_weight: Option<f64>,
    /// AIR only
    #[serde(default)]
    pub volume_weight: Option<f64>,
    /// LCL only, cubic metres
    #[serde(default)]
    pub volume: Option<f64>,
    /// Derived, never user-entered
    #[serde(default)]
    pub chargable_weight: f64,
    /// Derived, never user-entered
    #[serde(default)]
    pub chargable_volume: f64,
}

/// One FCL container line
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ContainerDetail {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub container_type_code: Option<String>,
    #[serde(default)]
    pub no_of_containers: Option<u32>,
    #[serde(default)]
    pub gross_weight: Option<f64>,
}

/// One package-type entry with physical dimensions
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DimensionRow {
    /// Present only once the row has been persisted
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub pieces: u32,
    #[serde(default)]
    pub length: Option<f64>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    /// Unit divisor looked up from the divisor table
    #[serde(default)]
    pub value: f64,
    /// Derived volumetric weight for the row
    #[serde(default)]
    pub vol_weight: f64,
}

impl DimensionRow {
    pub fn new(pieces: u32, length: f64, width: f64, height: f64) -> Self {
        Self {
            pieces,
            length: Some(length),
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    /// Whether the row contributes to a valid dimension set
    pub fn is_counted(&self) -> bool {
        self.pieces > 0 && self.vol_weight > 0.0
    }
}
