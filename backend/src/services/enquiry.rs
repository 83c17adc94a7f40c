//! Enquiry derivation service
//!
//! Runs the shared cargo engine over a submitted service tree: one
//! `EnquiryForm` per request, seeded with the current other-services
//! directory.

use serde::{Deserialize, Serialize};
use shared::{
    CargoSnapshot, DivisorTable, EnquiryForm, OtherServiceDirectory, ServiceDetail,
    ServicePayload, ServiceState, SubmitMode,
};
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Enquiry service for recompute and payload building
#[derive(Clone)]
pub struct EnquiryService {
    directory: OtherServiceDirectory,
    divisors: DivisorTable,
}

/// Input for a recompute pass
#[derive(Debug, Deserialize, Validate)]
pub struct DeriveInput {
    #[validate(length(min = 1, message = "at least one service is required"))]
    pub services: Vec<ServiceDetail>,
}

/// Input for building the submit payload
#[derive(Debug, Deserialize, Validate)]
pub struct PayloadInput {
    #[validate(length(min = 1, message = "at least one service is required"))]
    pub services: Vec<ServiceDetail>,
    /// True when the enquiry already exists and ids must be kept
    #[serde(default)]
    pub editing: bool,
}

/// One service leg after recompute
#[derive(Debug, Serialize)]
pub struct DerivedService {
    pub service: ServiceDetail,
    pub state: ServiceState,
    /// Manual values overwritten by the dimension aggregates
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_values: Option<CargoSnapshot>,
}

/// Recomputed enquiry
#[derive(Debug, Serialize)]
pub struct DerivedEnquiry {
    pub services: Vec<DerivedService>,
    pub changed_fields: usize,
}

/// Normalized submit payload
#[derive(Debug, Serialize)]
pub struct EnquiryPayload {
    pub services: Vec<ServicePayload>,
}

impl EnquiryService {
    /// Create a new EnquiryService
    pub fn new(directory: OtherServiceDirectory) -> Self {
        Self {
            directory,
            divisors: DivisorTable::default(),
        }
    }

    fn form(&self, services: Vec<ServiceDetail>) -> (EnquiryForm, usize) {
        let mut form = EnquiryForm::new(self.directory.clone()).with_divisors(self.divisors.clone());
        let report = form.replace_services(services);
        (form, report.changed_fields)
    }

    /// Recompute every derived field and report per-service state
    pub fn derive(&self, input: DeriveInput) -> AppResult<DerivedEnquiry> {
        input
            .validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        let (form, changed_fields) = self.form(input.services);

        let services = (0..form.services().len())
            .map(|index| {
                Ok(DerivedService {
                    service: form.service(index)?.clone(),
                    state: form.state(index)?,
                    original_values: form.original_values(index)?.cloned(),
                })
            })
            .collect::<AppResult<Vec<_>>>()?;

        tracing::debug!(
            services = services.len(),
            changed = changed_fields,
            "Derived enquiry cargo"
        );

        Ok(DerivedEnquiry {
            services,
            changed_fields,
        })
    }

    /// Validate and normalize the tree into the submit payload
    pub fn payload(&self, input: PayloadInput) -> AppResult<EnquiryPayload> {
        input
            .validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        let mode = if input.editing {
            SubmitMode::Update
        } else {
            SubmitMode::Create
        };
        let (mut form, _) = self.form(input.services);
        let services = form.build_payload(mode)?;

        tracing::info!(services = services.len(), ?mode, "Built enquiry payload");
        Ok(EnquiryPayload { services })
    }
}
