//! Error types for the enquiry form and submit-time validation

use serde::Serialize;
use thiserror::Error;

use crate::form::CargoField;
use crate::types::EffectiveServiceType;

/// Errors raised by the enquiry form mutation API
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormError {
    #[error("No service at index {0}")]
    ServiceNotFound(usize),

    #[error("No dimension row {row} on service {index}")]
    DimensionRowNotFound { index: usize, row: usize },

    #[error("No container {container} on service {index}")]
    ContainerNotFound { index: usize, container: usize },

    #[error("{field} is derived from dimensions and cannot be edited")]
    FieldLocked { index: usize, field: CargoField },

    #[error("{field} does not apply to {service} services")]
    FieldNotApplicable {
        field: &'static str,
        service: EffectiveServiceType,
    },

    #[error("An FCL service needs at least one container")]
    LastContainer { index: usize },

    #[error("Enquiry has {} invalid field(s)", .0.len())]
    Invalid(Vec<ValidationError>),
}

/// A single submit-time validation failure
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("services[{index}].{field}: {message}")]
pub struct ValidationError {
    pub index: usize,
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(index: usize, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            index,
            field: field.into(),
            message: message.into(),
        }
    }
}

pub type FormResult<T> = Result<T, FormError>;
