//! Submit-time validation of enquiry service legs
//!
//! Which cargo fields are mandatory depends on the effective service type,
//! so every check here runs after [`effective_type_of`].

use crate::derivation::effective_type_of;
use crate::error::ValidationError;
use crate::models::{ContainerDetail, ServiceDetail};
use crate::types::{EffectiveServiceType, OtherServiceDirectory, ServiceType};

// ============================================================================
// Field Validations
// ============================================================================

/// Validate a package count (at least one package)
pub fn validate_package_count(packages: Option<u32>) -> Result<(), &'static str> {
    match packages {
        Some(n) if n >= 1 => Ok(()),
        Some(_) => Err("Number of packages must be at least 1"),
        None => Err("Number of packages is required"),
    }
}

/// Validate a gross weight in kilograms
pub fn validate_gross_weight(weight: Option<f64>) -> Result<(), &'static str> {
    validate_positive(weight, "Gross weight is required", "Gross weight must be greater than 0")
}

/// Validate an AIR volume weight
pub fn validate_volume_weight(volume_weight: Option<f64>) -> Result<(), &'static str> {
    validate_positive(
        volume_weight,
        "Volume weight is required",
        "Volume weight must be greater than 0",
    )
}

/// Validate an LCL volume in cubic metres
pub fn validate_volume(volume: Option<f64>) -> Result<(), &'static str> {
    validate_positive(volume, "Volume is required", "Volume must be greater than 0")
}

fn validate_positive(
    value: Option<f64>,
    missing: &'static str,
    not_positive: &'static str,
) -> Result<(), &'static str> {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => Ok(()),
        Some(_) => Err(not_positive),
        None => Err(missing),
    }
}

/// Validate a location such as origin or destination
pub fn validate_location(location: Option<&str>) -> Result<(), &'static str> {
    match location {
        Some(l) if !l.trim().is_empty() => Ok(()),
        _ => Err("Location is required"),
    }
}

/// Validate one FCL container line
pub fn validate_container(container: &ContainerDetail) -> Vec<(&'static str, &'static str)> {
    let mut errors = Vec::new();
    if container
        .container_type_code
        .as_deref()
        .map_or(true, |c| c.trim().is_empty())
    {
        errors.push(("container_type_code", "Container type is required"));
    }
    match container.no_of_containers {
        Some(n) if n >= 1 => {}
        _ => errors.push(("no_of_containers", "Number of containers must be at least 1")),
    }
    if let Err(e) = validate_gross_weight(container.gross_weight) {
        errors.push(("gross_weight", e));
    }
    errors
}

// ============================================================================
// Service Validations
// ============================================================================

/// Validate one service leg against the requirements of its effective type
pub fn validate_service(
    index: usize,
    detail: &ServiceDetail,
    directory: &OtherServiceDirectory,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut push = |field: &str, message: &str| {
        errors.push(ValidationError::new(index, field, message));
    };

    if let Err(e) = validate_location(detail.origin.as_deref()) {
        push("origin", e);
    }
    if let Err(e) = validate_location(detail.destination.as_deref()) {
        push("destination", e);
    }
    if detail.pickup {
        if let Err(e) = validate_location(detail.pickup_location.as_deref()) {
            push("pickup_location", e);
        }
    }
    if detail.delivery {
        if let Err(e) = validate_location(detail.delivery_location.as_deref()) {
            push("delivery_location", e);
        }
    }

    match (detail.service, detail.service_code.as_deref()) {
        (ServiceType::Others, None) => push("service_code", "Service code is required"),
        (ServiceType::Others, Some(code)) => {
            if !directory.is_empty() && directory.get(code).is_none() {
                push("service_code", "Unknown service code");
            }
        }
        (_, _) => {
            if detail.trade.is_none() {
                push("trade", "Trade is required");
            }
        }
    }

    let cargo = &detail.cargo;
    match effective_type_of(detail, directory) {
        EffectiveServiceType::Fcl => {
            if detail.fcl_details.is_empty() {
                push("fcl_details", "At least one container is required");
            }
            for (i, container) in detail.fcl_details.iter().enumerate() {
                for (field, message) in validate_container(container) {
                    push(&format!("fcl_details[{}].{}", i, field), message);
                }
            }
        }
        EffectiveServiceType::Air => {
            if let Err(e) = validate_package_count(cargo.no_of_packages) {
                push("no_of_packages", e);
            }
            if let Err(e) = validate_gross_weight(cargo.gross_weight) {
                push("gross_weight", e);
            }
            if let Err(e) = validate_volume_weight(cargo.volume_weight) {
                push("volume_weight", e);
            }
        }
        EffectiveServiceType::Lcl => {
            if let Err(e) = validate_package_count(cargo.no_of_packages) {
                push("no_of_packages", e);
            }
            if let Err(e) = validate_gross_weight(cargo.gross_weight) {
                push("gross_weight", e);
            }
            if let Err(e) = validate_volume(cargo.volume) {
                push("volume", e);
            }
        }
    }

    errors
}

/// Validate every service leg of an enquiry
pub fn validate_services(
    services: &[ServiceDetail],
    directory: &OtherServiceDirectory,
) -> Result<(), Vec<ValidationError>> {
    if services.is_empty() {
        return Err(vec![ValidationError::new(
            0,
            "services",
            "At least one service is required",
        )]);
    }
    let errors: Vec<_> = services
        .iter()
        .enumerate()
        .flat_map(|(i, detail)| validate_service(i, detail, directory))
        .collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CargoDetail;
    use crate::types::{LoadType, OtherServiceInfo, TransportMode, Trade};

    fn routed(service: ServiceType) -> ServiceDetail {
        ServiceDetail {
            trade: Some(Trade::Export),
            origin: Some("BKK".to_string()),
            destination: Some("SIN".to_string()),
            ..ServiceDetail::new(service)
        }
    }

    fn fields(errors: &[ValidationError]) -> Vec<&str> {
        errors.iter().map(|e| e.field.as_str()).collect()
    }

    // ========================================================================
    // Field Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_package_count() {
        assert!(validate_package_count(Some(1)).is_ok());
        assert!(validate_package_count(Some(0)).is_err());
        assert!(validate_package_count(None).is_err());
    }

    #[test]
    fn test_validate_gross_weight() {
        assert!(validate_gross_weight(Some(0.5)).is_ok());
        assert!(validate_gross_weight(Some(0.0)).is_err());
        assert!(validate_gross_weight(Some(-3.0)).is_err());
        assert!(validate_gross_weight(Some(f64::NAN)).is_err());
        assert!(validate_gross_weight(None).is_err());
    }

    #[test]
    fn test_validate_location() {
        assert!(validate_location(Some("Laem Chabang")).is_ok());
        assert!(validate_location(Some("   ")).is_err());
        assert!(validate_location(None).is_err());
    }

    #[test]
    fn test_validate_container() {
        let ok = ContainerDetail {
            id: None,
            container_type_code: Some("40HC".to_string()),
            no_of_containers: Some(2),
            gross_weight: Some(18_000.0),
        };
        assert!(validate_container(&ok).is_empty());

        let errors = validate_container(&ContainerDetail::default());
        let names: Vec<_> = errors.iter().map(|(f, _)| *f).collect();
        assert_eq!(names, vec!["container_type_code", "no_of_containers", "gross_weight"]);
    }

    // ========================================================================
    // Service Validation Tests
    // ========================================================================

    #[test]
    fn test_valid_air_service() {
        let detail = ServiceDetail {
            cargo: CargoDetail {
                no_of_packages: Some(4),
                gross_weight: Some(120.0),
                volume_weight: Some(95.0),
                ..Default::default()
            },
            ..routed(ServiceType::Air)
        };
        assert!(validate_service(0, &detail, &OtherServiceDirectory::new()).is_empty());
    }

    #[test]
    fn test_lcl_requires_volume_not_volume_weight() {
        let detail = ServiceDetail {
            cargo: CargoDetail {
                no_of_packages: Some(4),
                gross_weight: Some(500.0),
                volume_weight: Some(10.0),
                ..Default::default()
            },
            ..routed(ServiceType::Lcl)
        };
        let errors = validate_service(2, &detail, &OtherServiceDirectory::new());
        assert_eq!(fields(&errors), vec!["volume"]);
        assert_eq!(errors[0].index, 2);
    }

    #[test]
    fn test_fcl_requires_containers() {
        let detail = routed(ServiceType::Fcl);
        let errors = validate_service(0, &detail, &OtherServiceDirectory::new());
        assert_eq!(fields(&errors), vec!["fcl_details"]);
    }

    #[test]
    fn test_others_requires_known_code_not_trade() {
        let directory: OtherServiceDirectory = std::iter::once(OtherServiceInfo {
            service_code: "SEAFCL".to_string(),
            label: "Sea full container".to_string(),
            transport_mode: TransportMode::Sea,
            full_groupage: Some(LoadType::Full),
        })
        .collect();

        let mut detail = ServiceDetail {
            trade: None,
            service_code: Some("NOPE".to_string()),
            fcl_details: vec![ContainerDetail {
                id: None,
                container_type_code: Some("20GP".to_string()),
                no_of_containers: Some(1),
                gross_weight: Some(9000.0),
            }],
            ..routed(ServiceType::Others)
        };
        let errors = validate_service(0, &detail, &directory);
        assert_eq!(fields(&errors), vec!["service_code"]);

        detail.service_code = Some("SEAFCL".to_string());
        assert!(validate_service(0, &detail, &directory).is_empty());
    }

    #[test]
    fn test_non_others_requires_trade() {
        let detail = ServiceDetail {
            trade: None,
            cargo: CargoDetail {
                no_of_packages: Some(1),
                gross_weight: Some(1.0),
                volume_weight: Some(1.0),
                ..Default::default()
            },
            ..routed(ServiceType::Air)
        };
        let errors = validate_service(0, &detail, &OtherServiceDirectory::new());
        assert_eq!(fields(&errors), vec!["trade"]);
    }

    #[test]
    fn test_pickup_location_required_when_pickup_set() {
        let detail = ServiceDetail {
            pickup: true,
            cargo: CargoDetail {
                no_of_packages: Some(1),
                gross_weight: Some(1.0),
                volume: Some(1.0),
                ..Default::default()
            },
            ..routed(ServiceType::Lcl)
        };
        let errors = validate_service(0, &detail, &OtherServiceDirectory::new());
        assert_eq!(fields(&errors), vec!["pickup_location"]);
    }

    #[test]
    fn test_empty_enquiry_is_invalid() {
        let errors = validate_services(&[], &OtherServiceDirectory::new()).unwrap_err();
        assert_eq!(fields(&errors), vec!["services"]);
    }
}
