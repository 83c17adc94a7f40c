//! Submit-time payload normalization
//!
//! Turns the in-memory service tree into the `services[]` array of the
//! enquiry create/update request body.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::{
    AirCargoPayload, CargoPayload, ContainerPayload, DimensionPayload, FclCargoPayload,
    LclCargoPayload, ServiceDetail, ServicePayload,
};
use crate::types::{EffectiveServiceType, OtherServiceDirectory, ServiceType};

use super::chargeable::{calculate_chargeable_volume, calculate_chargeable_weight, finite_or_zero};
use super::dimensions::has_valid_dimensions;
use super::resolver::effective_type_of;

/// Whether the payload creates a new enquiry or updates a persisted one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitMode {
    #[default]
    Create,
    Update,
}

/// Format a number with a fixed count of decimal places.
///
/// Rounds half away from zero on the exact binary value, which is how
/// JavaScript's `toFixed` behaves. Non-finite input formats as zero.
pub fn to_fixed(value: f64, decimals: u32) -> String {
    let mut rounded = to_decimal(value)
        .round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(decimals);
    rounded.to_string()
}

/// Round to a number of decimal places using the same rule as [`to_fixed`]
pub fn round_to(value: f64, decimals: u32) -> f64 {
    to_fixed(value, decimals).parse().unwrap_or(0.0)
}

fn to_decimal(value: f64) -> Decimal {
    if !value.is_finite() {
        return Decimal::ZERO;
    }
    Decimal::from_f64_retain(value)
        .or_else(|| Decimal::from_f64(value))
        .unwrap_or(Decimal::ZERO)
}

/// Normalize every service leg for submission
pub fn normalize_services(
    services: &[ServiceDetail],
    directory: &OtherServiceDirectory,
    mode: SubmitMode,
) -> Vec<ServicePayload> {
    services
        .iter()
        .map(|detail| normalize_service(detail, directory, mode))
        .collect()
}

/// Normalize one service leg
pub fn normalize_service(
    detail: &ServiceDetail,
    directory: &OtherServiceDirectory,
    mode: SubmitMode,
) -> ServicePayload {
    let effective = effective_type_of(detail, directory);
    let editing = mode == SubmitMode::Update;
    let is_other = detail.service == ServiceType::Others;

    let (trade, service_code, service_name) = if is_other {
        let name = detail.service_name.clone().or_else(|| {
            detail
                .service_code
                .as_deref()
                .and_then(|code| directory.get(code))
                .map(|info| info.label.clone())
        });
        (None, detail.service_code.clone(), name)
    } else {
        (detail.trade, None, None)
    };

    ServicePayload {
        id: detail.id.filter(|_| editing),
        service: detail.service,
        trade,
        service_code,
        service_name,
        origin: detail.origin.clone(),
        destination: detail.destination.clone(),
        pickup: detail.pickup,
        pickup_location: detail.pickup_location.clone().filter(|_| detail.pickup),
        delivery: detail.delivery,
        delivery_location: detail.delivery_location.clone().filter(|_| detail.delivery),
        cargo: normalize_cargo(detail, effective, editing),
    }
}

fn normalize_cargo(
    detail: &ServiceDetail,
    effective: EffectiveServiceType,
    editing: bool,
) -> CargoPayload {
    let cargo = &detail.cargo;
    match effective {
        EffectiveServiceType::Fcl => CargoPayload::Fcl(FclCargoPayload {
            fcl_details: detail
                .fcl_details
                .iter()
                .map(|container| ContainerPayload {
                    id: container.id.filter(|_| editing),
                    container_type: container.container_type_code.clone(),
                    no_of_containers: container.no_of_containers.unwrap_or(0),
                    gross_weight: to_fixed(finite_or_zero(container.gross_weight), 2),
                })
                .collect(),
        }),
        EffectiveServiceType::Air => CargoPayload::Air(AirCargoPayload {
            no_of_packages: cargo.no_of_packages.unwrap_or(0),
            gross_weight: to_fixed(finite_or_zero(cargo.gross_weight), 2),
            volume_weight: round_to(finite_or_zero(cargo.volume_weight), 3),
            chargeable_weight: to_fixed(
                calculate_chargeable_weight(cargo.gross_weight, cargo.volume_weight),
                2,
            ),
            dimension_details: dimension_details(detail),
        }),
        EffectiveServiceType::Lcl => CargoPayload::Lcl(LclCargoPayload {
            no_of_packages: cargo.no_of_packages.unwrap_or(0),
            gross_weight: to_fixed(finite_or_zero(cargo.gross_weight), 2),
            volume: to_fixed(finite_or_zero(cargo.volume), 1),
            chargeable_volume: to_fixed(
                calculate_chargeable_volume(cargo.gross_weight, cargo.volume),
                1,
            ),
            dimension_details: dimension_details(detail),
        }),
    }
}

fn dimension_details(detail: &ServiceDetail) -> Option<Vec<DimensionPayload>> {
    if !has_valid_dimensions(&detail.dimensions) {
        return None;
    }
    Some(
        detail
            .dimensions
            .iter()
            .map(|row| DimensionPayload {
                id: row.id,
                pieces: row.pieces,
                length: finite_or_zero(row.length),
                width: finite_or_zero(row.width),
                height: finite_or_zero(row.height),
                value: row.value,
                volume_weight: round_to(row.vol_weight, 3),
                unit: detail.dimension_unit,
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_fixed_pads_and_rounds() {
        assert_eq!(to_fixed(120.0, 2), "120.00");
        assert_eq!(to_fixed(1.2, 1), "1.2");
        assert_eq!(to_fixed(0.5, 1), "0.5");
        assert_eq!(to_fixed(2.345, 2), "2.35");
        assert_eq!(to_fixed(0.0, 2), "0.00");
        assert_eq!(to_fixed(f64::NAN, 2), "0.00");
    }

    #[test]
    fn test_to_fixed_uses_binary_value() {
        // 1.005 is stored as 1.00499999999999989...
        assert_eq!(to_fixed(1.005, 2), "1.00");
    }

    #[test]
    fn test_round_to_three_places() {
        assert_eq!(round_to(60.0, 3), 60.0);
        assert_eq!(round_to(0.12345, 3), 0.123);
        assert_eq!(round_to(1.23456, 3), 1.235);
    }
}
