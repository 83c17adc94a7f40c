//! Effective service type resolution
//!
//! Every cargo-shape decision in the platform goes through
//! [`resolve_effective_type`]; callers switch on the returned enum.

use crate::models::ServiceDetail;
use crate::types::{
    EffectiveServiceType, LoadType, OtherServiceDirectory, OtherServiceInfo, ServiceType,
    TransportMode,
};

/// Which cargo fields are populated on a service leg
///
/// Used only as a fallback when an OTHERS service code has no directory
/// entry, e.g. partially-loaded data while editing an existing enquiry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CargoSignals {
    pub has_fcl_details: bool,
    pub has_volume_weight: bool,
    pub has_volume: bool,
}

impl CargoSignals {
    pub fn from_detail(detail: &ServiceDetail) -> Self {
        Self {
            has_fcl_details: !detail.fcl_details.is_empty(),
            has_volume_weight: detail.cargo.volume_weight.is_some(),
            has_volume: detail.cargo.volume.is_some(),
        }
    }
}

/// Map directory metadata to a cargo shape: SEA+FULL is FCL, SEA+GROUPAGE is
/// LCL, anything else is AIR
pub fn classify_other_service(info: &OtherServiceInfo) -> EffectiveServiceType {
    match (&info.transport_mode, &info.full_groupage) {
        (TransportMode::Sea, Some(LoadType::Full)) => EffectiveServiceType::Fcl,
        (TransportMode::Sea, Some(LoadType::Groupage)) => EffectiveServiceType::Lcl,
        _ => EffectiveServiceType::Air,
    }
}

/// Resolve the effective service type of a leg. Total; defaults to AIR.
pub fn resolve_effective_type(
    service: ServiceType,
    service_code: Option<&str>,
    directory: &OtherServiceDirectory,
    signals: CargoSignals,
) -> EffectiveServiceType {
    match service {
        ServiceType::Air => EffectiveServiceType::Air,
        ServiceType::Fcl => EffectiveServiceType::Fcl,
        ServiceType::Lcl => EffectiveServiceType::Lcl,
        ServiceType::Others => match service_code.and_then(|code| directory.get(code)) {
            Some(info) => classify_other_service(info),
            None => infer_from_signals(signals),
        },
    }
}

/// Resolve the effective service type of a service detail
pub fn effective_type_of(
    detail: &ServiceDetail,
    directory: &OtherServiceDirectory,
) -> EffectiveServiceType {
    resolve_effective_type(
        detail.service,
        detail.service_code.as_deref(),
        directory,
        CargoSignals::from_detail(detail),
    )
}

fn infer_from_signals(signals: CargoSignals) -> EffectiveServiceType {
    if signals.has_fcl_details {
        EffectiveServiceType::Fcl
    } else if signals.has_volume_weight && !signals.has_volume {
        EffectiveServiceType::Air
    } else if signals.has_volume && !signals.has_volume_weight {
        EffectiveServiceType::Lcl
    } else {
        EffectiveServiceType::Air
    }
}
