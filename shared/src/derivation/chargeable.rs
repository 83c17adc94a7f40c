//! Chargeable weight and volume

use crate::models::CargoDetail;
use crate::types::EffectiveServiceType;

/// Chargeable weight (AIR): the larger of gross and volumetric weight
pub fn calculate_chargeable_weight(gross_weight: Option<f64>, volume_weight: Option<f64>) -> f64 {
    finite_or_zero(gross_weight).max(finite_or_zero(volume_weight))
}

/// Chargeable volume (LCL): the larger of gross weight in tonnes and volume
pub fn calculate_chargeable_volume(gross_weight: Option<f64>, volume: Option<f64>) -> f64 {
    (finite_or_zero(gross_weight) / 1000.0).max(finite_or_zero(volume))
}

/// Recompute the derived chargeable field of a cargo line.
///
/// Returns `true` only when the stored value changed, so hosts can skip
/// change notifications for no-op passes.
pub fn refresh_chargeable(cargo: &mut CargoDetail, effective: EffectiveServiceType) -> bool {
    match effective {
        EffectiveServiceType::Air => {
            let value = calculate_chargeable_weight(cargo.gross_weight, cargo.volume_weight);
            write_if_changed(&mut cargo.chargable_weight, value)
        }
        EffectiveServiceType::Lcl => {
            let value = calculate_chargeable_volume(cargo.gross_weight, cargo.volume);
            write_if_changed(&mut cargo.chargable_volume, value)
        }
        EffectiveServiceType::Fcl => false,
    }
}

pub(crate) fn finite_or_zero(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

pub(crate) fn write_if_changed(slot: &mut f64, value: f64) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chargeable_weight_takes_larger() {
        assert_eq!(calculate_chargeable_weight(Some(120.0), Some(95.0)), 120.0);
        assert_eq!(calculate_chargeable_weight(Some(40.0), Some(95.5)), 95.5);
    }

    #[test]
    fn test_chargeable_weight_absent_inputs() {
        assert_eq!(calculate_chargeable_weight(None, None), 0.0);
        assert_eq!(calculate_chargeable_weight(None, Some(12.0)), 12.0);
        assert_eq!(calculate_chargeable_weight(Some(7.0), None), 7.0);
        assert_eq!(calculate_chargeable_weight(Some(f64::NAN), None), 0.0);
    }

    #[test]
    fn test_chargeable_volume_converts_kg_to_tonnes() {
        assert_eq!(calculate_chargeable_volume(Some(500.0), Some(1.2)), 1.2);
        assert_eq!(calculate_chargeable_volume(Some(2500.0), Some(1.2)), 2.5);
        assert_eq!(calculate_chargeable_volume(None, None), 0.0);
    }

    #[test]
    fn test_refresh_is_idempotent() {
        let mut cargo = CargoDetail {
            gross_weight: Some(120.0),
            volume_weight: Some(95.0),
            ..Default::default()
        };
        assert!(refresh_chargeable(&mut cargo, EffectiveServiceType::Air));
        assert_eq!(cargo.chargable_weight, 120.0);
        assert!(!refresh_chargeable(&mut cargo, EffectiveServiceType::Air));
    }

    #[test]
    fn test_refresh_leaves_fcl_untouched() {
        let mut cargo = CargoDetail {
            gross_weight: Some(120.0),
            ..Default::default()
        };
        assert!(!refresh_chargeable(&mut cargo, EffectiveServiceType::Fcl));
        assert_eq!(cargo.chargable_weight, 0.0);
        assert_eq!(cargo.chargable_volume, 0.0);
    }
}
