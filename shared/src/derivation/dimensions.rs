//! Dimensional (volumetric) weight for dimension rows

use std::collections::HashMap;

use crate::models::DimensionRow;
use crate::types::{DimensionUnit, EffectiveServiceType};

use super::chargeable::finite_or_zero;

/// Divisor lookup keyed by (effective service type, unit)
#[derive(Debug, Clone, PartialEq)]
pub struct DivisorTable {
    divisors: HashMap<(EffectiveServiceType, DimensionUnit), f64>,
}

impl Default for DivisorTable {
    fn default() -> Self {
        let mut divisors = HashMap::new();
        divisors.insert((EffectiveServiceType::Air, DimensionUnit::Centimeter), 6000.0);
        divisors.insert((EffectiveServiceType::Air, DimensionUnit::Inch), 366.0);
        divisors.insert((EffectiveServiceType::Lcl, DimensionUnit::Centimeter), 1_000_000.0);
        divisors.insert((EffectiveServiceType::Lcl, DimensionUnit::Inch), 1728.0);
        Self { divisors }
    }
}

impl DivisorTable {
    pub fn with_divisor(
        mut self,
        service: EffectiveServiceType,
        unit: DimensionUnit,
        divisor: f64,
    ) -> Self {
        self.divisors.insert((service, unit), divisor);
        self
    }

    /// Divisor for a service and unit; 0 when the unit is unset or has no entry
    pub fn divisor(&self, service: EffectiveServiceType, unit: Option<DimensionUnit>) -> f64 {
        unit.and_then(|u| self.divisors.get(&(service, u)).copied())
            .unwrap_or(0.0)
    }
}

/// Volumetric weight of one row: pieces x length x width x height / divisor.
/// Zero when the divisor is zero or the result is not finite.
pub fn calculate_volume_weight(
    pieces: u32,
    length: Option<f64>,
    width: Option<f64>,
    height: Option<f64>,
    divisor: f64,
) -> f64 {
    if divisor == 0.0 {
        return 0.0;
    }
    let raw = f64::from(pieces)
        * length.unwrap_or(0.0)
        * width.unwrap_or(0.0)
        * height.unwrap_or(0.0)
        / divisor;
    if raw.is_finite() {
        raw
    } else {
        0.0
    }
}

/// Aggregate volume rounding: a fractional part of one half or more rounds up
/// to the next integer, anything smaller is kept to two decimal places.
///
/// This is a billing rule, not general rounding: 2.4 stays 2.4, 2.5 becomes 3.
pub fn round_vol(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let frac = value - value.trunc();
    if frac >= 0.5 {
        value.ceil()
    } else {
        (value * 100.0).round() / 100.0
    }
}

/// A dimension set is valid when any row has pieces and a positive volume weight
pub fn has_valid_dimensions(rows: &[DimensionRow]) -> bool {
    rows.iter().any(DimensionRow::is_counted)
}

/// Aggregates over a dimension set
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DimensionTotals {
    pub pieces: u32,
    /// `round_vol` of the summed row volume weights
    pub volume: f64,
}

pub fn dimension_totals(rows: &[DimensionRow]) -> DimensionTotals {
    let pieces = rows.iter().fold(0u32, |acc, row| acc.saturating_add(row.pieces));
    let raw: f64 = rows.iter().map(|row| finite_or_zero(Some(row.vol_weight))).sum();
    DimensionTotals {
        pieces,
        volume: round_vol(raw),
    }
}

/// Re-derive `value` and `vol_weight` for every row. Returns `true` when any
/// row changed.
pub fn refresh_rows(
    rows: &mut [DimensionRow],
    service: EffectiveServiceType,
    unit: Option<DimensionUnit>,
    table: &DivisorTable,
) -> bool {
    let divisor = table.divisor(service, unit);
    let mut changed = false;
    for row in rows.iter_mut() {
        let vol_weight =
            calculate_volume_weight(row.pieces, row.length, row.width, row.height, divisor);
        if row.value != divisor || row.vol_weight != vol_weight {
            row.value = divisor;
            row.vol_weight = vol_weight;
            changed = true;
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_divisors() {
        let table = DivisorTable::default();
        let air = EffectiveServiceType::Air;
        let lcl = EffectiveServiceType::Lcl;
        assert_eq!(table.divisor(air, Some(DimensionUnit::Centimeter)), 6000.0);
        assert_eq!(table.divisor(air, Some(DimensionUnit::Inch)), 366.0);
        assert_eq!(table.divisor(lcl, Some(DimensionUnit::Centimeter)), 1_000_000.0);
        assert_eq!(table.divisor(lcl, Some(DimensionUnit::Inch)), 1728.0);
        assert_eq!(table.divisor(air, None), 0.0);
        assert_eq!(
            table.divisor(EffectiveServiceType::Fcl, Some(DimensionUnit::Centimeter)),
            0.0
        );
    }

    #[test]
    fn test_volume_weight_formula() {
        let vw = calculate_volume_weight(10, Some(40.0), Some(30.0), Some(30.0), 6000.0);
        assert!((vw - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_volume_weight_zero_divisor_and_non_finite() {
        assert_eq!(calculate_volume_weight(3, Some(1.0), Some(1.0), Some(1.0), 0.0), 0.0);
        assert_eq!(
            calculate_volume_weight(3, Some(f64::NAN), Some(1.0), Some(1.0), 6000.0),
            0.0
        );
        assert_eq!(
            calculate_volume_weight(3, Some(f64::INFINITY), Some(1.0), Some(1.0), 6000.0),
            0.0
        );
        assert_eq!(calculate_volume_weight(3, None, Some(1.0), Some(1.0), 6000.0), 0.0);
    }

    #[test]
    fn test_round_vol_rule() {
        assert_eq!(round_vol(2.4), 2.4);
        assert_eq!(round_vol(2.5), 3.0);
        assert_eq!(round_vol(2.6), 3.0);
        assert_eq!(round_vol(3.999), 4.0);
        assert_eq!(round_vol(3.49), 3.49);
        assert_eq!(round_vol(3.456), 3.46);
        assert_eq!(round_vol(60.0), 60.0);
        assert_eq!(round_vol(f64::NAN), 0.0);
    }

    #[test]
    fn test_validity_gate() {
        let counted = DimensionRow {
            pieces: 2,
            vol_weight: 5.0,
            ..Default::default()
        };
        let empty = DimensionRow::default();
        assert!(has_valid_dimensions(&[counted, empty.clone()]));
        assert!(!has_valid_dimensions(&[empty]));
        assert!(!has_valid_dimensions(&[]));
        assert!(!has_valid_dimensions(&[DimensionRow {
            pieces: 3,
            vol_weight: 0.0,
            ..Default::default()
        }]));
    }

    #[test]
    fn test_totals_sum_pieces_and_round_volume() {
        let rows = vec![
            DimensionRow {
                pieces: 2,
                vol_weight: 1.25,
                ..Default::default()
            },
            DimensionRow {
                pieces: 3,
                vol_weight: 1.1,
                ..Default::default()
            },
        ];
        let totals = dimension_totals(&rows);
        assert_eq!(totals.pieces, 5);
        assert_eq!(totals.volume, 2.35);
    }

    #[test]
    fn test_refresh_rows_uses_unit_divisor() {
        let mut rows = vec![DimensionRow::new(10, 40.0, 30.0, 30.0)];
        let table = DivisorTable::default();
        assert!(refresh_rows(
            &mut rows,
            EffectiveServiceType::Air,
            Some(DimensionUnit::Centimeter),
            &table
        ));
        assert_eq!(rows[0].value, 6000.0);
        assert!((rows[0].vol_weight - 60.0).abs() < 1e-9);
        assert!(!refresh_rows(
            &mut rows,
            EffectiveServiceType::Air,
            Some(DimensionUnit::Centimeter),
            &table
        ));
    }
}
