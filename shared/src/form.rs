//! In-memory enquiry form tree and its mutation API
//!
//! The form owns every service leg of one enquiry while the wizard is open.
//! Dimension edits re-derive the dimension aggregates immediately; the
//! chargeable figures are refreshed by [`EnquiryForm::recompute`], which the
//! host calls after a burst of edits (see `RecomputeDebouncer`).
//!
//! Cargo fields derived from a valid dimension set are locked: attempts to
//! set them fail with [`FormError::FieldLocked`] and leave the value intact.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::derivation::{
    dimension_totals, effective_type_of, has_valid_dimensions, normalize_services,
    refresh_chargeable, refresh_rows, DivisorTable, SubmitMode,
};
use crate::error::{FormError, FormResult};
use crate::models::{ContainerDetail, DimensionRow, ServiceDetail, ServicePayload};
use crate::types::{DimensionUnit, EffectiveServiceType, OtherServiceDirectory, ServiceType, Trade};
use crate::validation::validate_services;

/// Scalar cargo fields that can be edited by hand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CargoField {
    NoOfPackages,
    GrossWeight,
    VolumeWeight,
    Volume,
}

impl CargoField {
    pub fn as_str(&self) -> &'static str {
        match self {
            CargoField::NoOfPackages => "no_of_packages",
            CargoField::GrossWeight => "gross_weight",
            CargoField::VolumeWeight => "volume_weight",
            CargoField::Volume => "volume",
        }
    }

    fn applies_to(&self, effective: EffectiveServiceType) -> bool {
        match (self, effective) {
            (_, EffectiveServiceType::Fcl) => false,
            (CargoField::VolumeWeight, EffectiveServiceType::Lcl) => false,
            (CargoField::Volume, EffectiveServiceType::Air) => false,
            _ => true,
        }
    }
}

impl std::fmt::Display for CargoField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Manual cargo values captured when a service first gets valid dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CargoSnapshot {
    pub no_of_packages: Option<u32>,
    pub gross_weight: Option<f64>,
    pub volume: Option<f64>,
    pub volume_weight: Option<f64>,
}

/// Measurements entered for a dimension row
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DimensionInput {
    #[serde(default)]
    pub pieces: u32,
    #[serde(default)]
    pub length: Option<f64>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
}

/// Outcome of a recompute pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RecomputeReport {
    pub services: usize,
    /// Number of derived fields whose value actually changed
    pub changed_fields: usize,
}

/// Per-service derivation state exposed to hosts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceState {
    pub effective_type: EffectiveServiceType,
    pub dimensions_valid: bool,
    pub locked_fields: Vec<CargoField>,
}

/// One enquiry being edited in the wizard
#[derive(Debug, Clone, Default)]
pub struct EnquiryForm {
    services: Vec<ServiceDetail>,
    directory: OtherServiceDirectory,
    divisors: DivisorTable,
    snapshots: HashMap<(usize, EffectiveServiceType), CargoSnapshot>,
}

impl EnquiryForm {
    pub fn new(directory: OtherServiceDirectory) -> Self {
        Self {
            directory,
            ..Self::default()
        }
    }

    pub fn with_divisors(mut self, divisors: DivisorTable) -> Self {
        self.divisors = divisors;
        self
    }

    /// Build a form from services loaded for editing
    pub fn load(services: Vec<ServiceDetail>, directory: OtherServiceDirectory) -> Self {
        let mut form = Self::new(directory);
        form.replace_services(services);
        form
    }

    /// Replace the whole tree, e.g. with what the server returned on reload
    pub fn replace_services(&mut self, services: Vec<ServiceDetail>) -> RecomputeReport {
        self.services = services;
        self.snapshots.clear();
        self.recompute()
    }

    pub fn set_directory(&mut self, directory: OtherServiceDirectory) {
        self.directory = directory;
    }

    pub fn directory(&self) -> &OtherServiceDirectory {
        &self.directory
    }

    pub fn services(&self) -> &[ServiceDetail] {
        &self.services
    }

    pub fn into_services(self) -> Vec<ServiceDetail> {
        self.services
    }

    pub fn service(&self, index: usize) -> FormResult<&ServiceDetail> {
        self.services
            .get(index)
            .ok_or(FormError::ServiceNotFound(index))
    }

    fn service_mut(&mut self, index: usize) -> FormResult<&mut ServiceDetail> {
        self.services
            .get_mut(index)
            .ok_or(FormError::ServiceNotFound(index))
    }

    pub fn effective_type(&self, index: usize) -> FormResult<EffectiveServiceType> {
        Ok(effective_type_of(self.service(index)?, &self.directory))
    }

    pub fn dimensions_valid(&self, index: usize) -> FormResult<bool> {
        Ok(has_valid_dimensions(&self.service(index)?.dimensions))
    }

    /// Whether a cargo field is currently derived from dimensions
    pub fn is_locked(&self, index: usize, field: CargoField) -> FormResult<bool> {
        let effective = self.effective_type(index)?;
        Ok(self.dimensions_valid(index)? && is_dimension_field(field, effective))
    }

    pub fn state(&self, index: usize) -> FormResult<ServiceState> {
        let effective_type = self.effective_type(index)?;
        let dimensions_valid = self.dimensions_valid(index)?;
        let locked_fields = if dimensions_valid {
            [
                CargoField::NoOfPackages,
                CargoField::GrossWeight,
                CargoField::VolumeWeight,
                CargoField::Volume,
            ]
            .into_iter()
            .filter(|f| is_dimension_field(*f, effective_type))
            .collect()
        } else {
            Vec::new()
        };
        Ok(ServiceState {
            effective_type,
            dimensions_valid,
            locked_fields,
        })
    }

    /// Values captured when the service first got valid dimensions
    pub fn original_values(&self, index: usize) -> FormResult<Option<&CargoSnapshot>> {
        let effective = self.effective_type(index)?;
        Ok(self.snapshots.get(&(index, effective)))
    }

    // ------------------------------------------------------------------
    // Service legs
    // ------------------------------------------------------------------

    /// Append a service leg and return its index
    pub fn add_service(&mut self, service: ServiceType, service_code: Option<String>) -> usize {
        let mut detail = ServiceDetail::new(service);
        detail.service_code = service_code;
        if service == ServiceType::Others {
            detail.service_name = detail
                .service_code
                .as_deref()
                .and_then(|code| self.directory.get(code))
                .map(|info| info.label.clone());
        }
        self.services.push(detail);
        let index = self.services.len() - 1;
        self.ensure_containers(index);
        index
    }

    pub fn remove_service(&mut self, index: usize) -> FormResult<ServiceDetail> {
        if index >= self.services.len() {
            return Err(FormError::ServiceNotFound(index));
        }
        let removed = self.services.remove(index);
        self.snapshots = std::mem::take(&mut self.snapshots)
            .into_iter()
            .filter(|((i, _), _)| *i != index)
            .map(|((i, t), s)| (((if i > index { i - 1 } else { i }), t), s))
            .collect();
        Ok(removed)
    }

    /// Change the service code of an OTHERS leg; the cargo shape may change
    pub fn set_service_code(&mut self, index: usize, service_code: Option<String>) -> FormResult<()> {
        if self.service(index)?.service != ServiceType::Others {
            return Err(FormError::FieldNotApplicable {
                field: "service_code",
                service: self.effective_type(index)?,
            });
        }
        let label = service_code
            .as_deref()
            .and_then(|code| self.directory.get(code))
            .map(|info| info.label.clone());
        let detail = self.service_mut(index)?;
        detail.service_code = service_code;
        detail.service_name = label;
        self.ensure_containers(index);
        self.apply_dimensions(index)?;
        Ok(())
    }

    pub fn set_trade(&mut self, index: usize, trade: Option<Trade>) -> FormResult<()> {
        self.service_mut(index)?.trade = trade;
        Ok(())
    }

    pub fn set_route(
        &mut self,
        index: usize,
        origin: Option<String>,
        destination: Option<String>,
    ) -> FormResult<()> {
        let detail = self.service_mut(index)?;
        detail.origin = origin;
        detail.destination = destination;
        Ok(())
    }

    pub fn set_pickup(&mut self, index: usize, pickup: bool, location: Option<String>) -> FormResult<()> {
        let detail = self.service_mut(index)?;
        detail.pickup = pickup;
        detail.pickup_location = location;
        Ok(())
    }

    pub fn set_delivery(
        &mut self,
        index: usize,
        delivery: bool,
        location: Option<String>,
    ) -> FormResult<()> {
        let detail = self.service_mut(index)?;
        detail.delivery = delivery;
        detail.delivery_location = location;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Scalar cargo fields
    // ------------------------------------------------------------------

    pub fn set_no_of_packages(&mut self, index: usize, packages: Option<u32>) -> FormResult<()> {
        self.ensure_editable(index, CargoField::NoOfPackages)?;
        self.service_mut(index)?.cargo.no_of_packages = packages;
        Ok(())
    }

    pub fn set_gross_weight(&mut self, index: usize, gross_weight: Option<f64>) -> FormResult<()> {
        self.ensure_editable(index, CargoField::GrossWeight)?;
        self.service_mut(index)?.cargo.gross_weight = gross_weight;
        Ok(())
    }

    pub fn set_volume_weight(&mut self, index: usize, volume_weight: Option<f64>) -> FormResult<()> {
        self.ensure_editable(index, CargoField::VolumeWeight)?;
        self.service_mut(index)?.cargo.volume_weight = volume_weight;
        Ok(())
    }

    pub fn set_volume(&mut self, index: usize, volume: Option<f64>) -> FormResult<()> {
        self.ensure_editable(index, CargoField::Volume)?;
        self.service_mut(index)?.cargo.volume = volume;
        Ok(())
    }

    fn ensure_editable(&self, index: usize, field: CargoField) -> FormResult<()> {
        let effective = self.effective_type(index)?;
        if !field.applies_to(effective) {
            return Err(FormError::FieldNotApplicable {
                field: field.as_str(),
                service: effective,
            });
        }
        if self.is_locked(index, field)? {
            tracing::debug!(index, field = %field, "rejected edit of dimension-derived field");
            return Err(FormError::FieldLocked { index, field });
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // FCL containers
    // ------------------------------------------------------------------

    pub fn add_container(&mut self, index: usize) -> FormResult<usize> {
        self.ensure_fcl(index, "fcl_details")?;
        let detail = self.service_mut(index)?;
        detail.fcl_details.push(ContainerDetail::default());
        Ok(detail.fcl_details.len() - 1)
    }

    pub fn update_container(
        &mut self,
        index: usize,
        container: usize,
        update: ContainerDetail,
    ) -> FormResult<()> {
        self.ensure_fcl(index, "fcl_details")?;
        let slot = self
            .service_mut(index)?
            .fcl_details
            .get_mut(container)
            .ok_or(FormError::ContainerNotFound { index, container })?;
        let id = slot.id;
        *slot = ContainerDetail { id, ..update };
        Ok(())
    }

    pub fn remove_container(&mut self, index: usize, container: usize) -> FormResult<ContainerDetail> {
        self.ensure_fcl(index, "fcl_details")?;
        let detail = self.service_mut(index)?;
        if container >= detail.fcl_details.len() {
            return Err(FormError::ContainerNotFound { index, container });
        }
        if detail.fcl_details.len() == 1 {
            return Err(FormError::LastContainer { index });
        }
        Ok(detail.fcl_details.remove(container))
    }

    fn ensure_fcl(&self, index: usize, field: &'static str) -> FormResult<()> {
        match self.effective_type(index)? {
            EffectiveServiceType::Fcl => Ok(()),
            service => Err(FormError::FieldNotApplicable { field, service }),
        }
    }

    fn ensure_containers(&mut self, index: usize) {
        let is_fcl = matches!(self.effective_type(index), Ok(EffectiveServiceType::Fcl));
        if let Some(detail) = self.services.get_mut(index) {
            if is_fcl && detail.fcl_details.is_empty() {
                detail.fcl_details.push(ContainerDetail::default());
            }
        }
    }

    // ------------------------------------------------------------------
    // Dimension rows
    // ------------------------------------------------------------------

    pub fn add_dimension_row(&mut self, index: usize, input: DimensionInput) -> FormResult<usize> {
        self.ensure_dimensions_apply(index)?;
        let detail = self.service_mut(index)?;
        detail.dimensions.push(DimensionRow {
            pieces: input.pieces,
            length: input.length,
            width: input.width,
            height: input.height,
            ..DimensionRow::default()
        });
        let row = detail.dimensions.len() - 1;
        self.apply_dimensions(index)?;
        Ok(row)
    }

    pub fn update_dimension_row(
        &mut self,
        index: usize,
        row: usize,
        input: DimensionInput,
    ) -> FormResult<()> {
        self.ensure_dimensions_apply(index)?;
        let slot = self
            .service_mut(index)?
            .dimensions
            .get_mut(row)
            .ok_or(FormError::DimensionRowNotFound { index, row })?;
        slot.pieces = input.pieces;
        slot.length = input.length;
        slot.width = input.width;
        slot.height = input.height;
        self.apply_dimensions(index)?;
        Ok(())
    }

    pub fn remove_dimension_row(&mut self, index: usize, row: usize) -> FormResult<DimensionRow> {
        let detail = self.service_mut(index)?;
        if row >= detail.dimensions.len() {
            return Err(FormError::DimensionRowNotFound { index, row });
        }
        let removed = detail.dimensions.remove(row);
        if detail.dimensions.is_empty() {
            detail.dimension_unit = None;
        }
        self.apply_dimensions(index)?;
        Ok(removed)
    }

    pub fn set_dimension_unit(&mut self, index: usize, unit: Option<DimensionUnit>) -> FormResult<()> {
        self.ensure_dimensions_apply(index)?;
        self.service_mut(index)?.dimension_unit = unit;
        self.apply_dimensions(index)?;
        Ok(())
    }

    fn ensure_dimensions_apply(&self, index: usize) -> FormResult<()> {
        match self.effective_type(index)? {
            EffectiveServiceType::Fcl => Err(FormError::FieldNotApplicable {
                field: "dimensions",
                service: EffectiveServiceType::Fcl,
            }),
            _ => Ok(()),
        }
    }

    /// Re-derive rows and, for a valid set, overwrite the locked aggregates.
    /// Returns the number of fields that changed.
    fn apply_dimensions(&mut self, index: usize) -> FormResult<usize> {
        let effective = self.effective_type(index)?;
        let detail = self
            .services
            .get_mut(index)
            .ok_or(FormError::ServiceNotFound(index))?;
        let mut changed = 0;

        if detail.dimensions.is_empty() {
            return Ok(changed);
        }

        if refresh_rows(&mut detail.dimensions, effective, detail.dimension_unit, &self.divisors) {
            changed += 1;
        }
        if !has_valid_dimensions(&detail.dimensions) {
            return Ok(changed);
        }

        let snapshot = CargoSnapshot {
            no_of_packages: detail.cargo.no_of_packages,
            gross_weight: detail.cargo.gross_weight,
            volume: detail.cargo.volume,
            volume_weight: detail.cargo.volume_weight,
        };
        let totals = dimension_totals(&detail.dimensions);
        let cargo = &mut detail.cargo;

        if cargo.no_of_packages != Some(totals.pieces) {
            cargo.no_of_packages = Some(totals.pieces);
            changed += 1;
        }
        let target = match effective {
            EffectiveServiceType::Air => Some(&mut cargo.volume_weight),
            EffectiveServiceType::Lcl => Some(&mut cargo.volume),
            EffectiveServiceType::Fcl => None,
        };
        if let Some(slot) = target {
            if *slot != Some(totals.volume) {
                *slot = Some(totals.volume);
                changed += 1;
            }
        }

        self.snapshots.entry((index, effective)).or_insert(snapshot);
        Ok(changed)
    }

    // ------------------------------------------------------------------
    // Recompute and submit
    // ------------------------------------------------------------------

    /// Full recompute pass over every service leg. Idempotent: a second call
    /// with no edits in between reports zero changed fields.
    pub fn recompute(&mut self) -> RecomputeReport {
        let mut report = RecomputeReport {
            services: self.services.len(),
            changed_fields: 0,
        };
        for index in 0..self.services.len() {
            self.ensure_containers(index);
            let effective = effective_type_of(&self.services[index], &self.directory);
            if effective != EffectiveServiceType::Fcl {
                report.changed_fields += self.apply_dimensions(index).unwrap_or(0);
            }
            if refresh_chargeable(&mut self.services[index].cargo, effective) {
                report.changed_fields += 1;
            }
        }
        if report.changed_fields > 0 {
            tracing::trace!(
                services = report.services,
                changed = report.changed_fields,
                "recomputed enquiry cargo"
            );
        }
        report
    }

    /// Recompute, validate and normalize the tree into the `services[]` payload
    pub fn build_payload(&mut self, mode: SubmitMode) -> FormResult<Vec<ServicePayload>> {
        self.recompute();
        validate_services(&self.services, &self.directory).map_err(FormError::Invalid)?;
        Ok(normalize_services(&self.services, &self.directory, mode))
    }
}

fn is_dimension_field(field: CargoField, effective: EffectiveServiceType) -> bool {
    match (field, effective) {
        (CargoField::NoOfPackages, EffectiveServiceType::Air | EffectiveServiceType::Lcl) => true,
        (CargoField::VolumeWeight, EffectiveServiceType::Air) => true,
        (CargoField::Volume, EffectiveServiceType::Lcl) => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn air_form() -> (EnquiryForm, usize) {
        let mut form = EnquiryForm::new(OtherServiceDirectory::new());
        let index = form.add_service(ServiceType::Air, None);
        (form, index)
    }

    #[test]
    fn test_add_fcl_service_seeds_one_container() {
        let mut form = EnquiryForm::default();
        let index = form.add_service(ServiceType::Fcl, None);
        assert_eq!(form.service(index).unwrap().fcl_details.len(), 1);
        assert_eq!(
            form.remove_container(index, 0),
            Err(FormError::LastContainer { index })
        );
    }

    #[test]
    fn test_unknown_index_is_an_error() {
        let mut form = EnquiryForm::default();
        assert_eq!(form.set_gross_weight(3, Some(1.0)), Err(FormError::ServiceNotFound(3)));
    }

    #[test]
    fn test_volume_field_does_not_apply_to_air() {
        let (mut form, index) = air_form();
        assert!(matches!(
            form.set_volume(index, Some(1.0)),
            Err(FormError::FieldNotApplicable { field: "volume", .. })
        ));
    }

    #[test]
    fn test_service_code_only_applies_to_others() {
        let (mut form, index) = air_form();
        assert_eq!(
            form.set_service_code(index, Some("SEALCL".to_string())),
            Err(FormError::FieldNotApplicable {
                field: "service_code",
                service: EffectiveServiceType::Air,
            })
        );
        assert_eq!(form.service(index).unwrap().service_code, None);

        let other = form.add_service(ServiceType::Others, None);
        form.set_service_code(other, Some("CUSTOMS".to_string())).unwrap();
        assert_eq!(
            form.service(other).unwrap().service_code.as_deref(),
            Some("CUSTOMS")
        );
    }

    #[test]
    fn test_empty_row_list_resets_unit() {
        let (mut form, index) = air_form();
        form.set_dimension_unit(index, Some(DimensionUnit::Inch)).unwrap();
        let row = form
            .add_dimension_row(
                index,
                DimensionInput {
                    pieces: 1,
                    length: Some(10.0),
                    width: Some(10.0),
                    height: Some(10.0),
                },
            )
            .unwrap();
        assert_eq!(form.service(index).unwrap().dimension_unit, Some(DimensionUnit::Inch));
        form.remove_dimension_row(index, row).unwrap();
        assert_eq!(form.service(index).unwrap().dimension_unit, None);
    }

    #[test]
    fn test_remove_service_shifts_snapshots() {
        let mut form = EnquiryForm::default();
        let first = form.add_service(ServiceType::Lcl, None);
        let second = form.add_service(ServiceType::Air, None);
        form.set_no_of_packages(second, Some(7)).unwrap();
        form.set_dimension_unit(second, Some(DimensionUnit::Centimeter)).unwrap();
        form.add_dimension_row(
            second,
            DimensionInput {
                pieces: 2,
                length: Some(50.0),
                width: Some(50.0),
                height: Some(50.0),
            },
        )
        .unwrap();
        assert!(form.original_values(second).unwrap().is_some());

        form.remove_service(first).unwrap();
        let snapshot = form.original_values(0).unwrap().cloned().unwrap();
        assert_eq!(snapshot.no_of_packages, Some(7));
    }
}
