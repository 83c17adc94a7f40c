//! WebAssembly module for the freight enquiry wizard
//!
//! Provides client-side computation for:
//! - Chargeable weight and volume
//! - Dimensional weight and aggregate volume rounding
//! - Effective service type resolution
//! - The enquiry form tree with locked-field enforcement and payload building

use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::derivation::*;
pub use shared::models::*;
pub use shared::types::*;

use shared::{CargoField, DimensionInput, EnquiryForm, FormError};

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[cfg(target_arch = "wasm32")]
fn warn(message: &str) {
    web_sys::console::warn_1(&JsValue::from_str(message));
}

#[cfg(not(target_arch = "wasm32"))]
fn warn(_message: &str) {}

/// Chargeable weight (AIR) from gross and volumetric weight
#[wasm_bindgen(js_name = calculateChargeableWeight)]
pub fn calculate_chargeable_weight_js(gross_weight: Option<f64>, volume_weight: Option<f64>) -> f64 {
    calculate_chargeable_weight(gross_weight, volume_weight)
}

/// Chargeable volume (LCL) from gross weight in kg and volume
#[wasm_bindgen(js_name = calculateChargeableVolume)]
pub fn calculate_chargeable_volume_js(gross_weight: Option<f64>, volume: Option<f64>) -> f64 {
    calculate_chargeable_volume(gross_weight, volume)
}

/// Volumetric weight of one dimension row for a service and unit label
#[wasm_bindgen(js_name = calculateVolumeWeight)]
pub fn calculate_volume_weight_js(
    service: &str,
    unit: Option<String>,
    pieces: u32,
    length: Option<f64>,
    width: Option<f64>,
    height: Option<f64>,
) -> f64 {
    let effective = match service.parse::<ServiceType>() {
        Ok(ServiceType::Lcl) => EffectiveServiceType::Lcl,
        Ok(ServiceType::Fcl) => EffectiveServiceType::Fcl,
        _ => EffectiveServiceType::Air,
    };
    let divisor = DivisorTable::default().divisor(effective, unit.as_deref().and_then(parse_unit));
    calculate_volume_weight(pieces, length, width, height, divisor)
}

/// Aggregate volume rounding rule
#[wasm_bindgen(js_name = roundVol)]
pub fn round_vol_js(value: f64) -> f64 {
    round_vol(value)
}

/// Resolve the effective service type ("AIR", "FCL" or "LCL")
///
/// `directory_json` is an object keyed by service code.
#[wasm_bindgen(js_name = resolveServiceType)]
pub fn resolve_service_type_js(
    service: &str,
    service_code: Option<String>,
    directory_json: &str,
    has_fcl_details: bool,
    has_volume_weight: bool,
    has_volume: bool,
) -> Result<String, JsValue> {
    let service: ServiceType = service.parse().map_err(to_js)?;
    let directory = parse_directory(directory_json).map_err(to_js)?;
    let signals = CargoSignals {
        has_fcl_details,
        has_volume_weight,
        has_volume,
    };
    Ok(resolve_effective_type(service, service_code.as_deref(), &directory, signals)
        .as_str()
        .to_string())
}

fn parse_unit(label: &str) -> Option<DimensionUnit> {
    match label.trim().to_ascii_lowercase().as_str() {
        "centimeter" | "cm" => Some(DimensionUnit::Centimeter),
        "inch" | "in" => Some(DimensionUnit::Inch),
        _ => None,
    }
}

fn parse_directory(json: &str) -> Result<OtherServiceDirectory, serde_json::Error> {
    if json.trim().is_empty() {
        return Ok(OtherServiceDirectory::new());
    }
    serde_json::from_str(json)
}

fn parse_field(field: &str) -> Result<CargoField, String> {
    serde_json::from_value(serde_json::Value::String(field.to_string()))
        .map_err(|_| format!("Unknown cargo field: {}", field))
}

fn parse_package_count(value: Option<f64>) -> Result<Option<u32>, String> {
    match value {
        None => Ok(None),
        Some(v) if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= f64::from(u32::MAX) => {
            Ok(Some(v as u32))
        }
        Some(v) => Err(format!("Package count must be a whole number of 0 or more, got {}", v)),
    }
}

/// Enquiry form held by the browser wizard
#[wasm_bindgen]
pub struct EnquiryWizard {
    form: EnquiryForm,
    debouncer: RecomputeDebouncer,
}

#[wasm_bindgen]
impl EnquiryWizard {
    #[wasm_bindgen(constructor)]
    pub fn new(directory_json: &str) -> Result<EnquiryWizard, JsValue> {
        let directory = parse_directory(directory_json).map_err(to_js)?;
        Ok(Self {
            form: EnquiryForm::new(directory),
            debouncer: RecomputeDebouncer::default(),
        })
    }

    /// Replace the tree with services loaded for editing
    pub fn load(&mut self, services_json: &str) -> Result<(), JsValue> {
        let services: Vec<ServiceDetail> = serde_json::from_str(services_json).map_err(to_js)?;
        self.form.replace_services(services);
        Ok(())
    }

    #[wasm_bindgen(js_name = setDirectory)]
    pub fn set_directory(&mut self, directory_json: &str) -> Result<(), JsValue> {
        let directory = parse_directory(directory_json).map_err(to_js)?;
        self.form.set_directory(directory);
        self.form.recompute();
        Ok(())
    }

    #[wasm_bindgen(js_name = addService)]
    pub fn add_service(&mut self, service: &str, service_code: Option<String>) -> Result<usize, JsValue> {
        let service: ServiceType = service.parse().map_err(to_js)?;
        Ok(self.form.add_service(service, service_code))
    }

    #[wasm_bindgen(js_name = removeService)]
    pub fn remove_service(&mut self, index: usize) -> Result<(), JsValue> {
        self.form.remove_service(index).map(|_| ()).map_err(to_js)
    }

    #[wasm_bindgen(js_name = setServiceCode)]
    pub fn set_service_code(&mut self, index: usize, service_code: Option<String>) -> Result<(), JsValue> {
        self.form.set_service_code(index, service_code).map_err(to_js)
    }

    /// Set a scalar cargo field. Fields derived from dimensions are rejected.
    #[wasm_bindgen(js_name = setCargoField)]
    pub fn set_cargo_field(&mut self, index: usize, field: &str, value: Option<f64>) -> Result<(), JsValue> {
        let field = parse_field(field).map_err(|e| JsValue::from_str(&e))?;
        let result = match field {
            CargoField::NoOfPackages => {
                let packages = parse_package_count(value).map_err(|e| JsValue::from_str(&e))?;
                self.form.set_no_of_packages(index, packages)
            }
            CargoField::GrossWeight => self.form.set_gross_weight(index, value),
            CargoField::VolumeWeight => self.form.set_volume_weight(index, value),
            CargoField::Volume => self.form.set_volume(index, value),
        };
        if let Err(FormError::FieldLocked { .. }) = &result {
            warn(&format!("service {}: {} is derived from dimensions", index, field));
        }
        result.map_err(to_js)
    }

    #[wasm_bindgen(js_name = addDimensionRow)]
    pub fn add_dimension_row(
        &mut self,
        index: usize,
        pieces: u32,
        length: Option<f64>,
        width: Option<f64>,
        height: Option<f64>,
    ) -> Result<usize, JsValue> {
        let input = DimensionInput {
            pieces,
            length,
            width,
            height,
        };
        self.form.add_dimension_row(index, input).map_err(to_js)
    }

    #[wasm_bindgen(js_name = updateDimensionRow)]
    pub fn update_dimension_row(
        &mut self,
        index: usize,
        row: usize,
        pieces: u32,
        length: Option<f64>,
        width: Option<f64>,
        height: Option<f64>,
    ) -> Result<(), JsValue> {
        let input = DimensionInput {
            pieces,
            length,
            width,
            height,
        };
        self.form.update_dimension_row(index, row, input).map_err(to_js)
    }

    #[wasm_bindgen(js_name = removeDimensionRow)]
    pub fn remove_dimension_row(&mut self, index: usize, row: usize) -> Result<(), JsValue> {
        self.form.remove_dimension_row(index, row).map(|_| ()).map_err(to_js)
    }

    #[wasm_bindgen(js_name = setDimensionUnit)]
    pub fn set_dimension_unit(&mut self, index: usize, unit: Option<String>) -> Result<(), JsValue> {
        let unit = match unit.as_deref() {
            None | Some("") => None,
            Some(label) => Some(
                parse_unit(label)
                    .ok_or_else(|| JsValue::from_str(&format!("Unknown unit: {}", label)))?,
            ),
        };
        self.form.set_dimension_unit(index, unit).map_err(to_js)
    }

    #[wasm_bindgen(js_name = addContainer)]
    pub fn add_container(&mut self, index: usize) -> Result<usize, JsValue> {
        self.form.add_container(index).map_err(to_js)
    }

    #[wasm_bindgen(js_name = updateContainer)]
    pub fn update_container(&mut self, index: usize, container: usize, container_json: &str) -> Result<(), JsValue> {
        let update: ContainerDetail = serde_json::from_str(container_json).map_err(to_js)?;
        self.form.update_container(index, container, update).map_err(to_js)
    }

    #[wasm_bindgen(js_name = removeContainer)]
    pub fn remove_container(&mut self, index: usize, container: usize) -> Result<(), JsValue> {
        self.form.remove_container(index, container).map(|_| ()).map_err(to_js)
    }

    /// Record an edit at `now_ms` (e.g. `performance.now()`)
    #[wasm_bindgen(js_name = markEdited)]
    pub fn mark_edited(&mut self, now_ms: f64) {
        self.debouncer.notify(now_ms.max(0.0) as u64);
    }

    /// Record an edit at the current wall-clock time
    #[wasm_bindgen(js_name = markEditedNow)]
    pub fn mark_edited_now(&mut self) {
        self.mark_edited(js_sys::Date::now());
    }

    /// Run the recompute pass if the debounce window has elapsed.
    /// Returns true when derived values changed.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        if self.debouncer.poll(now_ms.max(0.0) as u64) {
            self.form.recompute().changed_fields > 0
        } else {
            false
        }
    }

    /// Run the recompute pass immediately; returns the report as JSON
    pub fn recompute(&mut self) -> Result<String, JsValue> {
        serde_json::to_string(&self.form.recompute()).map_err(to_js)
    }

    /// Effective type, dimension validity and locked fields as JSON
    pub fn state(&self, index: usize) -> Result<String, JsValue> {
        let state = self.form.state(index).map_err(to_js)?;
        serde_json::to_string(&state).map_err(to_js)
    }

    pub fn services(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.form.services()).map_err(to_js)
    }

    /// Validate and normalize the enquiry into the `services[]` JSON array
    #[wasm_bindgen(js_name = buildPayload)]
    pub fn build_payload(&mut self, editing: bool) -> Result<String, JsValue> {
        let mode = if editing {
            SubmitMode::Update
        } else {
            SubmitMode::Create
        };
        match self.form.build_payload(mode) {
            Ok(services) => serde_json::to_string(&services).map_err(to_js),
            Err(FormError::Invalid(errors)) => {
                Err(serde_json::to_string(&errors).map(|s| JsValue::from_str(&s)).map_err(to_js)?)
            }
            Err(e) => Err(to_js(e)),
        }
    }
}
