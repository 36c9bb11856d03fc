//! FFI exports for C/Go bindings
//!
//! Inference-only: a handle is created from a model directory holding the two
//! JSON artifacts. A null handle means the artifacts were unavailable and no
//! prediction function can be called.
//!
//! Every returned string is owned by Rust and must be released with
//! `iris_free_string`.

use crate::dataset::DatasetSummary;
use crate::features::{input_form, FeatureVector};
use crate::service::PredictionService;
use crate::species::SpeciesLabel;
use crate::store::ModelStore;
use libc::{c_char, c_double, size_t};
use serde::Serialize;
use std::ffi::{CStr, CString};
use std::ptr;
use std::slice;
use std::sync::Arc;
use tracing::{error, warn};

// =============================================================================
// Helper functions
// =============================================================================

unsafe fn c_str_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

fn string_to_c_str(s: String) -> *mut c_char {
    CString::new(s).map(|cs| cs.into_raw()).unwrap_or(ptr::null_mut())
}

fn json_to_c_str<T: Serialize>(value: &T) -> *mut c_char {
    match serde_json::to_string(value) {
        Ok(json) => string_to_c_str(json),
        Err(e) => {
            error!("JSON serialization failed: {}", e);
            ptr::null_mut()
        }
    }
}

/// Read `len` doubles into a feature vector, logging why it was rejected
unsafe fn read_features(features: *const c_double, len: size_t) -> Option<FeatureVector> {
    if features.is_null() {
        warn!("Null feature pointer passed to iris prediction");
        return None;
    }
    let values = slice::from_raw_parts(features, len);
    match FeatureVector::from_slice(values) {
        Ok(vector) => Some(vector),
        Err(e) => {
            warn!("Rejected prediction input: {}", e);
            None
        }
    }
}

// =============================================================================
// Store lifecycle
// =============================================================================

/// Opaque handle to a loaded prediction service
pub struct IrisHandle(PredictionService);

/// Load both artifacts from `model_dir`. Returns null if either is unavailable.
#[no_mangle]
pub extern "C" fn iris_store_load(model_dir: *const c_char) -> *mut IrisHandle {
    let dir = match unsafe { c_str_to_string(model_dir) } {
        Some(s) => s,
        None => {
            error!("Null or non-UTF-8 model directory passed to iris_store_load");
            return ptr::null_mut();
        }
    };

    match ModelStore::load_dir(&dir) {
        Ok(store) => Box::into_raw(Box::new(IrisHandle(PredictionService::new(Arc::new(store))))),
        Err(e) => {
            error!("Failed to load Iris models from '{}': {}", dir, e);
            ptr::null_mut()
        }
    }
}

/// Free a handle returned by `iris_store_load`
#[no_mangle]
pub extern "C" fn iris_store_free(handle: *mut IrisHandle) {
    if !handle.is_null() {
        unsafe { drop(Box::from_raw(handle)) };
    }
}

// =============================================================================
// Prediction
// =============================================================================

/// Predict the species name ("Setosa", "Versicolor" or "Virginica")
#[no_mangle]
pub extern "C" fn iris_predict(
    handle: *const IrisHandle,
    features: *const c_double,
    len: size_t,
) -> *mut c_char {
    if handle.is_null() {
        return ptr::null_mut();
    }
    let service = unsafe { &(*handle).0 };
    let vector = match unsafe { read_features(features, len) } {
        Some(v) => v,
        None => return ptr::null_mut(),
    };

    match service.predict(&vector) {
        Ok(label) => string_to_c_str(label.as_str().to_string()),
        Err(e) => {
            error!("Prediction failed: {}", e);
            ptr::null_mut()
        }
    }
}

/// Predict and return the full prediction (species, description, votes) as JSON
#[no_mangle]
pub extern "C" fn iris_predict_json(
    handle: *const IrisHandle,
    features: *const c_double,
    len: size_t,
) -> *mut c_char {
    if handle.is_null() {
        return ptr::null_mut();
    }
    let service = unsafe { &(*handle).0 };
    let vector = match unsafe { read_features(features, len) } {
        Some(v) => v,
        None => return ptr::null_mut(),
    };

    match service.predict_detailed(&vector) {
        Ok(prediction) => json_to_c_str(&prediction),
        Err(e) => {
            error!("Prediction failed: {}", e);
            ptr::null_mut()
        }
    }
}

// =============================================================================
// Static information
// =============================================================================

/// Describe a species by name as JSON
#[no_mangle]
pub extern "C" fn iris_describe_json(
    handle: *const IrisHandle,
    label: *const c_char,
) -> *mut c_char {
    if handle.is_null() {
        return ptr::null_mut();
    }
    let service = unsafe { &(*handle).0 };
    let label = match unsafe { c_str_to_string(label) } {
        Some(s) => s,
        None => return ptr::null_mut(),
    };

    match SpeciesLabel::parse(&label).and_then(|l| service.describe(l)) {
        Ok(info) => json_to_c_str(info),
        Err(e) => {
            warn!("{}", e);
            ptr::null_mut()
        }
    }
}

/// Model specification card as JSON
#[no_mangle]
pub extern "C" fn iris_model_card_json(handle: *const IrisHandle) -> *mut c_char {
    if handle.is_null() {
        return ptr::null_mut();
    }
    let service = unsafe { &(*handle).0 };
    json_to_c_str(&service.model_card())
}

/// Dataset overview as JSON (needs no loaded models)
#[no_mangle]
pub extern "C" fn iris_dataset_summary_json() -> *mut c_char {
    json_to_c_str(&DatasetSummary::iris())
}

/// Input slider definitions as JSON (needs no loaded models)
#[no_mangle]
pub extern "C" fn iris_input_form_json() -> *mut c_char {
    json_to_c_str(&input_form())
}

// =============================================================================
// Memory management
// =============================================================================

/// Free a C string allocated by this library
#[no_mangle]
pub extern "C" fn iris_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        unsafe { drop(CString::from_raw(ptr)) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::shipped_model_dir;

    fn load_handle() -> *mut IrisHandle {
        let dir = CString::new(shipped_model_dir().display().to_string()).unwrap();
        let handle = iris_store_load(dir.as_ptr());
        assert!(!handle.is_null());
        handle
    }

    /// Take ownership of a returned string and free it
    fn take_string(ptr: *mut c_char) -> String {
        assert!(!ptr.is_null());
        let s = unsafe { CStr::from_ptr(ptr) }.to_str().unwrap().to_string();
        iris_free_string(ptr);
        s
    }

    #[test]
    fn test_ffi_predict_species_name() {
        let handle = load_handle();
        let features = [5.1, 3.5, 1.4, 0.2];
        let name = take_string(iris_predict(handle, features.as_ptr(), features.len()));
        assert_eq!(name, "Setosa");
        iris_store_free(handle);
    }

    #[test]
    fn test_ffi_predict_json() {
        let handle = load_handle();
        let features = [5.9, 3.0, 4.2, 1.5];
        let json = take_string(iris_predict_json(handle, features.as_ptr(), features.len()));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["species"], "Versicolor");
        assert_eq!(value["info"]["display_name"], "Iris Versicolor");
        assert_eq!(value["k"], 5);
        iris_store_free(handle);
    }

    #[test]
    fn test_ffi_rejects_bad_input() {
        let handle = load_handle();
        let short = [5.1, 3.5, 1.4];
        assert!(iris_predict(handle, short.as_ptr(), short.len()).is_null());
        let nan = [5.1, f64::NAN, 1.4, 0.2];
        assert!(iris_predict(handle, nan.as_ptr(), nan.len()).is_null());
        assert!(iris_predict(handle, ptr::null(), 4).is_null());
        iris_store_free(handle);
    }

    #[test]
    fn test_ffi_missing_models_give_null_handle() {
        let dir = tempfile::tempdir().unwrap();
        let path = CString::new(dir.path().display().to_string()).unwrap();
        let handle = iris_store_load(path.as_ptr());
        assert!(handle.is_null());

        // Every entry point tolerates the null handle
        let features = [5.1, 3.5, 1.4, 0.2];
        assert!(iris_predict(handle, features.as_ptr(), features.len()).is_null());
        assert!(iris_predict_json(handle, features.as_ptr(), features.len()).is_null());
        assert!(iris_model_card_json(handle).is_null());
        iris_store_free(handle);
        assert!(iris_store_load(ptr::null()).is_null());
    }

    #[test]
    fn test_ffi_describe() {
        let handle = load_handle();
        let label = CString::new("iris-virginica").unwrap();
        let json = take_string(iris_describe_json(handle, label.as_ptr()));
        assert!(json.contains("Long, narrow petals with large sepals"));

        let unknown = CString::new("rosa").unwrap();
        assert!(iris_describe_json(handle, unknown.as_ptr()).is_null());
        iris_store_free(handle);
    }

    #[test]
    fn test_ffi_static_info() {
        let handle = load_handle();
        let card: serde_json::Value =
            serde_json::from_str(&take_string(iris_model_card_json(handle))).unwrap();
        assert_eq!(card["training_samples"], 150);
        iris_store_free(handle);

        let summary: serde_json::Value =
            serde_json::from_str(&take_string(iris_dataset_summary_json())).unwrap();
        assert_eq!(summary["year_introduced"], 1936);

        let form: serde_json::Value =
            serde_json::from_str(&take_string(iris_input_form_json())).unwrap();
        assert_eq!(form.as_array().unwrap().len(), 4);
        assert_eq!(form[0]["feature"], "sepal_length");
    }
}
