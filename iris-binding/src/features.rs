//! Flower measurements accepted by the classifier
//!
//! The four features are always handled in the order the scaler and the
//! classifier were fitted with: sepal length, sepal width, petal length,
//! petal width (all in centimeters).

use crate::core::unified_error::{errors, IrisResult};
use serde::{Deserialize, Serialize};

/// Number of measurements in a feature vector
pub const NUM_FEATURES: usize = 4;

/// One of the four measured features
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    SepalLength,
    SepalWidth,
    PetalLength,
    PetalWidth,
}

impl Feature {
    /// All features in fitted order
    pub const ALL: [Feature; NUM_FEATURES] = [
        Feature::SepalLength,
        Feature::SepalWidth,
        Feature::PetalLength,
        Feature::PetalWidth,
    ];

    /// Field name used in artifacts and request bodies
    pub fn key(&self) -> &'static str {
        match self {
            Feature::SepalLength => "sepal_length",
            Feature::SepalWidth => "sepal_width",
            Feature::PetalLength => "petal_length",
            Feature::PetalWidth => "petal_width",
        }
    }

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            Feature::SepalLength => "Sepal Length",
            Feature::SepalWidth => "Sepal Width",
            Feature::PetalLength => "Petal Length",
            Feature::PetalWidth => "Petal Width",
        }
    }

    /// Input widget bounds for this feature
    pub fn bounds(&self) -> FeatureBounds {
        let (min, max, default) = match self {
            Feature::SepalLength => (4.0, 8.0, 5.4),
            Feature::SepalWidth => (2.0, 4.5, 3.4),
            Feature::PetalLength => (1.0, 7.0, 1.3),
            Feature::PetalWidth => (0.1, 2.5, 0.2),
        };
        FeatureBounds {
            feature: *self,
            label: format!("{} (cm)", self.display_name()),
            min,
            max,
            default,
            step: 0.1,
            help: format!(
                "{} of the {} in centimeters",
                if matches!(self, Feature::SepalLength | Feature::PetalLength) {
                    "Length"
                } else {
                    "Width"
                },
                if matches!(self, Feature::SepalLength | Feature::SepalWidth) {
                    "sepal"
                } else {
                    "petal"
                }
            ),
        }
    }
}

/// Slider definition for one feature.
///
/// Bounds are advertised to clients; the service itself only rejects
/// non-finite values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureBounds {
    pub feature: Feature,
    pub label: String,
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub step: f64,
    pub help: String,
}

impl FeatureBounds {
    /// Whether `value` lies within the widget range (inclusive)
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Slider definitions for the whole input form, in fitted order
pub fn input_form() -> Vec<FeatureBounds> {
    Feature::ALL.iter().map(Feature::bounds).collect()
}

/// Check the feature names recorded in an artifact against the fitted order.
///
/// An empty list is accepted. Names may carry a `_cm` unit suffix.
pub fn check_feature_order(names: &[String], origin: &str) -> IrisResult<()> {
    if names.is_empty() {
        return Ok(());
    }
    let in_order = names.len() == NUM_FEATURES
        && names
            .iter()
            .zip(Feature::ALL)
            .all(|(name, feature)| {
                name.strip_suffix("_cm").unwrap_or(name.as_str()) == feature.key()
            });
    if in_order {
        Ok(())
    } else {
        Err(errors::models_unavailable(
            origin,
            &format!(
                "feature order {:?} does not match {:?}",
                names,
                Feature::ALL.map(|f| f.key())
            ),
        ))
    }
}

/// Four measurements of a single flower, in centimeters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub sepal_length: f64,
    pub sepal_width: f64,
    pub petal_length: f64,
    pub petal_width: f64,
}

impl FeatureVector {
    /// Build a vector, rejecting NaN and infinities
    pub fn new(
        sepal_length: f64,
        sepal_width: f64,
        petal_length: f64,
        petal_width: f64,
    ) -> IrisResult<Self> {
        let vector = Self {
            sepal_length,
            sepal_width,
            petal_length,
            petal_width,
        };
        vector.validate()?;
        Ok(vector)
    }

    /// Build a vector from a raw slice; exactly four finite values are required
    pub fn from_slice(values: &[f64]) -> IrisResult<Self> {
        if values.len() != NUM_FEATURES {
            return Err(errors::invalid_input(
                "features",
                &format!("{} values", NUM_FEATURES),
                &format!("{} values", values.len()),
            ));
        }
        Self::new(values[0], values[1], values[2], values[3])
    }

    /// Measurements in fitted order
    pub fn to_array(&self) -> [f64; NUM_FEATURES] {
        [
            self.sepal_length,
            self.sepal_width,
            self.petal_length,
            self.petal_width,
        ]
    }

    /// Value of a single feature
    pub fn get(&self, feature: Feature) -> f64 {
        match feature {
            Feature::SepalLength => self.sepal_length,
            Feature::SepalWidth => self.sepal_width,
            Feature::PetalLength => self.petal_length,
            Feature::PetalWidth => self.petal_width,
        }
    }

    /// Check every measurement is finite.
    ///
    /// Vectors deserialized from untrusted input bypass `new`, so the
    /// service calls this again before scaling.
    pub fn validate(&self) -> IrisResult<()> {
        for feature in Feature::ALL {
            let value = self.get(feature);
            if !value.is_finite() {
                return Err(errors::invalid_input(
                    feature.key(),
                    "a finite number",
                    &value.to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Features whose value falls outside the advertised widget range
    pub fn out_of_bounds(&self) -> Vec<Feature> {
        Feature::ALL
            .into_iter()
            .filter(|f| !f.bounds().contains(self.get(*f)))
            .collect()
    }
}

impl Default for FeatureVector {
    /// The form's initial slider positions
    fn default() -> Self {
        Self {
            sepal_length: Feature::SepalLength.bounds().default,
            sepal_width: Feature::SepalWidth.bounds().default,
            petal_length: Feature::PetalLength.bounds().default,
            petal_width: Feature::PetalWidth.bounds().default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::unified_error::IrisError;

    #[test]
    fn test_from_slice_keeps_order() {
        let v = FeatureVector::from_slice(&[5.1, 3.5, 1.4, 0.2]).unwrap();
        assert_eq!(v.sepal_length, 5.1);
        assert_eq!(v.sepal_width, 3.5);
        assert_eq!(v.petal_length, 1.4);
        assert_eq!(v.petal_width, 0.2);
        assert_eq!(v.to_array(), [5.1, 3.5, 1.4, 0.2]);
    }

    #[test]
    fn test_from_slice_rejects_wrong_arity() {
        let cases: [&[f64]; 3] = [&[], &[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0, 4.0, 5.0]];
        for values in cases {
            match FeatureVector::from_slice(values) {
                Err(IrisError::InvalidInput { field, .. }) => assert_eq!(field, "features"),
                other => panic!("expected InvalidInput, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_new_rejects_non_finite() {
        let err = FeatureVector::new(5.0, f64::NAN, 1.0, 0.2).unwrap_err();
        match err {
            IrisError::InvalidInput { field, .. } => assert_eq!(field, "sepal_width"),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
        assert!(FeatureVector::new(5.0, 3.0, f64::INFINITY, 0.2).is_err());
        assert!(FeatureVector::new(5.0, 3.0, 1.0, f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn test_default_matches_form_defaults() {
        let v = FeatureVector::default();
        assert_eq!(v.to_array(), [5.4, 3.4, 1.3, 0.2]);
        assert!(v.out_of_bounds().is_empty());
    }

    #[test]
    fn test_input_form_ranges() {
        let form = input_form();
        assert_eq!(form.len(), NUM_FEATURES);
        assert_eq!(form[0].label, "Sepal Length (cm)");
        assert_eq!((form[0].min, form[0].max), (4.0, 8.0));
        assert_eq!((form[1].min, form[1].max), (2.0, 4.5));
        assert_eq!((form[2].min, form[2].max), (1.0, 7.0));
        assert_eq!((form[3].min, form[3].max), (0.1, 2.5));
        assert_eq!(form[3].help, "Width of the petal in centimeters");
        assert!(form.iter().all(|b| b.min <= b.default && b.default <= b.max));
    }

    #[test]
    fn test_feature_order_check() {
        fn names(list: &[&str]) -> Vec<String> {
            list.iter().map(|s| s.to_string()).collect()
        }

        assert!(check_feature_order(&[], "a.json").is_ok());
        assert!(check_feature_order(
            &names(&["sepal_length_cm", "sepal_width_cm", "petal_length_cm", "petal_width_cm"]),
            "a.json"
        )
        .is_ok());
        assert!(check_feature_order(
            &names(&["sepal_length", "sepal_width", "petal_length", "petal_width"]),
            "a.json"
        )
        .is_ok());

        let swapped = names(&[
            "petal_length_cm",
            "sepal_width_cm",
            "sepal_length_cm",
            "petal_width_cm",
        ]);
        match check_feature_order(&swapped, "a.json") {
            Err(IrisError::ModelsUnavailable { path, reason }) => {
                assert_eq!(path, "a.json");
                assert!(reason.contains("petal_length_cm"));
            }
            other => panic!("expected ModelsUnavailable, got {:?}", other),
        }
        assert!(check_feature_order(&names(&["sepal_length_cm"]), "a.json").is_err());
    }

    #[test]
    fn test_out_of_bounds_is_reported_not_rejected() {
        let v = FeatureVector::new(9.0, 3.0, 1.0, 0.2).unwrap();
        assert_eq!(v.out_of_bounds(), vec![Feature::SepalLength]);
    }
}
