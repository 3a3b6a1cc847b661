//! # Field Validation
//!
//! Constraint checks run before any storage call. A [`Validator`] collects one
//! [`FieldError`] per offending field so a client sees every problem of a payload
//! in a single 400 response instead of fixing them one round trip at a time.
//!
//! Constraint codes follow the names clients already know from bean validation
//! (`NotNull`, `Size`, `Min`, `DecimalMin`).
//!
//! ```rust
//! use resource_framework::validation::Validator;
//!
//! let name: Option<String> = None;
//! let handle = Some("h".to_string());
//!
//! let result = Validator::new("art")
//!     .required("name", &name)
//!     .min_length("handle", &handle, 3)
//!     .finish();
//!
//! let errors = result.unwrap_err();
//! assert_eq!(errors.field_errors.len(), 2);
//! ```

use serde::Serialize;

/// One violated constraint on one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub object_name: String,
    pub field: String,
    pub message: String,
}

/// All constraint violations of a payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{} constraint violation(s) on {object_name}", field_errors.len())]
pub struct ValidationErrors {
    pub object_name: String,
    pub field_errors: Vec<FieldError>,
}

impl ValidationErrors {
    /// True when `field` failed with the given constraint code.
    pub fn has(&self, field: &str, code: &str) -> bool {
        self.field_errors
            .iter()
            .any(|e| e.field == field && e.message == code)
    }
}

/// Fluent collector of field errors.
///
/// Every check except [`Validator::required`] skips absent values, so optional
/// fields are only constrained when supplied.
#[derive(Debug)]
pub struct Validator {
    object_name: &'static str,
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new(object_name: &'static str) -> Self {
        Self {
            object_name,
            errors: Vec::new(),
        }
    }

    fn push(&mut self, field: &str, code: &str) {
        self.errors.push(FieldError {
            object_name: self.object_name.to_string(),
            field: field.to_string(),
            message: code.to_string(),
        });
    }

    /// `NotNull`: the value must be present.
    pub fn required<V>(mut self, field: &str, value: &Option<V>) -> Self {
        if value.is_none() {
            self.push(field, "NotNull");
        }
        self
    }

    /// `Size`: string length (in characters) of at least `min`.
    pub fn min_length(mut self, field: &str, value: &Option<String>, min: usize) -> Self {
        if let Some(v) = value {
            if v.chars().count() < min {
                self.push(field, "Size");
            }
        }
        self
    }

    /// `Size`: string length (in characters) of at most `max`.
    pub fn max_length(mut self, field: &str, value: &Option<String>, max: usize) -> Self {
        if let Some(v) = value {
            if v.chars().count() > max {
                self.push(field, "Size");
            }
        }
        self
    }

    /// `Min`: integral value of at least `min`.
    pub fn min(mut self, field: &str, value: &Option<i32>, min: i32) -> Self {
        if let Some(v) = value {
            if *v < min {
                self.push(field, "Min");
            }
        }
        self
    }

    /// `DecimalMin`: numeric value of at least `min`, inclusive.
    pub fn decimal_min<N: PartialOrd>(mut self, field: &str, value: &Option<N>, min: N) -> Self {
        if let Some(v) = value {
            if *v < min {
                self.push(field, "DecimalMin");
            }
        }
        self
    }

    pub fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors {
                object_name: self.object_name.to_string(),
                field_errors: self.errors,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_optional_fields_are_not_constrained() {
        let result = Validator::new("collector")
            .min_length("username", &None, 3)
            .max_length("currency", &None, 3)
            .min("position", &None, 0)
            .decimal_min("amount", &None::<f64>, 0.0)
            .finish();
        assert!(result.is_ok());
    }

    #[test]
    fn test_collects_one_error_per_field() {
        let errors = Validator::new("transaction")
            .required("reference", &None::<String>)
            .min_length("currency", &Some("EU".to_string()), 3)
            .max_length("currency", &Some("EURO".to_string()), 3)
            .decimal_min("amount", &Some(-1.5), 0.0)
            .min("position", &Some(-1), 0)
            .finish()
            .unwrap_err();

        assert_eq!(errors.object_name, "transaction");
        assert_eq!(errors.field_errors.len(), 5);
        assert!(errors.has("reference", "NotNull"));
        assert!(errors.has("currency", "Size"));
        assert!(errors.has("amount", "DecimalMin"));
        assert!(errors.has("position", "Min"));
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let result = Validator::new("art")
            .min_length("handle", &Some("éé".to_string()), 2)
            .max_length("handle", &Some("ééé".to_string()), 3)
            .finish();
        assert!(result.is_ok());
    }

    #[test]
    fn test_boundary_values_pass() {
        let result = Validator::new("output")
            .min("position", &Some(0), 0)
            .decimal_min("amount", &Some(0.0), 0.0)
            .finish();
        assert!(result.is_ok());
    }
}
