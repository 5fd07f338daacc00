//! Parsing of `/predict` bodies into [`PredictionRequest`].
//!
//! Failures are returned as data, one [`Violation`] per problem, each naming
//! the offending location and input so clients can render diagnostics.

use serde::Serialize;
use serde_json::Value;

use crate::dataset::N_FEATURES;
use crate::service::prediction::PredictionRequest;

/// Name of the body field carrying the feature vector.
pub const VALUES_FIELD: &str = "values";

/// Largest `/predict` body accepted, in bytes.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// Body is not parseable JSON
    JsonInvalid,
    /// Body is JSON but not an object
    ModelAttributesType,
    /// Required field absent
    Missing,
    /// Field is not an array
    ListType,
    TooShort,
    TooLong,
    /// Element is not a number
    FloatType,
}

/// One path segment of a violation location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum LocItem {
    Field(String),
    Index(usize),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    #[serde(rename = "type")]
    pub kind: ViolationKind,
    pub loc: Vec<LocItem>,
    pub msg: String,
    pub input: Value,
}

impl Violation {
    fn new(kind: ViolationKind, loc: Vec<LocItem>, msg: impl Into<String>, input: Value) -> Self {
        Self {
            kind,
            loc,
            msg: msg.into(),
            input,
        }
    }
}

/// Every reason a body was rejected; never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationFailure {
    pub errors: Vec<Violation>,
}

impl ValidationFailure {
    fn single(violation: Violation) -> Self {
        Self {
            errors: vec![violation],
        }
    }

    /// Body exceeded `limit` bytes and was not read to the end.
    pub fn body_too_large(limit: usize) -> Self {
        Self::single(Violation::new(
            ViolationKind::TooLong,
            body_loc(),
            format!("Request body should have at most {} bytes", limit),
            Value::Null,
        ))
    }

    /// Body stream failed before it could be parsed.
    pub fn unreadable_body(reason: impl Into<String>) -> Self {
        Self::single(Violation::new(
            ViolationKind::JsonInvalid,
            body_loc(),
            "Request body could not be read",
            Value::String(reason.into()),
        ))
    }
}

impl std::fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kinds: Vec<String> = self
            .errors
            .iter()
            .map(|v| format!("{:?} at {:?}", v.kind, v.loc))
            .collect();
        write!(f, "{} validation error(s): {}", self.errors.len(), kinds.join(", "))
    }
}

fn body_loc() -> Vec<LocItem> {
    vec![LocItem::Field("body".to_string())]
}

fn values_loc() -> Vec<LocItem> {
    vec![
        LocItem::Field("body".to_string()),
        LocItem::Field(VALUES_FIELD.to_string()),
    ]
}

/// Parse a raw request body of the form `{"values": [f1, f2, f3, f4]}`.
///
/// JSON integers are accepted and coerced to `f64`; strings, booleans, null
/// and nested structures are rejected. Length and element problems are
/// reported together.
pub fn parse(raw_body: &[u8]) -> Result<PredictionRequest, ValidationFailure> {
    if raw_body.iter().all(|b| b.is_ascii_whitespace()) {
        return Err(ValidationFailure::single(Violation::new(
            ViolationKind::Missing,
            body_loc(),
            "Field required",
            Value::Null,
        )));
    }

    let body: Value = serde_json::from_slice(raw_body).map_err(|err| {
        ValidationFailure::single(Violation::new(
            ViolationKind::JsonInvalid,
            body_loc(),
            "JSON decode error",
            Value::String(err.to_string()),
        ))
    })?;

    let object = body.as_object().ok_or_else(|| {
        ValidationFailure::single(Violation::new(
            ViolationKind::ModelAttributesType,
            body_loc(),
            "Input should be a valid dictionary or object to extract fields from",
            body.clone(),
        ))
    })?;

    let field = object.get(VALUES_FIELD).ok_or_else(|| {
        ValidationFailure::single(Violation::new(
            ViolationKind::Missing,
            values_loc(),
            "Field required",
            body.clone(),
        ))
    })?;

    let items = field.as_array().ok_or_else(|| {
        ValidationFailure::single(Violation::new(
            ViolationKind::ListType,
            values_loc(),
            "Input should be a valid list",
            field.clone(),
        ))
    })?;

    let mut errors = Vec::new();

    if items.len() < N_FEATURES {
        errors.push(Violation::new(
            ViolationKind::TooShort,
            values_loc(),
            format!(
                "List should have at least {} items after validation, not {}",
                N_FEATURES,
                items.len()
            ),
            field.clone(),
        ));
    } else if items.len() > N_FEATURES {
        errors.push(Violation::new(
            ViolationKind::TooLong,
            values_loc(),
            format!(
                "List should have at most {} items after validation, not {}",
                N_FEATURES,
                items.len()
            ),
            field.clone(),
        ));
    }

    let mut values = [0.0; N_FEATURES];
    for (index, item) in items.iter().enumerate() {
        match item.as_f64() {
            Some(number) => {
                if let Some(slot) = values.get_mut(index) {
                    *slot = number;
                }
            }
            None => {
                let mut loc = values_loc();
                loc.push(LocItem::Index(index));
                errors.push(Violation::new(
                    ViolationKind::FloatType,
                    loc,
                    "Input should be a valid number",
                    item.clone(),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(PredictionRequest::new(values))
    } else {
        Err(ValidationFailure { errors })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse_json(body: Value) -> Result<PredictionRequest, ValidationFailure> {
        parse(body.to_string().as_bytes())
    }

    fn kinds(failure: &ValidationFailure) -> Vec<ViolationKind> {
        failure.errors.iter().map(|v| v.kind).collect()
    }

    #[test]
    fn test_accepts_floats_and_integers() {
        let request = parse_json(json!({"values": [5.1, 3, 1.4, 0]})).unwrap();
        assert_eq!(request.values(), &[5.1, 3.0, 1.4, 0.0]);
    }

    #[test]
    fn test_ignores_unknown_fields() {
        assert!(parse_json(json!({"values": [1, 2, 3, 4], "extra": true})).is_ok());
    }

    #[test]
    fn test_wrong_length() {
        let failure = parse_json(json!({"values": [1, 2, 3]})).unwrap_err();
        assert_eq!(kinds(&failure), vec![ViolationKind::TooShort]);

        let failure = parse_json(json!({"values": [1, 2, 3, 4, 5]})).unwrap_err();
        assert_eq!(kinds(&failure), vec![ViolationKind::TooLong]);

        let failure = parse_json(json!({"values": []})).unwrap_err();
        assert_eq!(kinds(&failure), vec![ViolationKind::TooShort]);
    }

    #[test]
    fn test_non_numeric_elements_are_itemised() {
        let failure = parse_json(json!({"values": [1.0, "bad", null, true]})).unwrap_err();
        assert_eq!(failure.errors.len(), 3);
        assert!(failure.errors.iter().all(|v| v.kind == ViolationKind::FloatType));

        let first = &failure.errors[0];
        assert_eq!(
            first.loc,
            vec![
                LocItem::Field("body".to_string()),
                LocItem::Field("values".to_string()),
                LocItem::Index(1)
            ]
        );
        assert_eq!(first.input, json!("bad"));
    }

    #[test]
    fn test_nested_structures_rejected() {
        let failure = parse_json(json!({"values": [1, [2], {"x": 3}, 4]})).unwrap_err();
        assert_eq!(kinds(&failure), vec![ViolationKind::FloatType, ViolationKind::FloatType]);
    }

    #[test]
    fn test_length_and_type_errors_collected_together() {
        let failure = parse_json(json!({"values": ["a", 2, 3]})).unwrap_err();
        assert_eq!(kinds(&failure), vec![ViolationKind::TooShort, ViolationKind::FloatType]);
    }

    #[test]
    fn test_values_must_be_a_list() {
        for body in [json!({"values": null}), json!({"values": 4}), json!({"values": {"a": 1}}), json!({"values": "1,2,3,4"})] {
            let failure = parse_json(body).unwrap_err();
            assert_eq!(kinds(&failure), vec![ViolationKind::ListType]);
        }
    }

    #[test]
    fn test_missing_field_and_bad_bodies() {
        let failure = parse_json(json!({"vals": [1, 2, 3, 4]})).unwrap_err();
        assert_eq!(kinds(&failure), vec![ViolationKind::Missing]);

        let failure = parse_json(json!([1, 2, 3, 4])).unwrap_err();
        assert_eq!(kinds(&failure), vec![ViolationKind::ModelAttributesType]);

        let failure = parse(b"{\"values\": [1, 2,").unwrap_err();
        assert_eq!(kinds(&failure), vec![ViolationKind::JsonInvalid]);

        let failure = parse(b"  ").unwrap_err();
        assert_eq!(kinds(&failure), vec![ViolationKind::Missing]);
    }

    #[test]
    fn test_violation_wire_shape() {
        let failure = parse_json(json!({"values": [1, 2, 3]})).unwrap_err();
        let wire = serde_json::to_value(&failure.errors[0]).unwrap();
        assert_eq!(wire["type"], json!("too_short"));
        assert_eq!(wire["loc"], json!(["body", "values"]));
        assert_eq!(wire["input"], json!([1, 2, 3]));
        assert!(wire["msg"].as_str().unwrap().contains("at least 4"));
    }
}
