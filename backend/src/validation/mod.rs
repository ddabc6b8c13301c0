//! JSON Schema validation for view configuration files.
//!
//! The schema is embedded at compile time from `schemas/view-config.json`
//! and checked with JSON Schema Draft 7 before the configuration is
//! deserialized, so a typo in a hand-written config surfaces as a list of
//! readable messages instead of a single serde error.
//!
//! # Example
//!
//! ```rust,ignore
//! use serde_json::json;
//! use sheetview::validation::validate_view_config;
//!
//! let config = json!({
//!     "tableUrl": "https://example.invalid/sheet.csv",
//!     "views": [{ "id": "table1", "rowStart": 1, "rowEnd": 3, "columns": [0, 1] }]
//! });
//! assert!(validate_view_config(&config).is_ok());
//! ```

use serde_json::Value;

const VIEW_CONFIG_SCHEMA: &str = include_str!("../../schemas/view-config.json");

/// Validate a JSON value against a JSON schema.
///
/// # Returns
/// * `Ok(())` if valid
/// * `Err(Vec<String>)` with every error if invalid
pub fn validate(schema: &Value, data: &Value) -> Result<(), Vec<String>> {
    let validator = jsonschema::draft7::new(schema)
        .map_err(|e| vec![format!("Invalid schema: {}", e)])?;

    let errors: Vec<String> = validator
        .iter_errors(data)
        .map(|e| e.to_string())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Quick true/false check.
pub fn is_valid(schema: &Value, data: &Value) -> bool {
    jsonschema::draft7::is_valid(schema, data)
}

fn view_config_schema() -> Result<Value, Vec<String>> {
    serde_json::from_str(VIEW_CONFIG_SCHEMA)
        .map_err(|e| vec![format!("Invalid embedded schema: {}", e)])
}

/// Validate against the embedded configuration schema.
pub fn validate_view_config(data: &Value) -> Result<(), Vec<String>> {
    let schema = view_config_schema()?;
    validate(&schema, data)
}

/// Quick check against the embedded configuration schema.
pub fn is_valid_view_config(data: &Value) -> bool {
    view_config_schema()
        .map(|schema| is_valid(&schema, data))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_config() {
        let config = json!({
            "tableUrl": "https://example.invalid/sheet.csv",
            "views": [{
                "id": "table4",
                "rowStart": 2,
                "rowEnd": 53,
                "columns": [0, 1, 2],
                "hideEmpty": [1],
                "compact": true,
                "styles": [{ "type": "hundred_max_border", "column": 2 }]
            }]
        });
        assert!(is_valid_view_config(&config));
    }

    #[test]
    fn test_negative_column_rejected() {
        let config = json!({
            "tableUrl": "x",
            "views": [{ "id": "t", "rowStart": 0, "rowEnd": 1, "columns": [-1] }]
        });
        assert!(!is_valid_view_config(&config));
    }

    #[test]
    fn test_unknown_style_rejected() {
        let config = json!({
            "tableUrl": "x",
            "views": [{
                "id": "t", "rowStart": 0, "rowEnd": 1, "columns": [0],
                "styles": [{ "type": "sparkle" }]
            }]
        });
        let errors = validate_view_config(&config).unwrap_err();
        assert!(!errors.is_empty());
    }

    #[test]
    fn test_missing_views_reports_errors() {
        let result = validate_view_config(&json!({ "tableUrl": "x" }));
        assert!(result.is_err());
        assert!(result.unwrap_err().iter().any(|e| e.contains("views")));
    }
}
