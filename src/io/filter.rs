use serde::{Deserialize, Serialize};
use serde_json::Value;
use shapefile::dbase::{FieldValue, Record};

/// Keep only features whose attribute `field` equals `value`, e.g.
/// `STATEFP == "13"` for Georgia counties or `RTTYP == "I"` for interstates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeFilter {
    pub field: String,
    pub value: String,
}

impl AttributeFilter {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self { field: field.into(), value: value.into() }
    }

    pub fn matches_record(&self, record: &Record) -> bool {
        record.get(&self.field).and_then(field_text).as_deref() == Some(self.value.as_str())
    }

    /// Same test against a GeoJSON `properties` object.
    pub fn matches_properties(&self, properties: &Value) -> bool {
        properties.get(&self.field).and_then(json_text).as_deref() == Some(self.value.as_str())
    }
}

/// Shapefile attribute as text, with integral numbers printed without a
/// fractional part.
pub(super) fn field_text(value: &FieldValue) -> Option<String> {
    match value {
        FieldValue::Character(Some(s)) => Some(s.trim().to_string()),
        FieldValue::Numeric(Some(n)) => Some(number_text(*n)),
        _ => None,
    }
}

pub(super) fn json_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => n.as_i64().map(|i| i.to_string()).or_else(|| n.as_f64().map(number_text)),
        _ => None,
    }
}

fn number_text(n: f64) -> String {
    if n.fract() == 0.0 { format!("{n:.0}") } else { n.to_string() }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn attribute_text_normalizes_numbers() {
        assert_eq!(field_text(&FieldValue::Character(Some(" 13 ".into()))).as_deref(), Some("13"));
        assert_eq!(field_text(&FieldValue::Numeric(Some(13.0))).as_deref(), Some("13"));
        assert_eq!(field_text(&FieldValue::Numeric(Some(1.5))).as_deref(), Some("1.5"));
        assert_eq!(field_text(&FieldValue::Character(None)), None);
    }

    #[test]
    fn filters_geojson_properties() {
        let georgia = AttributeFilter::new("STATEFP", "13");
        assert!(georgia.matches_properties(&json!({ "STATEFP": "13", "NAME": "Fulton" })));
        assert!(georgia.matches_properties(&json!({ "STATEFP": 13 })));
        assert!(!georgia.matches_properties(&json!({ "STATEFP": "01" })));
        assert!(!georgia.matches_properties(&json!({})));
        assert!(!georgia.matches_properties(&Value::Null));
    }
}
