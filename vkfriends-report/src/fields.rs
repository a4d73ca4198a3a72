//! Per-field transforms applied to friend records before they are written.
//!
//! A fixed table maps field names to transform functions. Fields without a
//! registered transform are written unchanged.
//!
//! | Field | Transform |
//! |-------|-----------|
//! | `country`, `city` | nested object → its `title` |
//! | `sex` | numeric code → localized label |
//! | `bdate` | `D.M[.Y]` → ISO-like timestamp |

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use vkfriends_core::{CoreError, Record};

/// Transform applied to one raw field value. Absent values arrive as `Null`.
pub type FieldHandler = fn(&Value) -> Result<Value, CoreError>;

/// Labels for the `sex` field codes.
pub const SEX_LABELS: [(i64, &str); 3] = [(0, "Пол не указан"), (1, "Женский"), (2, "Мужской")];

const FIELD_HANDLERS: &[(&str, FieldHandler)] = &[
    ("country", country_handler),
    ("city", city_handler),
    ("sex", sex_handler),
    ("bdate", bdate_value_handler),
];

/// Returns the transform registered for `field`.
pub fn handler_for(field: &str) -> Option<FieldHandler> {
    FIELD_HANDLERS
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, handler)| *handler)
}

/// Applies the registered transform for `field`, or passes `value` through.
///
/// # Errors
///
/// Returns the transform's error for values it cannot handle.
pub fn handle_field(field: &str, value: Option<&Value>) -> Result<Value, CoreError> {
    let value = value.unwrap_or(&Value::Null);
    match handler_for(field) {
        Some(handler) => handler(value),
        None => Ok(value.clone()),
    }
}

/// Converts a VK birth date into `YYYY-MM-DDT00:00:00.000`.
///
/// Dates without a year become `--MM-DDT00:00:00.000`. Absent or empty
/// input yields `None`.
///
/// # Errors
///
/// Returns [`CoreError::InvalidFieldValue`] unless the value has two or three
/// dot-separated parts.
pub fn bdate_handler(value: Option<&str>) -> Result<Option<String>, CoreError> {
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        return Ok(None);
    };

    let parts: Vec<&str> = value.split('.').collect();
    match parts.as_slice() {
        [day, month] => Ok(Some(format!("--{month:0>2}-{day:0>2}T00:00:00.000"))),
        [day, month, year] => Ok(Some(format!("{year}-{month:0>2}-{day:0>2}T00:00:00.000"))),
        _ => Err(invalid("bdate", value)),
    }
}

fn bdate_value_handler(value: &Value) -> Result<Value, CoreError> {
    match value {
        Value::Null => Ok(Value::Null),
        Value::String(s) => Ok(bdate_handler(Some(s))?.map_or(Value::Null, Value::String)),
        other => Err(invalid("bdate", other)),
    }
}

fn sex_handler(value: &Value) -> Result<Value, CoreError> {
    if value.is_null() {
        return Ok(Value::Null);
    }

    value
        .as_i64()
        .and_then(|code| SEX_LABELS.iter().find(|(c, _)| *c == code))
        .map(|(_, label)| Value::String((*label).to_string()))
        .ok_or_else(|| CoreError::UnknownFieldCode {
            field: "sex".to_string(),
            code: value.to_string(),
        })
}

fn country_handler(value: &Value) -> Result<Value, CoreError> {
    title_of("country", value)
}

fn city_handler(value: &Value) -> Result<Value, CoreError> {
    title_of("city", value)
}

fn title_of(field: &str, value: &Value) -> Result<Value, CoreError> {
    match value {
        Value::Null => Ok(Value::Null),
        Value::Object(object) => Ok(object.get("title").cloned().unwrap_or(Value::Null)),
        other => Err(invalid(field, other)),
    }
}

fn invalid(field: &str, value: impl ToString) -> CoreError {
    CoreError::InvalidFieldValue {
        field: field.to_string(),
        value: value.to_string(),
    }
}

// ============================================================================
// Prepared Item
// ============================================================================

/// A record reduced to the configured fields, in configured order, with
/// transforms applied.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedItem(Vec<(String, Value)>);

impl PreparedItem {
    /// Prepares `record` for the given field list.
    ///
    /// # Errors
    ///
    /// Returns the first field transform error.
    pub fn from_record(fields: &[String], record: &Record) -> Result<Self, CoreError> {
        fields
            .iter()
            .map(|field| Ok((field.clone(), handle_field(field, record.get(field))?)))
            .collect::<Result<Vec<_>, CoreError>>()
            .map(Self)
    }

    /// Returns the prepared values in field order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.0.iter().map(|(_, value)| value)
    }
}

impl Serialize for PreparedItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (field, value) in &self.0 {
            map.serialize_entry(field, value)?;
        }
        map.end()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bdate_with_year() {
        assert_eq!(
            bdate_handler(Some("5.9.2000")).unwrap().as_deref(),
            Some("2000-09-05T00:00:00.000")
        );
        assert_eq!(
            bdate_handler(Some("15.12.1990")).unwrap().as_deref(),
            Some("1990-12-15T00:00:00.000")
        );
    }

    #[test]
    fn test_bdate_without_year() {
        assert_eq!(
            bdate_handler(Some("5.9")).unwrap().as_deref(),
            Some("--09-05T00:00:00.000")
        );
    }

    #[test]
    fn test_bdate_absent() {
        assert_eq!(bdate_handler(None).unwrap(), None);
        assert_eq!(bdate_handler(Some("")).unwrap(), None);
        assert_eq!(handle_field("bdate", None).unwrap(), Value::Null);
    }

    #[test]
    fn test_bdate_malformed() {
        assert!(matches!(
            bdate_handler(Some("2000")),
            Err(CoreError::InvalidFieldValue { .. })
        ));
        assert!(handle_field("bdate", Some(&json!(12))).is_err());
    }

    #[test]
    fn test_sex_labels() {
        assert_eq!(handle_field("sex", Some(&json!(0))).unwrap(), "Пол не указан");
        assert_eq!(handle_field("sex", Some(&json!(1))).unwrap(), "Женский");
        assert_eq!(handle_field("sex", Some(&json!(2))).unwrap(), "Мужской");
    }

    #[test]
    fn test_sex_absent_is_null() {
        assert_eq!(handle_field("sex", None).unwrap(), Value::Null);
    }

    #[test]
    fn test_sex_unknown_code_fails() {
        let err = handle_field("sex", Some(&json!(3))).unwrap_err();
        assert!(matches!(err, CoreError::UnknownFieldCode { ref code, .. } if code == "3"));
    }

    #[test]
    fn test_title_extraction() {
        let city = json!({"id": 1, "title": "Москва"});
        assert_eq!(handle_field("city", Some(&city)).unwrap(), "Москва");
        assert_eq!(handle_field("country", None).unwrap(), Value::Null);
        assert_eq!(handle_field("country", Some(&json!({"id": 1}))).unwrap(), Value::Null);
    }

    #[test]
    fn test_unregistered_field_passes_through() {
        let value = json!({"nested": [1, 2]});
        assert_eq!(handle_field("photo_50", Some(&value)).unwrap(), value);
        assert_eq!(handle_field("first_name", None).unwrap(), Value::Null);
    }

    #[test]
    fn test_prepared_item_keeps_field_order() {
        let record = json!({"sex": 2, "first_name": "A", "id": 7})
            .as_object()
            .cloned()
            .unwrap();
        let fields = vec!["first_name".to_string(), "sex".to_string(), "last_name".to_string()];

        let item = PreparedItem::from_record(&fields, &record).unwrap();

        let values: Vec<_> = item.values().cloned().collect();
        assert_eq!(values, vec![json!("A"), json!("Мужской"), Value::Null]);
        assert_eq!(
            serde_json::to_string(&item).unwrap(),
            r#"{"first_name":"A","sex":"Мужской","last_name":null}"#
        );
    }
}
