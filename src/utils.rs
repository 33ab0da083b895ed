use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_LOCATION: &str = "Overall";

pub fn default_location() -> String {
    DEFAULT_LOCATION.to_string()
}

/// `location` on write shapes: an explicit `null` falls back to the default label.
pub fn location_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_location))
}

/// Replace a blank location label with the default one.
pub fn normalize_location(location: &mut String) {
    let trimmed = location.trim();
    if trimmed.is_empty() {
        *location = default_location();
    } else if trimmed.len() != location.len() {
        *location = trimmed.to_string();
    }
}

pub fn require_text(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{} is required", field))
    } else {
        Ok(())
    }
}

pub fn require_non_negative(field: &str, value: f64) -> Result<(), String> {
    if !value.is_finite() || value < 0.0 {
        Err(format!("{} must be a non-negative number", field))
    } else {
        Ok(())
    }
}

pub fn optional_non_negative(field: &str, value: Option<f64>) -> Result<(), String> {
    value.map_or(Ok(()), |v| require_non_negative(field, v))
}

/// Case-insensitive, whitespace-insensitive discriminator key ("Main Board" -> "main board").
pub fn discriminator_key(raw: &str) -> String {
    raw.split_whitespace()
        .map(|part| part.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Deserialize JSON bytes, reporting the path of the offending field on failure.
pub fn parse_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, String> {
    let de = &mut serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize(de).map_err(|e| {
        let path = e.path().to_string();
        if path == "." {
            e.inner().to_string()
        } else {
            format!("{}: {}", path, e.inner())
        }
    })
}

/// Overlay the keys present in `patch` onto the serialized `current` value and
/// read the result back as `T`.
///
/// Keys missing from `patch` keep their stored value; keys present replace it,
/// including zero, empty string and `null`. Keys listed in `immutable` are
/// dropped from both sides before merging.
pub fn merge_patch<C, T>(current: &C, patch: Map<String, Value>, immutable: &[&str]) -> Result<T, String>
where
    C: Serialize,
    T: DeserializeOwned,
{
    let mut merged = match serde_json::to_value(current).map_err(|e| e.to_string())? {
        Value::Object(map) => map,
        _ => return Err("stored record is not an object".to_string()),
    };
    for key in immutable {
        merged.remove(*key);
    }
    for (key, value) in patch {
        if immutable.contains(&key.as_str()) {
            continue;
        }
        merged.insert(key, value);
    }

    serde_path_to_error::deserialize(Value::Object(merged)).map_err(|e| format!("{}: {}", e.path(), e.inner()))
}

/// Serialize a serde-backed enum into its string name (e.g. lowercase).
pub fn serde_enum_name<T: Serialize>(val: &T) -> Option<String> {
    serde_json::to_value(val).ok()?.as_str().map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Serialize)]
    struct Stored {
        id: i64,
        name: String,
        count: i32,
        note: Option<String>,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(deny_unknown_fields)]
    struct Draft {
        name: String,
        count: i32,
        note: Option<String>,
    }

    fn stored() -> Stored {
        Stored {
            id: 7,
            name: "generator".into(),
            count: 3,
            note: Some("night shift".into()),
        }
    }

    fn patch(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("patch must be an object"),
        }
    }

    #[test]
    fn absent_keys_keep_stored_values() {
        let out: Draft = merge_patch(&stored(), patch(json!({ "count": 5 })), &["id"]).unwrap();
        assert_eq!(
            out,
            Draft {
                name: "generator".into(),
                count: 5,
                note: Some("night shift".into()),
            }
        );
    }

    #[test]
    fn zero_empty_and_null_are_real_values() {
        let out: Draft = merge_patch(
            &stored(),
            patch(json!({ "count": 0, "name": "", "note": null })),
            &["id"],
        )
        .unwrap();
        assert_eq!(out.count, 0);
        assert_eq!(out.name, "");
        assert_eq!(out.note, None);
    }

    #[test]
    fn immutable_keys_are_ignored() {
        let out: Draft = merge_patch(&stored(), patch(json!({ "id": 99 })), &["id"]).unwrap();
        assert_eq!(out.count, 3);
    }

    #[test]
    fn null_on_required_field_reports_path() {
        let err = merge_patch::<_, Draft>(&stored(), patch(json!({ "count": null })), &["id"]).unwrap_err();
        assert!(err.starts_with("count"), "{err}");
    }

    #[test]
    fn parse_json_reports_field_path() {
        let err = parse_json::<Draft>(br#"{"name": "x", "count": "three", "note": null}"#).unwrap_err();
        assert!(err.starts_with("count:"), "{err}");
    }

    #[test]
    fn location_defaults_when_blank() {
        let mut loc = "   ".to_string();
        normalize_location(&mut loc);
        assert_eq!(loc, DEFAULT_LOCATION);

        let mut loc = " Hall A ".to_string();
        normalize_location(&mut loc);
        assert_eq!(loc, "Hall A");
    }

    #[test]
    fn discriminator_key_folds_case_and_spacing() {
        assert_eq!(discriminator_key("  Main   Board "), "main board");
        assert_eq!(discriminator_key("E-Waste"), "e-waste");
    }
}
