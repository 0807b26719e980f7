use serde_json::Value;

/// Normalizes the contract's ambiguous `Option<String>` encodings into one
/// optional string. Depending on the SDK response schema the same field may
/// arrive as:
///   - `"value"` (bare string)
///   - `{"fields": {"vec": ["value"]}}` (standard option wrapper)
///   - `{"fields": ["value"]}` (array-shaped wrapper)
///   - `{"vec": ["value"]}` (bare vector)
///   - `null` / `{}` for None
/// The matchers run in order and the first hit wins; empty strings count as
/// absent. Extend the list only for a known new encoding.
pub fn extract_option_string(field: &Value) -> Option<String> {
    let matchers: [fn(&Value) -> Option<&str>; 4] = [
        |v| v.as_str(),
        |v| v.get("fields")?.get("vec")?.get(0)?.as_str(),
        |v| v.get("fields")?.get(0)?.as_str(),
        |v| v.get("vec")?.get(0)?.as_str(),
    ];

    matchers
        .iter()
        .find_map(|matcher| matcher(field))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Counters and timestamps come back as JSON numbers or decimal strings
/// depending on magnitude; anything else reads as zero.
pub fn extract_u64(field: &Value) -> u64 {
    if let Some(n) = field.as_u64() {
        return n;
    }
    field
        .as_str()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0)
}

/// Entity identifiers in event payloads are usually strings but have been
/// observed wrapped as `{"id": "0x.."}` or `{"value": "0x.."}`.
pub fn extract_id(field: &Value) -> Option<String> {
    if let Some(s) = field.as_str() {
        if !s.is_empty() {
            return Some(s.to_string());
        }
        return None;
    }
    for key in ["id", "value"] {
        if let Some(s) = field.get(key).and_then(Value::as_str) {
            if !s.is_empty() {
                return Some(s.to_string());
            }
        }
    }
    None
}

/// Plain string field with empty-as-missing semantics.
pub fn extract_string(field: &Value) -> String {
    field.as_str().unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn option_string_accepts_all_known_encodings() {
        let encodings = [
            json!("hello"),
            json!({"fields": {"vec": ["hello"]}}),
            json!({"vec": ["hello"]}),
            json!({"fields": ["hello"]}),
        ];
        for encoding in &encodings {
            assert_eq!(
                extract_option_string(encoding),
                Some("hello".to_string()),
                "failed for {encoding}"
            );
        }
    }

    #[test]
    fn option_string_absent_for_none_shapes() {
        assert_eq!(extract_option_string(&Value::Null), None);
        assert_eq!(extract_option_string(&json!({})), None);
        assert_eq!(extract_option_string(&json!("")), None);
        assert_eq!(extract_option_string(&json!({"fields": {"vec": []}})), None);
    }

    #[test]
    fn u64_accepts_number_and_string() {
        assert_eq!(extract_u64(&json!(42)), 42);
        assert_eq!(extract_u64(&json!("1700000000000")), 1_700_000_000_000);
        assert_eq!(extract_u64(&json!(null)), 0);
        assert_eq!(extract_u64(&json!("not a number")), 0);
    }

    #[test]
    fn id_unwraps_object_shapes() {
        assert_eq!(extract_id(&json!("0xbeef")), Some("0xbeef".to_string()));
        assert_eq!(extract_id(&json!({"id": "0xbeef"})), Some("0xbeef".to_string()));
        assert_eq!(extract_id(&json!({"value": "0xbeef"})), Some("0xbeef".to_string()));
        assert_eq!(extract_id(&json!("")), None);
        assert_eq!(extract_id(&json!(7)), None);
    }
}
