use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::client::ObjectSnapshot;
use crate::models::decode;

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Privacy {
    Public,
    Members,
}

impl Privacy {
    /// Wire encoding used by the contract's entry functions.
    pub fn as_u8(self) -> u8 {
        match self {
            Privacy::Public => 0,
            Privacy::Members => 1,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Community {
    pub id: String,
    pub name: String,
    pub handle: String,
    pub description: String,
    pub creator: String,
    pub privacy: Privacy,
    pub members_count: u64,
    pub thumbnail_blob_id: Option<String>,
    pub cover_blob_id: Option<String>,
    pub created_at_ms: u64,
}

impl Community {
    pub fn from_snapshot(snapshot: &ObjectSnapshot) -> Self {
        let fields = &snapshot.fields;
        Community {
            id: snapshot.object_id.clone(),
            name: decode::extract_string(field(fields, "name")),
            handle: decode::extract_string(field(fields, "handle")),
            description: decode::extract_string(field(fields, "description")),
            creator: decode::extract_string(field(fields, "creator")),
            privacy: decode_privacy(field(fields, "privacy")),
            members_count: decode::extract_u64(field(fields, "members_count")),
            thumbnail_blob_id: decode::extract_option_string(field(fields, "thumbnail_blob_id")),
            cover_blob_id: decode::extract_option_string(field(fields, "cover_blob_id")),
            created_at_ms: decode::extract_u64(field(fields, "created_at_ms")),
        }
    }
}

// The contract stores privacy as a u8 (0 = public) but older objects carry
// the string form.
fn decode_privacy(value: &Value) -> Privacy {
    match value {
        Value::Number(n) if n.as_u64() == Some(0) => Privacy::Public,
        Value::String(s) if s == "public" => Privacy::Public,
        _ => Privacy::Members,
    }
}

fn field<'a>(fields: &'a Value, key: &str) -> &'a Value {
    fields.get(key).unwrap_or(&Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn privacy_accepts_numeric_and_string_forms() {
        assert_eq!(decode_privacy(&json!(0)), Privacy::Public);
        assert_eq!(decode_privacy(&json!("public")), Privacy::Public);
        assert_eq!(decode_privacy(&json!(1)), Privacy::Members);
        assert_eq!(decode_privacy(&json!("members")), Privacy::Members);
        assert_eq!(decode_privacy(&json!(null)), Privacy::Members);
    }

    #[test]
    fn community_decodes_media_options() {
        let snapshot = ObjectSnapshot {
            object_id: "0xc".to_string(),
            object_type: None,
            fields: json!({
                "name": "rustaceans",
                "handle": "rust",
                "description": "systems talk",
                "creator": "0xa",
                "privacy": 0,
                "members_count": "12",
                "thumbnail_blob_id": {"vec": ["thumb"]},
                "cover_blob_id": null,
                "created_at_ms": 9,
            }),
        };
        let community = Community::from_snapshot(&snapshot);
        assert_eq!(community.privacy, Privacy::Public);
        assert_eq!(community.members_count, 12);
        assert_eq!(community.thumbnail_blob_id, Some("thumb".to_string()));
        assert_eq!(community.cover_blob_id, None);
    }
}
