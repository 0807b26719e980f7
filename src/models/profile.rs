use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::client::ObjectSnapshot;
use crate::models::decode;

/// On-chain profile snapshot. Username and bio are externally owned and a
/// profile's address holds at most one of these.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Profile {
    pub id: String,
    pub owner: String,
    pub username: String,
    pub bio: String,
    pub profile_image_blob_id: Option<String>,
    pub suits_count: u64,
    pub followers_count: u64,
    pub following_count: u64,
    pub created_at_ms: u64,
}

impl Profile {
    pub fn from_snapshot(snapshot: &ObjectSnapshot, fallback_owner: &str) -> Self {
        let fields = &snapshot.fields;
        let owner = decode::extract_string(field(fields, "owner"));
        Profile {
            id: snapshot.object_id.clone(),
            owner: if owner.is_empty() {
                fallback_owner.to_string()
            } else {
                owner
            },
            username: decode::extract_string(field(fields, "username")),
            bio: decode::extract_string(field(fields, "bio")),
            profile_image_blob_id: decode::extract_option_string(field(
                fields,
                "profile_image_blob_id",
            )),
            suits_count: decode::extract_u64(field(fields, "suits_count")),
            followers_count: decode::extract_u64(field(fields, "followers_count")),
            following_count: decode::extract_u64(field(fields, "following_count")),
            created_at_ms: decode::extract_u64(field(fields, "created_at_ms")),
        }
    }
}

/// Client-local profile overlay. Stored only on this device and never
/// authoritative for identity.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ProfileMetadata {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub location: String,
}

/// Field-wise patch applied by `PreferenceStore::merge`.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct MetadataPatch {
    pub display_name: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
}

impl ProfileMetadata {
    pub fn apply(&mut self, patch: MetadataPatch) {
        if let Some(display_name) = patch.display_name {
            self.display_name = display_name;
        }
        if let Some(website) = patch.website {
            self.website = website;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
    }
}

fn field<'a>(fields: &'a Value, key: &str) -> &'a Value {
    fields.get(key).unwrap_or(&Value::Null)
}
