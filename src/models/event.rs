use serde_json::Value;

use crate::models::decode;

/// Event taxonomy emitted by the Suitter contract package.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    SuitCreated,
    LikeAdded,
    CommentAdded,
    RepostAdded,
    UserFollowed,
    UserUnfollowed,
    ProfileCreated,
    MentionAdded,
    CommunityCreated,
    CommunityPostCreated,
}

impl EventKind {
    pub fn name(self) -> &'static str {
        match self {
            EventKind::SuitCreated => "SuitCreated",
            EventKind::LikeAdded => "LikeAdded",
            EventKind::CommentAdded => "CommentAdded",
            EventKind::RepostAdded => "RepostAdded",
            EventKind::UserFollowed => "UserFollowed",
            EventKind::UserUnfollowed => "UserUnfollowed",
            EventKind::ProfileCreated => "ProfileCreated",
            EventKind::MentionAdded => "MentionAdded",
            EventKind::CommunityCreated => "CommunityCreated",
            EventKind::CommunityPostCreated => "CommunityPostCreated",
        }
    }
}

/// One append-only ledger event: declared type, transaction reference,
/// optional emission time and the loosely-typed payload.
#[derive(Debug, Clone)]
pub struct EventRecord {
    pub event_type: String,
    pub tx_digest: String,
    pub timestamp_ms: Option<u64>,
    pub payload: Value,
}

impl EventRecord {
    /// Client-side kind filter used after a module-scope query. The declared
    /// type carries the package address, so matching is by kind-name
    /// substring; kind names are pairwise non-overlapping.
    pub fn matches(&self, kind: EventKind) -> bool {
        self.event_type.contains(kind.name())
    }

    fn field(&self, key: &str) -> Option<&Value> {
        self.payload.get(key)
    }

    /// Entity id under any of the historical payload key spellings.
    pub fn id_field(&self, keys: &[&str]) -> Option<String> {
        keys.iter()
            .filter_map(|key| self.field(key))
            .find_map(decode::extract_id)
    }

    pub fn address_field(&self, key: &str) -> Option<String> {
        self.field(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    pub fn u64_field(&self, key: &str) -> Option<u64> {
        self.field(key).map(decode::extract_u64)
    }

    pub fn suit_id(&self) -> Option<String> {
        self.id_field(&["suit_id", "suitId", "id", "suit"])
    }

    pub fn comment_id(&self) -> Option<String> {
        self.id_field(&["comment_id", "commentId"])
    }

    pub fn community_id(&self) -> Option<String> {
        self.id_field(&["community_id", "communityId", "id"])
    }

    pub fn profile_owner(&self) -> Option<String> {
        self.address_field("owner")
            .or_else(|| self.address_field("profile_owner"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn record(event_type: &str, payload: Value) -> EventRecord {
        EventRecord {
            event_type: event_type.to_string(),
            tx_digest: "digest".to_string(),
            timestamp_ms: Some(1),
            payload,
        }
    }

    #[test]
    fn matches_by_kind_name_substring() {
        let event = record("0xc9b9::suitter::SuitCreated", json!({}));
        assert!(event.matches(EventKind::SuitCreated));
        assert!(!event.matches(EventKind::LikeAdded));
        assert!(!event.matches(EventKind::CommunityPostCreated));
    }

    #[test]
    fn suit_id_tolerates_key_spellings() {
        let snake = record("t", json!({"suit_id": "0x1"}));
        let camel = record("t", json!({"suitId": "0x2"}));
        let wrapped = record("t", json!({"suit_id": {"id": "0x3"}}));
        assert_eq!(snake.suit_id(), Some("0x1".to_string()));
        assert_eq!(camel.suit_id(), Some("0x2".to_string()));
        assert_eq!(wrapped.suit_id(), Some("0x3".to_string()));
    }

    #[test]
    fn profile_owner_falls_back_to_alternate_key() {
        let event = record("t", json!({"profile_owner": "0xabc"}));
        assert_eq!(event.profile_owner(), Some("0xabc".to_string()));
    }
}
