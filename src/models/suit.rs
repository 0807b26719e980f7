use chrono::{DateTime, Local, LocalResult, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::client::ObjectSnapshot;
use crate::models::decode;
use crate::models::event::EventRecord;

/// A short post, decoded from its current on-chain snapshot. Counters are
/// maintained by the contract and only displayed here.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Suit {
    pub id: String,
    pub author: String,
    pub content: String,
    pub timestamp_ms: u64,
    pub datetime: String,
    pub likes_count: u64,
    pub comments_count: u64,
    pub reposts_count: u64,
    pub walrus_blob_id: Option<String>,
}

impl Suit {
    pub fn from_snapshot(snapshot: &ObjectSnapshot) -> Self {
        let fields = &snapshot.fields;
        let timestamp_ms = field_u64(fields, "timestamp_ms");
        Suit {
            id: snapshot.object_id.clone(),
            author: decode::extract_string(field(fields, "author")),
            content: decode::extract_string(field(fields, "content")),
            timestamp_ms,
            datetime: local_datetime(timestamp_ms),
            likes_count: field_u64(fields, "likes_count"),
            comments_count: field_u64(fields, "comments_count"),
            reposts_count: field_u64(fields, "reposts_count"),
            walrus_blob_id: decode::extract_option_string(field(fields, "walrus_blob_id")),
        }
    }
}

/// A reply to one suit, ordered oldest-first within its thread.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Comment {
    pub id: String,
    pub suit_id: String,
    pub author: String,
    pub content: String,
    pub timestamp_ms: u64,
    pub walrus_blob_id: Option<String>,
}

impl Comment {
    pub fn from_snapshot(snapshot: &ObjectSnapshot, parent_suit_id: &str) -> Self {
        let fields = &snapshot.fields;
        let suit_id = decode::extract_string(field(fields, "suit_id"));
        Comment {
            id: snapshot.object_id.clone(),
            suit_id: if suit_id.is_empty() {
                parent_suit_id.to_string()
            } else {
                suit_id
            },
            author: decode::extract_string(field(fields, "author")),
            content: decode::extract_string(field(fields, "content")),
            timestamp_ms: field_u64(fields, "timestamp_ms"),
            walrus_blob_id: decode::extract_option_string(field(fields, "walrus_blob_id")),
        }
    }
}

/// Repost provenance, carried entirely by the RepostAdded event.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Repost {
    pub repost_id: String,
    pub suit_id: String,
    pub reposter: String,
    pub original_author: String,
    pub tx_digest: String,
    pub timestamp_ms: Option<u64>,
}

impl Repost {
    pub fn from_event(event: &EventRecord) -> Option<Self> {
        Some(Repost {
            repost_id: event.id_field(&["repost_id", "repostId"])?,
            suit_id: event.suit_id()?,
            reposter: event.address_field("reposter").unwrap_or_default(),
            original_author: event.address_field("original_author").unwrap_or_default(),
            tx_digest: event.tx_digest.clone(),
            timestamp_ms: event.timestamp_ms,
        })
    }
}

fn field<'a>(fields: &'a Value, key: &str) -> &'a Value {
    fields.get(key).unwrap_or(&Value::Null)
}

fn field_u64(fields: &Value, key: &str) -> u64 {
    decode::extract_u64(field(fields, key))
}

fn local_datetime(timestamp_ms: u64) -> String {
    let secs = (timestamp_ms / 1000) as i64;
    match Utc.timestamp_opt(secs, 0) {
        LocalResult::Single(utc) => {
            let local: DateTime<Local> = DateTime::from(utc);
            local.format("%H:%M %h-%d-%Y").to_string()
        }
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn suit_decodes_counters_and_optional_media() {
        let snapshot = ObjectSnapshot {
            object_id: "0x9".to_string(),
            object_type: Some("0x1::suit::Suit".to_string()),
            fields: json!({
                "author": "0xa",
                "content": "gm",
                "timestamp_ms": "1700000000000",
                "likes_count": 3,
                "comments_count": "1",
                "reposts_count": 0,
                "walrus_blob_id": {"fields": {"vec": ["blob-1"]}},
            }),
        };
        let suit = Suit::from_snapshot(&snapshot);
        assert_eq!(suit.id, "0x9");
        assert_eq!(suit.timestamp_ms, 1_700_000_000_000);
        assert_eq!(suit.likes_count, 3);
        assert_eq!(suit.comments_count, 1);
        assert_eq!(suit.walrus_blob_id, Some("blob-1".to_string()));
    }

    #[test]
    fn comment_falls_back_to_the_queried_parent() {
        let snapshot = ObjectSnapshot {
            object_id: "0xc".to_string(),
            object_type: None,
            fields: json!({"author": "0xa", "content": "nice", "timestamp_ms": 5}),
        };
        let comment = Comment::from_snapshot(&snapshot, "0x9");
        assert_eq!(comment.suit_id, "0x9");
        assert_eq!(comment.walrus_blob_id, None);
    }

    #[test]
    fn repost_requires_both_ids() {
        let event = EventRecord {
            event_type: "0x1::suitter::RepostAdded".to_string(),
            tx_digest: "d1".to_string(),
            timestamp_ms: Some(7),
            payload: json!({"repost_id": "0xr", "suit_id": "0x9", "reposter": "0xb", "original_author": "0xa"}),
        };
        let repost = Repost::from_event(&event).unwrap();
        assert_eq!(repost.repost_id, "0xr");
        assert_eq!(repost.original_author, "0xa");

        let missing = EventRecord {
            payload: json!({"reposter": "0xb"}),
            ..event
        };
        assert!(Repost::from_event(&missing).is_none());
    }
}
