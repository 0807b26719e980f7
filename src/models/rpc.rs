use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::SuitterError;
use crate::models::client::{EventQuery, Ledger, ObjectSnapshot};
use crate::models::decode;
use crate::models::event::EventRecord;

const RPC_TIMEOUT: Duration = Duration::from_secs(30);

/// JSON-RPC 2.0 client for a ledger full node.
#[derive(Clone)]
pub struct SuiRpc {
    http: reqwest::Client,
    url: String,
}

impl SuiRpc {
    pub fn new(url: impl Into<String>) -> Result<Self, SuitterError> {
        let http = reqwest::Client::builder()
            .timeout(RPC_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }

    async fn call(&self, method: &str, params: Value) -> Result<Value, SuitterError> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let response = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let envelope: Value = response.json().await?;
        if let Some(error) = envelope.get("error") {
            return Err(SuitterError::Rpc(format!("{}: {}", method, error)));
        }
        envelope
            .get("result")
            .cloned()
            .ok_or_else(|| SuitterError::Rpc(format!("{}: response has no result", method)))
    }
}

fn event_from_value(value: &Value) -> Option<EventRecord> {
    let event_type = value.get("type")?.as_str()?.to_string();
    let tx_digest = value
        .get("id")
        .and_then(|id| id.get("txDigest"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let timestamp_ms = value
        .get("timestampMs")
        .map(decode::extract_u64)
        .filter(|ts| *ts > 0);
    let payload = value.get("parsedJson").cloned().unwrap_or(Value::Null);

    Some(EventRecord {
        event_type,
        tx_digest,
        timestamp_ms,
        payload,
    })
}

/// An object response resolves only when it carries move-object content with
/// fields; deleted or not-found entries come back as `None`.
fn snapshot_from_value(value: &Value) -> Option<ObjectSnapshot> {
    let data = value.get("data")?;
    let object_id = data.get("objectId")?.as_str()?.to_string();
    let content = data.get("content")?;
    let fields = content.get("fields")?.clone();
    let object_type = content
        .get("type")
        .and_then(Value::as_str)
        .map(str::to_string);

    Some(ObjectSnapshot {
        object_id,
        object_type,
        fields,
    })
}

fn object_options() -> Value {
    json!({"showContent": true, "showType": true})
}

impl EventQuery {
    fn to_rpc_filter(&self) -> Value {
        match self {
            EventQuery::ByType(event_type) => json!({"MoveEventType": event_type}),
            EventQuery::ByModule { package, module } => {
                json!({"MoveModule": {"package": package, "module": module}})
            }
        }
    }
}

#[async_trait]
impl Ledger for SuiRpc {
    async fn query_events(
        &self,
        query: EventQuery,
        limit: usize,
    ) -> Result<Vec<EventRecord>, SuitterError> {
        let result = self
            .call(
                "suix_queryEvents",
                json!([query.to_rpc_filter(), null, limit, true]),
            )
            .await?;

        let events = result
            .get("data")
            .and_then(Value::as_array)
            .map(|data| data.iter().filter_map(event_from_value).collect())
            .unwrap_or_default();
        Ok(events)
    }

    async fn get_object(&self, id: &str) -> Result<Option<ObjectSnapshot>, SuitterError> {
        let result = self
            .call("sui_getObject", json!([id, object_options()]))
            .await?;
        Ok(snapshot_from_value(&result))
    }

    async fn multi_get_objects(
        &self,
        ids: &[String],
    ) -> Result<Vec<Option<ObjectSnapshot>>, SuitterError> {
        let result = self
            .call("sui_multiGetObjects", json!([ids, object_options()]))
            .await?;

        let entries = result
            .as_array()
            .ok_or_else(|| SuitterError::Rpc("multiGetObjects: expected an array".to_string()))?;
        if entries.len() != ids.len() {
            return Err(SuitterError::Rpc(format!(
                "multiGetObjects: asked for {} objects, got {}",
                ids.len(),
                entries.len()
            )));
        }
        Ok(entries.iter().map(snapshot_from_value).collect())
    }

    async fn get_owned_objects(
        &self,
        owner: &str,
        struct_type: &str,
    ) -> Result<Vec<ObjectSnapshot>, SuitterError> {
        let query = json!({
            "filter": {"StructType": struct_type},
            "options": object_options(),
        });
        let result = self
            .call("suix_getOwnedObjects", json!([owner, query, null, null]))
            .await?;

        let objects = result
            .get("data")
            .and_then(Value::as_array)
            .map(|data| data.iter().filter_map(snapshot_from_value).collect())
            .unwrap_or_default();
        Ok(objects)
    }

    async fn transaction_timestamp(&self, digest: &str) -> Result<Option<u64>, SuitterError> {
        let result = self
            .call(
                "sui_getTransactionBlock",
                json!([digest, {"showEffects": false}]),
            )
            .await?;
        Ok(result
            .get("timestampMs")
            .map(decode::extract_u64)
            .filter(|ts| *ts > 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn event_parses_type_digest_and_timestamp() {
        let raw = json!({
            "id": {"txDigest": "Abc123", "eventSeq": "0"},
            "type": "0x1::suitter::SuitCreated",
            "parsedJson": {"suit_id": "0x9"},
            "timestampMs": "1700000000000",
        });
        let event = event_from_value(&raw).unwrap();
        assert_eq!(event.event_type, "0x1::suitter::SuitCreated");
        assert_eq!(event.tx_digest, "Abc123");
        assert_eq!(event.timestamp_ms, Some(1_700_000_000_000));
        assert_eq!(event.suit_id(), Some("0x9".to_string()));
    }

    #[test]
    fn snapshot_requires_content_fields() {
        let resolved = json!({
            "data": {
                "objectId": "0x9",
                "content": {"dataType": "moveObject", "type": "0x1::suit::Suit", "fields": {"content": "hi"}},
            }
        });
        let missing = json!({"error": {"code": "notExists"}});
        let no_fields = json!({"data": {"objectId": "0x9"}});

        assert_eq!(snapshot_from_value(&resolved).unwrap().object_id, "0x9");
        assert!(snapshot_from_value(&missing).is_none());
        assert!(snapshot_from_value(&no_fields).is_none());
    }

    #[test]
    fn query_filters_take_the_rpc_shape() {
        let typed = EventQuery::ByType("0x1::suitter::LikeAdded".to_string()).to_rpc_filter();
        assert_eq!(typed, json!({"MoveEventType": "0x1::suitter::LikeAdded"}));

        let scoped = EventQuery::ByModule {
            package: "0x1".to_string(),
            module: "suitter".to_string(),
        }
        .to_rpc_filter();
        assert_eq!(scoped, json!({"MoveModule": {"package": "0x1", "module": "suitter"}}));
    }
}
