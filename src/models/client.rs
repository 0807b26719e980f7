use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::SuitterError;
use crate::models::config::Config;
use crate::models::event::{EventKind, EventRecord};

/// Scope of one event-index query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventQuery {
    /// Fully-qualified `package::module::Kind` event type (most selective).
    ByType(String),
    /// Every event emitted by one module of one package.
    ByModule { package: String, module: String },
}

/// Current state of one on-chain entity, as returned by an object lookup.
#[derive(Debug, Clone)]
pub struct ObjectSnapshot {
    pub object_id: String,
    pub object_type: Option<String>,
    pub fields: Value,
}

/// The external ledger's query surface. Implemented over JSON-RPC in
/// production and by an in-memory fake in tests.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Matching events, time-descending, at most `limit` of them.
    async fn query_events(
        &self,
        query: EventQuery,
        limit: usize,
    ) -> Result<Vec<EventRecord>, SuitterError>;

    async fn get_object(&self, id: &str) -> Result<Option<ObjectSnapshot>, SuitterError>;

    /// One batched lookup; the output is positionally aligned with `ids`,
    /// with `None` for anything that does not resolve.
    async fn multi_get_objects(
        &self,
        ids: &[String],
    ) -> Result<Vec<Option<ObjectSnapshot>>, SuitterError>;

    async fn get_owned_objects(
        &self,
        owner: &str,
        struct_type: &str,
    ) -> Result<Vec<ObjectSnapshot>, SuitterError>;

    /// Execution time of the transaction that emitted an event, when the
    /// event record itself carries no timestamp.
    async fn transaction_timestamp(&self, digest: &str) -> Result<Option<u64>, SuitterError>;
}

/// Event-source adapter and object resolver over a [`Ledger`].
///
/// Read-path failures degrade to empty results and a warning; views built on
/// top render "no data" rather than an error.
pub struct SuitterClient<L> {
    ledger: Arc<L>,
    config: Config,
}

impl<L> Clone for SuitterClient<L> {
    fn clone(&self) -> Self {
        SuitterClient {
            ledger: Arc::clone(&self.ledger),
            config: self.config.clone(),
        }
    }
}

impl<L: Ledger> SuitterClient<L> {
    pub fn new(ledger: Arc<L>, config: Config) -> Self {
        Self { ledger, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Ordered query plans for one event kind: the typed query first, then
    /// the module-scope query with a client-side kind filter. The event
    /// taxonomy is versioned inconsistently across deployments, so the
    /// broader plan stays as a compatibility shim.
    fn query_plans(&self, kind: EventKind) -> Vec<(EventQuery, Option<EventKind>)> {
        vec![
            (EventQuery::ByType(self.config.event_type(kind.name())), None),
            (
                EventQuery::ByModule {
                    package: self.config.package_id.clone(),
                    module: self.config.contract_module.clone(),
                },
                Some(kind),
            ),
        ]
    }

    /// Time-descending events of one kind. Plans run in order and the first
    /// successful one wins; an exhausted chain degrades to an empty result.
    pub async fn fetch_events(&self, kind: EventKind) -> Vec<EventRecord> {
        for (query, post_filter) in self.query_plans(kind) {
            match self.ledger.query_events(query.clone(), self.config.event_limit).await {
                Ok(mut events) => {
                    if let Some(kind) = post_filter {
                        events.retain(|event| event.matches(kind));
                    }
                    return events;
                }
                Err(e) => {
                    log::warn!("event query {:?} failed, trying next plan: {}", query, e);
                }
            }
        }
        log::warn!("all event query plans failed for {}", kind.name());
        Vec::new()
    }

    /// Order-preserving batch resolve. Unresolvable ids come back as `None`
    /// so callers can zip against the event list positionally; a failed
    /// batch degrades every entry to `None`.
    pub async fn resolve_objects(&self, ids: &[String]) -> Vec<Option<ObjectSnapshot>> {
        if ids.is_empty() {
            return Vec::new();
        }
        match self.ledger.multi_get_objects(ids).await {
            Ok(snapshots) => snapshots,
            Err(e) => {
                log::warn!("batch object lookup failed for {} ids: {}", ids.len(), e);
                vec![None; ids.len()]
            }
        }
    }

    pub async fn resolve_object(&self, id: &str) -> Option<ObjectSnapshot> {
        match self.ledger.get_object(id).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                log::warn!("object lookup failed for {}: {}", id, e);
                None
            }
        }
    }

    pub async fn owned_objects(&self, owner: &str, struct_type: &str) -> Vec<ObjectSnapshot> {
        match self.ledger.get_owned_objects(owner, struct_type).await {
            Ok(objects) => objects,
            Err(e) => {
                log::warn!("owned-object lookup failed for {}: {}", owner, e);
                Vec::new()
            }
        }
    }

    pub async fn transaction_timestamp(&self, digest: &str) -> Option<u64> {
        match self.ledger.transaction_timestamp(digest).await {
            Ok(timestamp) => timestamp,
            Err(e) => {
                log::warn!("transaction lookup failed for {}: {}", digest, e);
                None
            }
        }
    }
}
