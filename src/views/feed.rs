use std::cmp::Reverse;

use serde::Serialize;

use crate::models::client::{Ledger, SuitterClient};
use crate::models::community::Community;
use crate::models::event::{EventKind, EventRecord};
use crate::models::suit::{Repost, Suit};

/// Global feed: every suit-creation event, resolved to current state and
/// ordered newest-first.
pub async fn feed<L: Ledger>(client: &SuitterClient<L>) -> Vec<Suit> {
    let events = client.fetch_events(EventKind::SuitCreated).await;
    suits_from_events(client, &events).await
}

/// Posts published into one community, newest-first.
pub async fn community_posts<L: Ledger>(
    client: &SuitterClient<L>,
    community_id: &str,
) -> Vec<Suit> {
    let mut events = client.fetch_events(EventKind::CommunityPostCreated).await;
    events.retain(|event| event.community_id().as_deref() == Some(community_id));
    suits_from_events(client, &events).await
}

/// Every community, newest-first by creation time.
pub async fn communities<L: Ledger>(client: &SuitterClient<L>) -> Vec<Community> {
    let events = client.fetch_events(EventKind::CommunityCreated).await;
    let ids: Vec<String> = events
        .iter()
        .filter_map(EventRecord::community_id)
        .collect();

    let mut communities: Vec<Community> = client
        .resolve_objects(&ids)
        .await
        .iter()
        .flatten()
        .map(Community::from_snapshot)
        .collect();
    communities.sort_by_key(|community| Reverse(community.created_at_ms));
    communities
}

/// Whether `address` holds a membership object for the community.
pub async fn is_community_member<L: Ledger>(
    client: &SuitterClient<L>,
    community_id: &str,
    address: &str,
) -> bool {
    let struct_type = client
        .config()
        .struct_type("community", "CommunityMembership");
    client
        .owned_objects(address, &struct_type)
        .await
        .iter()
        .any(|snapshot| {
            snapshot
                .fields
                .get("community_id")
                .and_then(|v| v.as_str())
                == Some(community_id)
        })
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct RepostedSuit {
    pub repost: Repost,
    pub suit: Suit,
}

/// Suits one address reposted, in repost order (newest repost first). The
/// event stream is already time-descending, so no re-sort happens here.
pub async fn reposts_by_user<L: Ledger>(
    client: &SuitterClient<L>,
    address: &str,
) -> Vec<RepostedSuit> {
    let events = client.fetch_events(EventKind::RepostAdded).await;
    let reposts: Vec<Repost> = events
        .iter()
        .filter(|event| {
            event
                .address_field("reposter")
                .is_some_and(|reposter| reposter.eq_ignore_ascii_case(address))
        })
        .filter_map(Repost::from_event)
        .collect();

    let ids: Vec<String> = reposts.iter().map(|r| r.suit_id.clone()).collect();
    let snapshots = client.resolve_objects(&ids).await;

    reposts
        .into_iter()
        .zip(snapshots)
        .filter_map(|(repost, snapshot)| {
            snapshot.map(|snapshot| RepostedSuit {
                suit: Suit::from_snapshot(&snapshot),
                repost,
            })
        })
        .collect()
}

/// Events → ids → positional resolve → decode → stable newest-first sort.
/// Unresolvable ids drop out; timestamp ties keep event order.
async fn suits_from_events<L: Ledger>(
    client: &SuitterClient<L>,
    events: &[EventRecord],
) -> Vec<Suit> {
    let ids: Vec<String> = events.iter().filter_map(EventRecord::suit_id).collect();
    let mut suits: Vec<Suit> = client
        .resolve_objects(&ids)
        .await
        .iter()
        .flatten()
        .map(Suit::from_snapshot)
        .collect();
    suits.sort_by_key(|suit| Reverse(suit.timestamp_ms));
    suits
}
