use std::cmp::Reverse;

use serde::Serialize;

use crate::models::client::{Ledger, SuitterClient};
use crate::models::event::{EventKind, EventRecord};
use crate::models::suit::Suit;
use crate::views::feed;

#[derive(Serialize, Copy, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Like,
    Comment,
    Repost,
    Follow,
    Mention,
}

/// Synthetic record derived from interaction events; it has no identity
/// beyond (kind, actor, target, timestamp) and is rebuilt on every refresh.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub actor: String,
    pub action: String,
    pub timestamp_ms: u64,
    pub time_label: String,
    pub suit_id: Option<String>,
    pub comment_id: Option<String>,
    pub content: String,
}

/// Interaction timeline for one address: likes/comments/reposts on the
/// address's suits (self-actions excluded), follows where the address is the
/// followee, and on-chain mentions naming it. Merged newest-first.
pub async fn notifications<L: Ledger>(
    client: &SuitterClient<L>,
    address: &str,
    now_ms: u64,
) -> Vec<Notification> {
    let suits = feed::feed(client).await;
    let user_suits: Vec<&Suit> = suits
        .iter()
        .filter(|suit| suit.author.eq_ignore_ascii_case(address))
        .collect();

    let (like_events, comment_events, repost_events, follow_events, mention_events) = tokio::join!(
        client.fetch_events(EventKind::LikeAdded),
        client.fetch_events(EventKind::CommentAdded),
        client.fetch_events(EventKind::RepostAdded),
        client.fetch_events(EventKind::UserFollowed),
        client.fetch_events(EventKind::MentionAdded),
    );

    let mut notifications = Vec::new();

    for event in &like_events {
        if let Some(n) = interaction(event, "liker", address, &user_suits, now_ms) {
            notifications.push(Notification {
                kind: NotificationKind::Like,
                action: "liked your Suit".to_string(),
                ..n
            });
        }
    }

    for event in &comment_events {
        if let Some(n) = interaction(event, "author", address, &user_suits, now_ms) {
            notifications.push(Notification {
                kind: NotificationKind::Comment,
                action: "commented on your Suit".to_string(),
                comment_id: event.comment_id(),
                ..n
            });
        }
    }

    for event in &repost_events {
        let original_author = event.address_field("original_author");
        let reposter = event.address_field("reposter");
        let (Some(original_author), Some(reposter)) = (original_author, reposter) else {
            continue;
        };
        if !original_author.eq_ignore_ascii_case(address)
            || reposter.eq_ignore_ascii_case(address)
        {
            continue;
        }
        let suit = event
            .suit_id()
            .and_then(|id| find_suit(&user_suits, &id).cloned());
        let timestamp_ms = event
            .timestamp_ms
            .or(suit.as_ref().map(|s| s.timestamp_ms))
            .unwrap_or(now_ms);
        notifications.push(Notification {
            kind: NotificationKind::Repost,
            actor: reposter,
            action: "reposted your Suit".to_string(),
            timestamp_ms,
            time_label: relative_time_label(now_ms, timestamp_ms),
            suit_id: event.suit_id(),
            comment_id: None,
            content: suit.map(|s| s.content).unwrap_or_default(),
        });
    }

    for event in &follow_events {
        let followee = event.address_field("followee");
        if !followee.is_some_and(|f| f.eq_ignore_ascii_case(address)) {
            continue;
        }
        let Some(follower) = event.address_field("follower") else {
            continue;
        };
        // Follow events often lack an inline timestamp; fall back to the
        // emitting transaction's execution time.
        let timestamp_ms = match event.timestamp_ms {
            Some(ts) => ts,
            None => client
                .transaction_timestamp(&event.tx_digest)
                .await
                .unwrap_or(now_ms),
        };
        notifications.push(Notification {
            kind: NotificationKind::Follow,
            actor: follower,
            action: "started following you".to_string(),
            timestamp_ms,
            time_label: relative_time_label(now_ms, timestamp_ms),
            suit_id: None,
            comment_id: None,
            content: String::new(),
        });
    }

    for event in &mention_events {
        let mentioned = event.address_field("mentioned_user");
        if !mentioned.is_some_and(|m| m.eq_ignore_ascii_case(address)) {
            continue;
        }
        let mentioner = event.address_field("mentioner").unwrap_or_default();
        let content_id = event.id_field(&["content_id", "contentId"]);
        let in_suit = event.u64_field("content_type").unwrap_or(0) == 0;
        let timestamp_ms = event.timestamp_ms.unwrap_or(now_ms);

        let content = if in_suit {
            content_id
                .as_deref()
                .and_then(|id| {
                    suits
                        .iter()
                        .find(|suit| suit.id.eq_ignore_ascii_case(id))
                        .map(|suit| suit.content.clone())
                })
                .unwrap_or_default()
        } else {
            String::new()
        };

        notifications.push(Notification {
            kind: NotificationKind::Mention,
            actor: mentioner,
            action: if in_suit {
                "mentioned you in a Suit".to_string()
            } else {
                "mentioned you in a comment".to_string()
            },
            timestamp_ms,
            time_label: relative_time_label(now_ms, timestamp_ms),
            suit_id: if in_suit { content_id.clone() } else { None },
            comment_id: if in_suit { None } else { content_id },
            content,
        });
    }

    notifications.sort_by_key(|n| Reverse(n.timestamp_ms));
    notifications
}

/// Like/comment shape: an actor interacting with one of the user's suits.
/// Returns a template with kind/action left for the caller to fill.
fn interaction(
    event: &EventRecord,
    actor_key: &str,
    address: &str,
    user_suits: &[&Suit],
    now_ms: u64,
) -> Option<Notification> {
    let suit_id = event.suit_id()?;
    let suit = find_suit(user_suits, &suit_id)?;
    let actor = event.address_field(actor_key)?;
    if actor.eq_ignore_ascii_case(address) {
        return None;
    }
    let timestamp_ms = event.timestamp_ms.unwrap_or(suit.timestamp_ms);
    Some(Notification {
        kind: NotificationKind::Like,
        actor,
        action: String::new(),
        timestamp_ms,
        time_label: relative_time_label(now_ms, timestamp_ms),
        suit_id: Some(suit_id),
        comment_id: None,
        content: suit.content.clone(),
    })
}

fn find_suit<'a>(suits: &'a [&Suit], id: &str) -> Option<&'a Suit> {
    suits
        .iter()
        .find(|suit| suit.id.eq_ignore_ascii_case(id))
        .copied()
}

/// Human-relative age: <1 min "Just now", <60 min "{n}m", <24 h "{n}h",
/// otherwise "{n}d".
pub fn relative_time_label(now_ms: u64, timestamp_ms: u64) -> String {
    let diff = now_ms.saturating_sub(timestamp_ms);
    let minutes = diff / 60_000;
    let hours = diff / 3_600_000;
    let days = diff / 86_400_000;

    if minutes < 1 {
        "Just now".to_string()
    } else if minutes < 60 {
        format!("{minutes}m")
    } else if hours < 24 {
        format!("{hours}h")
    } else {
        format!("{days}d")
    }
}
