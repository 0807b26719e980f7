use crate::models::client::{Ledger, SuitterClient};
use crate::models::event::EventKind;
use crate::models::suit::Comment;

/// Comment thread under one suit, oldest-first.
pub async fn thread<L: Ledger>(client: &SuitterClient<L>, suit_id: &str) -> Vec<Comment> {
    let mut events = client.fetch_events(EventKind::CommentAdded).await;
    events.retain(|event| event.suit_id().as_deref() == Some(suit_id));

    let ids: Vec<String> = events.iter().filter_map(|e| e.comment_id()).collect();
    let mut comments: Vec<Comment> = client
        .resolve_objects(&ids)
        .await
        .iter()
        .flatten()
        .map(|snapshot| Comment::from_snapshot(snapshot, suit_id))
        .collect();
    comments.sort_by_key(|comment| comment.timestamp_ms);
    comments
}
