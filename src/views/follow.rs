use serde::Serialize;

use crate::models::client::{Ledger, SuitterClient};
use crate::models::event::{EventKind, EventRecord};

#[derive(Serialize, Copy, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FollowStatus {
    Following,
    NotFollowing,
}

impl FollowStatus {
    pub fn is_following(self) -> bool {
        self == FollowStatus::Following
    }
}

/// Current follow state for the ordered (follower, followee) pair: the most
/// recent of the pair's follow and unfollow events wins. No follow event at
/// all means not following; a follow with no unfollow means following. Equal
/// timestamps resolve in favor of the follow, matching the descending event
/// order the ledger serves.
pub async fn follow_status<L: Ledger>(
    client: &SuitterClient<L>,
    follower: &str,
    followee: &str,
) -> FollowStatus {
    if follower.eq_ignore_ascii_case(followee) {
        return FollowStatus::NotFollowing;
    }

    let (follow_events, unfollow_events) = tokio::join!(
        client.fetch_events(EventKind::UserFollowed),
        client.fetch_events(EventKind::UserUnfollowed),
    );

    let latest_follow = latest_for_pair(&follow_events, "follower", "followee", follower, followee);
    let latest_unfollow = latest_for_pair(
        &unfollow_events,
        "unfollower",
        "unfollowee",
        follower,
        followee,
    );

    match (latest_follow, latest_unfollow) {
        (None, _) => FollowStatus::NotFollowing,
        (Some(_), None) => FollowStatus::Following,
        (Some(follow), Some(unfollow)) => {
            if unfollow > follow {
                FollowStatus::NotFollowing
            } else {
                FollowStatus::Following
            }
        }
    }
}

/// Events arrive time-descending, so the first pair match is the latest.
fn latest_for_pair(
    events: &[EventRecord],
    from_key: &str,
    to_key: &str,
    follower: &str,
    followee: &str,
) -> Option<u64> {
    events
        .iter()
        .find(|event| {
            event
                .address_field(from_key)
                .is_some_and(|from| from.eq_ignore_ascii_case(follower))
                && event
                    .address_field(to_key)
                    .is_some_and(|to| to.eq_ignore_ascii_case(followee))
        })
        .map(|event| event.timestamp_ms.unwrap_or(0))
}
