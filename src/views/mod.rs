pub mod feed;
pub mod follow;
pub mod notifications;
pub mod profile;
pub mod thread;
pub mod topics;

use std::time::Duration;

use crate::models::Config;

pub use feed::RepostedSuit;
pub use follow::FollowStatus;
pub use notifications::{Notification, NotificationKind};
pub use profile::ProfileView;
pub use topics::TopicStat;

/// Identity of one read view: the view type plus its scoping parameters.
/// Each unique key refreshes on its own timer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ViewKey {
    Feed,
    Thread { suit_id: String },
    FollowStatus { follower: String, followee: String },
    Notifications { address: String },
    Profiles,
    Communities,
    CommunityPosts { community_id: String },
}

impl ViewKey {
    /// Feed-shaped views refresh fast; aggregates are cheaper to serve
    /// slightly stale.
    pub fn interval(&self, config: &Config) -> Duration {
        match self {
            ViewKey::Feed
            | ViewKey::Thread { .. }
            | ViewKey::FollowStatus { .. }
            | ViewKey::Communities
            | ViewKey::CommunityPosts { .. } => config.feed_interval(),
            ViewKey::Notifications { .. } | ViewKey::Profiles => config.aggregate_interval(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregates_refresh_slower_than_feeds() {
        let config = Config::default();
        assert_eq!(ViewKey::Feed.interval(&config), Duration::from_secs(10));
        assert_eq!(
            ViewKey::Notifications {
                address: "0xa".to_string()
            }
            .interval(&config),
            Duration::from_secs(30)
        );
    }
}
