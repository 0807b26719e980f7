use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::models::client::{Ledger, SuitterClient};
use crate::models::community::Community;
use crate::models::profile::Profile;
use crate::models::suit::{Comment, Suit};
use crate::views::{self, FollowStatus, Notification, ViewKey};

/// Handle to one view's refresh loop. Holds the latest published result;
/// dropping the handle stops the loop.
pub struct ViewHandle<T> {
    rx: watch::Receiver<Option<T>>,
    refresh_tx: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

impl<T: Clone> ViewHandle<T> {
    /// Latest complete result, if any refresh has finished yet.
    pub fn current(&self) -> Option<T> {
        self.rx.borrow().clone()
    }

    /// Waits until the next refresh publishes.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<T>> {
        self.rx.clone()
    }

    /// Forces an out-of-schedule refresh, e.g. right after the user submits
    /// a post. A nudge while one is already queued is a no-op.
    pub fn refresh_now(&self) {
        let _ = self.refresh_tx.try_send(());
    }
}

impl<T> Drop for ViewHandle<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Runs `fetch` immediately and then on every tick or manual nudge,
/// replacing the published value wholesale. Refreshes for one handle run
/// sequentially on its task, so readers never observe a partial view and
/// two cycles for the same key cannot interleave.
pub fn spawn_view<T, F, Fut>(interval: Duration, fetch: F) -> ViewHandle<T>
where
    T: Clone + Send + Sync + 'static,
    F: Fn() -> Fut + Send + 'static,
    Fut: Future<Output = T> + Send + 'static,
{
    let (tx, rx) = watch::channel(None);
    let (refresh_tx, mut refresh_rx) = mpsc::channel(1);

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                nudge = refresh_rx.recv() => {
                    if nudge.is_none() {
                        break;
                    }
                    // Count the next scheduled tick from the manual refresh.
                    ticker.reset();
                }
            }
            let view = fetch().await;
            if tx.send(Some(view)).is_err() {
                break;
            }
        }
    });

    ViewHandle {
        rx,
        refresh_tx,
        task,
    }
}

/// Spawns refresh loops for the application's read views, each keyed and
/// timed independently.
pub struct Scheduler<L> {
    client: SuitterClient<L>,
}

impl<L: Ledger + 'static> Scheduler<L> {
    pub fn new(client: SuitterClient<L>) -> Self {
        Self { client }
    }

    fn interval(&self, key: &ViewKey) -> Duration {
        key.interval(self.client.config())
    }

    pub fn feed(&self) -> ViewHandle<Vec<Suit>> {
        let client = self.client.clone();
        spawn_view(self.interval(&ViewKey::Feed), move || {
            let client = client.clone();
            async move { views::feed::feed(&client).await }
        })
    }

    pub fn thread(&self, suit_id: &str) -> ViewHandle<Vec<Comment>> {
        let key = ViewKey::Thread {
            suit_id: suit_id.to_string(),
        };
        let client = self.client.clone();
        let suit_id = suit_id.to_string();
        spawn_view(self.interval(&key), move || {
            let client = client.clone();
            let suit_id = suit_id.clone();
            async move { views::thread::thread(&client, &suit_id).await }
        })
    }

    pub fn follow_status(&self, follower: &str, followee: &str) -> ViewHandle<FollowStatus> {
        let key = ViewKey::FollowStatus {
            follower: follower.to_string(),
            followee: followee.to_string(),
        };
        let client = self.client.clone();
        let follower = follower.to_string();
        let followee = followee.to_string();
        spawn_view(self.interval(&key), move || {
            let client = client.clone();
            let follower = follower.clone();
            let followee = followee.clone();
            async move { views::follow::follow_status(&client, &follower, &followee).await }
        })
    }

    pub fn notifications(&self, address: &str) -> ViewHandle<Vec<Notification>> {
        let key = ViewKey::Notifications {
            address: address.to_string(),
        };
        let client = self.client.clone();
        let address = address.to_string();
        spawn_view(self.interval(&key), move || {
            let client = client.clone();
            let address = address.clone();
            async move {
                let now_ms = Utc::now().timestamp_millis() as u64;
                views::notifications::notifications(&client, &address, now_ms).await
            }
        })
    }

    pub fn profiles(&self) -> ViewHandle<Vec<Profile>> {
        let client = self.client.clone();
        spawn_view(self.interval(&ViewKey::Profiles), move || {
            let client = client.clone();
            async move { views::profile::all_profiles(&client).await }
        })
    }

    pub fn communities(&self) -> ViewHandle<Vec<Community>> {
        let client = self.client.clone();
        spawn_view(self.interval(&ViewKey::Communities), move || {
            let client = client.clone();
            async move { views::feed::communities(&client).await }
        })
    }

    pub fn community_posts(&self, community_id: &str) -> ViewHandle<Vec<Suit>> {
        let key = ViewKey::CommunityPosts {
            community_id: community_id.to_string(),
        };
        let client = self.client.clone();
        let community_id = community_id.to_string();
        spawn_view(self.interval(&key), move || {
            let client = client.clone();
            let community_id = community_id.clone();
            async move { views::feed::community_posts(&client, &community_id).await }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    fn counting_view(interval: Duration) -> (ViewHandle<u64>, Arc<AtomicU64>) {
        let counter = Arc::new(AtomicU64::new(0));
        let fetch_counter = Arc::clone(&counter);
        let handle = spawn_view(interval, move || {
            let fetch_counter = Arc::clone(&fetch_counter);
            async move { fetch_counter.fetch_add(1, Ordering::SeqCst) + 1 }
        });
        (handle, counter)
    }

    #[tokio::test(start_paused = true)]
    async fn first_refresh_runs_immediately_then_on_interval() {
        let (mut handle, _) = counting_view(Duration::from_secs(10));

        assert!(handle.changed().await);
        assert_eq!(handle.current(), Some(1));

        tokio::time::advance(Duration::from_secs(10)).await;
        assert!(handle.changed().await);
        assert_eq!(handle.current(), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn manual_refresh_does_not_wait_for_the_timer() {
        let (mut handle, counter) = counting_view(Duration::from_secs(600));

        assert!(handle.changed().await);
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        handle.refresh_now();
        assert!(handle.changed().await);
        assert_eq!(handle.current(), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn readers_only_see_complete_results() {
        let (mut handle, _) = counting_view(Duration::from_secs(10));
        // Nothing published until the first refresh completes.
        assert_eq!(handle.current(), None);
        assert!(handle.changed().await);
        assert!(handle.current().is_some());
    }
}
