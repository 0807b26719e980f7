use std::sync::Arc;

use serde_json::json;

use suitter::cli::{Command, Flags};
use suitter::controllers::Scheduler;
use suitter::error::SuitterError;
use suitter::models::{Config, MetadataPatch, PreferenceStore, SuiRpc, SuitterClient, WalrusClient};
use suitter::views;

#[tokio::main]
async fn main() -> Result<(), SuitterError> {
    env_logger::init();

    let flags = Flags::from_args();
    let config = Config::load()?;
    let rpc = SuiRpc::new(config.rpc_url.clone())?;
    let client = SuitterClient::new(Arc::new(rpc), config);

    match flags.command {
        Command::Init => {
            client.config().save()?;
            print_json(client.config())?
        }
        Command::Feed => print_json(&views::feed::feed(&client).await)?,
        Command::Thread { suit_id } => {
            print_json(&views::thread::thread(&client, &suit_id).await)?
        }
        Command::Notifications { address } => {
            let now_ms = chrono::Utc::now().timestamp_millis() as u64;
            print_json(&views::notifications::notifications(&client, &address, now_ms).await)?
        }
        Command::FollowStatus { follower, followee } => {
            print_json(&views::follow::follow_status(&client, &follower, &followee).await)?
        }
        Command::Profile { address } => {
            let store = PreferenceStore::open_default()?;
            print_json(&views::profile::profile_with_overlay(&client, &store, &address).await)?
        }
        Command::Profiles => print_json(&views::profile::all_profiles(&client).await)?,
        Command::Communities => print_json(&views::feed::communities(&client).await)?,
        Command::CommunityPosts { community_id } => {
            print_json(&views::feed::community_posts(&client, &community_id).await)?
        }
        Command::Reposts { address } => {
            print_json(&views::feed::reposts_by_user(&client, &address).await)?
        }
        Command::Topics => {
            let now_ms = chrono::Utc::now().timestamp_millis() as u64;
            let suits = views::feed::feed(&client).await;
            print_json(&views::topics::topic_stats(&suits, now_ms))?
        }
        Command::Watch { address } => watch(client, address).await?,
        Command::SetMeta {
            address,
            display_name,
            website,
            location,
        } => {
            let store = PreferenceStore::open_default()?;
            let merged = store.merge(
                &address,
                MetadataPatch {
                    display_name,
                    website,
                    location,
                },
            )?;
            print_json(&merged)?
        }
        Command::ClearMeta { address } => {
            let store = PreferenceStore::open_default()?;
            store.clear(&address)?;
        }
        Command::Upload { file, send_to } => {
            let config = client.config();
            let walrus = WalrusClient::new(
                config.walrus_publisher_url.clone(),
                config.walrus_aggregator_url.clone(),
            )?;
            let bytes = std::fs::read(&file)?;
            let blob_id = walrus.put(bytes, send_to.as_deref()).await?;
            print_json(&json!({"blob_id": blob_id, "url": walrus.url(&blob_id)}))?
        }
    }

    Ok(())
}

/// Runs the refresh loops until interrupted, printing each published view.
async fn watch<L: suitter::models::Ledger + 'static>(
    client: SuitterClient<L>,
    address: Option<String>,
) -> Result<(), SuitterError> {
    let scheduler = Scheduler::new(client);
    let mut feed = scheduler.feed();
    let mut notifications = address.as_deref().map(|a| scheduler.notifications(a));

    loop {
        match notifications.as_mut() {
            Some(handle) => {
                tokio::select! {
                    alive = feed.changed() => {
                        if !alive {
                            break;
                        }
                        if let Some(suits) = feed.current() {
                            print_json(&json!({"view": "feed", "suits": suits}))?;
                        }
                    }
                    alive = handle.changed() => {
                        if !alive {
                            break;
                        }
                        if let Some(items) = handle.current() {
                            print_json(&json!({"view": "notifications", "items": items}))?;
                        }
                    }
                }
            }
            None => {
                if !feed.changed().await {
                    break;
                }
                if let Some(suits) = feed.current() {
                    print_json(&json!({"view": "feed", "suits": suits}))?;
                }
            }
        }
    }

    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), SuitterError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
