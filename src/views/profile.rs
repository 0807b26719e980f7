use std::collections::HashSet;

use futures::future::join_all;
use serde::Serialize;

use crate::models::client::{Ledger, SuitterClient};
use crate::models::event::{EventKind, EventRecord};
use crate::models::profile::{Profile, ProfileMetadata};
use crate::models::store::PreferenceStore;

/// On-chain profile plus the client-local overlay. The overlay decorates the
/// view only; username and bio always come from the chain.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ProfileView {
    pub profile: Profile,
    pub metadata: ProfileMetadata,
}

/// The profile object owned by an address, if one exists.
pub async fn profile<L: Ledger>(client: &SuitterClient<L>, address: &str) -> Option<Profile> {
    let struct_type = client.config().struct_type("profile", "Profile");
    client
        .owned_objects(address, &struct_type)
        .await
        .first()
        .map(|snapshot| Profile::from_snapshot(snapshot, address))
}

pub async fn profile_with_overlay<L: Ledger>(
    client: &SuitterClient<L>,
    store: &PreferenceStore,
    address: &str,
) -> Option<ProfileView> {
    let profile = profile(client, address).await?;
    let metadata = store.get(address).unwrap_or_else(|e| {
        log::warn!("preference lookup failed for {}: {}", address, e);
        ProfileMetadata::default()
    });
    Some(ProfileView { profile, metadata })
}

/// Every known profile: creation events, de-duplicated by owner before the
/// per-owner lookups fan out. Owners whose profile no longer resolves drop
/// out of the view.
pub async fn all_profiles<L: Ledger>(client: &SuitterClient<L>) -> Vec<Profile> {
    let events = client.fetch_events(EventKind::ProfileCreated).await;

    let mut seen = HashSet::new();
    let owners: Vec<String> = events
        .iter()
        .filter_map(EventRecord::profile_owner)
        .filter(|owner| seen.insert(owner.to_ascii_lowercase()))
        .collect();

    let lookups = owners.iter().map(|owner| profile(client, owner));
    join_all(lookups).await.into_iter().flatten().collect()
}
