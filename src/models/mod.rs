pub mod client;
pub mod community;
pub mod config;
pub mod decode;
pub mod event;
pub mod profile;
pub mod rpc;
pub mod store;
pub mod suit;
pub mod walrus;

// Re-export important structs for convenience
pub use client::{EventQuery, Ledger, ObjectSnapshot, SuitterClient};
pub use community::{Community, Privacy};
pub use config::Config;
pub use event::{EventKind, EventRecord};
pub use profile::{MetadataPatch, Profile, ProfileMetadata};
pub use rpc::SuiRpc;
pub use store::PreferenceStore;
pub use suit::{Comment, Repost, Suit};
pub use walrus::WalrusClient;
