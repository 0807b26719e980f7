use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    about = concat!(env!("CARGO_CRATE_NAME"), " - event-sourced Suitter client"),
    version
)]
pub struct Flags {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve configuration (file, env overrides, defaults), write it
    /// back to the config file and print it
    Init,
    /// Print the global feed, newest first
    Feed,
    /// Print the comment thread under one suit, oldest first
    Thread { suit_id: String },
    /// Print the interaction timeline for an address
    Notifications { address: String },
    /// Report whether one address follows another
    FollowStatus { follower: String, followee: String },
    /// Print one address's profile with the local metadata overlay
    Profile { address: String },
    /// Print every known profile
    Profiles,
    /// Print every community, newest first
    Communities,
    /// Print the posts published into one community
    CommunityPosts { community_id: String },
    /// Print the suits an address reposted
    Reposts { address: String },
    /// Print hashtag usage across the current feed
    Topics,
    /// Keep the feed (and notifications, if an address is given) refreshing
    /// on their timers, printing each refresh
    Watch {
        #[arg(long)]
        address: Option<String>,
    },
    /// Set local profile metadata fields for an address; omitted fields
    /// keep their stored values
    SetMeta {
        address: String,
        #[arg(long)]
        display_name: Option<String>,
        #[arg(long)]
        website: Option<String>,
        #[arg(long)]
        location: Option<String>,
    },
    /// Drop all local profile metadata for an address
    ClearMeta { address: String },
    /// Upload a file to blob storage and print its blob id and serving URL
    Upload {
        file: std::path::PathBuf,
        /// Transfer the resulting blob object to this address
        #[arg(long)]
        send_to: Option<String>,
    },
}

impl Flags {
    /// Parse from `std::env::args_os()`, exiting on error.
    pub fn from_args() -> Self {
        Self::parse()
    }
}
