use std::env;
use std::fs::{self, File};
use std::io::{BufReader, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::SuitterError;

const DEFAULT_RPC_URL: &str = "https://fullnode.testnet.sui.io:443";
const DEFAULT_PACKAGE_ID: &str =
    "0x4d105e317fae9c83ea97d317b02a8e29d3bffe563a4c5ef76584c15a2cfc26ea";
const DEFAULT_MODULE: &str = "suitter";
const DEFAULT_PUBLISHER_URL: &str = "https://publisher.walrus-01.tududes.com";
const DEFAULT_AGGREGATOR_URL: &str = "https://aggregator.walrus-testnet.walrus.space";

/// Shared contract objects referenced by write-path transactions.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Registries {
    #[serde(default = "default_global_registry")]
    pub global: String,
    #[serde(default = "default_profile_registry")]
    pub profile: String,
    #[serde(default = "default_like_registry")]
    pub like: String,
    #[serde(default = "default_repost_registry")]
    pub repost: String,
    #[serde(default = "default_mention_registry")]
    pub mention: String,
    #[serde(default = "default_follow_registry")]
    pub follow: String,
    #[serde(default = "default_community_registry")]
    pub community: String,
}

fn default_global_registry() -> String {
    "0x3f9d688b242a46547d3eb6ebfc2e8d5d5384c4bb0cce858bd235a113d08df8af".to_string()
}
fn default_profile_registry() -> String {
    "0xce633d2dd87c92dbe9060d33783c3ba2ffce4a571f6294cd793b5b40e7817e35".to_string()
}
fn default_like_registry() -> String {
    "0xfc0f46c69176082eb217266462133517927e252b2e5e39db80ab4d7e39e0b95c".to_string()
}
fn default_repost_registry() -> String {
    "0x07cf02f7758dcbc87ceb7cb65742406a15fd6c3426e83e5a59f78ac977cf4bd3".to_string()
}
fn default_mention_registry() -> String {
    "0xe6ee869f196d50db424ad5df60a5eacfe4af376b92335a1840b65405c19c5f87".to_string()
}
fn default_follow_registry() -> String {
    "0xe6ff988467c7232a43352e21c0f993ba485efbb06d26e40fe52d52253d675fcf".to_string()
}
fn default_community_registry() -> String {
    "0x3b9c1325bca405b447a88e83b9bcc9603e3a2f1b0d7d70dcc1b93043522c989d".to_string()
}

impl Default for Registries {
    fn default() -> Self {
        Registries {
            global: default_global_registry(),
            profile: default_profile_registry(),
            like: default_like_registry(),
            repost: default_repost_registry(),
            mention: default_mention_registry(),
            follow: default_follow_registry(),
            community: default_community_registry(),
        }
    }
}

/// All external identifiers and tunables, resolved once at startup and
/// passed explicitly to every component.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
    #[serde(default = "default_package_id")]
    pub package_id: String,
    #[serde(default = "default_module")]
    pub contract_module: String,
    #[serde(default)]
    pub registries: Registries,
    #[serde(default = "default_publisher_url")]
    pub walrus_publisher_url: String,
    #[serde(default = "default_aggregator_url")]
    pub walrus_aggregator_url: String,
    /// Feed, thread and community views refresh on this cadence.
    #[serde(default = "default_feed_interval")]
    pub feed_interval_secs: u64,
    /// Profile aggregates and notifications refresh on this cadence.
    #[serde(default = "default_aggregate_interval")]
    pub aggregate_interval_secs: u64,
    #[serde(default = "default_event_limit")]
    pub event_limit: usize,
}

fn default_rpc_url() -> String {
    DEFAULT_RPC_URL.to_string()
}
fn default_package_id() -> String {
    DEFAULT_PACKAGE_ID.to_string()
}
fn default_module() -> String {
    DEFAULT_MODULE.to_string()
}
fn default_publisher_url() -> String {
    DEFAULT_PUBLISHER_URL.to_string()
}
fn default_aggregator_url() -> String {
    DEFAULT_AGGREGATOR_URL.to_string()
}
fn default_feed_interval() -> u64 {
    10
}
fn default_aggregate_interval() -> u64 {
    30
}
fn default_event_limit() -> usize {
    100
}

impl Default for Config {
    fn default() -> Self {
        // Round-trips through serde so the field defaults stay the single
        // source of truth.
        serde_json::from_str("{}").expect("empty config object must deserialize")
    }
}

impl Config {
    pub fn load() -> Result<Self, SuitterError> {
        let config_path = Self::config_path()?;

        let mut config = if config_path.exists() {
            let file = File::open(&config_path)
                .with_context(|| format!("Failed to open config file at {:?}", config_path))?;
            let reader = BufReader::new(file);
            serde_json::from_reader(reader).context("Failed to parse config JSON")?
        } else {
            Config::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    pub fn save(&self) -> Result<(), SuitterError> {
        let config_path = Self::config_path()?;
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| SuitterError::Config(format!("Failed to create config dir: {}", e)))?;
        }

        let json = serde_json::to_string_pretty(&self)
            .context("Failed to serialize config to JSON")?;

        let mut file = File::create(&config_path)
            .with_context(|| format!("Failed to open config file for writing at {:?}", config_path))?;
        file.write_all(json.as_bytes())
            .context("Failed to write config data")?;

        Ok(())
    }

    fn config_path() -> Result<PathBuf, SuitterError> {
        let home = dirs::home_dir()
            .ok_or_else(|| SuitterError::Config("Could not find home directory".to_string()))?;
        Ok(home.join(".config/suitter/config.json"))
    }

    /// Environment variables win over the config file, matching how the
    /// contract was originally deployed with per-network overrides.
    fn apply_env_overrides(&mut self) {
        let overrides: [(&str, &mut String); 11] = [
            ("SUITTER_RPC_URL", &mut self.rpc_url),
            ("SUITTER_PACKAGE_ID", &mut self.package_id),
            ("SUITTER_MODULE", &mut self.contract_module),
            ("SUITTER_GLOBAL_REGISTRY_ID", &mut self.registries.global),
            ("SUITTER_PROFILE_REGISTRY_ID", &mut self.registries.profile),
            ("SUITTER_LIKE_REGISTRY_ID", &mut self.registries.like),
            ("SUITTER_REPOST_REGISTRY_ID", &mut self.registries.repost),
            ("SUITTER_MENTION_REGISTRY_ID", &mut self.registries.mention),
            ("SUITTER_FOLLOW_REGISTRY_ID", &mut self.registries.follow),
            ("SUITTER_COMMUNITY_REGISTRY_ID", &mut self.registries.community),
            ("SUITTER_WALRUS_PUBLISHER_URL", &mut self.walrus_publisher_url),
        ];
        for (var, slot) in overrides {
            if let Ok(value) = env::var(var) {
                if !value.is_empty() {
                    *slot = value;
                }
            }
        }
        if let Ok(value) = env::var("SUITTER_WALRUS_AGGREGATOR_URL") {
            if !value.is_empty() {
                self.walrus_aggregator_url = value;
            }
        }
    }

    pub fn feed_interval(&self) -> Duration {
        Duration::from_secs(self.feed_interval_secs)
    }

    pub fn aggregate_interval(&self) -> Duration {
        Duration::from_secs(self.aggregate_interval_secs)
    }

    /// `package::module::Kind`, the fully-qualified event type string.
    pub fn event_type(&self, kind_name: &str) -> String {
        format!("{}::{}::{}", self.package_id, self.contract_module, kind_name)
    }

    /// `package::module::Struct`, for owned-object type filters.
    pub fn struct_type(&self, module: &str, name: &str) -> String {
        format!("{}::{}::{}", self.package_id, module, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_fill_missing_fields() {
        let config: Config = serde_json::from_str(r#"{"rpc_url":"http://localhost:9000"}"#).unwrap();
        assert_eq!(config.rpc_url, "http://localhost:9000");
        assert_eq!(config.contract_module, "suitter");
        assert_eq!(config.feed_interval_secs, 10);
        assert_eq!(config.aggregate_interval_secs, 30);
        assert_eq!(config.registries.global, default_global_registry());
    }

    #[test]
    fn event_type_is_fully_qualified() {
        let mut config = Config::default();
        config.package_id = "0xabc".to_string();
        assert_eq!(config.event_type("SuitCreated"), "0xabc::suitter::SuitCreated");
    }
}
