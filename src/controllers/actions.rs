use std::sync::Arc;

use async_trait::async_trait;

use crate::error::SuitterError;
use crate::models::community::Privacy;
use crate::models::config::Config;

/// The shared Clock object every time-stamped entry function takes last.
pub const CLOCK_OBJECT_ID: &str = "0x6";

/// One argument of a Move entry-function call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallArg {
    /// Shared or owned object, by id.
    Object(String),
    Str(String),
    Address(String),
    U8(u8),
}

/// A single Move call, ready for signing. `target` is the fully-qualified
/// `package::module::function` string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionSpec {
    pub target: String,
    pub args: Vec<CallArg>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    pub digest: String,
}

/// Signing authority for the write path. The ledger connection owns the
/// read path; this owns the key material.
#[async_trait]
pub trait Wallet: Send + Sync {
    fn address(&self) -> &str;

    async fn sign_and_execute(&self, spec: TransactionSpec) -> Result<TxReceipt, SuitterError>;
}

/// Builds and submits every contract mutation. Unlike the read path these
/// surface errors unmodified; a dropped post must be visible to the caller.
pub struct Actions<W> {
    wallet: Arc<W>,
    config: Config,
}

impl<W: Wallet> Actions<W> {
    pub fn new(wallet: Arc<W>, config: Config) -> Self {
        Self { wallet, config }
    }

    pub fn wallet_address(&self) -> &str {
        self.wallet.address()
    }

    fn target(&self, module: &str, function: &str) -> String {
        format!("{}::{}::{}", self.config.package_id, module, function)
    }

    async fn submit(
        &self,
        module: &str,
        function: &str,
        args: Vec<CallArg>,
    ) -> Result<TxReceipt, SuitterError> {
        self.wallet
            .sign_and_execute(TransactionSpec {
                target: self.target(module, function),
                args,
            })
            .await
    }

    pub async fn create_suit(
        &self,
        content: &str,
        media_blob_id: Option<&str>,
    ) -> Result<TxReceipt, SuitterError> {
        let global = CallArg::Object(self.config.registries.global.clone());
        match media_blob_id {
            Some(blob_id) => {
                self.submit(
                    "suit",
                    "create_suit_with_media",
                    vec![
                        global,
                        CallArg::Str(content.to_string()),
                        CallArg::Str(blob_id.to_string()),
                        CallArg::Object(CLOCK_OBJECT_ID.to_string()),
                    ],
                )
                .await
            }
            None => {
                self.submit(
                    "suit",
                    "create_suit",
                    vec![
                        global,
                        CallArg::Str(content.to_string()),
                        CallArg::Object(CLOCK_OBJECT_ID.to_string()),
                    ],
                )
                .await
            }
        }
    }

    pub async fn like_suit(&self, suit_id: &str) -> Result<TxReceipt, SuitterError> {
        self.submit(
            "interactions",
            "like_suit",
            vec![
                CallArg::Object(self.config.registries.global.clone()),
                CallArg::Object(self.config.registries.like.clone()),
                CallArg::Object(suit_id.to_string()),
                CallArg::Object(CLOCK_OBJECT_ID.to_string()),
            ],
        )
        .await
    }

    pub async fn comment_on_suit(
        &self,
        suit_id: &str,
        content: &str,
        media_blob_id: Option<&str>,
    ) -> Result<TxReceipt, SuitterError> {
        let mut args = vec![
            CallArg::Object(self.config.registries.global.clone()),
            CallArg::Object(suit_id.to_string()),
            CallArg::Str(content.to_string()),
        ];
        let function = match media_blob_id {
            Some(blob_id) => {
                args.push(CallArg::Str(blob_id.to_string()));
                "comment_on_suit_with_media"
            }
            None => "comment_on_suit",
        };
        args.push(CallArg::Object(CLOCK_OBJECT_ID.to_string()));
        self.submit("interactions", function, args).await
    }

    pub async fn repost_suit(&self, suit_id: &str) -> Result<TxReceipt, SuitterError> {
        self.submit(
            "interactions",
            "repost_suit",
            vec![
                CallArg::Object(self.config.registries.global.clone()),
                CallArg::Object(self.config.registries.repost.clone()),
                CallArg::Object(suit_id.to_string()),
                CallArg::Object(CLOCK_OBJECT_ID.to_string()),
            ],
        )
        .await
    }

    pub async fn mention_in_suit(
        &self,
        suit_id: &str,
        mentioned: &str,
    ) -> Result<TxReceipt, SuitterError> {
        self.mention("mention_user_in_suit", suit_id, mentioned).await
    }

    pub async fn mention_in_comment(
        &self,
        comment_id: &str,
        mentioned: &str,
    ) -> Result<TxReceipt, SuitterError> {
        self.mention("mention_user_in_comment", comment_id, mentioned)
            .await
    }

    async fn mention(
        &self,
        function: &str,
        content_id: &str,
        mentioned: &str,
    ) -> Result<TxReceipt, SuitterError> {
        self.submit(
            "interactions",
            function,
            vec![
                CallArg::Object(self.config.registries.global.clone()),
                CallArg::Object(self.config.registries.mention.clone()),
                CallArg::Object(content_id.to_string()),
                CallArg::Address(mentioned.to_string()),
                CallArg::Object(CLOCK_OBJECT_ID.to_string()),
            ],
        )
        .await
    }

    pub async fn create_profile(
        &self,
        username: &str,
        bio: &str,
    ) -> Result<TxReceipt, SuitterError> {
        self.submit(
            "profile",
            "create_profile",
            vec![
                CallArg::Object(self.config.registries.global.clone()),
                CallArg::Object(self.config.registries.profile.clone()),
                CallArg::Str(username.to_string()),
                CallArg::Str(bio.to_string()),
                CallArg::Object(CLOCK_OBJECT_ID.to_string()),
            ],
        )
        .await
    }

    pub async fn update_bio(&self, profile_id: &str, bio: &str) -> Result<TxReceipt, SuitterError> {
        self.submit(
            "profile",
            "update_bio",
            vec![
                CallArg::Object(profile_id.to_string()),
                CallArg::Str(bio.to_string()),
            ],
        )
        .await
    }

    pub async fn update_profile_image(
        &self,
        profile_id: &str,
        blob_id: &str,
    ) -> Result<TxReceipt, SuitterError> {
        self.submit(
            "profile",
            "update_profile_image",
            vec![
                CallArg::Object(profile_id.to_string()),
                CallArg::Str(blob_id.to_string()),
            ],
        )
        .await
    }

    pub async fn follow_user(
        &self,
        follower_profile_id: &str,
        followee_profile_id: &str,
    ) -> Result<TxReceipt, SuitterError> {
        self.follow_call("follow_user", follower_profile_id, followee_profile_id)
            .await
    }

    pub async fn unfollow_user(
        &self,
        follower_profile_id: &str,
        followee_profile_id: &str,
    ) -> Result<TxReceipt, SuitterError> {
        self.follow_call("unfollow_user", follower_profile_id, followee_profile_id)
            .await
    }

    async fn follow_call(
        &self,
        function: &str,
        follower_profile_id: &str,
        followee_profile_id: &str,
    ) -> Result<TxReceipt, SuitterError> {
        self.submit(
            "profile",
            function,
            vec![
                CallArg::Object(self.config.registries.follow.clone()),
                CallArg::Object(follower_profile_id.to_string()),
                CallArg::Object(followee_profile_id.to_string()),
            ],
        )
        .await
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create_community(
        &self,
        name: &str,
        handle: &str,
        description: &str,
        privacy: Privacy,
        thumbnail_blob_id: Option<&str>,
        cover_blob_id: Option<&str>,
    ) -> Result<TxReceipt, SuitterError> {
        let mut args = vec![
            CallArg::Object(self.config.registries.global.clone()),
            CallArg::Object(self.config.registries.community.clone()),
            CallArg::Str(name.to_string()),
            CallArg::Str(handle.to_string()),
            CallArg::Str(description.to_string()),
            CallArg::U8(privacy.as_u8()),
        ];
        let function = if thumbnail_blob_id.is_some() || cover_blob_id.is_some() {
            args.push(CallArg::Str(thumbnail_blob_id.unwrap_or("").to_string()));
            args.push(CallArg::Str(cover_blob_id.unwrap_or("").to_string()));
            "create_community_with_media"
        } else {
            "create_community"
        };
        args.push(CallArg::Object(CLOCK_OBJECT_ID.to_string()));
        self.submit("community", function, args).await
    }

    pub async fn join_community(
        &self,
        community_id: &str,
        members_id: &str,
    ) -> Result<TxReceipt, SuitterError> {
        self.submit(
            "community",
            "join_community",
            vec![
                CallArg::Object(community_id.to_string()),
                CallArg::Object(members_id.to_string()),
                CallArg::Object(CLOCK_OBJECT_ID.to_string()),
            ],
        )
        .await
    }

    pub async fn create_community_post(
        &self,
        community_id: &str,
        members_id: &str,
        content: &str,
        media_blob_id: Option<&str>,
    ) -> Result<TxReceipt, SuitterError> {
        let mut args = vec![
            CallArg::Object(self.config.registries.global.clone()),
            CallArg::Object(community_id.to_string()),
            CallArg::Object(members_id.to_string()),
            CallArg::Str(content.to_string()),
        ];
        let function = match media_blob_id {
            Some(blob_id) => {
                args.push(CallArg::Str(blob_id.to_string()));
                "create_community_post_with_media"
            }
            None => "create_community_post",
        };
        args.push(CallArg::Object(CLOCK_OBJECT_ID.to_string()));
        self.submit("community", function, args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    struct RecordingWallet {
        specs: Mutex<Vec<TransactionSpec>>,
        fail: bool,
    }

    #[async_trait]
    impl Wallet for RecordingWallet {
        fn address(&self) -> &str {
            "0xme"
        }

        async fn sign_and_execute(
            &self,
            spec: TransactionSpec,
        ) -> Result<TxReceipt, SuitterError> {
            if self.fail {
                return Err(SuitterError::Transaction("rejected by signer".into()));
            }
            self.specs.lock().unwrap().push(spec);
            Ok(TxReceipt {
                digest: "D1".to_string(),
            })
        }
    }

    fn actions(fail: bool) -> (Actions<RecordingWallet>, Arc<RecordingWallet>) {
        let wallet = Arc::new(RecordingWallet {
            specs: Mutex::new(Vec::new()),
            fail,
        });
        let mut config = Config::default();
        config.package_id = "0xpkg".to_string();
        (Actions::new(Arc::clone(&wallet), config), wallet)
    }

    #[tokio::test]
    async fn plain_suit_omits_the_media_argument() {
        let (actions, wallet) = actions(false);
        actions.create_suit("gm", None).await.unwrap();

        let spec = wallet.specs.lock().unwrap().remove(0);
        assert_eq!(spec.target, "0xpkg::suit::create_suit");
        assert_eq!(spec.args.len(), 3);
        assert_eq!(spec.args[1], CallArg::Str("gm".to_string()));
        assert_eq!(
            spec.args[2],
            CallArg::Object(CLOCK_OBJECT_ID.to_string())
        );
    }

    #[tokio::test]
    async fn media_suit_places_the_blob_before_the_clock() {
        let (actions, wallet) = actions(false);
        actions.create_suit("gm", Some("blob9")).await.unwrap();

        let spec = wallet.specs.lock().unwrap().remove(0);
        assert_eq!(spec.target, "0xpkg::suit::create_suit_with_media");
        assert_eq!(spec.args[2], CallArg::Str("blob9".to_string()));
        assert_eq!(
            spec.args[3],
            CallArg::Object(CLOCK_OBJECT_ID.to_string())
        );
    }

    #[tokio::test]
    async fn like_routes_through_both_registries() {
        let (actions, wallet) = actions(false);
        actions.like_suit("0xsuit").await.unwrap();

        let spec = wallet.specs.lock().unwrap().remove(0);
        let config = Config::default();
        assert_eq!(spec.target, "0xpkg::interactions::like_suit");
        assert_eq!(
            spec.args,
            vec![
                CallArg::Object(config.registries.global),
                CallArg::Object(config.registries.like),
                CallArg::Object("0xsuit".to_string()),
                CallArg::Object(CLOCK_OBJECT_ID.to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn community_media_variant_sends_both_blob_slots() {
        let (actions, wallet) = actions(false);
        actions
            .create_community("rustaceans", "rust", "crab talk", Privacy::Members, Some("t1"), None)
            .await
            .unwrap();

        let spec = wallet.specs.lock().unwrap().remove(0);
        assert_eq!(spec.target, "0xpkg::community::create_community_with_media");
        assert_eq!(spec.args[5], CallArg::U8(1));
        assert_eq!(spec.args[6], CallArg::Str("t1".to_string()));
        assert_eq!(spec.args[7], CallArg::Str(String::new()));
    }

    #[tokio::test]
    async fn signer_failures_reach_the_caller() {
        let (actions, _) = actions(true);
        let err = actions.create_suit("gm", None).await.unwrap_err();
        assert!(matches!(err, SuitterError::Transaction(_)));
    }
}
