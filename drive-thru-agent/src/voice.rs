use drive_thru_sdk::config::LiveKitConfig;
use livekit_api::access_token::{AccessToken, AccessTokenError, VideoGrants};
use std::time::Duration;

const ROOM_PREFIX: &str = "drive-thru-";

pub fn room_name(session_id: &str) -> String {
    format!("{}{}", ROOM_PREFIX, session_id)
}

/// Mints LiveKit join tokens so the voice front end can bring a customer
/// into the room that belongs to an ordering session.
#[derive(Debug, Clone)]
pub struct VoiceTokens {
    config: LiveKitConfig,
}

impl VoiceTokens {
    /// `None` when the LiveKit credentials are incomplete.
    pub fn from_config(config: &LiveKitConfig) -> Option<Self> {
        config.is_enabled().then(|| Self {
            config: config.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.config.url
    }

    pub fn join_token(&self, room: &str, identity: &str) -> Result<String, AccessTokenError> {
        AccessToken::with_api_key(&self.config.api_key, &self.config.api_secret)
            .with_identity(identity)
            .with_name(identity)
            .with_grants(VideoGrants {
                room_join: true,
                room: room.to_string(),
                can_publish: true,
                can_subscribe: true,
                can_publish_data: true,
                ..Default::default()
            })
            .with_ttl(Duration::from_secs(self.config.token_ttl_seconds))
            .to_jwt()
    }
}
