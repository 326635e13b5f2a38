use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SessionResponse {
    pub id: String,
    pub status: String,
    pub room: String,
    /// LiveKit join token for the voice front end; absent when LiveKit is not configured.
    pub token: Option<String>,
    pub livekit_url: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MessageRequest {
    pub content: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MessageResponse {
    pub response: String,
}
