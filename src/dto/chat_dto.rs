use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateConversationRequest {
    #[validate(length(equal = 24))]
    pub agency_id: String,

    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[serde(default)]
    pub participants: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PostMessageRequest {
    #[validate(length(min = 1, max = 100))]
    pub sender: String,

    #[validate(length(min = 1, max = 4000))]
    pub body: String,
}
