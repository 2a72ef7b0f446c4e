use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Internal chat persistence. Real-time delivery happens elsewhere; this
/// service only stores and lists conversations and their messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConversation {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    pub agency_id: ObjectId,
    pub title: String,
    #[serde(default)]
    pub participants: Vec<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    pub conversation_id: ObjectId,
    pub sender: String,
    pub body: String,
    pub sent_at: Option<String>,
}
