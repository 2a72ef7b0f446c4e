use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{doc, Document};
use futures::stream::StreamExt;
use mongodb::options::FindOptions;
use mongodb::Collection;
use tracing::error;

use crate::model::chat::{ChatConversation, ChatMessage};
use crate::repository::mongo::{collections, now_rfc3339, MongoStore};
use crate::repository::repository_error::{RepositoryError, RepositoryResult};

#[async_trait]
pub trait ChatRepository: Send + Sync {
    async fn create_conversation(
        &self,
        conversation: ChatConversation,
    ) -> RepositoryResult<ChatConversation>;
    async fn get_conversation(&self, id: ObjectId) -> RepositoryResult<ChatConversation>;
    async fn list_conversations(
        &self,
        agency_id: Option<ObjectId>,
        page: u32,
        limit: u32,
    ) -> RepositoryResult<Vec<ChatConversation>>;
    async fn delete_conversation(&self, id: ObjectId) -> RepositoryResult<()>;
    async fn add_message(&self, message: ChatMessage) -> RepositoryResult<ChatMessage>;
    async fn list_messages(&self, conversation_id: ObjectId) -> RepositoryResult<Vec<ChatMessage>>;
}

pub struct MongoChatRepository {
    conversations: Collection<ChatConversation>,
    messages: Collection<ChatMessage>,
}

impl MongoChatRepository {
    pub fn new(store: Arc<MongoStore>) -> Self {
        let conversations = store.collection::<ChatConversation>(collections::CHAT_CONVERSATIONS);
        let messages = store.collection::<ChatMessage>(collections::CHAT_MESSAGES);
        MongoChatRepository { conversations, messages }
    }
}

#[async_trait]
impl ChatRepository for MongoChatRepository {
    #[tracing::instrument(skip(self, conversation))]
    async fn create_conversation(
        &self,
        conversation: ChatConversation,
    ) -> RepositoryResult<ChatConversation> {
        let mut new_conversation = conversation;
        new_conversation.id = Some(ObjectId::new());
        let now = now_rfc3339();
        new_conversation.created_at = Some(now.clone());
        new_conversation.updated_at = Some(now);

        self.conversations
            .insert_one(new_conversation.clone(), None)
            .await
            .map_err(RepositoryError::from)?;
        Ok(new_conversation)
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn get_conversation(&self, id: ObjectId) -> RepositoryResult<ChatConversation> {
        match self.conversations.find_one(doc! { "_id": id }, None).await {
            Ok(Some(conversation)) => Ok(conversation),
            Ok(None) => Err(RepositoryError::not_found(format!(
                "Conversation not found for ID: {}",
                id
            ))),
            Err(e) => {
                error!("Failed to fetch conversation: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(page = page, limit = limit))]
    async fn list_conversations(
        &self,
        agency_id: Option<ObjectId>,
        page: u32,
        limit: u32,
    ) -> RepositoryResult<Vec<ChatConversation>> {
        let mut filter = Document::new();
        if let Some(agency_id) = agency_id {
            filter.insert("agency_id", agency_id);
        }
        let options = FindOptions::builder()
            .skip(u64::from(page.saturating_sub(1)) * u64::from(limit))
            .limit(i64::from(limit))
            .sort(doc! { "updated_at": -1 })
            .build();
        let mut cursor = self
            .conversations
            .find(filter, options)
            .await
            .map_err(RepositoryError::from)?;
        let mut conversations = Vec::new();
        while let Some(conversation) = cursor.next().await {
            conversations.push(conversation.map_err(RepositoryError::from)?);
        }
        Ok(conversations)
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn delete_conversation(&self, id: ObjectId) -> RepositoryResult<()> {
        let result = self.conversations.delete_one(doc! { "_id": id }, None).await;
        match result {
            Ok(delete_result) if delete_result.deleted_count > 0 => {
                // Messages go with their conversation.
                self.messages
                    .delete_many(doc! { "conversation_id": id }, None)
                    .await
                    .map_err(RepositoryError::from)?;
                Ok(())
            }
            Ok(_) => Err(RepositoryError::not_found(format!(
                "No conversation to delete for ID: {}",
                id
            ))),
            Err(e) => Err(RepositoryError::from(e)),
        }
    }

    #[tracing::instrument(skip(self, message))]
    async fn add_message(&self, message: ChatMessage) -> RepositoryResult<ChatMessage> {
        let mut new_message = message;
        new_message.id = Some(ObjectId::new());
        new_message.sent_at = Some(now_rfc3339());

        self.messages
            .insert_one(new_message.clone(), None)
            .await
            .map_err(RepositoryError::from)?;
        Ok(new_message)
    }

    #[tracing::instrument(skip(self), fields(conversation_id = %conversation_id))]
    async fn list_messages(&self, conversation_id: ObjectId) -> RepositoryResult<Vec<ChatMessage>> {
        let options = FindOptions::builder().sort(doc! { "sent_at": 1 }).build();
        let mut cursor = self
            .messages
            .find(doc! { "conversation_id": conversation_id }, options)
            .await
            .map_err(RepositoryError::from)?;
        let mut messages = Vec::new();
        while let Some(message) = cursor.next().await {
            messages.push(message.map_err(RepositoryError::from)?);
        }
        Ok(messages)
    }
}
