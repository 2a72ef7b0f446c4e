use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use tracing::{info, instrument};

use crate::dto::chat_dto::{CreateConversationRequest, PostMessageRequest};
use crate::model::chat::{ChatConversation, ChatMessage};
use crate::repository::chat_repo::ChatRepository;
use crate::service::lead_service::parse_object_id;
use crate::util::error::ServiceError;

#[async_trait]
pub trait ChatService: Send + Sync {
    async fn create_conversation(
        &self,
        request: CreateConversationRequest,
    ) -> Result<ChatConversation, ServiceError>;
    async fn get_conversation(&self, id: ObjectId) -> Result<ChatConversation, ServiceError>;
    async fn list_conversations(
        &self,
        agency_id: Option<ObjectId>,
        page: u32,
        limit: u32,
    ) -> Result<Vec<ChatConversation>, ServiceError>;
    async fn delete_conversation(&self, id: ObjectId) -> Result<(), ServiceError>;
    async fn post_message(
        &self,
        conversation_id: ObjectId,
        request: PostMessageRequest,
    ) -> Result<ChatMessage, ServiceError>;
    async fn list_messages(
        &self,
        conversation_id: ObjectId,
    ) -> Result<Vec<ChatMessage>, ServiceError>;
}

pub struct ChatServiceImpl {
    chat_repo: Arc<dyn ChatRepository>,
}

impl ChatServiceImpl {
    pub fn new(chat_repo: Arc<dyn ChatRepository>) -> Self {
        ChatServiceImpl { chat_repo }
    }
}

#[async_trait]
impl ChatService for ChatServiceImpl {
    #[instrument(skip(self, request))]
    async fn create_conversation(
        &self,
        request: CreateConversationRequest,
    ) -> Result<ChatConversation, ServiceError> {
        info!("Creating chat conversation");
        let agency_id = parse_object_id(&request.agency_id, "agency id")?;
        let conversation = ChatConversation {
            id: None,
            agency_id,
            title: request.title,
            participants: request.participants,
            created_at: None,
            updated_at: None,
        };
        self.chat_repo
            .create_conversation(conversation)
            .await
            .map_err(ServiceError::from)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn get_conversation(&self, id: ObjectId) -> Result<ChatConversation, ServiceError> {
        self.chat_repo.get_conversation(id).await.map_err(ServiceError::from)
    }

    #[instrument(skip(self))]
    async fn list_conversations(
        &self,
        agency_id: Option<ObjectId>,
        page: u32,
        limit: u32,
    ) -> Result<Vec<ChatConversation>, ServiceError> {
        self.chat_repo
            .list_conversations(agency_id, page, limit)
            .await
            .map_err(ServiceError::from)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete_conversation(&self, id: ObjectId) -> Result<(), ServiceError> {
        self.chat_repo.delete_conversation(id).await.map_err(ServiceError::from)
    }

    #[instrument(skip(self, request), fields(conversation_id = %conversation_id))]
    async fn post_message(
        &self,
        conversation_id: ObjectId,
        request: PostMessageRequest,
    ) -> Result<ChatMessage, ServiceError> {
        // Posting into a deleted conversation is a NotFound, not a silent
        // orphan row.
        self.chat_repo.get_conversation(conversation_id).await?;

        let message = ChatMessage {
            id: None,
            conversation_id,
            sender: request.sender,
            body: request.body,
            sent_at: None,
        };
        self.chat_repo.add_message(message).await.map_err(ServiceError::from)
    }

    #[instrument(skip(self), fields(conversation_id = %conversation_id))]
    async fn list_messages(
        &self,
        conversation_id: ObjectId,
    ) -> Result<Vec<ChatMessage>, ServiceError> {
        self.chat_repo
            .list_messages(conversation_id)
            .await
            .map_err(ServiceError::from)
    }
}
