use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::handler::chat_handler::{
    create_conversation_handler, delete_conversation_handler, get_conversation_handler,
    list_conversations_handler, list_messages_handler, post_message_handler,
};
use crate::service::chat_service::ChatServiceImpl;

pub fn chat_router(service: Arc<ChatServiceImpl>) -> Router {
    Router::new()
        .route("/chat/conversations", post(create_conversation_handler))
        .route("/chat/conversations", get(list_conversations_handler))
        .route("/chat/conversations/{id}", get(get_conversation_handler))
        .route("/chat/conversations/{id}", delete(delete_conversation_handler))
        .route("/chat/conversations/{id}/messages", post(post_message_handler))
        .route("/chat/conversations/{id}/messages", get(list_messages_handler))
        .with_state(service)
}
