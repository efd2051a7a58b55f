//! Conversion logic between domain entities and DTOs.

use crate::domain::{Author, ChatMessage, MessageKind};
use crate::infrastructure::dto::sse as dto;

// ========================================
// Domain Entity → DTO
// ========================================

impl From<MessageKind> for dto::MessageKindDto {
    fn from(kind: MessageKind) -> Self {
        match kind {
            MessageKind::Text => Self::Text,
            MessageKind::Image => Self::Image,
        }
    }
}

impl From<&Author> for dto::AuthorDto {
    fn from(author: &Author) -> Self {
        Self {
            id: author.id.as_str().to_string(),
            nickname: author.nickname.as_str().to_string(),
            color: author.color.as_ref().map(|c| c.as_str().to_string()),
        }
    }
}

impl From<&ChatMessage> for dto::MessageDto {
    fn from(message: &ChatMessage) -> Self {
        Self {
            from_app: message.from_app(),
            author: message.author().map(dto::AuthorDto::from),
            kind: message.kind().into(),
            content: message.content().to_string(),
            private: message.is_private(),
        }
    }
}

/// Serialize a message into the JSON text carried by one SSE frame
pub fn to_frame(message: &ChatMessage) -> Result<String, serde_json::Error> {
    serde_json::to_string(&dto::MessageDto::from(message))
}
