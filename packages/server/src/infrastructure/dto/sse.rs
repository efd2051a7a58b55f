//! Server-Sent Events frame DTOs.

use serde::{Deserialize, Serialize};

/// Message kind on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKindDto {
    Text,
    Image,
}

/// Author of a user-originated message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorDto {
    pub id: String,
    pub nickname: String,
    pub color: Option<String>,
}

/// One JSON object per SSE `data:` frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDto {
    pub from_app: bool,
    pub author: Option<AuthorDto>,
    pub kind: MessageKindDto,
    pub content: String,
    pub private: bool,
}
