//! UseCase 層のエラー型

use thiserror::Error;

use crate::domain::NicknameError;

/// メッセージ送信のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendMessageError {
    #[error("Message is required")]
    EmptyMessage,

    #[error("You are sending messages too quickly!")]
    Throttled,
}

/// ニックネーム設定のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetNicknameError {
    #[error(transparent)]
    Invalid(#[from] NicknameError),
}

/// 画像アップロードのエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadImageError {
    #[error("Invalid image")]
    EmptyImage,

    #[error("Image exceeds {limit} bytes")]
    TooLarge { limit: usize },
}
