//! ドメイン層のエラー型

use thiserror::Error;

/// ニックネーム設定のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NicknameError {
    #[error("Invalid nickname: empty")]
    Empty,

    #[error("Invalid nickname: contains whitespace")]
    ContainsWhitespace,

    #[error("Nickname '{0}' is already taken")]
    Taken(String),
}

/// カラー指定のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("Invalid color format: '{0}'")]
    InvalidFormat(String),
}

/// 乱数ソースの取得失敗
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Secure random source unavailable: {0}")]
pub struct EntropyError(pub String);
