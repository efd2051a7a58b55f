//! エンティティ
//!
//! - `Session`: チャット参加者（接続とは独立して存続する）
//! - `ChatMessage`: 配信されるメッセージ（テキスト / 画像）

use super::{
    rate_limit::SpamState,
    value_object::{BlobId, Color, Nickname, SessionId},
};

/// セッション
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: SessionId,
    /// 未設定の場合は "anonymous" として表示される
    pub nickname: Option<Nickname>,
    pub color: Option<Color>,
    pub spam: SpamState,
}

impl Session {
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            nickname: None,
            color: None,
            spam: SpamState::default(),
        }
    }

    /// 表示用のニックネーム
    pub fn display_nickname(&self) -> Nickname {
        self.nickname.clone().unwrap_or_else(Nickname::anonymous)
    }

    pub fn author(&self) -> Author {
        Author {
            id: self.id.clone(),
            nickname: self.display_nickname(),
            color: self.color.clone(),
        }
    }
}

/// メンバー一覧の 1 エントリ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub id: SessionId,
    pub nickname: Nickname,
}

/// ニックネーム変更の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NicknameChange {
    pub previous: Option<Nickname>,
    pub current: Nickname,
}

/// メッセージ送信者
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub id: SessionId,
    pub nickname: Nickname,
    pub color: Option<Color>,
}

/// メッセージの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Text,
    Image,
}

/// 配信メッセージ
///
/// `private` なメッセージは常にアプリ発（`from_app`）で author を持たない。
/// この不変条件はコンストラクタで保証する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    kind: MessageKind,
    content: String,
    author: Option<Author>,
    from_app: bool,
    private: bool,
}

impl ChatMessage {
    /// ユーザーのテキストメッセージ（`content` はエスケープ済み）
    pub fn user_text(author: Author, content: String) -> Self {
        Self {
            kind: MessageKind::Text,
            content,
            author: Some(author),
            from_app: false,
            private: false,
        }
    }

    /// ユーザーがアップロードした画像
    pub fn user_image(author: Author, blob_id: &BlobId) -> Self {
        Self {
            kind: MessageKind::Image,
            content: blob_id.as_str().to_string(),
            author: Some(author),
            from_app: false,
            private: false,
        }
    }

    /// 全員に配信されるアプリからのお知らせ
    pub fn app_notice(content: String) -> Self {
        Self {
            kind: MessageKind::Text,
            content,
            author: None,
            from_app: true,
            private: false,
        }
    }

    /// 特定のセッションにだけ届くアプリからのメッセージ
    pub fn app_private(content: String) -> Self {
        Self {
            kind: MessageKind::Text,
            content,
            author: None,
            from_app: true,
            private: true,
        }
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn author(&self) -> Option<&Author> {
        self.author.as_ref()
    }

    pub fn from_app(&self) -> bool {
        self.from_app
    }

    pub fn is_private(&self) -> bool {
        self.private
    }
}
