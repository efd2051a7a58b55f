//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//! 各操作は実装内部で排他制御され、呼び出し側がロックに触れることはありません。

use async_trait::async_trait;
use bytes::Bytes;

use super::{
    Author, BlobId, Color, ColorError, Decision, Member, Nickname, NicknameChange, NicknameError,
    SessionId, SessionToken, Timestamp,
};

/// `resolve` の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSession {
    pub token: SessionToken,
    pub id: SessionId,
    /// 新しく発行されたセッションかどうか（Cookie の再設定が必要）
    pub minted: bool,
}

/// Session Repository trait
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// トークンからセッションを解決する。未知または未指定なら新規発行する
    async fn resolve(&self, token: Option<&str>) -> ResolvedSession;

    /// ニックネームを取得（未設定なら "anonymous"）
    async fn nickname(&self, id: &SessionId) -> Nickname;

    /// メッセージに付与する送信者情報を取得
    async fn author(&self, id: &SessionId) -> Author;

    /// ニックネームを設定する
    ///
    /// 他のセッションが使用中の名前は拒否する。
    /// 色が未設定なら固定パレットからランダムに割り当てる。
    async fn set_nickname(
        &self,
        id: &SessionId,
        nickname: Nickname,
    ) -> Result<NicknameChange, NicknameError>;

    /// 色を設定する（`#RRGGBB` または名前付きカラー）
    async fn set_color(&self, id: &SessionId, spec: &str) -> Result<Color, ColorError>;

    /// ニックネームを設定済みのメンバー一覧
    async fn list_members(&self) -> Vec<Member>;

    /// 現在のニックネームでセッションを検索
    async fn find_by_nickname(&self, nickname: &str) -> Option<SessionId>;

    /// 連投制限の判定（判定とカウンタ更新はアトミック）
    async fn admit(&self, id: &SessionId, now: Timestamp) -> Decision;
}

/// Blob Repository trait
#[async_trait]
pub trait BlobRepository: Send + Sync {
    /// バイト列を保存し、新しい ID を返す
    async fn put(&self, bytes: Bytes) -> BlobId;

    /// 保存されたバイト列を取得（期限切れでも sweep 前なら返す）
    async fn get(&self, id: &BlobId) -> Option<Bytes>;

    /// `now` 以前に期限切れになった Blob を削除し、削除件数を返す
    async fn sweep(&self, now: Timestamp) -> usize;

    /// 保存中の Blob 数
    async fn count(&self) -> usize;
}
