//! UseCase: Cookie のトークンからセッションを解決する

use std::sync::Arc;

use crate::domain::{ResolvedSession, SessionRepository};

/// セッション解決のユースケース
pub struct ResolveSessionUseCase {
    sessions: Arc<dyn SessionRepository>,
}

impl ResolveSessionUseCase {
    /// 新しい ResolveSessionUseCase を作成
    pub fn new(sessions: Arc<dyn SessionRepository>) -> Self {
        Self { sessions }
    }

    /// 既知のトークンならそのセッションを、それ以外なら新しいセッションを返す
    pub async fn execute(&self, token: Option<&str>) -> ResolvedSession {
        self.sessions.resolve(token).await
    }
}
