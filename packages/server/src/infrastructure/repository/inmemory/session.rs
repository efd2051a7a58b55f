//! InMemory Session Repository 実装
//!
//! ドメイン層が定義する SessionRepository trait の具体的な実装。
//! トークン表とセッション表を 1 つの Mutex で保護するため、
//! ニックネームの重複チェックと代入の間に他の操作が割り込むことはありません。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    Author, Color, ColorError, Decision, IdFactory, Member, Nickname, NicknameChange,
    NicknameError, RateLimitPolicy, ResolvedSession, Session, SessionId, SessionRepository,
    SessionToken, Timestamp, palette,
};

#[derive(Default)]
struct SessionTable {
    /// Cookie トークン → 公開セッション ID
    tokens: HashMap<SessionToken, SessionId>,
    sessions: HashMap<SessionId, Session>,
}

impl SessionTable {
    fn session_mut(&mut self, id: &SessionId) -> &mut Session {
        self.sessions
            .entry(id.clone())
            .or_insert_with(|| Session::new(id.clone()))
    }
}

/// インメモリ Session Repository 実装
///
/// セッションは削除されません（プロセスの寿命の間だけ保持する）。
pub struct InMemorySessionRepository {
    table: Mutex<SessionTable>,
    ids: IdFactory,
    policy: RateLimitPolicy,
}

impl InMemorySessionRepository {
    /// 新しい InMemorySessionRepository を作成
    pub fn new(ids: IdFactory, policy: RateLimitPolicy) -> Self {
        Self {
            table: Mutex::new(SessionTable::default()),
            ids,
            policy,
        }
    }
}

impl Default for InMemorySessionRepository {
    fn default() -> Self {
        Self::new(IdFactory::system(), RateLimitPolicy::default())
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn resolve(&self, token: Option<&str>) -> ResolvedSession {
        let mut table = self.table.lock().await;

        if let Some(token) = token.map(SessionToken::new)
            && let Some(id) = table.tokens.get(&token)
        {
            return ResolvedSession {
                id: id.clone(),
                token,
                minted: false,
            };
        }

        let token = loop {
            let candidate = self.ids.session_token();
            if !table.tokens.contains_key(&candidate) {
                break candidate;
            }
        };
        let id = loop {
            let candidate = self.ids.session_id();
            if !table.sessions.contains_key(&candidate) {
                break candidate;
            }
        };

        table.tokens.insert(token.clone(), id.clone());
        table.sessions.insert(id.clone(), Session::new(id.clone()));
        tracing::debug!("Minted session '{}'", id);

        ResolvedSession {
            token,
            id,
            minted: true,
        }
    }

    async fn nickname(&self, id: &SessionId) -> Nickname {
        let table = self.table.lock().await;
        table
            .sessions
            .get(id)
            .map(Session::display_nickname)
            .unwrap_or_else(Nickname::anonymous)
    }

    async fn author(&self, id: &SessionId) -> Author {
        let table = self.table.lock().await;
        table
            .sessions
            .get(id)
            .map(Session::author)
            .unwrap_or_else(|| Session::new(id.clone()).author())
    }

    async fn set_nickname(
        &self,
        id: &SessionId,
        nickname: Nickname,
    ) -> Result<NicknameChange, NicknameError> {
        let mut table = self.table.lock().await;

        let taken = table
            .sessions
            .values()
            .any(|s| &s.id != id && s.nickname.as_ref() == Some(&nickname));
        if taken {
            return Err(NicknameError::Taken(nickname.into_string()));
        }

        let session = table.session_mut(id);
        let previous = session.nickname.replace(nickname.clone());
        if session.color.is_none() {
            session.color = Some(palette::random_auto_color());
        }

        Ok(NicknameChange {
            previous,
            current: nickname,
        })
    }

    async fn set_color(&self, id: &SessionId, spec: &str) -> Result<Color, ColorError> {
        let color = Color::parse(spec)?;

        let mut table = self.table.lock().await;
        table.session_mut(id).color = Some(color.clone());
        Ok(color)
    }

    async fn list_members(&self) -> Vec<Member> {
        let table = self.table.lock().await;
        let mut members: Vec<Member> = table
            .sessions
            .values()
            .filter_map(|s| {
                s.nickname.as_ref().map(|nickname| Member {
                    id: s.id.clone(),
                    nickname: nickname.clone(),
                })
            })
            .collect();
        drop(table);

        members.sort_by(|a, b| {
            a.nickname
                .as_str()
                .cmp(b.nickname.as_str())
                .then_with(|| a.id.cmp(&b.id))
        });
        members
    }

    async fn find_by_nickname(&self, nickname: &str) -> Option<SessionId> {
        let table = self.table.lock().await;
        // Nicknames are unique, so the ordering only matters if that ever changes.
        table
            .sessions
            .values()
            .filter(|s| s.nickname.as_ref().is_some_and(|n| n.as_str() == nickname))
            .map(|s| s.id.clone())
            .min()
    }

    async fn admit(&self, id: &SessionId, now: Timestamp) -> Decision {
        let mut table = self.table.lock().await;
        let session = table.session_mut(id);
        self.policy.evaluate(&mut session.spam, now)
    }
}
