//! 連投制限のポリシー
//!
//! トークンバケットではなく「連続した速い投稿」を数えるカウンタ方式です。
//! ウィンドウ内の投稿が閾値に達すると、投稿間隔がウィンドウ以上空くまで
//! 全ての投稿が拒否されます（緩やかな間引きではなく、ハードストップ）。

use super::value_object::Timestamp;

/// 連投判定の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Throttle,
}

/// セッションごとの連投カウンタ
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpamState {
    /// 最後に受理したメッセージの時刻
    pub last_message_at: Option<Timestamp>,
    /// ウィンドウ内で連続した投稿の回数
    pub consecutive_fast_messages: u32,
}

/// 連投制限のパラメータ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    window_millis: i64,
    threshold: u32,
}

impl RateLimitPolicy {
    pub const DEFAULT_WINDOW_MILLIS: i64 = 2_000;
    pub const DEFAULT_THRESHOLD: u32 = 5;

    pub fn new(window_millis: i64, threshold: u32) -> Self {
        Self {
            window_millis,
            threshold,
        }
    }

    pub fn window_millis(&self) -> i64 {
        self.window_millis
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// `now` の投稿を評価し、`state` を更新する
    ///
    /// Throttle の場合は `last_message_at` を更新しない。
    pub fn evaluate(&self, state: &mut SpamState, now: Timestamp) -> Decision {
        match state.last_message_at {
            Some(last) if now.millis_since(last) < self.window_millis => {
                state.consecutive_fast_messages = state.consecutive_fast_messages.saturating_add(1);
                if state.consecutive_fast_messages >= self.threshold {
                    return Decision::Throttle;
                }
            }
            _ => state.consecutive_fast_messages = 0,
        }
        state.last_message_at = Some(now);
        Decision::Allow
    }
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WINDOW_MILLIS, Self::DEFAULT_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(policy: &RateLimitPolicy, state: &mut SpamState, times: &[i64]) -> Vec<Decision> {
        times
            .iter()
            .map(|t| policy.evaluate(state, Timestamp::new(*t)))
            .collect()
    }

    #[test]
    fn test_first_message_is_allowed() {
        // テスト項目: 初回の投稿は常に許可される
        // given (前提条件):
        let policy = RateLimitPolicy::default();
        let mut state = SpamState::default();

        // when (操作):
        let decision = policy.evaluate(&mut state, Timestamp::new(0));

        // then (期待する結果):
        assert_eq!(decision, Decision::Allow);
        assert_eq!(state.last_message_at, Some(Timestamp::new(0)));
        assert_eq!(state.consecutive_fast_messages, 0);
    }

    #[test]
    fn test_burst_is_throttled_once_strikes_reach_threshold() {
        // テスト項目: 0.5 秒間隔の連投は 5 回目の速い投稿（6 通目）で拒否される
        // given (前提条件): window = 2.0s, threshold = 5
        let policy = RateLimitPolicy::default();
        let mut state = SpamState::default();

        // when (操作): t = 0, 0.5, 1.0, 1.5, 2.0, 2.5
        let decisions = run(&policy, &mut state, &[0, 500, 1_000, 1_500, 2_000, 2_500]);

        // then (期待する結果):
        assert_eq!(
            decisions,
            vec![
                Decision::Allow,
                Decision::Allow,
                Decision::Allow,
                Decision::Allow,
                Decision::Allow,
                Decision::Throttle,
            ]
        );
        // 拒否された投稿は最終受理時刻を動かさない
        assert_eq!(state.last_message_at, Some(Timestamp::new(2_000)));
    }

    #[test]
    fn test_throttle_persists_while_client_keeps_posting_fast() {
        // テスト項目: 拒否後もウィンドウ内で投稿を続ける限り拒否され続ける
        // given (前提条件): 閾値に達した状態
        let policy = RateLimitPolicy::default();
        let mut state = SpamState::default();
        run(&policy, &mut state, &[0, 500, 1_000, 1_500, 2_000, 2_500]);

        // when (操作): 最終受理 (2.0s) からウィンドウ内の投稿
        let decisions = run(&policy, &mut state, &[3_000, 3_500, 3_999]);

        // then (期待する結果):
        assert_eq!(decisions, vec![Decision::Throttle; 3]);
    }

    #[test]
    fn test_slowing_down_resets_the_counter() {
        // テスト項目: ウィンドウ以上の間隔を空けるとカウンタがリセットされ許可される
        // given (前提条件): 閾値に達した状態（最終受理 2.0s）
        let policy = RateLimitPolicy::default();
        let mut state = SpamState::default();
        run(&policy, &mut state, &[0, 500, 1_000, 1_500, 2_000, 2_500]);

        // when (操作): 最終受理からちょうど 2.0s 後
        let decision = policy.evaluate(&mut state, Timestamp::new(4_000));

        // then (期待する結果):
        assert_eq!(decision, Decision::Allow);
        assert_eq!(state.consecutive_fast_messages, 0);
        assert_eq!(state.last_message_at, Some(Timestamp::new(4_000)));
    }

    #[test]
    fn test_custom_policy_threshold() {
        // テスト項目: 閾値 1 の場合、ウィンドウ内の 2 通目から拒否される
        // given (前提条件):
        let policy = RateLimitPolicy::new(1_000, 1);
        let mut state = SpamState::default();

        // when (操作):
        let decisions = run(&policy, &mut state, &[0, 100, 200, 1_200]);

        // then (期待する結果):
        assert_eq!(
            decisions,
            vec![
                Decision::Allow,
                Decision::Throttle,
                Decision::Throttle,
                Decision::Allow,
            ]
        );
    }
}
