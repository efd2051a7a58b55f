//! 値オブジェクト
//!
//! セッション識別子・ニックネーム・色・Blob ID・タイムスタンプなど、
//! 不変で検証済みの値を表現します。

use std::fmt;

use super::{
    error::{ColorError, NicknameError},
    palette,
};

/// 公開セッション ID
///
/// メンバー一覧やメッセージの author に表示される識別子。
/// Cookie に載る [`SessionToken`] とは別の値です。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// セッショントークン（Cookie に保存される秘密の値）
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Keep tokens out of log output.
impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(..)")
    }
}

/// ニックネーム
///
/// 空文字列と空白文字を含む文字列は受け付けません。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Nickname(String);

impl Nickname {
    /// ニックネーム未設定のセッションに表示される名前
    pub const ANONYMOUS: &'static str = "anonymous";

    pub fn new(value: impl Into<String>) -> Result<Self, NicknameError> {
        let value = value.into();
        if value.is_empty() {
            return Err(NicknameError::Empty);
        }
        if value.chars().any(char::is_whitespace) {
            return Err(NicknameError::ContainsWhitespace);
        }
        Ok(Self(value))
    }

    pub fn anonymous() -> Self {
        Self(Self::ANONYMOUS.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Nickname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Nickname {
    type Error = NicknameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// 表示色（常に小文字の `#rrggbb` 形式で保持）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Color(String);

impl Color {
    /// `#RRGGBB` リテラル、または名前付きカラー表の名前（大文字小文字を区別しない）を解釈する
    pub fn parse(spec: &str) -> Result<Self, ColorError> {
        if let Some(hex) = palette::lookup_named_color(spec) {
            return Ok(Self(hex.to_string()));
        }
        Self::from_hex(spec)
    }

    /// `#RRGGBB` リテラルのみを受け付ける
    pub fn from_hex(literal: &str) -> Result<Self, ColorError> {
        let digits = literal
            .strip_prefix('#')
            .ok_or_else(|| ColorError::InvalidFormat(literal.to_string()))?;
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorError::InvalidFormat(literal.to_string()));
        }
        Ok(Self(format!("#{}", digits.to_ascii_lowercase())))
    }

    /// Caller guarantees `hex` is already a lowercase `#rrggbb` literal.
    pub(crate) fn new_unchecked(hex: &str) -> Self {
        Self(hex.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// アップロード画像の ID（`<unix ミリ秒>-<サフィックス>`）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlobId(String);

impl BlobId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for BlobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 時刻（ミリ秒）
///
/// 尺度は値を作った側が決める。`Clock` の読みなら差分だけが意味を持つ。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn add_millis(&self, millis: i64) -> Self {
        Self(self.0.saturating_add(millis))
    }

    /// `earlier` からの経過ミリ秒
    pub fn millis_since(&self, earlier: Timestamp) -> i64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nickname_rejects_empty() {
        // テスト項目: 空のニックネームは拒否される
        // given (前提条件):
        let input = String::new();

        // when (操作):
        let result = Nickname::new(input);

        // then (期待する結果):
        assert_eq!(result, Err(NicknameError::Empty));
    }

    #[test]
    fn test_nickname_rejects_whitespace() {
        // テスト項目: 空白文字（スペース・タブ）を含むニックネームは拒否される
        // given (前提条件):
        let inputs = ["alice smith", "alice\tsmith", " alice"];

        // when (操作) / then (期待する結果):
        for input in inputs {
            assert_eq!(
                Nickname::new(input),
                Err(NicknameError::ContainsWhitespace),
                "input: {:?}",
                input
            );
        }
    }

    #[test]
    fn test_nickname_accepts_plain_name() {
        // テスト項目: 通常の名前は受け付けられる
        // when (操作):
        let nickname = Nickname::new("alice").unwrap();

        // then (期待する結果):
        assert_eq!(nickname.as_str(), "alice");
    }

    #[test]
    fn test_color_from_hex_normalizes_case() {
        // テスト項目: 16 進カラーは小文字に正規化される
        // when (操作):
        let color = Color::parse("#FF00aA").unwrap();

        // then (期待する結果):
        assert_eq!(color.as_str(), "#ff00aa");
    }

    #[test]
    fn test_color_from_named_palette_is_case_insensitive() {
        // テスト項目: 名前付きカラーは大文字小文字を区別せず解決される
        // when (操作):
        let red = Color::parse("Red").unwrap();
        let sky = Color::parse("SKYBLUE").unwrap();

        // then (期待する結果):
        assert_eq!(red.as_str(), "#ff0000");
        assert_eq!(sky.as_str(), "#87ceeb");
    }

    #[test]
    fn test_color_rejects_invalid_specs() {
        // テスト項目: 不正なカラー指定は拒否される
        // given (前提条件):
        let inputs = ["", "ff0000", "#ff00", "#ff00000", "#gggggg", "notacolor"];

        // when (操作) / then (期待する結果):
        for input in inputs {
            assert!(
                matches!(Color::parse(input), Err(ColorError::InvalidFormat(_))),
                "input: {:?}",
                input
            );
        }
    }

    #[test]
    fn test_timestamp_arithmetic() {
        // テスト項目: タイムスタンプの加算と差分
        // given (前提条件):
        let start = Timestamp::new(1_000);

        // when (操作):
        let later = start.add_millis(2_500);

        // then (期待する結果):
        assert_eq!(later.value(), 3_500);
        assert_eq!(later.millis_since(start), 2_500);
        assert!(start < later);
    }

    #[test]
    fn test_session_token_debug_is_redacted() {
        // テスト項目: SessionToken の Debug 出力にトークン本体が含まれない
        // given (前提条件):
        let token = SessionToken::new("super-secret");

        // when (操作):
        let debug = format!("{:?}", token);

        // then (期待する結果):
        assert!(!debug.contains("super-secret"));
    }
}
