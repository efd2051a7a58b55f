//! UseCase: コマンド処理（`;help`, `;members`, `;whisper`, `;color`）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - parse_command(): コマンド文字列の解釈（大文字小文字、引数不足）
//! - ProcessCommandUseCase::execute(): 各コマンドの返信先と内容
//!
//! ### なぜこのテストが必要か
//! - コマンドの返信は必ず送信者（whisper は送信者と受信者）にだけ届き、
//!   ブロードキャストされないことを保証する
//!
//! ### どのような状況を想定しているか
//! - 正常系：各コマンドの実行
//! - 異常系：引数不足、whisper 先が存在しない、不正な色指定、未知のコマンド

use std::sync::Arc;

use crate::domain::{
    ChatMessage, Color, MessagePusher, SessionId, SessionRepository, escape_markup,
};

pub const HELP_TEXT: &str =
    "Available commands: ;help, ;members, ;whisper <username> <message>, ;color <hexcode|colorname>";
pub const WHISPER_USAGE: &str = "Usage: ;whisper <username> <message>";
pub const COLOR_USAGE: &str =
    "Usage: ;color <hexcode|colorname> (e.g., ;color #ff0000 or ;color red)";
pub const INVALID_COLOR_TEXT: &str =
    "Invalid color format. Use hexadecimal format like #ff0000 or predefined names like red";

/// 解釈済みのコマンド
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<'a> {
    Help,
    Members,
    Whisper { target: &'a str, text: String },
    Color { spec: &'a str },
    /// 引数が不足・過剰なコマンド（使い方を返す）
    Usage(&'static str),
    Unknown,
}

/// `;` で始まる入力をコマンドとして解釈する（コマンド名は大文字小文字を区別しない）
pub fn parse_command(raw: &str) -> Command<'_> {
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    let Some(name) = tokens.first() else {
        return Command::Unknown;
    };

    match name.to_ascii_lowercase().as_str() {
        ";help" => Command::Help,
        ";members" => Command::Members,
        ";whisper" => match tokens.as_slice() {
            [_, target, rest @ ..] if !rest.is_empty() => Command::Whisper {
                target: *target,
                text: rest.join(" "),
            },
            _ => Command::Usage(WHISPER_USAGE),
        },
        ";color" => match tokens.as_slice() {
            [_, spec] => Command::Color { spec: *spec },
            _ => Command::Usage(COLOR_USAGE),
        },
        _ => Command::Unknown,
    }
}

/// コマンド実行の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandReply {
    Help,
    Members(usize),
    Whispered { recipient: SessionId },
    WhisperTargetNotFound,
    ColorChanged(Color),
    ColorRejected,
    Usage,
    Unknown,
}

/// コマンド処理のユースケース
pub struct ProcessCommandUseCase {
    /// Repository（セッション状態）
    sessions: Arc<dyn SessionRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl ProcessCommandUseCase {
    /// 新しい ProcessCommandUseCase を作成
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            sessions,
            message_pusher,
        }
    }

    /// コマンドを実行し、結果を送信者へ private メッセージで返す
    ///
    /// # Arguments
    ///
    /// * `sender` - コマンドを送ったセッション
    /// * `raw` - `;` で始まる入力全体
    pub async fn execute(&self, sender: &SessionId, raw: &str) -> CommandReply {
        match parse_command(raw) {
            Command::Help => {
                self.reply(sender, HELP_TEXT.to_string()).await;
                CommandReply::Help
            }
            Command::Members => {
                let members = self.sessions.list_members().await;
                let listing: String = members
                    .iter()
                    .map(|m| {
                        format!(
                            " [{}] ({})",
                            escape_markup(m.nickname.as_str()),
                            escape_markup(m.id.as_str())
                        )
                    })
                    .collect();
                self.reply(sender, format!("Online members{}", listing))
                    .await;
                CommandReply::Members(members.len())
            }
            Command::Whisper { target, text } => self.whisper(sender, target, &text).await,
            Command::Color { spec } => match self.sessions.set_color(sender, spec).await {
                Ok(color) => {
                    self.reply(
                        sender,
                        format!("Your nickname color has been changed to {}", color),
                    )
                    .await;
                    CommandReply::ColorChanged(color)
                }
                Err(e) => {
                    tracing::debug!("Rejected color for '{}': {}", sender, e);
                    self.reply(sender, INVALID_COLOR_TEXT.to_string()).await;
                    CommandReply::ColorRejected
                }
            },
            Command::Usage(usage) => {
                self.reply(sender, usage.to_string()).await;
                CommandReply::Usage
            }
            Command::Unknown => {
                self.reply(sender, format!("Unknown command: {}", escape_markup(raw)))
                    .await;
                CommandReply::Unknown
            }
        }
    }

    async fn whisper(&self, sender: &SessionId, target: &str, text: &str) -> CommandReply {
        let Some(recipient) = self.sessions.find_by_nickname(target).await else {
            self.reply(
                sender,
                format!("User {} not found", escape_markup(target)),
            )
            .await;
            return CommandReply::WhisperTargetNotFound;
        };

        let from = self.sessions.nickname(sender).await;
        let body = ChatMessage::app_private(format!(
            "(whisper to @{}) [{}]: {}",
            escape_markup(target),
            escape_markup(from.as_str()),
            escape_markup(text)
        ));

        self.message_pusher.unicast(&recipient, &body).await;
        if &recipient != sender {
            self.message_pusher.unicast(sender, &body).await;
        }
        CommandReply::Whispered { recipient }
    }

    async fn reply(&self, sender: &SessionId, text: String) {
        self.message_pusher
            .unicast(sender, &ChatMessage::app_private(text))
            .await;
    }
}
