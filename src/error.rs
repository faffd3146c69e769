use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ログインが必要です。`arbitrage-dash login` でログインしてください")]
    LoginRequired,

    /// バックエンド呼び出しの失敗。表示用メッセージは選択済み。
    #[error("{message}")]
    Api {
        message: String,
        #[source]
        source: arbitrage_common::Error,
    },

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("入力エラー: {0}")]
    Prompt(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

impl DashError {
    /// 共通エラーを表示用メッセージ付きで包む
    pub fn api(source: arbitrage_common::Error, fallback: &str) -> Self {
        let message = source.user_message(fallback);
        DashError::Api { message, source }
    }

    /// セッション切れで失敗したか
    pub fn is_session_expired(&self) -> bool {
        matches!(
            self,
            DashError::Api {
                source: arbitrage_common::Error::SessionExpired,
                ..
            }
        )
    }
}

impl From<arbitrage_common::Error> for DashError {
    fn from(source: arbitrage_common::Error) -> Self {
        let message = source.to_string();
        DashError::Api { message, source }
    }
}

pub type Result<T> = std::result::Result<T, DashError>;
