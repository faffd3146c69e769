//! エラー型定義
//!
//! 失敗の種類（通信・バックエンド拒否・ローカル検証・想定外レスポンス）を
//! 一つの型にまとめ、画面側は `user_message` で表示文字列に変換する。

use serde_json::Value;
use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Backend error ({status}): {}", detail.as_deref().unwrap_or("no detail"))]
    Backend { status: u16, detail: Option<String> },

    #[error("Session expired")]
    SessionExpired,

    #[error("{0}")]
    Validation(String),

    #[error("Unexpected response: {0}")]
    MalformedResponse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// エラー分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Backend,
    Validation,
    Malformed,
    Storage,
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please log in again.";

impl Error {
    /// 非2xxレスポンスからエラーを組み立てる
    pub fn from_response(status: u16, body: &str) -> Self {
        Error::Backend {
            status,
            detail: extract_detail(body),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Network(_) => ErrorKind::Network,
            Error::Backend { .. } | Error::SessionExpired => ErrorKind::Backend,
            Error::Validation(_) => ErrorKind::Validation,
            Error::MalformedResponse(_) | Error::Json(_) => ErrorKind::Malformed,
            Error::Storage(_) => ErrorKind::Storage,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Error::Backend { status: 401, .. })
    }

    /// 画面表示用メッセージ
    ///
    /// バックエンドの `detail` > ローカル検証メッセージ > `fallback` の順で選ぶ。
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Error::Backend { detail: Some(detail), .. } => detail.clone(),
            Error::Validation(message) => message.clone(),
            Error::SessionExpired => SESSION_EXPIRED_MESSAGE.to_string(),
            _ => fallback.to_string(),
        }
    }
}

/// FastAPI形式のエラーボディから `detail` を取り出す
///
/// - `{"detail": "..."}` → そのまま
/// - `{"detail": [{"msg": "..."}, ...]}` → `msg` を "; " で連結
/// - それ以外の `detail` → JSON文字列化
pub fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let detail = value.get("detail")?;

    match detail {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(entries) => {
            let messages: Vec<&str> = entries
                .iter()
                .filter_map(|entry| entry.get("msg").and_then(Value::as_str))
                .collect();
            if messages.is_empty() {
                Some(detail.to_string())
            } else {
                Some(messages.join("; "))
            }
        }
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_detail_string() {
        let body = r#"{"detail": "Incorrect username or password"}"#;
        assert_eq!(
            extract_detail(body).as_deref(),
            Some("Incorrect username or password")
        );
    }

    #[test]
    fn test_extract_detail_validation_list() {
        let body = r#"{"detail": [
            {"loc": ["body", "weight_grams"], "msg": "field required", "type": "value_error.missing"},
            {"loc": ["body", "purity"], "msg": "value is not a valid float", "type": "type_error.float"}
        ]}"#;
        assert_eq!(
            extract_detail(body).as_deref(),
            Some("field required; value is not a valid float")
        );
    }

    #[test]
    fn test_extract_detail_non_json() {
        assert_eq!(extract_detail("<html>Bad Gateway</html>"), None);
        assert_eq!(extract_detail(""), None);
    }

    #[test]
    fn test_extract_detail_missing_or_blank() {
        assert_eq!(extract_detail(r#"{"message": "nope"}"#), None);
        assert_eq!(extract_detail(r#"{"detail": "  "}"#), None);
        assert_eq!(extract_detail(r#"{"detail": null}"#), None);
    }

    #[test]
    fn test_user_message_prefers_backend_detail() {
        let error = Error::from_response(400, r#"{"detail": "Username already registered"}"#);
        assert_eq!(
            error.user_message("Registration failed. Please try again."),
            "Username already registered"
        );
    }

    #[test]
    fn test_user_message_falls_back() {
        let error = Error::from_response(500, "Internal Server Error");
        assert_eq!(error.user_message("Failed to fetch items."), "Failed to fetch items.");

        let error = Error::Network("connection refused".to_string());
        assert_eq!(error.user_message("Failed to fetch items."), "Failed to fetch items.");
    }

    #[test]
    fn test_user_message_validation() {
        let error = Error::Validation("Passwords do not match".to_string());
        assert_eq!(error.user_message("ignored"), "Passwords do not match");
        assert_eq!(error.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_is_unauthorized() {
        assert!(Error::from_response(401, r#"{"detail": "Not authenticated"}"#).is_unauthorized());
        assert!(!Error::from_response(403, "").is_unauthorized());
        assert!(!Error::Network("timeout".into()).is_unauthorized());
    }

    #[test]
    fn test_error_display_backend() {
        let error = Error::from_response(422, "{}");
        assert_eq!(format!("{}", error), "Backend error (422): no detail");
    }

    #[test]
    fn test_error_from_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: Error = json_error.into();
        assert!(matches!(error, Error::Json(_)));
        assert_eq!(error.kind(), ErrorKind::Malformed);
    }
}
