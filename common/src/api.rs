//! バックエンドREST契約
//!
//! エンドポイントのメソッド・パス・認証要否と、ベースURLの解決。

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// ベースURLを上書きする環境変数
pub const API_URL_ENV: &str = "ARBITRAGE_API_URL";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// 利用するエンドポイント
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Token,
    Register,
    CurrentUser,
    Items,
    Discover,
    DiscoverMultiple,
    OptimizeRoute,
    CalculateRoi,
    AnalyzeImage,
}

impl Endpoint {
    pub fn method(&self) -> Method {
        match self {
            Endpoint::CurrentUser | Endpoint::Items => Method::Get,
            _ => Method::Post,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Token => "/auth/token",
            Endpoint::Register => "/auth/register/",
            Endpoint::CurrentUser => "/auth/users/me/",
            Endpoint::Items => "/items/",
            Endpoint::Discover => "/discover/",
            Endpoint::DiscoverMultiple => "/discover_multiple/",
            Endpoint::OptimizeRoute => "/logistics/optimize_route/",
            Endpoint::CalculateRoi => "/valuation/calculate_roi/",
            Endpoint::AnalyzeImage => "/verification/analyze_image/",
        }
    }

    /// 認証ヘッダを付けるか（ログイン・登録以外すべて）
    pub fn is_protected(&self) -> bool {
        !matches!(self, Endpoint::Token | Endpoint::Register)
    }
}

/// API接続設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

impl ApiConfig {
    pub fn new(base_url: &str) -> Self {
        let trimmed = base_url.trim().trim_end_matches('/');
        let base_url = if trimmed.is_empty() { DEFAULT_API_URL } else { trimmed };
        Self {
            base_url: base_url.to_string(),
        }
    }

    /// 環境変数などの任意値から。未設定・空ならデフォルト。
    pub fn from_override(value: Option<&str>) -> Self {
        value.map(Self::new).unwrap_or_default()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_base_url() {
        assert_eq!(ApiConfig::default().base_url(), "http://localhost:8000");
        assert_eq!(ApiConfig::from_override(None).base_url(), DEFAULT_API_URL);
        assert_eq!(ApiConfig::from_override(Some("  ")).base_url(), DEFAULT_API_URL);
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let config = ApiConfig::new("https://api.example.com/");
        assert_eq!(config.url(Endpoint::Items), "https://api.example.com/items/");
        assert_eq!(config.url(Endpoint::Token), "https://api.example.com/auth/token");
    }

    #[test]
    fn test_endpoint_contract() {
        assert_eq!(Endpoint::Items.method(), Method::Get);
        assert_eq!(Endpoint::CurrentUser.method(), Method::Get);
        assert_eq!(Endpoint::DiscoverMultiple.method(), Method::Post);
        assert_eq!(Endpoint::DiscoverMultiple.path(), "/discover_multiple/");
        assert!(!Endpoint::Token.is_protected());
        assert!(!Endpoint::Register.is_protected());
        assert!(Endpoint::OptimizeRoute.is_protected());
        assert!(Endpoint::AnalyzeImage.is_protected());
    }
}
