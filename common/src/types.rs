//! バックエンドとの共有データ型
//!
//! Web(WASM)とCLIで共有される型:
//! - Credential / TokenResponse: 認証情報
//! - DiscoveredItem: 発見アイテムの正規レコード
//! - 各画面の送信・結果DTO

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `/auth/token` のレスポンス
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
}

/// 認証済みセッションを表すトークン
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub access_token: String,
    pub token_type: String,
}

impl Credential {
    pub const DEFAULT_TOKEN_TYPE: &'static str = "bearer";

    pub fn new(access_token: impl Into<String>, token_type: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: token_type.into(),
        }
    }

    /// `Authorization` ヘッダ値（"<token_type> <access_token>"）
    pub fn authorization_header(&self) -> String {
        let token_type = if self.token_type.trim().is_empty() {
            Self::DEFAULT_TOKEN_TYPE
        } else {
            self.token_type.as_str()
        };
        format!("{} {}", token_type, self.access_token)
    }
}

impl From<TokenResponse> for Credential {
    fn from(response: TokenResponse) -> Self {
        Self::new(response.access_token, response.token_type)
    }
}

/// ログインフォーム（form-urlencoded で送信）
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn fields(&self) -> [(&'static str, &str); 2] {
        [("username", &self.username), ("password", &self.password)]
    }
}

/// `/auth/register/` のリクエストボディ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    pub password: String,
}

/// `/auth/users/me/` のレスポンス
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub username: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub disabled: Option<bool>,
}

/// 発見アイテム（バックエンド所有の正規レコード）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscoveredItem {
    pub id: i64,

    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub description: Option<String>,

    /// AI解析テキスト、または住所を含むJSON（`analysis::parse_analysis` 参照）
    #[serde(default)]
    pub analysis: Option<String>,

    #[serde(default)]
    pub status: String,

    #[serde(default)]
    pub score: Option<f64>,

    #[serde(default)]
    pub latitude: Option<f64>,

    #[serde(default)]
    pub longitude: Option<f64>,

    /// 画像URLリストのJSON文字列
    #[serde(default)]
    pub image_urls: Option<String>,

    #[serde(default)]
    pub image_analysis_results: Option<String>,

    #[serde(default)]
    pub roi_analysis: Option<String>,
}

impl DiscoveredItem {
    /// 緯度・経度が両方そろっている場合のみ位置ありとみなす
    pub fn location(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some((lat, lng)),
            _ => None,
        }
    }
}

/// `/discover/` が返す作成済みアイテムの参照
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemReference {
    pub id: Option<i64>,
    pub url: String,
    pub status: String,
}

/// `/discover_multiple/` のリクエストボディ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchDiscoveryRequest {
    pub urls: Vec<String>,
}

/// バッチ発見のURLごとの結果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryOutcome {
    pub url: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<i64>,
    /// 失敗理由。バックエンドは文字列以外も返す。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
}

impl DiscoveryOutcome {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }

    /// 表示用の失敗理由。文字列はそのまま、それ以外はJSON文字列化。
    pub fn detail_text(&self) -> Option<String> {
        match self.detail.as_ref()? {
            Value::Null => None,
            Value::String(s) if s.trim().is_empty() => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// 1行表示用の要約
    pub fn summary(&self) -> String {
        let mut line = format!("URL: {} | Status: {}", self.url, self.status);
        if let Some(item_id) = self.item_id {
            line.push_str(&format!(" (Item ID: {})", item_id));
        }
        if let Some(detail) = self.detail_text() {
            line.push_str(&format!(" - {}", detail));
        }
        line
    }
}

/// 緯度経度
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    /// JSONオブジェクトから数値の `lat`/`lng` を読む
    pub fn from_value(value: &Value) -> Option<Self> {
        let lat = value.get("lat")?.as_f64()?;
        let lng = value.get("lng")?.as_f64()?;
        if lat.is_finite() && lng.is_finite() {
            Some(Self { lat, lng })
        } else {
            None
        }
    }
}

/// `/logistics/optimize_route/` のリクエストボディ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub coordinates: Vec<Coordinate>,
}

/// ルート最適化結果
///
/// `optimized_route` の形はバックエンドの外部サービス依存のため `Value` で受け、
/// `stops()` で読めるものだけを取り出す。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptimizedRoute {
    #[serde(default)]
    pub optimized_route: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl OptimizedRoute {
    pub fn stops(&self) -> Vec<Coordinate> {
        match &self.optimized_route {
            Some(Value::Array(entries)) => {
                entries.iter().filter_map(Coordinate::from_value).collect()
            }
            _ => Vec::new(),
        }
    }
}

/// `/valuation/calculate_roi/` のリクエストボディ
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoiRequest {
    pub weight_grams: f64,
    pub purity: f64,
    pub purchase_price: f64,
}

/// ROI計算結果
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoiResult {
    pub silver_value: f64,
    pub profit: f64,
    pub roi_percentage: f64,
}

impl RoiResult {
    pub fn is_profitable(&self) -> bool {
        self.profit > 0.0
    }

    pub fn melt_value_label(&self) -> String {
        format!("${:.2}", self.silver_value)
    }

    pub fn profit_label(&self) -> String {
        format!("${:.2}", self.profit)
    }

    pub fn roi_label(&self) -> String {
        format!("{:.2}%", self.roi_percentage)
    }
}

/// 画像解析で認識されたラベル
#[derive(Debug, Clone, PartialEq)]
pub struct HallmarkFinding {
    pub id: String,
    pub label: String,
    pub probability: f64,
}

impl HallmarkFinding {
    pub fn confidence_percent(&self) -> i64 {
        (self.probability * 100.0).round() as i64
    }

    pub fn summary(&self) -> String {
        format!("Found: {} with {}% confidence.", self.label, self.confidence_percent())
    }
}

/// `/verification/analyze_image/` のレスポンス
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
    #[serde(default)]
    pub records: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl VerificationResult {
    /// `records[]` から `_id` / `best_label.name` / `best_label.prob` を読めるものだけ返す
    pub fn findings(&self) -> Vec<HallmarkFinding> {
        let Some(Value::Array(records)) = &self.records else {
            return Vec::new();
        };

        records
            .iter()
            .filter_map(|record| {
                let best = record.get("best_label")?;
                let label = best.get("name")?.as_str()?.to_string();
                let probability = best.get("prob")?.as_f64()?;
                let id = match record.get("_id") {
                    Some(Value::String(s)) => s.clone(),
                    Some(Value::Null) | None => String::new(),
                    Some(other) => other.to_string(),
                };
                Some(HallmarkFinding { id, label, probability })
            })
            .collect()
    }
}
