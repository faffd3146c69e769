//! バックエンドAPI呼び出し（fetch）
//!
//! 保護エンドポイントには保存済みトークンを `Authorization` に付け、
//! 401 が返ったらセッションを破棄して `Error::SessionExpired` を返す。

use crate::session::SessionContext;
use arbitrage_common::{
    ApiConfig, BatchDiscoveryRequest, Credential, DiscoveredItem, DiscoveryOutcome, Endpoint,
    Error, ItemReference, LoginForm, OptimizedRoute, RegisterRequest, Result, RoiRequest,
    RoiResult, RouteRequest, TokenResponse, VerificationResult,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    File, FormData, Headers, Request, RequestInit, RequestMode, Response, UrlSearchParams,
};

/// リクエストボディ
enum Body {
    Empty,
    Json(String),
    Form(UrlSearchParams),
    Multipart(FormData),
}

#[derive(Clone, Copy)]
pub struct ApiClient {
    session: SessionContext,
}

/// ビルド時の `ARBITRAGE_API_URL`、未指定なら localhost:8000
pub fn api_config() -> ApiConfig {
    ApiConfig::from_override(option_env!("ARBITRAGE_API_URL"))
}

fn js_error(e: JsValue) -> Error {
    Error::Network(e.as_string().unwrap_or_else(|| format!("{:?}", e)))
}

fn malformed(e: JsValue) -> Error {
    Error::MalformedResponse(e.as_string().unwrap_or_else(|| format!("{:?}", e)))
}

fn to_json<T: Serialize>(value: &T) -> Result<Body> {
    Ok(Body::Json(serde_json::to_string(value)?))
}

impl ApiClient {
    pub fn new(session: SessionContext) -> Self {
        Self { session }
    }

    /// 共通の送信処理
    async fn send(&self, endpoint: Endpoint, query: Option<String>, body: Body) -> Result<JsValue> {
        let mut url = api_config().url(endpoint);
        if let Some(query) = query {
            url.push('?');
            url.push_str(&query);
        }

        let opts = RequestInit::new();
        opts.set_method(endpoint.method().as_str());
        opts.set_mode(RequestMode::Cors);

        let headers = Headers::new().map_err(js_error)?;
        match &body {
            Body::Empty => {}
            Body::Json(text) => {
                headers.set("Content-Type", "application/json").map_err(js_error)?;
                opts.set_body(&JsValue::from_str(text));
            }
            Body::Form(params) => {
                headers
                    .set("Content-Type", "application/x-www-form-urlencoded")
                    .map_err(js_error)?;
                opts.set_body(params.as_ref());
            }
            // Content-Type はブラウザが boundary 付きで設定する
            Body::Multipart(form) => opts.set_body(form.as_ref()),
        }
        if endpoint.is_protected() {
            if let Some(authorization) = self.session.authorization_header() {
                headers.set("Authorization", &authorization).map_err(js_error)?;
            }
        }
        opts.set_headers(headers.as_ref());

        let request = Request::new_with_str_and_init(&url, &opts).map_err(js_error)?;
        let window = web_sys::window().ok_or_else(|| Error::Network("window が取得できません".into()))?;
        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(js_error)?;
        let resp: Response = resp_value.dyn_into().map_err(js_error)?;

        if !resp.ok() {
            let text = match resp.text() {
                Ok(promise) => JsFuture::from(promise).await.ok().and_then(|v| v.as_string()),
                Err(_) => None,
            };
            let error = Error::from_response(resp.status(), text.as_deref().unwrap_or_default());
            let method = endpoint.method().as_str();
            gloo::console::warn!(format!("{} {} -> {}", method, endpoint.path(), error));
            if endpoint.is_protected() && error.is_unauthorized() {
                return Err(self.session.expire());
            }
            return Err(error);
        }

        JsFuture::from(resp.json().map_err(malformed)?)
            .await
            .map_err(malformed)
    }

    async fn call<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        query: Option<String>,
        body: Body,
    ) -> Result<T> {
        let value = self.send(endpoint, query, body).await?;
        serde_wasm_bindgen::from_value(value).map_err(|e| Error::MalformedResponse(e.to_string()))
    }

    /// ログイン: 成功時のみトークンを保存
    pub async fn login(&self, form: &LoginForm) -> Result<Credential> {
        let params = UrlSearchParams::new().map_err(js_error)?;
        for (key, value) in form.fields() {
            params.append(key, value);
        }
        let token: TokenResponse = self.call(Endpoint::Token, None, Body::Form(params)).await?;
        let credential = Credential::from(token);
        if credential.access_token.is_empty() {
            return Err(Error::MalformedResponse("access_token が空です".into()));
        }
        self.session.sign_in(&credential)?;
        Ok(credential)
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<()> {
        self.send(Endpoint::Register, None, to_json(request)?).await?;
        Ok(())
    }

    pub async fn list_items(&self) -> Result<Vec<DiscoveredItem>> {
        self.call(Endpoint::Items, None, Body::Empty).await
    }

    pub async fn discover(&self, url: &str) -> Result<ItemReference> {
        let query = format!("url={}", String::from(js_sys::encode_uri_component(url)));
        self.call(Endpoint::Discover, Some(query), Body::Empty).await
    }

    pub async fn discover_multiple(&self, urls: Vec<String>) -> Result<Vec<DiscoveryOutcome>> {
        let body = to_json(&BatchDiscoveryRequest { urls })?;
        self.call(Endpoint::DiscoverMultiple, None, body).await
    }

    pub async fn optimize_route(&self, request: &RouteRequest) -> Result<OptimizedRoute> {
        self.call(Endpoint::OptimizeRoute, None, to_json(request)?).await
    }

    pub async fn calculate_roi(&self, request: &RoiRequest) -> Result<RoiResult> {
        self.call(Endpoint::CalculateRoi, None, to_json(request)?).await
    }

    pub async fn analyze_image(&self, file: &File) -> Result<VerificationResult> {
        let form = FormData::new().map_err(js_error)?;
        form.append_with_blob_and_filename("file", file, &file.name())
            .map_err(js_error)?;
        self.call(Endpoint::AnalyzeImage, None, Body::Multipart(form)).await
    }
}

pub fn use_api() -> ApiClient {
    ApiClient::new(crate::session::use_session())
}
