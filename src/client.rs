//! バックエンドAPIクライアント（reqwest）
//!
//! 保護エンドポイントにはセッションのトークンを付け、401 が返ったら
//! セッションを破棄して `Error::SessionExpired` を返す。

use arbitrage_common::{
    ApiConfig, BatchDiscoveryRequest, Credential, DiscoveredItem, DiscoveryOutcome, Endpoint,
    Error, ItemReference, LoginForm, Method, OptimizedRoute, RegisterRequest, Result, RoiRequest,
    RoiResult, RouteRequest, Session, SessionStore, TokenResponse, UserProfile,
    VerificationResult,
};
use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

fn network(e: reqwest::Error) -> Error {
    Error::Network(e.to_string())
}

pub struct ApiClient<S> {
    http: reqwest::Client,
    api: ApiConfig,
    session: Session<S>,
}

impl<S: SessionStore> ApiClient<S> {
    pub fn new(api: ApiConfig, session: Session<S>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api,
            session,
        }
    }

    pub fn api(&self) -> &ApiConfig {
        &self.api
    }

    pub fn session(&self) -> &Session<S> {
        &self.session
    }

    fn request(&self, endpoint: Endpoint) -> RequestBuilder {
        let method = match endpoint.method() {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        };
        let builder = self.http.request(method, self.api.url(endpoint));

        if !endpoint.is_protected() {
            return builder;
        }
        match self.session.authorization_header() {
            Some(authorization) => builder.header(AUTHORIZATION, authorization),
            None => builder,
        }
    }

    /// 送信して非2xxをエラーに変換する
    async fn send(&self, endpoint: Endpoint, builder: RequestBuilder) -> Result<Response> {
        debug!(method = endpoint.method().as_str(), path = endpoint.path(), "request");
        let resp = builder.send().await.map_err(network)?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        let error = Error::from_response(status.as_u16(), &body);
        warn!(path = endpoint.path(), status = status.as_u16(), "{}", error);
        if endpoint.is_protected() && error.is_unauthorized() {
            return Err(self.session.expire());
        }
        Err(error)
    }

    async fn call<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        builder: RequestBuilder,
    ) -> Result<T> {
        let resp = self.send(endpoint, builder).await?;
        let text = resp.text().await.map_err(network)?;
        serde_json::from_str(&text).map_err(|e| Error::MalformedResponse(e.to_string()))
    }

    /// ログイン: 成功時のみトークンを保存
    pub async fn login(&self, form: &LoginForm) -> Result<Credential> {
        let builder = self.request(Endpoint::Token).form(&form.fields());
        let token: TokenResponse = self.call(Endpoint::Token, builder).await?;
        let credential = Credential::from(token);
        if credential.access_token.is_empty() {
            return Err(Error::MalformedResponse("access_token が空です".into()));
        }
        self.session.store_credential(&credential)?;
        Ok(credential)
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<()> {
        let builder = self.request(Endpoint::Register).json(request);
        self.send(Endpoint::Register, builder).await?;
        Ok(())
    }

    pub async fn current_user(&self) -> Result<UserProfile> {
        let builder = self.request(Endpoint::CurrentUser);
        self.call(Endpoint::CurrentUser, builder).await
    }

    pub async fn list_items(&self) -> Result<Vec<DiscoveredItem>> {
        let builder = self.request(Endpoint::Items);
        self.call(Endpoint::Items, builder).await
    }

    pub async fn discover(&self, url: &str) -> Result<ItemReference> {
        let builder = self.request(Endpoint::Discover).query(&[("url", url)]);
        self.call(Endpoint::Discover, builder).await
    }

    pub async fn discover_multiple(&self, urls: Vec<String>) -> Result<Vec<DiscoveryOutcome>> {
        let builder = self
            .request(Endpoint::DiscoverMultiple)
            .json(&BatchDiscoveryRequest { urls });
        self.call(Endpoint::DiscoverMultiple, builder).await
    }

    pub async fn optimize_route(&self, request: &RouteRequest) -> Result<OptimizedRoute> {
        let builder = self.request(Endpoint::OptimizeRoute).json(request);
        self.call(Endpoint::OptimizeRoute, builder).await
    }

    pub async fn calculate_roi(&self, request: &RoiRequest) -> Result<RoiResult> {
        let builder = self.request(Endpoint::CalculateRoi).json(request);
        self.call(Endpoint::CalculateRoi, builder).await
    }

    pub async fn analyze_image(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<VerificationResult> {
        let part = Part::bytes(bytes).file_name(file_name.to_string());
        let builder = self
            .request(Endpoint::AnalyzeImage)
            .multipart(Form::new().part("file", part));
        self.call(Endpoint::AnalyzeImage, builder).await
    }
}
