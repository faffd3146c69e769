//! セッションガード
//!
//! 認証トークンの保存・削除と、保護された画面へのアクセス判定を行う。
//! 保存先は `SessionStore` で差し替える（Web: localStorage、CLI: JSONファイル、
//! テスト: メモリ）。セッションは各画面に注入して使い、グローバル参照はしない。

use crate::error::{Error, Result};
use crate::types::{Credential, RegisterRequest};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const TOKEN_TYPE_KEY: &str = "token_type";

/// 登録成功からログイン画面へ遷移するまでの待ち時間
pub const REGISTER_REDIRECT_DELAY: Duration = Duration::from_secs(2);

pub const LOGIN_FAILED_MESSAGE: &str = "Login failed. Please check your credentials.";
pub const REGISTER_FAILED_MESSAGE: &str = "Registration failed. Please try again.";
pub const PASSWORD_MISMATCH_MESSAGE: &str = "Passwords do not match";

/// 永続キー・バリューストア
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// メモリ上のストア（テスト・一時利用）
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .map_err(|e| Error::Storage(e.to_string()))?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries
            .lock()
            .map_err(|e| Error::Storage(e.to_string()))?
            .remove(key);
        Ok(())
    }
}

/// 画面（クライアント側ルート）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Register,
    Dashboard,
    Discover,
    MultiDiscover,
    Logistics,
    Verification,
    Valuation,
}

impl Route {
    pub const ALL: [Route; 8] = [
        Route::Login,
        Route::Register,
        Route::Dashboard,
        Route::Discover,
        Route::MultiDiscover,
        Route::Logistics,
        Route::Verification,
        Route::Valuation,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Dashboard => "/",
            Route::Discover => "/discover",
            Route::MultiDiscover => "/multi-discover",
            Route::Logistics => "/logistics",
            Route::Verification => "/verification",
            Route::Valuation => "/valuation",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Login => "Login",
            Route::Register => "Register",
            Route::Dashboard => "Dashboard",
            Route::Discover => "Discovery",
            Route::MultiDiscover => "Multi-Discovery",
            Route::Logistics => "Logistics",
            Route::Verification => "Verification",
            Route::Valuation => "Valuation",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        let normalized = match path.trim_end_matches('/') {
            "" => "/",
            other => other,
        };
        Self::ALL.into_iter().find(|route| route.path() == normalized)
    }

    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Login | Route::Register)
    }

    /// ナビゲーションバーに並べる保護画面
    pub fn navigation() -> impl Iterator<Item = Route> {
        Self::ALL.into_iter().filter(Route::is_protected)
    }
}

/// ガード判定結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    Render(Route),
    Redirect(Route),
}

/// 注入されるセッション
#[derive(Debug, Clone)]
pub struct Session<S> {
    store: S,
}

impl<S: SessionStore> Session<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// ログイン成功時の保存（唯一の書き込み経路）
    pub fn store_credential(&self, credential: &Credential) -> Result<()> {
        self.store.set(ACCESS_TOKEN_KEY, &credential.access_token)?;
        self.store.set(TOKEN_TYPE_KEY, &credential.token_type)?;
        Ok(())
    }

    pub fn credential(&self) -> Option<Credential> {
        let access_token = self.store.get(ACCESS_TOKEN_KEY).filter(|t| !t.is_empty())?;
        let token_type = self
            .store
            .get(TOKEN_TYPE_KEY)
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| Credential::DEFAULT_TOKEN_TYPE.to_string());
        Some(Credential::new(access_token, token_type))
    }

    /// 空でないトークンが保存されていればログイン済み（有効期限は見ない）
    pub fn is_authenticated(&self) -> bool {
        self.credential().is_some()
    }

    pub fn authorization_header(&self) -> Option<String> {
        self.credential().map(|c| c.authorization_header())
    }

    pub fn guard(&self, route: Route) -> GuardOutcome {
        if route.is_protected() && !self.is_authenticated() {
            GuardOutcome::Redirect(Route::Login)
        } else {
            GuardOutcome::Render(route)
        }
    }

    pub fn logout(&self) -> Result<()> {
        self.store.remove(ACCESS_TOKEN_KEY)?;
        self.store.remove(TOKEN_TYPE_KEY)?;
        Ok(())
    }

    /// 保護APIが401を返したときの強制ログアウト
    pub fn expire(&self) -> Error {
        match self.logout() {
            Ok(()) => Error::SessionExpired,
            Err(e) => e,
        }
    }
}

/// 登録フォーム
#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterForm {
    /// 送信前のローカル検証。パスワード不一致ならネットワークに出ない。
    pub fn validate(&self) -> Result<RegisterRequest> {
        if self.password != self.confirm_password {
            return Err(Error::Validation(PASSWORD_MISMATCH_MESSAGE.to_string()));
        }

        let full_name = Some(self.full_name.trim())
            .filter(|name| !name.is_empty())
            .map(str::to_string);

        Ok(RegisterRequest {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
            full_name,
            password: self.password.clone(),
        })
    }
}
