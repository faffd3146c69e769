//! 画面に注入するセッションコンテキスト
//!
//! 保存の正は localStorage。`authenticated` シグナルはガードとナビゲーション
//! バーを再描画させるための通知用。

use crate::session_store::LocalStorageStore;
use arbitrage_common::{Credential, Error, GuardOutcome, Result, Route, Session};
use leptos::prelude::*;

#[derive(Clone, Copy)]
pub struct SessionContext {
    authenticated: RwSignal<bool>,
}

impl SessionContext {
    pub fn new() -> Self {
        let authenticated = Self::session().is_authenticated();
        Self {
            authenticated: RwSignal::new(authenticated),
        }
    }

    pub fn session() -> Session<LocalStorageStore> {
        Session::new(LocalStorageStore)
    }

    /// リアクティブに読む
    pub fn is_authenticated(&self) -> bool {
        self.authenticated.get() && Self::session().is_authenticated()
    }

    pub fn guard(&self, route: Route) -> GuardOutcome {
        self.authenticated.track();
        Self::session().guard(route)
    }

    pub fn authorization_header(&self) -> Option<String> {
        Self::session().authorization_header()
    }

    pub fn sign_in(&self, credential: &Credential) -> Result<()> {
        Self::session().store_credential(credential)?;
        self.authenticated.set(true);
        Ok(())
    }

    pub fn sign_out(&self) -> Result<()> {
        let result = Self::session().logout();
        self.authenticated.set(false);
        result
    }

    /// 401 を受けたときの強制ログアウト
    pub fn expire(&self) -> Error {
        let error = Self::session().expire();
        self.authenticated.set(false);
        error
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

pub fn use_session() -> SessionContext {
    expect_context::<SessionContext>()
}
