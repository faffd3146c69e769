//! 画面の状態遷移と生存トークン
//!
//! 状態: `Idle -> Loading -> (Loaded | Failed)`。Loaded/Failed は操作可能な
//! アイドル状態で、次の送信で再び Loading に入る。Loading 中の再送信は
//! `begin()` が拒否する（ボタンは無効化される）。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        ViewState::Idle
    }
}

impl<T> ViewState<T> {
    /// Loading に入る。すでに Loading なら false。
    pub fn begin(&mut self) -> bool {
        if self.is_loading() {
            return false;
        }
        *self = ViewState::Loading;
        true
    }

    pub fn succeed(&mut self, value: T) {
        *self = ViewState::Loaded(value);
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        *self = ViewState::Failed(message.into());
    }

    /// ローカル検証エラー用: Loading に入らずに失敗表示
    pub fn reject(&mut self, message: impl Into<String>) {
        if !self.is_loading() {
            self.fail(message);
        }
    }

    pub fn reset(&mut self) {
        *self = ViewState::Idle;
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            ViewState::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ViewState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// 画面の生存トークン
///
/// 画面の破棄時に `cancel()` し、非同期処理の結果は `is_alive()` の間だけ反映する。
#[derive(Debug, Clone)]
pub struct Liveness {
    alive: Arc<AtomicBool>,
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

impl Liveness {
    pub fn new() -> Self {
        Self {
            alive: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn cancel(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// 生存中なら `apply` を実行して true
    pub fn apply<F: FnOnce()>(&self, apply: F) -> bool {
        if self.is_alive() {
            apply();
            true
        } else {
            false
        }
    }
}
