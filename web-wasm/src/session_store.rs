//! localStorage によるトークン保存

use arbitrage_common::{Error, Result, SessionStore};
use web_sys::Storage;

/// `window.localStorage` を都度取得するストア
///
/// `web_sys::Storage` を保持しないので `Send + Sync` のままコンテキストに載せられる。
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    fn storage() -> Result<Storage> {
        web_sys::window()
            .ok_or_else(|| Error::Storage("window が取得できません".to_string()))?
            .local_storage()
            .map_err(|e| Error::Storage(format!("{:?}", e)))?
            .ok_or_else(|| Error::Storage("localStorage が利用できません".to_string()))
    }
}

impl SessionStore for LocalStorageStore {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage().ok()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|e| Error::Storage(format!("保存失敗: {:?}", e)))
    }

    fn remove(&self, key: &str) -> Result<()> {
        Self::storage()?
            .remove_item(key)
            .map_err(|e| Error::Storage(format!("削除失敗: {:?}", e)))
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use arbitrage_common::{Credential, Route, GuardOutcome, Session};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_local_storage_roundtrip() {
        let session = Session::new(LocalStorageStore);
        session.logout().expect("削除失敗");
        assert_eq!(session.guard(Route::Logistics), GuardOutcome::Redirect(Route::Login));

        session
            .store_credential(&Credential::new("tok", "bearer"))
            .expect("保存失敗");
        assert!(session.is_authenticated());
        assert_eq!(LocalStorageStore.get("access_token").as_deref(), Some("tok"));

        session.logout().expect("削除失敗");
        assert!(!session.is_authenticated());
    }
}
