//! セッションファイル・設定ファイルのテスト

use arbitrage_common::{Credential, GuardOutcome, Route, Session};
use arbitrage_dash::commands;
use arbitrage_dash::config::Config;
use arbitrage_dash::{DashError, FileStore};
use tempfile::tempdir;

/// 保存前はすべての保護コマンドがログイン必須
#[test]
fn test_guard_with_file_store() {
    let dir = tempdir().expect("一時ディレクトリ作成失敗");
    let session = Session::new(FileStore::in_dir(dir.path()));

    for route in Route::navigation() {
        assert_eq!(session.guard(route), GuardOutcome::Redirect(Route::Login));
        assert!(matches!(commands::guard(&session, route), Err(DashError::LoginRequired)));
    }
    assert_eq!(session.guard(Route::Register), GuardOutcome::Render(Route::Register));

    session
        .store_credential(&Credential::new("tok", "Bearer"))
        .expect("保存失敗");
    for route in Route::navigation() {
        assert_eq!(session.guard(route), GuardOutcome::Render(route));
        assert!(commands::guard(&session, route).is_ok());
    }
}

/// 401 による強制ログアウトでファイルも消える
#[test]
fn test_expire_removes_session_file() {
    let dir = tempdir().expect("一時ディレクトリ作成失敗");
    let store = FileStore::in_dir(dir.path());
    let path = store.path().to_path_buf();
    let session = Session::new(store);

    session
        .store_credential(&Credential::new("tok", "bearer"))
        .expect("保存失敗");
    assert!(path.exists());

    let err = session.expire();
    assert!(matches!(err, arbitrage_common::Error::SessionExpired));
    assert!(!path.exists());
    assert!(!session.is_authenticated());
}

#[test]
fn test_config_save_and_load() {
    let dir = tempdir().expect("一時ディレクトリ作成失敗");
    let path = dir.path().join("nested").join("config.json");

    let missing = Config::load_from(&path).expect("読み込み失敗");
    assert_eq!(missing, Config::default());

    let config = Config {
        api_url: Some("http://backend:9000".into()),
    };
    config.save_to(&path).expect("保存失敗");

    let loaded = Config::load_from(&path).expect("読み込み失敗");
    assert_eq!(loaded, config);
    assert_eq!(loaded.resolve_api_with(None, None).base_url(), "http://backend:9000");
}

#[test]
fn test_config_invalid_json() {
    let dir = tempdir().expect("一時ディレクトリ作成失敗");
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ not json").expect("書き込み失敗");

    let result = Config::load_from(&path);
    assert!(matches!(result, Err(DashError::JsonParse(_))));
}
