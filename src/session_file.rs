//! セッションファイル（CLI用 `SessionStore`）
//!
//! `~/.config/arbitrage-dash/session.json` にトークンを保存する。

use arbitrage_common::{Error, Result, Session, SessionStore};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const SESSION_FILE_NAME: &str = "session.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SessionFile {
    #[serde(default)]
    entries: BTreeMap<String, String>,
    #[serde(default)]
    stored_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// 設定ディレクトリ内のセッションファイル
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(SESSION_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 最後に書き込んだ時刻
    pub fn stored_at(&self) -> Option<DateTime<Utc>> {
        self.read().ok()?.stored_at
    }

    // 壊れたファイルは未ログイン扱い
    fn read(&self) -> Result<SessionFile> {
        if !self.path.exists() {
            return Ok(SessionFile::default());
        }
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| Error::Storage(format!("{}: {}", self.path.display(), e)))?;
        Ok(serde_json::from_str(&content).unwrap_or_default())
    }

    fn write(&self, file: &SessionFile) -> Result<()> {
        if file.entries.is_empty() {
            if self.path.exists() {
                std::fs::remove_file(&self.path)
                    .map_err(|e| Error::Storage(format!("{}: {}", self.path.display(), e)))?;
            }
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Storage(format!("{}: {}", parent.display(), e)))?;
        }
        let content = serde_json::to_string_pretty(file)?;
        std::fs::write(&self.path, content)
            .map_err(|e| Error::Storage(format!("{}: {}", self.path.display(), e)))
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.read().ok()?.entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut file = self.read()?;
        file.entries.insert(key.to_string(), value.to_string());
        file.stored_at = Some(Utc::now());
        self.write(&file)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut file = self.read()?;
        if file.entries.remove(key).is_some() {
            self.write(&file)?;
        }
        Ok(())
    }
}

pub type FileSession = Session<FileStore>;

#[cfg(test)]
mod tests {
    use super::*;
    use arbitrage_common::Credential;
    use tempfile::tempdir;

    #[test]
    fn test_store_and_logout() {
        let dir = tempdir().expect("一時ディレクトリ作成失敗");
        let session = Session::new(FileStore::in_dir(dir.path()));
        assert!(!session.is_authenticated());
        assert!(session.store().stored_at().is_none());

        session
            .store_credential(&Credential::new("abc", "bearer"))
            .expect("保存失敗");
        assert!(session.is_authenticated());
        assert!(session.store().stored_at().is_some());

        // 別インスタンスからも読める
        let reopened = Session::new(FileStore::in_dir(dir.path()));
        assert_eq!(reopened.authorization_header().as_deref(), Some("bearer abc"));

        session.logout().expect("削除失敗");
        assert!(!reopened.is_authenticated());
        assert!(!dir.path().join(SESSION_FILE_NAME).exists());
    }

    #[test]
    fn test_corrupt_file_is_logged_out() {
        let dir = tempdir().expect("一時ディレクトリ作成失敗");
        std::fs::write(dir.path().join(SESSION_FILE_NAME), "not json").expect("書き込み失敗");

        let session = Session::new(FileStore::in_dir(dir.path()));
        assert!(!session.is_authenticated());

        session
            .store_credential(&Credential::new("fresh", "bearer"))
            .expect("保存失敗");
        assert!(session.is_authenticated());
    }
}
