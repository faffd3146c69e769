use crate::error::{DashError, Result};
use arbitrage_common::{ApiConfig, API_URL_ENV};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub api_url: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// 設定ディレクトリ（セッションファイルもここに置く）
    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| DashError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("arbitrage-dash"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// 接続先の解決: `--api-url` > 環境変数 > 設定ファイル > デフォルト
    pub fn resolve_api(&self, flag: Option<&str>) -> ApiConfig {
        let env = std::env::var(API_URL_ENV).ok();
        self.resolve_api_with(flag, env.as_deref())
    }

    pub fn resolve_api_with(&self, flag: Option<&str>, env: Option<&str>) -> ApiConfig {
        let chosen = [flag, env, self.api_url.as_deref()]
            .into_iter()
            .flatten()
            .find(|url| !url.trim().is_empty());
        ApiConfig::from_override(chosen)
    }

    pub fn set_api_url(&mut self, url: String) -> Result<()> {
        self.api_url = Some(ApiConfig::new(&url).base_url().to_string());
        self.save()
    }
}

/// `.env` を読む（テスト時は読まない）
pub fn load_dotenv() {
    if !cfg!(test) {
        dotenvy::dotenv().ok();
    }
}
