//! # サーバー設定・共有状態
//!
//! 環境変数からの設定読み込みと、ハンドラ間で共有する状態の定義。

use pokenea_ingest::{ConfigError, ImagePipeline, PipelineConfig};

use crate::repository::Repository;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://pokeneas.db?mode=rwc";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";

/// サーバー設定。起動時に一度だけ読み込む。
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub pipeline: PipelineConfig,
    /// `DATABASE_URL`
    pub database_url: String,
    /// `BIND_ADDR`
    pub bind_addr: String,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pipeline = PipelineConfig::from_vars(&lookup)?;
        let var = |name: &str, default: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Ok(Self {
            pipeline,
            database_url: var("DATABASE_URL", DEFAULT_DATABASE_URL),
            bind_addr: var("BIND_ADDR", DEFAULT_BIND_ADDR),
        })
    }
}

/// サーバーの共有状態。
pub struct AppState {
    /// Pokeneaレコードストア
    pub repository: Repository,
    /// 画像取り込みパイプライン
    pub pipeline: ImagePipeline,
    /// 応答に付与するコンテナID
    pub container_id: String,
}

impl AppState {
    /// 画像キーの公開URL。
    pub fn image_url(&self, key: &str) -> String {
        self.pipeline.public_url_for(key).to_string()
    }
}
