//! # パイプライン設定
//!
//! 環境変数からの設定読み込み。必須項目が欠けている場合は
//! 起動時（パイプライン構築時）に失敗させ、リクエスト処理中には失敗させない。

use std::path::PathBuf;
use std::time::Duration;

/// HEADリクエストのデフォルトタイムアウト（秒）
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 10;

/// 設定エラー型。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 必須の環境変数が未設定
    #[error("環境変数 {0} が設定されていません")]
    Missing(&'static str),
    /// 値が不正
    #[error("環境変数 {name} の値が不正です: {reason}")]
    Invalid { name: &'static str, reason: String },
    /// オブジェクトストアクライアントの初期化失敗
    #[error("オブジェクトストアの初期化に失敗: {0}")]
    Store(String),
    /// 作業ディレクトリの作成失敗
    #[error("作業ディレクトリ {path} を作成できません: {source}")]
    WorkDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// オブジェクトストア（S3）の接続設定。
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// バケット名（`AWS_BUCKET`）
    pub bucket: String,
    /// リージョン（`AWS_REGION`）
    pub region: String,
    /// S3互換エンドポイント（`S3_ENDPOINT`）。
    /// Noneの場合は `https://s3.{region}.amazonaws.com`。
    pub endpoint: Option<String>,
    /// アクセスキー（`S3_ACCESS_KEY`）。Noneの場合は署名なしリクエスト。
    pub access_key: Option<String>,
    /// シークレットキー（`S3_SECRET_KEY`）
    pub secret_key: Option<String>,
}

impl StoreConfig {
    /// 公開URL生成に必要な項目が揃っているかを確認する。
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bucket.trim().is_empty() {
            return Err(ConfigError::Missing("AWS_BUCKET"));
        }
        if self.region.trim().is_empty() {
            return Err(ConfigError::Missing("AWS_REGION"));
        }
        if self.access_key.is_some() != self.secret_key.is_some() {
            return Err(ConfigError::Invalid {
                name: "S3_ACCESS_KEY",
                reason: "S3_ACCESS_KEY と S3_SECRET_KEY は両方指定する必要があります".to_string(),
            });
        }
        Ok(())
    }

    /// 実際に接続するエンドポイント。
    pub fn resolved_endpoint(&self) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| format!("https://s3.{}.amazonaws.com", self.region))
    }
}

/// 画像取り込みパイプラインの設定。
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub store: StoreConfig,
    /// HEADリクエストのタイムアウト（`INGEST_PROBE_TIMEOUT_SECS`）
    pub probe_timeout: Duration,
    /// 一時ファイルを置く作業ディレクトリ（`INGEST_WORK_DIR`）
    pub work_dir: PathBuf,
}

impl PipelineConfig {
    /// 環境変数から構築する。
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// 任意の変数ソースから構築する。空文字列は未設定として扱う。
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let store = StoreConfig {
            bucket: var("AWS_BUCKET").ok_or(ConfigError::Missing("AWS_BUCKET"))?,
            region: var("AWS_REGION").ok_or(ConfigError::Missing("AWS_REGION"))?,
            endpoint: var("S3_ENDPOINT"),
            access_key: var("S3_ACCESS_KEY"),
            secret_key: var("S3_SECRET_KEY"),
        };
        store.validate()?;

        let probe_timeout_secs = match var("INGEST_PROBE_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError::Invalid {
                    name: "INGEST_PROBE_TIMEOUT_SECS",
                    reason: format!("正の整数が必要です: {raw}"),
                })?,
            None => DEFAULT_PROBE_TIMEOUT_SECS,
        };

        let work_dir = var("INGEST_WORK_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join("pokenea-ingest"));

        Ok(Self {
            store,
            probe_timeout: Duration::from_secs(probe_timeout_secs),
            work_dir,
        })
    }
}
