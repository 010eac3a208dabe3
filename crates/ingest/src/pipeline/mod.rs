//! # 取り込みパイプライン
//!
//! 検証 → ダウンロード → 形式判定 → 命名・アップロードを順に実行する。
//! いずれかのステージが失敗した時点で残りは実行せず、元のエラーをそのまま返す。
//! 作業領域は [`ScratchSpace`] のドロップで必ず削除される。

use std::sync::Arc;

use crate::config::{ConfigError, PipelineConfig};
use crate::download::download_to;
use crate::error::IngestError;
use crate::probe::probe_content_type;
use crate::publish::publish;
use crate::scratch::ScratchSpace;
use crate::sniff::sniff_extension;
use crate::source::SourceReference;
use crate::storage::{public_url, ObjectStore, PublicUrl};


/// 画像取り込みパイプライン。起動時に一度構築し、リクエスト間で共有する。
pub struct ImagePipeline {
    http_client: reqwest::Client,
    store: Arc<dyn ObjectStore>,
    config: PipelineConfig,
}

impl ImagePipeline {
    /// 設定とオブジェクトストアからパイプラインを構築する。
    ///
    /// バケット・リージョンの欠落や作業ディレクトリの作成失敗はここで検出する。
    pub fn new(config: PipelineConfig, store: Arc<dyn ObjectStore>) -> Result<Self, ConfigError> {
        config.store.validate()?;
        std::fs::create_dir_all(&config.work_dir).map_err(|source| ConfigError::WorkDir {
            path: config.work_dir.clone(),
            source,
        })?;

        Ok(Self {
            http_client: reqwest::Client::new(),
            store,
            config,
        })
    }

    /// 保存済みキーの公開URL。
    pub fn public_url_for(&self, key: &str) -> PublicUrl {
        public_url(&self.config.store.bucket, &self.config.store.region, key)
    }

    /// リモート画像を取り込み、公開URLを返す。
    ///
    /// URLとベース名の検証はネットワークアクセスより前に行う。
    pub async fn ingest(&self, source_url: &str, base_name: &str) -> Result<PublicUrl, IngestError> {
        let source = SourceReference::new(source_url, base_name)?;
        self.ingest_source(&source).await
    }

    /// 検証済みの取り込み元から画像を取り込む。
    pub async fn ingest_source(&self, source: &SourceReference) -> Result<PublicUrl, IngestError> {
        let mut scratch = ScratchSpace::create(&self.config.work_dir).await?;
        let result = self.run_stages(source, &mut scratch).await;
        drop(scratch);

        match &result {
            Ok(url) => tracing::info!(
                source = %source.url(),
                key = %url.key(),
                url = %url,
                "画像の取り込みに成功"
            ),
            Err(e) => tracing::warn!(
                source = %source.url(),
                error = %e,
                "画像の取り込みに失敗"
            ),
        }
        result
    }

    async fn run_stages(
        &self,
        source: &SourceReference,
        scratch: &mut ScratchSpace,
    ) -> Result<PublicUrl, IngestError> {
        // Step 1: HEADでContent-Typeを検証
        let probe =
            probe_content_type(&self.http_client, source.url(), self.config.probe_timeout).await?;

        // Step 2: 本体を一時ファイルへ
        download_to(&self.http_client, source.url(), scratch.temp_path()).await?;

        // Step 3: バイト列から実際の形式を判定
        let ext = sniff_extension(scratch.temp_path(), Some(probe.candidate_extension.as_str())).await?;

        // Step 4: 最終名にリネームしてアップロード
        publish(
            self.store.as_ref(),
            &self.config.store,
            scratch,
            &source.normalized_base_name(),
            &ext,
        )
        .await
    }
}
