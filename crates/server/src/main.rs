//! # Pokenea Server
//!
//! Pokeneaの閲覧・作成を提供するWebサーバー。
//!
//! ## API エンドポイント
//! - `GET /` — 全Pokeneaの一覧
//! - `GET /api/pokenea` — ランダムなPokenea（JSON、コンテナID付き）
//! - `GET /pokenea` — ランダムなPokeneaのビュー
//! - `GET /pokenea/{id}` — 指定Pokeneaのビュー
//! - `POST /your-pokenea` — リモート画像を取り込んでPokeneaを作成

mod config;
mod container;
mod endpoints;
mod error;
mod form;
mod repository;

#[cfg(test)]
mod test_helpers;

use std::sync::Arc;

use pokenea_ingest::storage::S3ObjectStore;
use pokenea_ingest::ImagePipeline;
use tracing_subscriber::EnvFilter;

use config::{AppState, ServerConfig};
use endpoints::*;
use repository::{builtin_pokeneas, Repository};

/// ルーターを構築する。
fn build_router(state: Arc<AppState>) -> axum::Router {
    axum::Router::new()
        .route("/", axum::routing::get(handle_home))
        .route("/api/pokenea", axum::routing::get(handle_api_pokenea))
        .route("/pokenea", axum::routing::get(handle_random_pokenea))
        .route("/pokenea/{id}", axum::routing::get(handle_show_pokenea))
        .route("/your-pokenea", axum::routing::post(handle_create_pokenea))
        .fallback(handle_not_found)
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // 設定の欠落はここで失敗させる
    let config = ServerConfig::from_env()?;

    let store = S3ObjectStore::from_config(&config.pipeline.store)?;
    let pipeline = ImagePipeline::new(config.pipeline.clone(), Arc::new(store))?;
    tracing::info!(
        bucket = %config.pipeline.store.bucket,
        region = %config.pipeline.store.region,
        work_dir = %config.pipeline.work_dir.display(),
        "画像取り込みパイプラインを初期化"
    );

    let repository = Repository::connect(&config.database_url).await?;
    repository.seed(&builtin_pokeneas()).await?;

    let container_id = container::container_id();
    tracing::info!(container_id = %container_id, "コンテナID");

    let state = Arc::new(AppState {
        repository,
        pipeline,
        container_id,
    });

    let app = build_router(state);

    tracing::info!("Pokeneaサーバーを {} で起動します", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ---------------------------------------------------------------------------
// テスト
// ---------------------------------------------------------------------------
