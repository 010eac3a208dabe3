//! # テスト用共通ヘルパー

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::http::header;
use axum::response::IntoResponse;
use pokenea_ingest::{ImagePipeline, ObjectStore, PipelineConfig, StoreConfig, StoreError};

use crate::config::AppState;
use crate::repository::Repository;

pub const TEST_CONTAINER_ID: &str = "test-container";

/// PNGシグネチャ + IHDRの先頭（形式判定に十分）
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\x0dIHDR\x00\x00\x00\x01\x00\x00\x00\x01\x08\x02\x00\x00\x00";

/// アップロード内容を記録するモックObjectStore。クローンは記録を共有する。
#[derive(Clone, Default)]
pub struct MockObjectStore {
    uploads: Arc<Mutex<Vec<(String, u64)>>>,
    failure: Option<String>,
}

impl MockObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn keys(&self) -> Vec<String> {
        self.uploads.lock().unwrap().iter().map(|(k, _)| k.clone()).collect()
    }

    pub fn sizes(&self) -> Vec<u64> {
        self.uploads.lock().unwrap().iter().map(|(_, s)| *s).collect()
    }
}

#[async_trait::async_trait]
impl ObjectStore for MockObjectStore {
    async fn upload(
        &self,
        local_path: &Path,
        key: &str,
        _content_type: &str,
    ) -> Result<(), StoreError> {
        if let Some(message) = &self.failure {
            return Err(StoreError::Upload(message.clone()));
        }
        let size = std::fs::metadata(local_path)
            .map_err(|source| StoreError::ReadLocal {
                path: local_path.display().to_string(),
                source,
            })?
            .len();
        self.uploads.lock().unwrap().push((key.to_string(), size));
        Ok(())
    }
}

/// インメモリDBとモックストアで共有状態を構築する。
/// 返却する一時ディレクトリはパイプラインの作業ディレクトリ。
pub async fn test_state(store: MockObjectStore) -> (Arc<AppState>, tempfile::TempDir) {
    let work = tempfile::tempdir().unwrap();
    let config = PipelineConfig {
        store: StoreConfig {
            bucket: "pokeneas-test".to_string(),
            region: "us-east-2".to_string(),
            endpoint: None,
            access_key: None,
            secret_key: None,
        },
        probe_timeout: Duration::from_secs(5),
        work_dir: work.path().to_path_buf(),
    };
    let pipeline = ImagePipeline::new(config, Arc::new(store)).unwrap();

    let state = Arc::new(AppState {
        repository: Repository::in_memory().await.unwrap(),
        pipeline,
        container_id: TEST_CONTAINER_ID.to_string(),
    });
    (state, work)
}

/// `/img.png`（PNG）と `/page`（HTML）を返すモック画像サーバー。
pub struct ImageServer {
    port: u16,
    hits: Arc<AtomicUsize>,
}

impl ImageServer {
    pub fn png_url(&self) -> String {
        format!("http://127.0.0.1:{}/img.png", self.port)
    }

    pub fn html_url(&self) -> String {
        format!("http://127.0.0.1:{}/page", self.port)
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

pub async fn start_image_server() -> ImageServer {
    let hits = Arc::new(AtomicUsize::new(0));
    let png_hits = hits.clone();
    let html_hits = hits.clone();

    let app = axum::Router::new()
        .route(
            "/img.png",
            axum::routing::get(move || {
                png_hits.fetch_add(1, Ordering::SeqCst);
                async { ([(header::CONTENT_TYPE, "image/png")], PNG_BYTES).into_response() }
            }),
        )
        .route(
            "/page",
            axum::routing::get(move || {
                html_hits.fetch_add(1, Ordering::SeqCst);
                async { ([(header::CONTENT_TYPE, "text/html")], "<html></html>").into_response() }
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    ImageServer { port, hits }
}
