//! # テスト用共通ヘルパー
//!
//! モック画像サーバー、モックObjectStore、サンプル画像バイト列。

use std::collections::HashMap;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Method, Response, StatusCode};

use crate::config::{PipelineConfig, StoreConfig};
use crate::storage::{ObjectStore, StoreError};

// ---------------------------------------------------------------------------
// モック画像サーバー
// ---------------------------------------------------------------------------

/// モックサーバーの1パス分の応答定義。
#[derive(Clone)]
pub struct MockResponse {
    content_type: Option<String>,
    body: Vec<u8>,
    head_status: u16,
    get_status: u16,
    location: Option<String>,
    delay: Option<Duration>,
}

impl MockResponse {
    /// HEAD/GETとも200で指定Content-Typeを返す。
    pub fn ok(content_type: &str, body: Vec<u8>) -> Self {
        Self {
            content_type: Some(content_type.to_string()),
            body,
            head_status: 200,
            get_status: 200,
            location: None,
            delay: None,
        }
    }

    /// Content-Typeヘッダー無しで返す。
    pub fn untyped(body: Vec<u8>) -> Self {
        Self {
            content_type: None,
            ..Self::ok("", body)
        }
    }

    /// HEAD/GETとも302で `location` にリダイレクトする。
    pub fn redirect(location: &str) -> Self {
        Self {
            content_type: None,
            body: Vec::new(),
            head_status: 302,
            get_status: 302,
            location: Some(location.to_string()),
            delay: None,
        }
    }

    /// GETのみ指定ステータスを返す（HEADは成功のまま）。
    pub fn with_get_status(mut self, status: u16) -> Self {
        self.get_status = status;
        self
    }

    /// 応答前に待機する。
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn to_response(&self, method: &Method) -> Response<Body> {
        let status = if method == Method::HEAD {
            self.head_status
        } else {
            self.get_status
        };
        let mut builder = Response::builder()
            .status(StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR));
        if let Some(ct) = &self.content_type {
            builder = builder.header(header::CONTENT_TYPE, ct);
        }
        if let Some(location) = &self.location {
            builder = builder.header(header::LOCATION, location);
        }
        let body = if method == Method::HEAD {
            Body::empty()
        } else {
            Body::from(self.body.clone())
        };
        builder.body(body).unwrap()
    }
}

/// 起動済みモックサーバー。パスごとのHEAD/GET回数を記録する。
pub struct MockServer {
    port: u16,
    hits: Arc<Mutex<HashMap<(String, Method), usize>>>,
}

impl MockServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{path}", self.port)
    }

    pub fn get_count(&self, path: &str) -> usize {
        self.count(path, Method::GET)
    }

    pub fn head_count(&self, path: &str) -> usize {
        self.count(path, Method::HEAD)
    }

    pub fn total_hits(&self) -> usize {
        self.hits.lock().unwrap().values().sum()
    }

    fn count(&self, path: &str, method: Method) -> usize {
        self.hits
            .lock()
            .unwrap()
            .get(&(path.to_string(), method))
            .copied()
            .unwrap_or(0)
    }
}

/// テスト用モックHTTPサーバーを起動し、指定パスで指定応答を返す。
pub async fn start_mock_image_server(routes: Vec<(&str, MockResponse)>) -> MockServer {
    let hits: Arc<Mutex<HashMap<(String, Method), usize>>> = Arc::default();

    let app = routes
        .into_iter()
        .fold(axum::Router::new(), |router, (path, response)| {
            let hits = hits.clone();
            let key = path.to_string();
            router.route(
                path,
                axum::routing::any(move |method: Method| {
                    let response = response.clone();
                    let hits = hits.clone();
                    let key = key.clone();
                    async move {
                        *hits.lock().unwrap().entry((key, method.clone())).or_insert(0) += 1;
                        if let Some(delay) = response.delay {
                            tokio::time::sleep(delay).await;
                        }
                        response.to_response(&method)
                    }
                }),
            )
        });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    MockServer { port, hits }
}

/// HEADにはPNGとして応答し、それ以外のリクエストは応答せずに接続を切るサーバー。
pub async fn start_head_only_server() -> u16 {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let Ok(n) = socket.read(&mut buf).await else {
                    return;
                };
                if buf[..n].starts_with(b"HEAD ") {
                    let _ = socket
                        .write_all(
                            b"HTTP/1.1 200 OK\r\nContent-Type: image/png\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                        )
                        .await;
                }
            });
        }
    });
    port
}

// ---------------------------------------------------------------------------
// モックObjectStore
// ---------------------------------------------------------------------------

/// モックストアが受け取ったアップロード。
#[derive(Debug, Clone)]
pub struct UploadedObject {
    pub key: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
    pub local_path: PathBuf,
}

/// S3への接続なしでアップロード内容を記録するモック。
#[derive(Default)]
pub struct MockObjectStore {
    uploads: Mutex<Vec<UploadedObject>>,
    failure: Option<String>,
}

impl MockObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 常に指定メッセージで失敗するモック。
    pub fn failing(message: &str) -> Self {
        Self {
            uploads: Mutex::default(),
            failure: Some(message.to_string()),
        }
    }

    pub fn uploads(&self) -> Vec<UploadedObject> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ObjectStore for MockObjectStore {
    async fn upload(
        &self,
        local_path: &Path,
        key: &str,
        content_type: &str,
    ) -> Result<(), StoreError> {
        if let Some(message) = &self.failure {
            return Err(StoreError::Upload(message.clone()));
        }
        // アップロード時点でローカルファイルが存在することも検証になる
        let bytes = std::fs::read(local_path).map_err(|source| StoreError::ReadLocal {
            path: local_path.display().to_string(),
            source,
        })?;
        self.uploads.lock().unwrap().push(UploadedObject {
            key: key.to_string(),
            content_type: content_type.to_string(),
            bytes,
            local_path: local_path.to_path_buf(),
        });
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// 設定・サンプル画像
// ---------------------------------------------------------------------------

pub fn test_store_config() -> StoreConfig {
    StoreConfig {
        bucket: "pokeneas-test".to_string(),
        region: "us-east-2".to_string(),
        endpoint: None,
        access_key: None,
        secret_key: None,
    }
}

pub fn test_pipeline_config(work_dir: &Path) -> PipelineConfig {
    PipelineConfig {
        store: test_store_config(),
        probe_timeout: Duration::from_secs(5),
        work_dir: work_dir.to_path_buf(),
    }
}

/// 拡張子に対応するサンプル画像。PNG/JPEGは実際にエンコードし、
/// その他は形式判定に十分なヘッダーを持つバイト列を返す。
pub fn sample_image(ext: &str) -> Vec<u8> {
    match ext {
        "png" => encode(image::ImageFormat::Png),
        "jpg" | "jpeg" => encode(image::ImageFormat::Jpeg),
        "gif" => b"GIF89a\x01\x00\x01\x00\x80\x00\x00\xff\xff\xff\x00\x00\x00!\xf9\x04\x01\x00\x00\x00\x00,\x00\x00\x00\x00\x01\x00\x01\x00\x00\x02\x02D\x01\x00;".to_vec(),
        "webp" => {
            let mut bytes = b"RIFF\x1a\x00\x00\x00WEBPVP8L\x0d\x00\x00\x00\x2f\x00\x00\x00".to_vec();
            bytes.extend_from_slice(&[0x10, 0x07, 0x10, 0x11, 0x11, 0x88, 0x88, 0xfe, 0x07, 0x00]);
            bytes
        }
        "bmp" => {
            let mut bytes = b"BM".to_vec();
            bytes.extend_from_slice(&[0u8; 56]);
            bytes
        }
        "ico" => {
            let mut bytes = vec![0x00, 0x00, 0x01, 0x00, 0x01, 0x00];
            bytes.extend_from_slice(&[0u8; 16]);
            bytes
        }
        "svg" => br#"<svg xmlns="http://www.w3.org/2000/svg" width="1" height="1"><rect width="1" height="1"/></svg>"#.to_vec(),
        "tiff" => {
            let mut bytes = b"II*\x00\x08\x00\x00\x00".to_vec();
            bytes.extend_from_slice(&[0u8; 8]);
            bytes
        }
        other => panic!("no sample for {other}"),
    }
}

fn encode(format: image::ImageFormat) -> Vec<u8> {
    let img = image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
        2,
        2,
        image::Rgb([200, 30, 90]),
    ));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, format).unwrap();
    buf.into_inner()
}
