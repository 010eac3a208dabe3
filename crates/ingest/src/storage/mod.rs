//! # オブジェクトストア
//!
//! 検証済み画像の保存先の抽象インターフェースと公開URLの生成。
//! S3互換ストレージ実装は `s3` サブモジュールを参照。

#[cfg(feature = "vendor-aws")]
pub mod s3;

#[cfg(feature = "vendor-aws")]
pub use s3::S3ObjectStore;

use std::fmt;
use std::path::Path;

/// オブジェクトストア操作のエラー型。
/// `IngestError::UploadFailed` 経由でユーザーに表示される。
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// ローカルファイルの読み込みに失敗
    #[error("No se pudo leer el archivo local ({path}): {source}")]
    ReadLocal {
        path: String,
        source: std::io::Error,
    },
    /// 転送・権限・容量等の失敗
    #[error("{0}")]
    Upload(String),
}

/// 画像の保存先の抽象インターフェース。
///
/// バケットとACL（public-read）は実装の構築時に固定される。
/// テストではモック実装に差し替える。
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// ローカルファイルを `key` として公開読み取り可能な状態でアップロードする。
    async fn upload(
        &self,
        local_path: &Path,
        key: &str,
        content_type: &str,
    ) -> Result<(), StoreError>;
}

/// 保存済み画像の公開URLとオブジェクトキー。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicUrl {
    url: String,
    key: String,
}

impl PublicUrl {
    pub fn as_str(&self) -> &str {
        &self.url
    }

    /// オブジェクトキー（= 最終ファイル名）
    pub fn key(&self) -> &str {
        &self.key
    }

    /// `(url, key)` に分解する。
    pub fn into_parts(self) -> (String, String) {
        (self.url, self.key)
    }
}

impl fmt::Display for PublicUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// バケット・リージョン・キーから公開URLを生成する。
pub fn public_url(bucket: &str, region: &str, key: &str) -> PublicUrl {
    PublicUrl {
        url: format!("https://{bucket}.s3.{region}.amazonaws.com/{key}"),
        key: key.to_string(),
    }
}

/// 検証済み拡張子に対応するMIMEタイプ。
pub fn content_type_for_extension(ext: &str) -> &'static str {
    match ext {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "ico" => "image/x-icon",
        _ => "application/octet-stream",
    }
}
