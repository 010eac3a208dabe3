//! # Pokenea 画像取り込みパイプライン
//!
//! ユーザーが指定したリモート画像URLを検証し、正規化した名前で
//! オブジェクトストアに保存して公開URLを返す。
//!
//! ## 処理フロー
//! 1. HEADリクエストでContent-Typeを検証する（[`probe`]）
//! 2. GETで本体を作業ディレクトリにダウンロードする（[`download`]）
//! 3. バイト列のシグネチャから実際の画像形式を判定する（[`sniff`]）
//! 4. 正規化名にリネームしてオブジェクトストアにアップロードする（[`publish`]）
//!
//! どのステージで失敗しても、ローカルの一時ファイルは必ず削除される（[`scratch`]）。

pub mod config;
pub mod download;
pub mod error;
pub mod pipeline;
pub mod probe;
pub mod publish;
pub mod scratch;
pub mod sniff;
pub mod source;
pub mod storage;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use config::{ConfigError, PipelineConfig, StoreConfig};
pub use error::{IngestError, NotImageReason, UnsupportedFormat};
pub use pipeline::ImagePipeline;
pub use source::SourceReference;
pub use storage::{public_url, ObjectStore, PublicUrl, StoreError};

/// `<img>` タグで表示可能な拡張子。
pub const SUPPORTED_EXTENSIONS: &[&str] =
    &["jpg", "jpeg", "png", "gif", "svg", "webp", "bmp", "ico"];

/// 拡張子がブラウザ表示可能な集合に含まれるか。
pub fn is_supported_extension(ext: &str) -> bool {
    SUPPORTED_EXTENSIONS.contains(&ext)
}
