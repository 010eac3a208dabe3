//! # 命名・アップロード
//!
//! 一時ファイルを `{正規化ベース名}.{拡張子}` にリネームし、同じ名前を
//! キーとしてオブジェクトストアにアップロードする。
//! 最終名ファイルの削除はこのステージでは行わない（[`crate::scratch`] の責務）。

use crate::config::StoreConfig;
use crate::error::IngestError;
use crate::scratch::ScratchSpace;
use crate::storage::{content_type_for_extension, public_url, ObjectStore, PublicUrl};

/// 最終ファイル名（= オブジェクトキー）を組み立てる。
pub fn compose_key(normalized_base_name: &str, ext: &str) -> String {
    format!("{normalized_base_name}.{ext}")
}

/// 一時ファイルを最終名にリネームしてアップロードし、公開URLを返す。
pub async fn publish(
    store: &dyn ObjectStore,
    store_config: &StoreConfig,
    scratch: &mut ScratchSpace,
    normalized_base_name: &str,
    ext: &str,
) -> Result<PublicUrl, IngestError> {
    let key = compose_key(normalized_base_name, ext);
    let final_path = scratch.final_path(&key);
    tokio::fs::rename(scratch.temp_path(), &final_path).await?;

    store
        .upload(&final_path, &key, content_type_for_extension(ext))
        .await
        .map_err(|e| IngestError::UploadFailed(e.to_string()))?;

    Ok(public_url(&store_config.bucket, &store_config.region, &key))
}
