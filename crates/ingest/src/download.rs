//! # ダウンローダー
//!
//! GETで本体全体を取得し、呼び出しごとの一時パスに書き出す。
//! 書き込みは常に上書き。失敗時の後始末は呼び出し側のスクラッチガードが行う。

use std::path::Path;

use reqwest::Url;

use crate::error::IngestError;

/// ダウンロード完了の確認。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Downloaded {
    /// 書き出したバイト数
    pub bytes: u64,
}

/// URLの本体をダウンロードし `dest` に書き出す。
///
/// ダウンロード自体にはタイムアウトを設けない。
pub async fn download_to(
    client: &reqwest::Client,
    url: &Url,
    dest: &Path,
) -> Result<Downloaded, IngestError> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| IngestError::Unreachable(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(IngestError::DownloadFailed {
            status: status.as_u16(),
        });
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| IngestError::Unreachable(e.to_string()))?;
    tokio::fs::write(dest, &body).await?;

    tracing::debug!(
        url = %url,
        dest = %dest.display(),
        bytes = body.len(),
        "ダウンロード完了"
    );

    Ok(Downloaded {
        bytes: body.len() as u64,
    })
}
