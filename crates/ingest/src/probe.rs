//! # URL・Content-Type検証
//!
//! HEADリクエスト（リダイレクト追従、タイムアウト付き）で宣言された
//! Content-Typeを取得し、ブラウザ表示可能な画像かどうかを分類する。
//! 本体はダウンロードしない。

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::Url;

use crate::error::{IngestError, NotImageReason, UnsupportedFormat};
use crate::is_supported_extension;

/// HEADリクエストで得たContent-Typeと候補拡張子。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentTypeProbe {
    /// 宣言されたContent-Type（ヘッダー値そのまま）
    pub content_type: String,
    /// Content-Typeから導出した候補拡張子（例: `png`, `svg`）
    pub candidate_extension: String,
}

/// HEADリクエストを送信し、Content-Typeを検証する。
pub async fn probe_content_type(
    client: &reqwest::Client,
    url: &Url,
    timeout: Duration,
) -> Result<ContentTypeProbe, IngestError> {
    let response = client
        .head(url.clone())
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| classify_transport_error(e, timeout))?;

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(IngestError::UnknownContentType)?
        .to_string();

    tracing::debug!(
        url = %url,
        status = %response.status(),
        content_type = %content_type,
        "HEADリクエスト完了"
    );

    let candidate_extension = classify_content_type(&content_type)?;
    Ok(ContentTypeProbe {
        content_type,
        candidate_extension,
    })
}

/// reqwestのエラーをタイムアウトと接続失敗に分類する。
pub(crate) fn classify_transport_error(err: reqwest::Error, timeout: Duration) -> IngestError {
    if err.is_timeout() {
        IngestError::Timeout {
            secs: timeout.as_secs().max(1),
        }
    } else {
        IngestError::Unreachable(err.to_string())
    }
}

/// Content-Typeを分類し、ブラウザ表示可能な画像であれば候補拡張子を返す。
pub fn classify_content_type(content_type: &str) -> Result<String, IngestError> {
    let media_type = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    if media_type == "application/octet-stream" {
        return Err(IngestError::NotAnImage(NotImageReason::UnspecifiedBinary));
    }
    if media_type.starts_with("text/html") {
        return Err(IngestError::NotAnImage(NotImageReason::Html));
    }
    if media_type.starts_with("application/") {
        return Err(IngestError::NotAnImage(NotImageReason::Document(media_type)));
    }
    if media_type.starts_with("video/") {
        return Err(IngestError::NotAnImage(NotImageReason::Video(media_type)));
    }
    if media_type.starts_with("audio/") {
        return Err(IngestError::NotAnImage(NotImageReason::Audio(media_type)));
    }
    let Some(subtype) = media_type.strip_prefix("image/") else {
        return Err(IngestError::NotAnImage(NotImageReason::Other(media_type)));
    };

    let candidate = candidate_extension(subtype);
    if is_supported_extension(&candidate) {
        return Ok(candidate);
    }
    let format = match candidate.as_str() {
        "tiff" | "tif" => UnsupportedFormat::Tiff,
        "psd" => UnsupportedFormat::Psd,
        "raw" => UnsupportedFormat::Raw,
        _ => UnsupportedFormat::Other(candidate.clone()),
    };
    Err(IngestError::UnsupportedFormat(format))
}

/// `image/` 以降のサブタイプから候補拡張子を導出する。
///
/// `svg+xml` → `svg`、`x-icon` → `ico`、`vnd.adobe.photoshop` → `psd` のように
/// 構造化構文サフィックス・`x-` 接頭辞・既知の別名を取り除く。
pub fn candidate_extension(subtype: &str) -> String {
    let base = subtype.split('+').next().unwrap_or_default();
    let base = base.strip_prefix("x-").unwrap_or(base);
    match base {
        "icon" | "vnd.microsoft.icon" => "ico",
        "ms-bmp" => "bmp",
        "pjpeg" => "jpeg",
        "photoshop" | "vnd.adobe.photoshop" => "psd",
        other => other,
    }
    .to_string()
}
