//! # 画像形式の判定
//!
//! 宣言されたContent-Typeではなく、ダウンロードしたファイルの先頭バイト
//! （マジックナンバー）から実際の画像形式を判定する。
//! バイト列から判定できた形式は宣言より優先される。

use std::path::Path;

use crate::error::{IngestError, NotImageReason, UnsupportedFormat};
use crate::is_supported_extension;

/// テキスト形式（SVG）の判定に使う先頭バイト数
const TEXT_SNIFF_LEN: usize = 1024;

/// ルート要素がsvg以外のマークアップ（HTMLページ等）の判定結果
const MARKUP: &str = "html";

/// ファイルの実際の形式を判定し、検証済み拡張子を返す。
///
/// - バイト列から判定できればその形式
/// - できなければ `candidate`（Content-Type由来の候補拡張子）
/// - どちらも無ければ [`IngestError::UndeterminedFormat`]
pub async fn sniff_extension(path: &Path, candidate: Option<&str>) -> Result<String, IngestError> {
    let bytes = tokio::fs::read(path).await?;
    let detected = detect_format(&bytes);

    tracing::debug!(
        path = %path.display(),
        detected = ?detected,
        candidate = ?candidate,
        "画像形式を判定"
    );

    resolve_extension(detected, candidate)
}

/// シグネチャから画像形式の拡張子を判定する。
pub fn detect_format(bytes: &[u8]) -> Option<&'static str> {
    if let Ok(format) = image::guess_format(bytes) {
        if let Some(ext) = format.extensions_str().first().copied() {
            return Some(ext);
        }
    }
    if looks_like_xbm(bytes) {
        return Some("xbm");
    }
    match markup_root(bytes).as_deref() {
        Some("svg") => Some("svg"),
        Some(_) => Some(MARKUP),
        None => None,
    }
}

/// 判定結果と候補から最終的な拡張子を決め、ブラウザ表示可能か検証する。
pub fn resolve_extension(
    detected: Option<&str>,
    candidate: Option<&str>,
) -> Result<String, IngestError> {
    let ext = detected
        .or(candidate)
        .ok_or(IngestError::UndeterminedFormat)?
        .to_ascii_lowercase();
    let ext = if ext == "jpeg" { "jpg".to_string() } else { ext };

    if is_supported_extension(&ext) {
        return Ok(ext);
    }
    if ext == MARKUP {
        return Err(IngestError::NotAnImage(NotImageReason::Html));
    }
    let format = match ext.as_str() {
        "xbm" => UnsupportedFormat::Xbm,
        "tiff" | "tif" => UnsupportedFormat::Tiff,
        _ => UnsupportedFormat::Other(ext.clone()),
    };
    Err(IngestError::UnsupportedFormat(format))
}

/// X BitMap: Cヘッダー形式のテキスト画像。
fn looks_like_xbm(bytes: &[u8]) -> bool {
    bytes.starts_with(b"#define ")
}

/// マークアップのルート要素名（小文字）。
///
/// BOM・空白・XML宣言・DOCTYPE・コメントを読み飛ばし、最初の要素名を返す。
/// `<` で始まらないテキストやバイナリはNone。
fn markup_root(bytes: &[u8]) -> Option<String> {
    let head = &bytes[..bytes.len().min(TEXT_SNIFF_LEN)];
    let text = String::from_utf8_lossy(head);
    let mut rest = text.trim_start_matches('\u{feff}').trim_start();
    if !rest.starts_with('<') {
        return None;
    }

    loop {
        let skip_to = if rest.starts_with("<?") {
            "?>"
        } else if rest.starts_with("<!--") {
            "-->"
        } else if rest.starts_with("<!") {
            ">"
        } else {
            break;
        };
        // 閉じられていない宣言は先頭ウィンドウ内でルート要素に届かない
        let end = rest.find(skip_to)?;
        rest = rest[end + skip_to.len()..].trim_start();
    }

    let name: String = rest
        .strip_prefix('<')?
        .chars()
        .take_while(|c| !c.is_whitespace() && *c != '>' && *c != '/')
        .collect();
    if name.is_empty() {
        return Some(MARKUP.to_string());
    }
    Some(name.to_ascii_lowercase())
}
