//! # 取り込み元
//!
//! ユーザー入力（URLとベース名）を検証済みの値に変換する。
//! ここで弾かれた入力はネットワークに一切触れない。

use reqwest::Url;

use crate::error::IngestError;

/// 検証済みの取り込み元。リクエストごとに構築される。
#[derive(Debug, Clone)]
pub struct SourceReference {
    url: Url,
    base_name: String,
}

impl SourceReference {
    /// URLとベース名を検証する。
    ///
    /// - URLはスキームとホストを持つ `http`/`https` の絶対URLであること
    /// - ベース名は空でなく、パス区切り文字を含まないこと
    pub fn new(source_url: &str, base_name: &str) -> Result<Self, IngestError> {
        let url = parse_source_url(source_url)?;
        validate_base_name(base_name)?;
        Ok(Self {
            url,
            base_name: base_name.to_string(),
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// オブジェクトキーに使う正規化済みベース名。
    pub fn normalized_base_name(&self) -> String {
        normalize_base_name(&self.base_name)
    }
}

/// ベース名を正規化する: 小文字化し、空白をアンダースコアにする。
/// 記号類はそのまま残す（`"My Pokenea!"` → `"my_pokenea!"`）。
pub fn normalize_base_name(base_name: &str) -> String {
    base_name.to_lowercase().replace(' ', "_")
}

fn parse_source_url(source_url: &str) -> Result<Url, IngestError> {
    let url = Url::parse(source_url.trim())
        .map_err(|e| IngestError::InvalidUrl(format!("{source_url} ({e})")))?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(IngestError::InvalidUrl(format!(
                "{source_url} (esquema no soportado: {other})"
            )))
        }
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(IngestError::InvalidUrl(format!("{source_url} (sin host)")));
    }

    Ok(url)
}

fn validate_base_name(base_name: &str) -> Result<(), IngestError> {
    if base_name.trim().is_empty() {
        return Err(IngestError::InvalidBaseName(
            "el nombre está vacío".to_string(),
        ));
    }
    // 正規化名はローカルファイル名にもなる
    if base_name.contains(['/', '\\', '\0']) || base_name == "." || base_name == ".." {
        return Err(IngestError::InvalidBaseName(format!(
            "{base_name} contiene caracteres de ruta"
        )));
    }
    Ok(())
}
