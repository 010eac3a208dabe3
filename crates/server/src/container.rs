//! # コンテナ識別子
//!
//! どのコンテナ（ホスト）が応答したかを示す。`HOSTNAME` → `/etc/hostname` の順に参照する。

use std::path::Path;

pub const UNKNOWN_CONTAINER: &str = "unknown-container";

/// 起動時に一度だけ解決する。
pub fn container_id() -> String {
    resolve_container_id(
        std::env::var("HOSTNAME").ok(),
        Path::new("/etc/hostname"),
    )
}

fn resolve_container_id(hostname_env: Option<String>, hostname_file: &Path) -> String {
    hostname_env
        .map(|h| h.trim().to_string())
        .filter(|h| !h.is_empty())
        .or_else(|| {
            std::fs::read_to_string(hostname_file)
                .ok()
                .map(|h| h.trim().to_string())
                .filter(|h| !h.is_empty())
        })
        .unwrap_or_else(|| UNKNOWN_CONTAINER.to_string())
}
