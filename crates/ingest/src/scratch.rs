//! # 呼び出しごとの作業領域
//!
//! 取り込み1回ごとに一意なディレクトリ（`{work_dir}/ingest-{uuid}`）を作り、
//! 一時ファイルと最終名ファイルをその中に置く。
//! ガードがドロップされると、成功・失敗に関わらず両方のファイルと
//! ディレクトリを削除する。

use std::path::{Path, PathBuf};

/// ダウンロード中の一時ファイル名
const TEMP_FILE_NAME: &str = "download.part";

/// 取り込み1回分の作業領域。ドロップ時に中身を削除する。
pub struct ScratchSpace {
    dir: PathBuf,
    temp_path: PathBuf,
    final_path: Option<PathBuf>,
}

impl ScratchSpace {
    /// `work_dir` 配下に一意な作業ディレクトリを作成する。
    /// `work_dir` が無ければ合わせて作る。
    pub async fn create(work_dir: &Path) -> std::io::Result<Self> {
        let dir = work_dir.join(format!("ingest-{}", uuid::Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self {
            temp_path: dir.join(TEMP_FILE_NAME),
            dir,
            final_path: None,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// ダウンロード先の一時パス。
    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    /// 最終名ファイルのパスを確定し、削除対象に登録する。
    pub fn final_path(&mut self, file_name: &str) -> PathBuf {
        let path = self.dir.join(file_name);
        self.final_path = Some(path.clone());
        path
    }
}

impl Drop for ScratchSpace {
    fn drop(&mut self) {
        let paths = std::iter::once(&self.temp_path).chain(self.final_path.as_ref());
        for path in paths {
            if path.exists() {
                if let Err(e) = std::fs::remove_file(path) {
                    tracing::warn!(path = %path.display(), error = %e, "一時ファイルの削除に失敗");
                }
            }
        }
        if let Err(e) = std::fs::remove_dir(&self.dir) {
            tracing::warn!(dir = %self.dir.display(), error = %e, "作業ディレクトリの削除に失敗");
        }
    }
}
