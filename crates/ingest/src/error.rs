//! # 取り込みエラー型
//!
//! パイプラインの各ステージが返すエラー。
//! メッセージはそのままエンドユーザーに表示されるため、アプリケーションの
//! ロケール（スペイン語）で記述する。

/// 画像取り込みパイプラインのエラー型。
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// URLが絶対HTTP(S) URLではない
    #[error("La URL de la imagen no es válida: {0}")]
    InvalidUrl(String),
    /// ベース名が空、またはパスとして解釈される
    #[error("El nombre de la imagen no es válido: {0}")]
    InvalidBaseName(String),
    /// 接続失敗
    #[error("No se pudo conectar con la URL de la imagen: {0}")]
    Unreachable(String),
    /// HEADリクエストのタイムアウト
    #[error("La URL de la imagen no respondió en {secs} segundos")]
    Timeout { secs: u64 },
    /// Content-Typeヘッダーが無い
    #[error("No se pudo determinar el tipo de contenido de la URL")]
    UnknownContentType,
    /// 宣言されたContent-Typeが画像ではない
    #[error("{0}")]
    NotAnImage(NotImageReason),
    /// ブラウザで表示できない画像形式
    #[error("{0}")]
    UnsupportedFormat(UnsupportedFormat),
    /// バイト列からもContent-Typeからも形式が判定できない
    #[error("No se pudo determinar el formato de la imagen descargada")]
    UndeterminedFormat,
    /// ダウンロードが成功ステータス以外で終了
    #[error("Error al descargar la imagen: HTTP {status}")]
    DownloadFailed { status: u16 },
    /// オブジェクトストアへのアップロード失敗
    #[error("Error al subir la imagen al almacenamiento: {0}")]
    UploadFailed(String),
    /// 作業ディレクトリのIO失敗
    #[error("Error al guardar la imagen temporalmente: {0}")]
    LocalIo(#[from] std::io::Error),
}

/// Content-Typeが画像でない理由。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotImageReason {
    #[error("La URL apunta a una página web (HTML), no a una imagen")]
    Html,
    #[error("La URL apunta a un documento ({0}), no a una imagen")]
    Document(String),
    #[error("La URL apunta a un video ({0}), no a una imagen")]
    Video(String),
    #[error("La URL apunta a un archivo de audio ({0}), no a una imagen")]
    Audio(String),
    #[error("La URL apunta a un archivo binario sin tipo especificado (application/octet-stream), no a una imagen")]
    UnspecifiedBinary,
    #[error("El tipo de contenido {0} no corresponde a una imagen")]
    Other(String),
}

/// ブラウザで表示できない画像形式。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnsupportedFormat {
    #[error("El formato TIFF no es compatible con los navegadores web. Formatos soportados: jpg, jpeg, png, gif, svg, webp, bmp, ico")]
    Tiff,
    #[error("Los archivos PSD de Photoshop no se pueden mostrar en un navegador web. Formatos soportados: jpg, jpeg, png, gif, svg, webp, bmp, ico")]
    Psd,
    #[error("Los formatos RAW de cámara no se pueden mostrar en un navegador web. Formatos soportados: jpg, jpeg, png, gif, svg, webp, bmp, ico")]
    Raw,
    #[error("El formato XBM es obsoleto y no es compatible con los navegadores modernos. Formatos soportados: jpg, jpeg, png, gif, svg, webp, bmp, ico")]
    Xbm,
    #[error("Formato de imagen no soportado: {0}. Formatos soportados: jpg, jpeg, png, gif, svg, webp, bmp, ico")]
    Other(String),
}

impl IngestError {
    /// ユーザー入力（URL・画像内容）に起因するエラーか。
    /// falseの場合はサーバー側・外部サービス側の障害。
    pub fn is_user_error(&self) -> bool {
        !matches!(self, IngestError::UploadFailed(_) | IngestError::LocalIo(_))
    }
}
