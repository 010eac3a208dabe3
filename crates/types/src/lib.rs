//! # Pokenea 共有型定義
//!
//! HTTP APIでやり取りされるデータ構造をRust構造体として提供する。
//!
//! ## 命名規則
//! - フィールド名はアプリケーションの公開JSONに合わせてスペイン語
//!   （`nombre`, `altura`, `habilidad`, `imagen`, `frase`）。

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Pokenea レコード
// ---------------------------------------------------------------------------

/// データベースに保存されたPokenea。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pokenea {
    /// 主キー
    pub id: i64,
    /// 名前（一意、最大50文字）
    pub nombre: String,
    /// 身長（メートル）
    pub altura: f64,
    /// 特殊能力（最大100文字）
    pub habilidad: String,
    /// オブジェクトストア上の画像キー（例: `my_pokenea.png`）
    pub imagen: String,
    /// 哲学的なフレーズ
    pub frase: String,
}

/// 挿入前のPokenea（idはデータベースが採番する）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPokenea {
    pub nombre: String,
    pub altura: f64,
    pub habilidad: String,
    pub imagen: String,
    pub frase: String,
}

impl NewPokenea {
    /// 採番済みidを付与してレコードにする。
    pub fn with_id(self, id: i64) -> Pokenea {
        Pokenea {
            id,
            nombre: self.nombre,
            altura: self.altura,
            habilidad: self.habilidad,
            imagen: self.imagen,
            frase: self.frase,
        }
    }
}

// ---------------------------------------------------------------------------
// レスポンス
// ---------------------------------------------------------------------------

/// `GET /api/pokenea` のレスポンス。
///
/// 画像とフレーズは含まない。応答したコンテナのIDを付与する。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokeneaJson {
    pub id: i64,
    pub nombre: String,
    pub altura: f64,
    pub habilidad: String,
    /// 応答したコンテナ（ホスト名）
    pub container_id: String,
}

impl PokeneaJson {
    pub fn new(pokenea: &Pokenea, container_id: &str) -> Self {
        Self {
            id: pokenea.id,
            nombre: pokenea.nombre.clone(),
            altura: pokenea.altura,
            habilidad: pokenea.habilidad.clone(),
            container_id: container_id.to_string(),
        }
    }
}

/// `GET /pokenea`, `GET /pokenea/{id}` のビューモデル。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokeneaView {
    pub pokenea: Pokenea,
    /// 画像の公開URL
    pub image_url: String,
    pub container_id: String,
}

/// `GET /` の一覧要素。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokeneaWithImage {
    pub pokenea: Pokenea,
    pub image_url: String,
}

/// エラーレスポンス `{"error": "..."}`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ---------------------------------------------------------------------------
// 作成フォーム
// ---------------------------------------------------------------------------

/// `POST /your-pokenea` で送信されるフォーム。
///
/// 入力をそのまま保持する（`altura` も文字列）。検証失敗時にはこの値を
/// そのまま返却し、ユーザーが修正できるようにする。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PokeneaForm {
    #[serde(default)]
    pub nombre: String,
    #[serde(default)]
    pub altura: String,
    #[serde(default)]
    pub habilidad: String,
    #[serde(default)]
    pub url_imagen: String,
    #[serde(default)]
    pub frase: String,
}

/// フォーム処理失敗時のレスポンス。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormErrorResponse {
    /// フォーム全体のエラー（画像取り込み失敗等）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// フィールドごとの検証エラー
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub field_errors: BTreeMap<String, String>,
    /// 送信された入力
    pub form: PokeneaForm,
}
