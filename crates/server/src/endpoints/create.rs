//! # POST /your-pokenea
//!
//! ユーザーによるPokenea作成。
//!
//! 1. フォームを検証する
//! 2. 名前と画像キーの重複を確認する（ネットワークアクセス前）
//! 3. 画像を取り込む。失敗した場合は何も保存しない
//! 4. 画像キーを `imagen` としてレコードを保存する
//! 5. 作成したPokeneaのページへ `303 See Other`

use std::sync::Arc;

use axum::extract::State;
use axum::response::Redirect;
use axum::Form;
use pokenea_ingest::source::normalize_base_name;
use pokenea_types::{NewPokenea, PokeneaForm};

use crate::config::AppState;
use crate::error::{AppError, DUPLICATE_NAME};
use crate::form::validate;
use crate::repository::RepositoryError;

/// POST /your-pokenea — フォームからPokeneaを作成する。
pub async fn handle_create_pokenea(
    State(state): State<Arc<AppState>>,
    Form(form): Form<PokeneaForm>,
) -> Result<Redirect, AppError> {
    let valid = match validate(&form) {
        Ok(valid) => valid,
        Err(field_errors) => return Err(AppError::invalid_fields(field_errors, form)),
    };

    // 大文字小文字や空白だけが違う名前は既存の画像を上書きしてしまう
    let base = normalize_base_name(&valid.nombre);
    if state.repository.exists_by_name(&valid.nombre).await?
        || state.repository.image_base_in_use(&base).await?
    {
        return Err(AppError::form(DUPLICATE_NAME, form));
    }

    let image_url = match state.pipeline.ingest(&valid.url_imagen, &valid.nombre).await {
        Ok(url) => url,
        Err(e) => {
            if e.is_user_error() {
                tracing::warn!(nombre = %valid.nombre, error = %e, "画像の処理に失敗");
            } else {
                tracing::error!(nombre = %valid.nombre, error = %e, "画像の保存に失敗");
            }
            return Err(AppError::form(format!("Error: {e}"), form));
        }
    };
    let (_, key) = image_url.into_parts();

    let new = NewPokenea {
        nombre: valid.nombre,
        altura: valid.altura,
        habilidad: valid.habilidad,
        imagen: key,
        frase: valid.frase,
    };
    let pokenea = match state.repository.insert(new).await {
        Ok(pokenea) => pokenea,
        Err(RepositoryError::Duplicate(_)) => return Err(AppError::form(DUPLICATE_NAME, form)),
        Err(e) => return Err(e.into()),
    };

    tracing::info!(id = pokenea.id, nombre = %pokenea.nombre, imagen = %pokenea.imagen, "Pokeneaを作成");
    Ok(Redirect::to(&format!("/pokenea/{}", pokenea.id)))
}
