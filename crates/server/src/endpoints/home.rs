//! # GET /
//!
//! 全Pokeneaの一覧。

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use pokenea_types::PokeneaWithImage;

use crate::config::AppState;
use crate::error::AppError;

/// GET / — 全Pokeneaを画像の公開URL付きでid順に返す。
pub async fn handle_home(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PokeneaWithImage>>, AppError> {
    let pokeneas = state.repository.list().await?;

    Ok(Json(
        pokeneas
            .into_iter()
            .map(|pokenea| PokeneaWithImage {
                image_url: state.image_url(&pokenea.imagen),
                pokenea,
            })
            .collect(),
    ))
}
