//! # GET /pokenea/{id}

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use pokenea_types::PokeneaView;

use crate::config::AppState;
use crate::error::{AppError, PAGE_NOT_FOUND, POKENEA_NOT_FOUND};

/// GET /pokenea/{id} — 指定idのPokeneaビュー。
///
/// 整数でないidは未定義ルートと同じ扱い。
pub async fn handle_show_pokenea(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<PokeneaView>, AppError> {
    let id: i64 = id.parse().map_err(|_| AppError::NotFound(PAGE_NOT_FOUND))?;

    let pokenea = state
        .repository
        .get(id)
        .await?
        .ok_or(AppError::NotFound(POKENEA_NOT_FOUND))?;

    Ok(Json(PokeneaView {
        image_url: state.image_url(&pokenea.imagen),
        pokenea,
        container_id: state.container_id.clone(),
    }))
}
