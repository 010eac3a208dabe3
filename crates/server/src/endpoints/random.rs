//! # GET /api/pokenea, GET /pokenea
//!
//! ランダムなPokeneaを返す。どちらも応答したコンテナのIDを付与する。

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use pokenea_types::{Pokenea, PokeneaJson, PokeneaView};

use crate::config::AppState;
use crate::error::{AppError, NO_POKENEAS};

async fn pick_random(state: &AppState) -> Result<Pokenea, AppError> {
    state
        .repository
        .random()
        .await?
        .ok_or(AppError::NotFound(NO_POKENEAS))
}

/// GET /api/pokenea — 画像とフレーズを除いたJSON。
pub async fn handle_api_pokenea(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PokeneaJson>, AppError> {
    let pokenea = pick_random(&state).await?;
    Ok(Json(PokeneaJson::new(&pokenea, &state.container_id)))
}

/// GET /pokenea — 画像URLとフレーズを含むビュー。
pub async fn handle_random_pokenea(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PokeneaView>, AppError> {
    let pokenea = pick_random(&state).await?;
    Ok(Json(PokeneaView {
        image_url: state.image_url(&pokenea.imagen),
        pokenea,
        container_id: state.container_id.clone(),
    }))
}
