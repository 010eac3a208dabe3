//! # サーバーエラー型
//!
//! すべて `{"error": "..."}` 形式（フォームエラーは [`FormErrorResponse`]）のJSONで返す。

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use pokenea_types::{ErrorResponse, FormErrorResponse, PokeneaForm};

use crate::form::FieldErrors;
use crate::repository::RepositoryError;

pub const NO_POKENEAS: &str = "No hay Pokeneas disponibles";
pub const POKENEA_NOT_FOUND: &str = "Pokenea no encontrado";
pub const PAGE_NOT_FOUND: &str = "Página no encontrada";
pub const DUPLICATE_NAME: &str = "Ya existe un Pokenea con ese nombre";

/// サーバーエラー型。
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// リソースが存在しない
    #[error("{0}")]
    NotFound(&'static str),
    /// フォーム処理の失敗（入力を添えて返す）
    #[error("フォーム処理に失敗")]
    Form(Box<FormErrorResponse>),
    /// レコードストアの失敗
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl AppError {
    /// フィールドごとの検証エラー。
    pub fn invalid_fields(field_errors: FieldErrors, form: PokeneaForm) -> Self {
        AppError::Form(Box::new(FormErrorResponse {
            error: None,
            field_errors,
            form,
        }))
    }

    /// フォーム全体のエラー。
    pub fn form(message: impl Into<String>, form: PokeneaForm) -> Self {
        AppError::Form(Box::new(FormErrorResponse {
            error: Some(message.into()),
            field_errors: FieldErrors::new(),
            form,
        }))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound(message) => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: message.to_string(),
                }),
            )
                .into_response(),
            AppError::Form(body) => (StatusCode::UNPROCESSABLE_ENTITY, Json(*body)).into_response(),
            AppError::Repository(e) => {
                tracing::error!(error = %e, "レコードストアのエラー");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: "Error interno del servidor".to_string(),
                    }),
                )
                    .into_response()
            }
        }
    }
}
