//! # Pokeneaエンドポイント

pub mod create;
pub mod home;
pub mod random;
pub mod show;

pub use create::handle_create_pokenea;
pub use home::handle_home;
pub use random::{handle_api_pokenea, handle_random_pokenea};
pub use show::handle_show_pokenea;

use axum::response::IntoResponse;

use crate::error::{AppError, PAGE_NOT_FOUND};

/// 未定義ルート。
pub async fn handle_not_found() -> impl IntoResponse {
    AppError::NotFound(PAGE_NOT_FOUND)
}
