//! # Gatewayエンドポイント
//!
//! - `GET /` — トップページ
//! - `POST /generate-presigned-url` — アップロード用署名付きURL発行
//! - `POST /upload` — multipartアップロード
//! - `POST /get-presigned-download-url` — ダウンロード用署名付きURL発行
//! - `GET /list-uploaded-files` — 保存済みファイル一覧

pub mod download_url;
pub mod home;
pub mod list_files;
pub mod upload;
pub mod upload_url;

#[cfg(test)]
pub(crate) mod test_helpers;


use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::config::GatewayState;
use crate::error::GatewayError;

pub use download_url::handle_download_url;
pub use home::handle_home;
pub use list_files::handle_list_files;
pub use upload::handle_upload;
pub use upload_url::handle_upload_url;

/// 全ルートを束ねたルーターを構築する。
///
/// `/upload` はボディ上限を外す。保持量はハンドラー側で打ち切るので、
/// どれだけ大きなファイルでもアドミッション検査の応答が返る。
/// JSONルートはフレームワーク既定の上限のまま。
pub fn router(state: Arc<GatewayState>) -> axum::Router {
    axum::Router::new()
        .route("/", get(handle_home))
        .route("/generate-presigned-url", post(handle_upload_url))
        .route(
            "/upload",
            post(handle_upload).layer(DefaultBodyLimit::disable()),
        )
        .route("/get-presigned-download-url", post(handle_download_url))
        .route("/list-uploaded-files", get(handle_list_files))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// JSONボディのパース失敗を400に変換する。
pub(crate) fn bad_json(rejection: JsonRejection) -> GatewayError {
    GatewayError::BadRequest(rejection.body_text())
}
