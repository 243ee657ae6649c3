//! # GET /list-uploaded-files
//!
//! 保存済みファイル一覧。

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use secureshare_types::FileListResponse;

use crate::config::GatewayState;
use crate::error::GatewayError;
use crate::inventory;

pub async fn handle_list_files(
    State(state): State<Arc<GatewayState>>,
) -> Result<Json<FileListResponse>, GatewayError> {
    let files = inventory::list_all(state.store.as_ref(), state.list_all_pages).await?;
    Ok(Json(FileListResponse { files }))
}
