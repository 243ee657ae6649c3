//! # POST /get-presigned-download-url
//!
//! ダウンロード用（GET）署名付きURLの発行。

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use secureshare_types::{DownloadUrlRequest, PresignedUrlResponse};

use crate::config::GatewayState;
use crate::error::GatewayError;
use crate::grant::issue_download_grant;

/// POST /get-presigned-download-url — 署名付きURL発行。
///
/// `password` は受け付けるが検証しない。照合先の認証情報ストアは持たない。
pub async fn handle_download_url(
    State(state): State<Arc<GatewayState>>,
    body: Result<Json<DownloadUrlRequest>, JsonRejection>,
) -> Result<Json<PresignedUrlResponse>, GatewayError> {
    let Json(body) = body.map_err(super::bad_json)?;

    if body.password.is_some() {
        tracing::debug!("passwordが指定されましたが検証は行いません");
    }

    let grant = issue_download_grant(state.store.as_ref(), body.file_name.as_deref())
        .await
        .inspect_err(|e| tracing::warn!(error = %e, "ダウンロード用URLの発行に失敗"))?;

    tracing::info!(
        key = %grant.target_key,
        operation = grant.operation.http_method(),
        expires_in = grant.expires_in_secs,
        "署名付きURLを発行"
    );

    Ok(Json(PresignedUrlResponse {
        url: grant.signed_url,
    }))
}
