//! # POST /generate-presigned-url
//!
//! アップロード用（PUT）署名付きURLの発行。

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use secureshare_types::{GenerateUploadUrlRequest, PresignedUrlResponse};

use crate::config::GatewayState;
use crate::error::GatewayError;
use crate::grant::issue_upload_grant;

/// POST /generate-presigned-url — 署名付きURL発行。
///
/// `file_type` は署名に束縛されるため、クライアントは同じContent-TypeでPUTする必要がある。
pub async fn handle_upload_url(
    State(state): State<Arc<GatewayState>>,
    body: Result<Json<GenerateUploadUrlRequest>, JsonRejection>,
) -> Result<Json<PresignedUrlResponse>, GatewayError> {
    let Json(body) = body.map_err(super::bad_json)?;

    let grant = issue_upload_grant(
        state.store.as_ref(),
        body.file_name.as_deref(),
        body.file_type.as_deref(),
    )
    .await
    .inspect_err(|e| tracing::warn!(error = %e, "アップロード用URLの発行に失敗"))?;

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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints::test_helpers::{test_state, MockObjectStore};

    #[tokio::test]
    async fn test_upload_url_issued() {
        let state = test_state(MockObjectStore::new());
        let response = handle_upload_url(
            State(state),
            Ok(Json(GenerateUploadUrlRequest {
                file_name: Some("photo.jpg".to_string()),
                file_type: Some("image/jpeg".to_string()),
            })),
        )
        .await
        .unwrap()
        .0;
        assert!(response.url.contains("photo.jpg"));
        assert!(response.url.contains("expires=300"));
    }

    #[tokio::test]
    async fn test_upload_url_missing_type() {
        let state = test_state(MockObjectStore::new());
        let err = handle_upload_url(
            State(state),
            Ok(Json(GenerateUploadUrlRequest {
                file_name: Some("photo.jpg".to_string()),
                file_type: None,
            })),
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "File name and type are required");
    }
}
