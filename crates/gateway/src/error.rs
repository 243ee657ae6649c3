//! # Gateway エラー型
//!
//! 全エンドポイントで共通のエラー型。
//! クライアント起因のエラーは400、ストレージ起因のエラーは500として返し、
//! ボディは常に `{"error": "<理由>"}` とする。

use axum::http::StatusCode;
use axum::Json;
use secureshare_types::ErrorResponse;

use crate::admission::Rejection;
use crate::storage::StorageError;

/// Gatewayエラー型。
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// 必須フィールドの欠落（メッセージはルートごとに異なる）
    #[error("{0}")]
    MissingField(&'static str),
    /// multipartに `file` パートがない
    #[error("No file provided")]
    MissingPayload,
    /// アドミッション検査で拒否
    #[error(transparent)]
    Rejected(#[from] Rejection),
    /// リクエストボディのパース失敗
    #[error("{0}")]
    BadRequest(String),
    /// ストレージの認証情報が未設定
    #[error("AWS credentials not found")]
    NoCredentials,
    /// ストレージ操作の失敗（バックエンドのメッセージをそのまま返す）
    #[error("{0}")]
    Backend(String),
}

impl GatewayError {
    /// 署名・一覧取得の失敗を変換する。認証情報の欠落も `Backend` に畳み込む。
    pub fn backend(err: StorageError) -> Self {
        GatewayError::Backend(err.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::MissingField(_)
            | GatewayError::MissingPayload
            | GatewayError::Rejected(_)
            | GatewayError::BadRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::NoCredentials | GatewayError::Backend(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<StorageError> for GatewayError {
    /// アップロード経路の変換。認証情報の欠落は `NoCredentials` として区別する。
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NoCredentials => GatewayError::NoCredentials,
            StorageError::Backend(msg) => GatewayError::Backend(msg),
        }
    }
}

impl axum::response::IntoResponse for GatewayError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
