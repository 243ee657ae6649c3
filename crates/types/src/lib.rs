//! # SecureShare 共有型定義
//!
//! GatewayのHTTP APIで送受信するJSONボディをRust構造体として提供する。
//!
//! ## 規則
//! - リクエストの必須フィールドは `Option<String>` で受け取り、欠落判定はGateway側で行う。
//!   空文字列も欠落として扱う。
//! - エラーは常に `{"error": "<理由>"}` の形で返る。

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// POST /generate-presigned-url
// ---------------------------------------------------------------------------

/// アップロード用署名付きURLの発行リクエスト。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateUploadUrlRequest {
    /// オブジェクトキー（ファイル名がそのままキーになる）
    #[serde(default)]
    pub file_name: Option<String>,
    /// 署名に束縛するMIMEタイプ
    #[serde(default)]
    pub file_type: Option<String>,
}

// ---------------------------------------------------------------------------
// POST /get-presigned-download-url
// ---------------------------------------------------------------------------

/// ダウンロード用署名付きURLの発行リクエスト。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DownloadUrlRequest {
    /// オブジェクトキー
    #[serde(default)]
    pub file_name: Option<String>,
    /// 受け付けるが検証しない
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// 署名付きURL発行レスポンス（アップロード・ダウンロード共通）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresignedUrlResponse {
    /// 署名付きURL
    pub url: String,
}

// ---------------------------------------------------------------------------
// POST /upload
// ---------------------------------------------------------------------------

/// アップロード完了レスポンス。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    /// 完了メッセージ
    pub message: String,
    /// 保存先オブジェクトの公開URL
    pub url: String,
}

// ---------------------------------------------------------------------------
// GET /list-uploaded-files
// ---------------------------------------------------------------------------

/// 保存済みオブジェクトキーの一覧。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileListResponse {
    pub files: Vec<String>,
}

// ---------------------------------------------------------------------------
// エラー
// ---------------------------------------------------------------------------

/// 全ルート共通のエラーボディ。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
