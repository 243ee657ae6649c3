//! # アップロード処理
//!
//! 受信したペイロードをアドミッション検査にかけ、受理したものだけを
//! ストレージへストリーム転送して、公開URL用の所在情報を返す。
//!
//! ## 処理フロー
//! 1. ペイロードがなければ即座に拒否
//! 2. アドミッション検査（拒否理由はそのまま返す）
//! 3. ファイル名をそのままキーとして転送（サニタイズ・衝突検出なし、同名は上書き）
//! 4. バケット・リージョン・キーから公開URLを組み立てる
//!
//! 転送失敗時の部分的な再開は行わない。クライアントは最初からやり直す。

use crate::admission;
use crate::error::GatewayError;
use crate::storage::{ObjectLocator, ObjectStore, UploadPayload};

/// アップロード成功時のメッセージ
pub const UPLOAD_SUCCESS_MESSAGE: &str = "File uploaded successfully";

/// パートにContent-Typeがない場合にストレージへ渡す型
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// リクエストから取り出したアップロード対象。
#[derive(Debug)]
pub struct IncomingFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub payload: UploadPayload,
}

impl IncomingFile {
    pub fn new(file_name: impl Into<String>, content_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type,
            payload: UploadPayload::new(bytes),
        }
    }
}

/// アップロードを検査し、受理したものをストレージに保存する。
pub async fn handle_upload(
    store: &dyn ObjectStore,
    file: Option<IncomingFile>,
) -> Result<ObjectLocator, GatewayError> {
    let Some(mut file) = file else {
        tracing::warn!("アップロードにファイルが含まれていません");
        return Err(GatewayError::MissingPayload);
    };

    let size = match admission::validate(&file.file_name, &mut file.payload).await {
        Ok(size) => size,
        Err(e) => {
            tracing::warn!(key = %file.file_name, error = %e, "アップロードを拒否");
            return Err(e);
        }
    };

    let content_type = file.content_type.as_deref().unwrap_or(DEFAULT_CONTENT_TYPE);

    if let Err(e) = store
        .put_object(&file.file_name, &mut file.payload, content_type)
        .await
    {
        tracing::error!(key = %file.file_name, error = %e, "ストレージへの転送に失敗");
        return Err(e.into());
    }

    let locator = store.locate(&file.file_name);
    tracing::info!(key = %file.file_name, size, content_type, "アップロード完了");
    Ok(locator)
}
