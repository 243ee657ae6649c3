//! # POST /upload
//!
//! multipartの `file` パートを受け取り、検査の上ストレージへ転送する。
//!
//! パートの内容はシーク可能なバッファに読み込んでから検査に渡す。
//! バッファはサイズ上限+1バイトで打ち切るため、ボディ全体の大きさに
//! 関わらずメモリ使用量は一定に収まる。
//! ファイル名を持たない `file` パートは無視する（ファイルなしと同じ扱い）。

use std::sync::Arc;

use axum::extract::multipart::{Field, Multipart, MultipartError, MultipartRejection};
use axum::extract::State;
use axum::Json;
use secureshare_types::UploadResponse;

use crate::admission::{self, Rejection, MAX_FILE_SIZE};
use crate::config::GatewayState;
use crate::error::GatewayError;
use crate::ingest::{self, IncomingFile, UPLOAD_SUCCESS_MESSAGE};

/// multipartのファイルフィールド名
pub const FILE_FIELD: &str = "file";

/// POST /upload — ファイルアップロード。
pub async fn handle_upload(
    State(state): State<Arc<GatewayState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, GatewayError> {
    // multipartでないリクエストはファイルなしとして扱う
    let file = match multipart {
        Ok(mut multipart) => read_file_field(&mut multipart).await?,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "multipartとして解釈できません");
            None
        }
    };

    let locator = ingest::handle_upload(state.store.as_ref(), file).await?;

    Ok(Json(UploadResponse {
        message: UPLOAD_SUCCESS_MESSAGE.to_string(),
        url: locator.url(),
    }))
}

/// 最初の `file` パートを読み込む。
///
/// 拡張子はファイル名が分かった時点で検査し、内容を読む前に拒否する。
/// 内容は `MAX_FILE_SIZE + 1` バイトまでしか保持しないため、
/// 上限超過は後段のサイズ検査で `TooLarge` として検出される。
/// 拒否した場合も残りのボディは読み捨ててから応答する。
async fn read_file_field(multipart: &mut Multipart) -> Result<Option<IncomingFile>, GatewayError> {
    let mut found = None;

    while let Some(mut field) = multipart.next_field().await.map_err(bad_multipart)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content_type = field.content_type().map(str::to_string);

        if !admission::allowed_extension(&file_name) {
            tracing::warn!(file_name = %file_name, "許可されていない拡張子のためアップロードを拒否");
            drop(field);
            discard_rest(multipart).await;
            return Err(Rejection::BadExtension.into());
        }

        let bytes = read_capped(&mut field, MAX_FILE_SIZE + 1).await?;
        found = Some(IncomingFile::new(file_name, content_type, bytes));
        break;
    }

    discard_rest(multipart).await;
    Ok(found)
}

/// パートを最後まで読み、先頭 `cap` バイトだけを保持する。
async fn read_capped(field: &mut Field<'_>, cap: u64) -> Result<Vec<u8>, GatewayError> {
    let cap = usize::try_from(cap).unwrap_or(usize::MAX);
    let mut buf = Vec::new();

    while let Some(chunk) = field.chunk().await.map_err(bad_multipart)? {
        let room = cap.saturating_sub(buf.len());
        buf.extend_from_slice(&chunk[..chunk.len().min(room)]);
    }

    Ok(buf)
}

/// 残りのパートを読み捨てる。途中のエラーは応答に影響させない。
async fn discard_rest(multipart: &mut Multipart) {
    while let Ok(Some(field)) = multipart.next_field().await {
        tracing::debug!(name = ?field.name(), "未使用のパートを読み捨て");
    }
}

fn bad_multipart(error: MultipartError) -> GatewayError {
    GatewayError::BadRequest(error.body_text())
}
