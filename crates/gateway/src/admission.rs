//! # アップロードのアドミッション検査
//!
//! ストレージへ何かを送る前に、ファイル名の拡張子とペイロードサイズで
//! アップロード可否を判定する。
//!
//! サイズ判定は末尾へのシークと先頭へのシークのみで行い、ペイロードを消費しない。
//! 検査後のストリームは必ず先頭に位置する。

use std::io::SeekFrom;

use tokio::io::{AsyncSeek, AsyncSeekExt};

use crate::error::GatewayError;

/// 受け付ける拡張子（小文字）。
pub const ALLOWED_EXTENSIONS: [&str; 6] = ["txt", "pdf", "png", "jpg", "jpeg", "gif"];

/// ペイロードの上限サイズ（10 MiB、境界値は許可）。
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// アドミッション検査による拒否理由。どちらもクライアントエラー。
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("File type not allowed")]
    BadExtension,
    #[error("File size exceeds limit")]
    TooLarge,
}

/// 最後の `.` 以降を小文字化し、許可リストに含まれるか判定する。
/// `.` を含まないファイル名は常に拒否。
pub fn allowed_extension(file_name: &str) -> bool {
    match file_name.rsplit_once('.') {
        Some((_, ext)) => ALLOWED_EXTENSIONS.contains(&ext.to_lowercase().as_str()),
        None => false,
    }
}

pub fn allowed_size(len: u64) -> bool {
    len <= MAX_FILE_SIZE
}

/// ペイロードの全長を非破壊的に取得する。
pub async fn probe_len<R>(payload: &mut R) -> std::io::Result<u64>
where
    R: AsyncSeek + Unpin,
{
    let len = payload.seek(SeekFrom::End(0)).await?;
    payload.seek(SeekFrom::Start(0)).await?;
    Ok(len)
}

/// 拡張子、サイズの順に検査する。受理した場合はペイロード長を返す。
///
/// 拡張子で拒否した場合はペイロードに触れない。
pub async fn validate<R>(file_name: &str, payload: &mut R) -> Result<u64, GatewayError>
where
    R: AsyncSeek + Unpin,
{
    if !allowed_extension(file_name) {
        return Err(Rejection::BadExtension.into());
    }

    let len = probe_len(payload)
        .await
        .map_err(|e| GatewayError::BadRequest(format!("payload could not be read: {e}")))?;

    if !allowed_size(len) {
        return Err(Rejection::TooLarge.into());
    }

    Ok(len)
}
