//! # 保存済みオブジェクトの一覧
//!
//! 呼び出しごとにストレージへ問い合わせる。キャッシュはしない。
//! デフォルトでは先頭ページのみを返し、`all_pages` の場合は継続トークンを辿る。

use crate::error::GatewayError;
use crate::storage::ObjectStore;

/// バケット内のオブジェクトキーを、ストレージが返した順に列挙する。
pub async fn list_all(store: &dyn ObjectStore, all_pages: bool) -> Result<Vec<String>, GatewayError> {
    let mut files = Vec::new();
    let mut continuation_token = None;

    loop {
        let page = store
            .list_page(continuation_token)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "オブジェクト一覧の取得に失敗");
                GatewayError::backend(e)
            })?;
        files.extend(page.keys);

        match page.next_continuation_token {
            Some(token) if all_pages => continuation_token = Some(token),
            Some(_) => {
                tracing::debug!("続きのページがありますが先頭ページのみを返します");
                break;
            }
            None => break,
        }
    }

    tracing::info!(count = files.len(), "オブジェクト一覧を取得");
    Ok(files)
}
