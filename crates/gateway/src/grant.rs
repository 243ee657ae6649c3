//! # 一時アクセス権の発行
//!
//! 特定の1オブジェクトに対する1操作（書き込みまたは読み出し）だけを許可する、
//! 有効期限付きの署名付きURLを発行する。
//!
//! - 有効期限は常に [`GRANT_EXPIRY_SECS`]。クライアントからの指定は受け付けない。
//! - 操作種別（PUT/GET）は発行時に固定され、署名にエンコードされる。
//! - アップロード用はContent-Typeも署名に束縛し、実際のPUTはそれと一致する必要がある。
//! - 署名の失敗はリトライせず、バックエンドのメッセージを付けて返す。

use crate::error::GatewayError;
use crate::storage::ObjectStore;

/// 署名付きURLの有効期限（秒）。
pub const GRANT_EXPIRY_SECS: u32 = 300;

pub const MISSING_UPLOAD_FIELDS: &str = "File name and type are required";
pub const MISSING_DOWNLOAD_FIELD: &str = "File name is required";

/// 署名付きURLが許可する操作。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantOperation {
    /// PUT
    Write,
    /// GET
    Read,
}

impl GrantOperation {
    pub fn http_method(self) -> &'static str {
        match self {
            GrantOperation::Write => "PUT",
            GrantOperation::Read => "GET",
        }
    }
}

/// 発行済みの一時アクセス権。発行後は不変で、Gatewayには保存されない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessGrant {
    pub target_key: String,
    pub operation: GrantOperation,
    pub expires_in_secs: u32,
    pub signed_url: String,
}

/// 空文字列も欠落として扱う。
fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// アップロード用（PUT）の署名付きURLを発行する。
///
/// `key` と `content_type` のどちらかが欠けていればバックエンドを呼ばずに拒否する。
pub async fn issue_upload_grant(
    store: &dyn ObjectStore,
    key: Option<&str>,
    content_type: Option<&str>,
) -> Result<AccessGrant, GatewayError> {
    let (Some(key), Some(content_type)) = (present(key), present(content_type)) else {
        return Err(GatewayError::MissingField(MISSING_UPLOAD_FIELDS));
    };

    let signed_url = store
        .presign_put(key, GRANT_EXPIRY_SECS, content_type)
        .await
        .map_err(GatewayError::backend)?;

    Ok(AccessGrant {
        target_key: key.to_string(),
        operation: GrantOperation::Write,
        expires_in_secs: GRANT_EXPIRY_SECS,
        signed_url,
    })
}

/// ダウンロード用（GET）の署名付きURLを発行する。
pub async fn issue_download_grant(
    store: &dyn ObjectStore,
    key: Option<&str>,
) -> Result<AccessGrant, GatewayError> {
    let Some(key) = present(key) else {
        return Err(GatewayError::MissingField(MISSING_DOWNLOAD_FIELD));
    };

    let signed_url = store
        .presign_get(key, GRANT_EXPIRY_SECS)
        .await
        .map_err(GatewayError::backend)?;

    Ok(AccessGrant {
        target_key: key.to_string(),
        operation: GrantOperation::Read,
        expires_in_secs: GRANT_EXPIRY_SECS,
        signed_url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints::test_helpers::{MockObjectStore, StoreCall};

    #[tokio::test]
    async fn test_upload_grant_is_put_with_fixed_expiry() {
        let store = MockObjectStore::new();
        let log = store.call_log();

        let grant = issue_upload_grant(&store, Some("photo.jpg"), Some("image/jpeg"))
            .await
            .unwrap();

        assert_eq!(grant.operation, GrantOperation::Write);
        assert_eq!(grant.operation.http_method(), "PUT");
        assert_eq!(grant.expires_in_secs, 300);
        assert_eq!(grant.target_key, "photo.jpg");
        assert!(grant.signed_url.contains("method=PUT"));

        let calls = log.lock().unwrap().clone();
        assert_eq!(
            calls,
            vec![StoreCall::PresignPut {
                key: "photo.jpg".to_string(),
                expiry_secs: 300,
                content_type: "image/jpeg".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_download_grant_is_get_with_fixed_expiry() {
        let store = MockObjectStore::new();
        let log = store.call_log();

        let grant = issue_download_grant(&store, Some("a.txt")).await.unwrap();

        assert_eq!(grant.operation, GrantOperation::Read);
        assert_eq!(grant.expires_in_secs, 300);
        assert!(grant.signed_url.contains("method=GET"));
        assert_eq!(
            log.lock().unwrap().clone(),
            vec![StoreCall::PresignGet {
                key: "a.txt".to_string(),
                expiry_secs: 300,
            }]
        );
    }

    /// 必須フィールドが欠けている場合はバックエンドを呼ばない
    #[tokio::test]
    async fn test_missing_fields_skip_backend() {
        let store = MockObjectStore::new();
        let log = store.call_log();

        for (key, content_type) in [
            (None, None),
            (Some("a.txt"), None),
            (None, Some("text/plain")),
            (Some(""), Some("text/plain")),
            (Some("a.txt"), Some("")),
        ] {
            let err = issue_upload_grant(&store, key, content_type)
                .await
                .unwrap_err();
            assert!(matches!(err, GatewayError::MissingField(MISSING_UPLOAD_FIELDS)));
        }

        for key in [None, Some("")] {
            let err = issue_download_grant(&store, key).await.unwrap_err();
            assert!(matches!(err, GatewayError::MissingField(MISSING_DOWNLOAD_FIELD)));
        }

        assert!(log.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_signing_failure_is_backend_error() {
        let store = MockObjectStore::new().failing("SignatureDoesNotMatch");
        let err = issue_download_grant(&store, Some("a.txt"))
            .await
            .unwrap_err();
        match err {
            GatewayError::Backend(msg) => assert_eq!(msg, "SignatureDoesNotMatch"),
            other => panic!("unexpected: {other:?}"),
        }

        // 認証情報の欠落も署名経路ではBackendとして返る
        let store = MockObjectStore::new().without_credentials();
        let err = issue_upload_grant(&store, Some("a.txt"), Some("text/plain"))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Backend(_)));
    }
}
