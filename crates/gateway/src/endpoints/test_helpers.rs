//! # エンドポイントテスト用共通ヘルパー
//!
//! ストレージへの接続なしで動作するモックと、実ルーターを起動するヘルパー。

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::io::AsyncReadExt;

use crate::config::GatewayState;
use crate::storage::{ListPage, ObjectLocator, ObjectStore, StorageError, UploadPayload};

/// モックが受けた呼び出しの記録。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    PresignPut {
        key: String,
        expiry_secs: u32,
        content_type: String,
    },
    PresignGet {
        key: String,
        expiry_secs: u32,
    },
    PutObject {
        key: String,
        content_type: String,
        body: Vec<u8>,
    },
    ListPage {
        continuation_token: Option<String>,
    },
}

enum Failure {
    NoCredentials,
    Backend(String),
}

/// テスト用のモックObjectStore。
/// 呼び出しを記録し、ダミーの署名付きURLを返す。
#[derive(Default)]
pub struct MockObjectStore {
    calls: Arc<Mutex<Vec<StoreCall>>>,
    objects: Mutex<HashMap<String, Vec<u8>>>,
    pages: Vec<Vec<String>>,
    failure: Option<Failure>,
}

impl MockObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 一覧取得で返すページ列。継続トークンはページ番号。
    pub fn with_pages(mut self, pages: Vec<Vec<String>>) -> Self {
        self.pages = pages;
        self
    }

    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(Failure::Backend(message.to_string()));
        self
    }

    pub fn without_credentials(mut self) -> Self {
        self.failure = Some(Failure::NoCredentials);
        self
    }

    /// 呼び出し記録へのハンドル。モックを `GatewayState` に移した後も参照できる。
    pub fn call_log(&self) -> Arc<Mutex<Vec<StoreCall>>> {
        self.calls.clone()
    }

    pub fn stored(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    fn record(&self, call: StoreCall) -> Result<(), StorageError> {
        self.calls.lock().unwrap().push(call);
        match &self.failure {
            None => Ok(()),
            Some(Failure::NoCredentials) => Err(StorageError::NoCredentials),
            Some(Failure::Backend(msg)) => Err(StorageError::Backend(msg.clone())),
        }
    }
}

#[async_trait::async_trait]
impl ObjectStore for MockObjectStore {
    async fn presign_put(
        &self,
        key: &str,
        expiry_secs: u32,
        content_type: &str,
    ) -> Result<String, StorageError> {
        self.record(StoreCall::PresignPut {
            key: key.to_string(),
            expiry_secs,
            content_type: content_type.to_string(),
        })?;
        Ok(format!(
            "http://mock-storage/{key}?method=PUT&expires={expiry_secs}&sig=test"
        ))
    }

    async fn presign_get(&self, key: &str, expiry_secs: u32) -> Result<String, StorageError> {
        self.record(StoreCall::PresignGet {
            key: key.to_string(),
            expiry_secs,
        })?;
        Ok(format!(
            "http://mock-storage/{key}?method=GET&expires={expiry_secs}&sig=test"
        ))
    }

    async fn put_object(
        &self,
        key: &str,
        payload: &mut UploadPayload,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let mut body = Vec::new();
        payload
            .read_to_end(&mut body)
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        self.record(StoreCall::PutObject {
            key: key.to_string(),
            content_type: content_type.to_string(),
            body: body.clone(),
        })?;
        self.objects.lock().unwrap().insert(key.to_string(), body);
        Ok(())
    }

    async fn list_page(
        &self,
        continuation_token: Option<String>,
    ) -> Result<ListPage, StorageError> {
        self.record(StoreCall::ListPage {
            continuation_token: continuation_token.clone(),
        })?;

        let index: usize = continuation_token
            .as_deref()
            .map(|t| t.parse().unwrap())
            .unwrap_or(0);
        let keys = self.pages.get(index).cloned().unwrap_or_default();
        let next_continuation_token =
            (index + 1 < self.pages.len()).then(|| (index + 1).to_string());

        Ok(ListPage {
            keys,
            next_continuation_token,
        })
    }

    fn locate(&self, key: &str) -> ObjectLocator {
        ObjectLocator {
            bucket: "secureshare7".to_string(),
            region: "eu-north-1".to_string(),
            key: key.to_string(),
            endpoint: None,
        }
    }
}

/// テスト用GatewayStateを構築するヘルパー
pub fn test_state(store: MockObjectStore) -> Arc<GatewayState> {
    Arc::new(GatewayState {
        store: Box::new(store),
        list_all_pages: false,
    })
}

/// 実ルーターを127.0.0.1の空きポートで起動し、ベースURLを返す。
pub async fn start_gateway(state: Arc<GatewayState>) -> String {
    let app = super::router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    format!("http://127.0.0.1:{port}")
}
