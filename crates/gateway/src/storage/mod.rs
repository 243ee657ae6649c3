//! # オブジェクトストレージ
//!
//! Gatewayが委譲するオブジェクトストレージの抽象インターフェース。
//! S3互換ストレージ実装は `s3` サブモジュールを参照。

#[cfg(feature = "vendor-aws")]
pub mod s3;

#[cfg(feature = "vendor-aws")]
pub use self::s3::S3ObjectStore;

/// アップロード中のペイロード。サイズ検査のためシーク可能なバッファに保持する。
pub type UploadPayload = std::io::Cursor<Vec<u8>>;

/// ストレージ操作のエラー。
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// アクセスキーまたはシークレットキーが未設定
    #[error("AWS credentials not found")]
    NoCredentials,
    /// バックエンドが返したエラー（メッセージはそのまま透過する）
    #[error("{0}")]
    Backend(String),
}

/// アップロード済みオブジェクトの所在。公開URLへ決定的に変換できる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectLocator {
    pub bucket: String,
    pub region: String,
    pub key: String,
    /// S3互換エンドポイント（MinIO等）。Noneの場合はAWSの仮想ホスト形式。
    pub endpoint: Option<String>,
}

impl ObjectLocator {
    /// 公開URLを組み立てる。キーはエンコードせずにそのまま連結する。
    pub fn url(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => format!(
                "{}/{}/{}",
                endpoint.trim_end_matches('/'),
                self.bucket,
                self.key
            ),
            None => format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.bucket, self.region, self.key
            ),
        }
    }
}

/// 一覧取得の1ページ分。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPage {
    pub keys: Vec<String>,
    /// 続きがある場合のみSome
    pub next_continuation_token: Option<String>,
}

/// オブジェクトストレージの抽象インターフェース。
///
/// 署名付きURLの生成はバックエンドのネイティブ署名機能に委譲する。
/// 有効期限は署名自体にエンコードされ、Gatewayは何も保持しない。
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// PUT用の署名付きURLを生成する。`content_type` は署名に束縛される。
    async fn presign_put(
        &self,
        key: &str,
        expiry_secs: u32,
        content_type: &str,
    ) -> Result<String, StorageError>;

    /// GET用の署名付きURLを生成する。
    async fn presign_get(&self, key: &str, expiry_secs: u32) -> Result<String, StorageError>;

    /// ペイロードを先頭からストリーム転送し、`key` に保存する。
    /// 同名オブジェクトは上書きされる。
    async fn put_object(
        &self,
        key: &str,
        payload: &mut UploadPayload,
        content_type: &str,
    ) -> Result<(), StorageError>;

    /// バケットのオブジェクト一覧を1ページ取得する。
    async fn list_page(&self, continuation_token: Option<String>)
        -> Result<ListPage, StorageError>;

    /// キーから公開URL用の所在情報を得る。
    fn locate(&self, key: &str) -> ObjectLocator;
}
