//! # Gateway設定・共有状態
//!
//! 環境変数からの設定読み込みとGatewayの共有状態の定義。
//! 設定は起動時に一度だけ読み込み、以降は不変。

use std::fmt;

use crate::storage::ObjectStore;

/// バケット名のデフォルト値
pub const DEFAULT_BUCKET: &str = "secureshare7";
/// リージョンのデフォルト値
pub const DEFAULT_REGION: &str = "eu-north-1";
/// 待ち受けアドレスのデフォルト値
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:5000";

/// オブジェクトストレージの接続設定。
/// 認証情報にはデフォルト値がなく、外部から与える必要がある。
#[derive(Clone)]
pub struct StorageConfig {
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub bucket: String,
    pub region: String,
    /// S3互換エンドポイント（MinIO, Cloudflare R2等）
    pub endpoint: Option<String>,
}

impl StorageConfig {
    pub fn has_credentials(&self) -> bool {
        self.access_key.is_some() && self.secret_key.is_some()
    }
}

impl fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageConfig")
            .field("access_key", &self.access_key)
            .field("secret_key", &self.secret_key.as_ref().map(|_| "<redacted>"))
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

/// Gateway全体の設定。
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub storage: StorageConfig,
    /// 待ち受けアドレス
    pub listen_addr: String,
    /// 一覧取得で継続トークンを辿るか（falseなら先頭ページのみ）
    pub list_all_pages: bool,
}

impl GatewayConfig {
    /// `.env` があれば読み込んだ上で、環境変数から構築する。
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 任意のキー参照関数から構築する。空文字列は未設定として扱う。
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let list_all_pages = match var("LIST_ALL_PAGES").as_deref() {
            None => false,
            Some("true") | Some("1") => true,
            Some("false") | Some("0") => false,
            Some(other) => {
                anyhow::bail!("LIST_ALL_PAGESはtrueまたはfalseである必要があります: {other}")
            }
        };

        Ok(Self {
            storage: StorageConfig {
                access_key: var("AWS_ACCESS_KEY"),
                secret_key: var("AWS_SECRET_KEY"),
                bucket: var("AWS_BUCKET_NAME").unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
                region: var("AWS_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
                endpoint: var("AWS_ENDPOINT_URL"),
            },
            listen_addr: var("GATEWAY_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string()),
            list_all_pages,
        })
    }
}

/// Gatewayの共有状態。起動時に構築し、全リクエストから読み取り専用で参照する。
pub struct GatewayState {
    /// オブジェクトストレージ（S3互換等、トレイトで抽象化）
    pub store: Box<dyn ObjectStore>,
    /// 一覧取得で継続トークンを辿るか
    pub list_all_pages: bool,
}
