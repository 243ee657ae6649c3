//! # SecureShare Gateway
//!
//! オブジェクトストレージ上のファイルを、長期認証情報を渡さずに
//! 有効期限付きURLでアップロード・取得させるHTTPゲートウェイ。
//!
//! ## 役割
//! - アップロードのアドミッション検査（拡張子・サイズ）
//! - ストレージへのストリーム転送
//! - 署名付きURL（PUT/GET、有効期限300秒）の発行
//! - 保存済みオブジェクトの一覧
//!
//! ## API エンドポイント
//! - `GET /` — トップページ
//! - `POST /generate-presigned-url` — アップロード用署名付きURL発行
//! - `POST /upload` — multipartアップロード
//! - `POST /get-presigned-download-url` — ダウンロード用署名付きURL発行
//! - `GET /list-uploaded-files` — 保存済みファイル一覧

mod admission;
mod config;
mod endpoints;
mod error;
mod grant;
mod ingest;
mod inventory;
mod storage;

use std::sync::Arc;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{GatewayConfig, GatewayState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "secureshare_gateway=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = GatewayConfig::from_env()?;
    tracing::info!(
        bucket = %config.storage.bucket,
        region = %config.storage.region,
        has_credentials = config.storage.has_credentials(),
        list_all_pages = config.list_all_pages,
        "設定を読み込みました"
    );

    let state = Arc::new(GatewayState {
        store: open_store(&config)?,
        list_all_pages: config.list_all_pages,
    });

    let app = endpoints::router(state);

    tracing::info!("Gatewayを {} で起動します", config.listen_addr);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(feature = "vendor-aws")]
fn open_store(config: &GatewayConfig) -> anyhow::Result<Box<dyn storage::ObjectStore>> {
    Ok(Box::new(storage::S3ObjectStore::new(&config.storage)?))
}

#[cfg(not(feature = "vendor-aws"))]
fn open_store(_config: &GatewayConfig) -> anyhow::Result<Box<dyn storage::ObjectStore>> {
    anyhow::bail!("ストレージ実装が有効になっていません（vendor-aws featureを有効にしてください）")
}
