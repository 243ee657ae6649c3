//! # GET /
//!
//! トップページ。HTMLはバイナリに埋め込む。

use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../templates/index.html");

pub async fn handle_home() -> Html<&'static str> {
    Html(INDEX_HTML)
}
