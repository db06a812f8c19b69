//! # Presign Gateway 署名サービス
//!
//! ストレージキーに対して有効期限付きの署名付きURLを発行する。
//!
//! ## API エンドポイント
//! - `GET /presigned?uri=<key>`: 署名付きURL発行
//! - `GET /healthz`: 死活監視

mod config;
mod endpoints;
mod error;
mod key;
mod signer;
mod storage;

use std::sync::Arc;

use config::{SignerConfig, SignerState};
use signer::Signer;
use storage::ObjectStore;

/// ルーターを構築する。
fn build_router(state: Arc<SignerState>) -> axum::Router {
    axum::Router::new()
        .route("/presigned", axum::routing::get(endpoints::handle_presigned))
        .route("/healthz", axum::routing::get(endpoints::handle_health))
        .with_state(state)
}

/// 設定に応じたObjectStoreを構築する。
#[cfg(feature = "vendor-aws")]
fn build_store(config: &SignerConfig) -> anyhow::Result<Arc<dyn ObjectStore>> {
    Ok(Arc::new(storage::S3ObjectStore::from_config(&config.s3)?))
}

#[cfg(not(feature = "vendor-aws"))]
fn build_store(_config: &SignerConfig) -> anyhow::Result<Arc<dyn ObjectStore>> {
    anyhow::bail!("ストレージバックエンドが有効化されていません（feature `vendor-aws`）")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = SignerConfig::from_env()?;
    let store = build_store(&config)?;

    let state = Arc::new(SignerState {
        signer: Signer::new(store, &config),
    });
    tracing::info!(
        expiry_secs = state.signer.expiry_secs(),
        "署名付きURLの有効期限"
    );

    let app = build_router(state);

    tracing::info!("署名サービスを {} で起動します", config.listen_addr);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use crate::signer::tests::MockObjectStore;

    /// テスト用サーバーを起動し、ベースURLを返す。
    async fn start_server(store: Arc<MockObjectStore>) -> String {
        let state = Arc::new(SignerState {
            signer: Signer::new(store, &test_config(3600, 0)),
        });
        let app = build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://127.0.0.1:{port}")
    }

    /// 200 + {"presigned_url": ...} が返ることを確認
    #[tokio::test]
    async fn test_presigned_over_http() {
        let base = start_server(Arc::new(MockObjectStore::default())).await;

        let response = reqwest::Client::new()
            .get(format!("{base}/presigned"))
            .query(&[("uri", "/docs/report 2024.pdf")])
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        assert_eq!(
            response.headers()["content-type"].to_str().unwrap(),
            "application/json"
        );
        let body: serde_json::Value = response.json().await.unwrap();
        assert!(body["presigned_url"]
            .as_str()
            .unwrap()
            .starts_with("https://store.example/docs/report 2024.pdf?"));
    }

    /// uri欠落時に400 + {"error": ...} が返ることを確認
    #[tokio::test]
    async fn test_missing_uri_over_http() {
        let base = start_server(Arc::new(MockObjectStore::default())).await;

        let response = reqwest::get(format!("{base}/presigned")).await.unwrap();

        assert_eq!(response.status(), 400);
        let body: presign_types::ErrorResponse = response.json().await.unwrap();
        assert!(body.error.contains("uri"));
    }

    /// バックエンド失敗時に500 + {"error": ...} が返ることを確認
    #[tokio::test]
    async fn test_backend_failure_over_http() {
        let base = start_server(Arc::new(MockObjectStore::failing("AccessDenied"))).await;

        let response = reqwest::get(format!("{base}/presigned?uri=/a.txt"))
            .await
            .unwrap();

        assert_eq!(response.status(), 500);
        let body: presign_types::ErrorResponse = response.json().await.unwrap();
        assert!(body.error.contains("AccessDenied"));
    }

    #[tokio::test]
    async fn test_health() {
        let base = start_server(Arc::new(MockObjectStore::default())).await;
        let response = reqwest::get(format!("{base}/healthz")).await.unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(response.text().await.unwrap(), "ok");
    }
}
