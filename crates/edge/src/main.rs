//! # Presign Gateway エッジリダイレクト
//!
//! CDNのviewer-requestを受け取り、未署名のリクエストを署名サービスで
//! 発行した署名付きURLへ302でリダイレクトする。
//! 署名済みのリクエスト（`X-Amz-Credential` を含む）はそのままオリジンへ通す。
//!
//! ## API エンドポイント
//! - `POST /edge/viewer-request`: リダイレクト判定
//! - `GET /healthz`: 死活監視

mod config;
mod dispatcher;
mod endpoints;
mod error;
mod parameter_store;
mod request;
mod signing_client;

use std::sync::Arc;

use config::{EdgeConfig, EdgeState};
use dispatcher::RedirectDispatcher;
use parameter_store::{
    EnvParameterStore, FileParameterStore, ParameterStore, StaticParameterStore,
};
use signing_client::HttpSigningClient;

/// ルーターを構築する。
fn build_router(state: Arc<EdgeState>) -> axum::Router {
    axum::Router::new()
        .route(
            "/edge/viewer-request",
            axum::routing::post(endpoints::handle_viewer_request),
        )
        .route("/healthz", axum::routing::get(endpoints::handle_health))
        .with_state(state)
}

/// 設定に応じたパラメータストアを選ぶ。
///
/// 優先順位: `SIGNER_ENDPOINT` の固定値 > パラメータファイル > 環境変数。
fn build_parameter_store(config: &EdgeConfig) -> Arc<dyn ParameterStore> {
    if let Some(endpoint) = &config.signer_endpoint {
        tracing::info!(endpoint = %endpoint, "署名サービスのエンドポイントに固定値を使用します");
        return Arc::new(
            StaticParameterStore::default().with(config.endpoint_parameter.clone(), endpoint),
        );
    }

    match &config.parameter_store_file {
        Some(path) => {
            tracing::info!(path = %path.display(), "パラメータファイルを使用します");
            Arc::new(FileParameterStore::new(path))
        }
        None => {
            tracing::info!(
                env = %EnvParameterStore::env_name(&config.endpoint_parameter),
                "環境変数のパラメータストアを使用します"
            );
            Arc::new(EnvParameterStore)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = EdgeConfig::from_env()?;
    let parameters = build_parameter_store(&config);

    let signing_client = HttpSigningClient::new(
        config.signer_timeout,
        config.signer_max_retries,
        config.signer_retry_jitter,
    )?;

    let state = Arc::new(EdgeState {
        dispatcher: RedirectDispatcher::new(
            parameters,
            Arc::new(signing_client),
            config.endpoint_parameter.clone(),
            config.marker_param.clone(),
        ),
    });

    let app = build_router(state);

    tracing::info!(
        marker = %config.marker_param,
        timeout = ?config.signer_timeout,
        max_retries = config.signer_max_retries,
        "エッジリダイレクトを {} で起動します",
        config.listen_addr
    );

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
