//! # エンドポイントテスト用共通ヘルパー
//!
//! 署名サービスクライアントとエッジエンドポイントのテストで共有するモックサーバー群。

/// テスト用モックHTTPサーバーを起動し、ベースURLを返す。
pub async fn start_mock_server(app: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    format!("http://127.0.0.1:{port}")
}

/// 誰もリッスンしていないローカルアドレスのURLを返す。
pub async fn unused_local_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

/// 署名付きURLを常に返すモック署名サービスを起動し、エンドポイントURLを返す。
pub async fn start_mock_signer(signed_url: &'static str) -> String {
    use axum::routing::get;

    let app = axum::Router::new().route(
        "/presigned",
        get(move || async move { axum::Json(serde_json::json!({ "presigned_url": signed_url })) }),
    );
    format!("{}/presigned", start_mock_server(app).await)
}
