//! # GET /presigned
//!
//! オブジェクトストレージへの署名付きURL発行。

use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use presign_types::{PresignQuery, PresignResponse};

use crate::config::SignerState;
use crate::error::SignerError;

/// GET /presigned?uri=<key>: 署名付きURL発行。
///
/// `uri` の先頭スラッシュは任意。`uri` の欠落・空・不正なクエリ文字列は400。
/// バックエンドでの署名失敗は500。
pub async fn handle_presigned(
    State(state): State<Arc<SignerState>>,
    query: Result<Query<PresignQuery>, QueryRejection>,
) -> Result<Json<PresignResponse>, SignerError> {
    let Query(query) =
        query.map_err(|e| SignerError::InvalidKey(format!("クエリ文字列のパースに失敗: {e}")))?;

    let uri = query
        .uri
        .ok_or_else(|| SignerError::InvalidKey("uriパラメータがありません".to_string()))?;

    tracing::info!(uri = %uri, "署名付きURL発行リクエストを受信");

    let signed = state.signer.sign(&uri).await.inspect_err(|e| {
        tracing::warn!(uri = %uri, error = %e, "署名付きURL発行に失敗");
    })?;

    tracing::debug!(
        key = %signed.key,
        issued_at = signed.issued_at,
        expires_at = signed.expires_at,
        url = %signed.url,
        "署名付きURLを発行"
    );

    Ok(Json(PresignResponse {
        presigned_url: signed.url,
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    use super::*;
    use crate::config::test_config;
    use crate::signer::tests::MockObjectStore;
    use crate::signer::Signer;

    fn test_state(store: Arc<MockObjectStore>) -> Arc<SignerState> {
        Arc::new(SignerState {
            signer: Signer::new(store, &test_config(3600, 0)),
        })
    }

    fn query(uri: Option<&str>) -> Result<Query<PresignQuery>, QueryRejection> {
        Ok(Query(PresignQuery {
            uri: uri.map(str::to_string),
        }))
    }

    #[tokio::test]
    async fn test_presigned_ok() {
        let store = Arc::new(MockObjectStore::default());
        let state = test_state(store.clone());

        let response = handle_presigned(State(state), query(Some("/images/cat.png")))
            .await
            .unwrap()
            .0;

        assert!(response
            .presigned_url
            .starts_with("https://store.example/images/cat.png?X-Amz-Credential="));
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);
    }

    /// uri欠落は400
    #[tokio::test]
    async fn test_presigned_missing_uri() {
        let store = Arc::new(MockObjectStore::default());
        let state = test_state(store.clone());

        let err = handle_presigned(State(state), query(None)).await.unwrap_err();
        assert!(matches!(err, SignerError::InvalidKey(_)));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    /// バックエンド失敗は500
    #[tokio::test]
    async fn test_presigned_backend_failure() {
        let store = Arc::new(MockObjectStore::failing("NoSuchBucket"));
        let state = test_state(store);

        let err = handle_presigned(State(state), query(Some("a.txt")))
            .await
            .unwrap_err();
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
