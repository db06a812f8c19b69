//! # POST /edge/viewer-request
//!
//! Lambda@Edge形式のviewer-requestイベントを受け取り、
//! リダイレクト記述子か元のリクエスト記述子を返す。

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use presign_types::{EdgeEvent, EdgeRedirect, EdgeResult};

use crate::config::EdgeState;
use crate::dispatcher::Dispatch;
use crate::error::EdgeError;
use crate::request::InboundRequest;

/// POST /edge/viewer-request: 署名付きURLへのリダイレクト。
///
/// 署名済みのリクエストは受け取った記述子を変更せずに返す。
/// 未署名のリクエストには302のリダイレクト記述子を返す。
pub async fn handle_viewer_request(
    State(state): State<Arc<EdgeState>>,
    event: Result<Json<EdgeEvent>, JsonRejection>,
) -> Result<Json<EdgeResult>, EdgeError> {
    let Json(event) =
        event.map_err(|e| EdgeError::InvalidRequest(format!("イベントのパースに失敗: {e}")))?;

    let request = event
        .records
        .into_iter()
        .next()
        .ok_or_else(|| EdgeError::InvalidRequest("Recordsが空です".to_string()))?
        .cf
        .request;

    tracing::info!(
        uri = %request.uri,
        querystring = request.querystring.as_deref().unwrap_or_default(),
        "viewer-requestイベントを受信"
    );

    let inbound = InboundRequest::from_edge(&request);

    let result = match state.dispatcher.dispatch(&inbound).await? {
        Dispatch::PassThrough => EdgeResult::PassThrough(request),
        Dispatch::Redirect { location } => EdgeResult::Redirect(EdgeRedirect::found(location)),
    };

    Ok(Json(result))
}
