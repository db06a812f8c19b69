//! # エッジリダイレクト エラー型
//!
//! 全エンドポイントで共通のエラー型。
//! `SignerError`（`crates/signer/src/error.rs`）と同パターンで、
//! レスポンスボディは `{"error": "..."}` に統一する。

use axum::http::StatusCode;
use axum::Json;
use presign_types::ErrorResponse;

/// エッジリダイレクトのエラー型。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EdgeError {
    /// 不正なイベント（Recordsが空、パース失敗）
    #[error("不正なリクエスト: {0}")]
    InvalidRequest(String),
    /// 必要な設定値がパラメータストアにない
    #[error("設定値が見つかりません: {0}")]
    ConfigNotFound(String),
    /// 署名サービスへの通信失敗（接続失敗、タイムアウト）
    #[error("署名サービスに接続できません: {message}")]
    UpstreamUnavailable {
        /// 失敗内容
        message: String,
        /// タイムアウトによる失敗か
        timed_out: bool,
    },
    /// 署名サービスのレスポンスが想定外の形式
    #[error("署名サービスのレスポンスが不正です: {0}")]
    MalformedUpstreamResponse(String),
    /// 署名サービスがエラーステータスを返した
    #[error("署名サービスがエラーを返しました: HTTP {status} - {message}")]
    UpstreamRejected {
        /// HTTPステータスコード
        status: u16,
        /// 署名サービスのエラーメッセージ
        message: String,
    },
}

impl EdgeError {
    /// 対応するHTTPステータス。
    pub fn status(&self) -> StatusCode {
        match self {
            EdgeError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            EdgeError::ConfigNotFound(_) => StatusCode::INTERNAL_SERVER_ERROR,
            EdgeError::UpstreamUnavailable { timed_out: true, .. } => StatusCode::GATEWAY_TIMEOUT,
            EdgeError::UpstreamUnavailable { .. }
            | EdgeError::MalformedUpstreamResponse(_)
            | EdgeError::UpstreamRejected { .. } => StatusCode::BAD_GATEWAY,
        }
    }
}

impl axum::response::IntoResponse for EdgeError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            EdgeError::InvalidRequest("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            EdgeError::ConfigNotFound("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            EdgeError::UpstreamUnavailable {
                message: "x".into(),
                timed_out: true
            }
            .status(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            EdgeError::UpstreamUnavailable {
                message: "x".into(),
                timed_out: false
            }
            .status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            EdgeError::MalformedUpstreamResponse("x".into()).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            EdgeError::UpstreamRejected {
                status: 500,
                message: "x".into()
            }
            .status(),
            StatusCode::BAD_GATEWAY
        );
    }
}
