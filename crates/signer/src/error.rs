//! # 署名サービス エラー型
//!
//! 全エンドポイントで共通のエラー型。
//! ステータスコードへの変換はこの境界でのみ行う。

use axum::http::StatusCode;
use axum::Json;
use presign_types::ErrorResponse;

/// 署名サービスのエラー型。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignerError {
    /// 不正なオブジェクトキー（欠落、空、`..` セグメントを含む）
    #[error("不正なオブジェクトキー: {0}")]
    InvalidKey(String),
    /// ストレージバックエンドでの署名に失敗
    #[error("署名付きURL生成に失敗: {0}")]
    SigningBackend(String),
    /// 内部エラー
    #[error("内部エラー: {0}")]
    Internal(String),
}

impl SignerError {
    /// 対応するHTTPステータス。
    pub fn status(&self) -> StatusCode {
        match self {
            SignerError::InvalidKey(_) => StatusCode::BAD_REQUEST,
            SignerError::SigningBackend(_) | SignerError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl axum::response::IntoResponse for SignerError {
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
