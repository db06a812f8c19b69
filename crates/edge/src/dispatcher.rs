//! # リダイレクトディスパッチャ
//!
//! ## 処理フロー
//! 1. クエリに署名済みマーカー（デフォルト `X-Amz-Credential`）があれば素通し
//! 2. パラメータストアから署名サービスのエンドポイントを取得
//! 3. 署名サービスにリクエストパスをオブジェクトキーとして渡し、署名付きURLを取得
//! 4. 署名付きURLの最初の `?` 以降を元のパスに付け替えて `Location` を構築
//! 5. 302リダイレクトを返す
//!
//! ローカルキャッシュは持たない。未署名のリクエストは毎回署名サービスを呼ぶ。

use std::sync::Arc;

use crate::error::EdgeError;
use crate::parameter_store::ParameterStore;
use crate::request::InboundRequest;
use crate::signing_client::SigningClient;

/// ディスパッチ結果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// 302 Found で `location` へリダイレクト
    Redirect {
        /// `Location` ヘッダの値
        location: String,
    },
    /// 署名済みのためオリジンへそのまま転送
    PassThrough,
}

/// リダイレクトディスパッチャ。
pub struct RedirectDispatcher {
    parameters: Arc<dyn ParameterStore>,
    signing_client: Arc<dyn SigningClient>,
    /// 署名サービスのエンドポイントを保持するパラメータ名
    endpoint_parameter: String,
    /// 署名済みを示すクエリパラメータ名
    marker_param: String,
}

impl RedirectDispatcher {
    /// 依存コンポーネントとパラメータ名を指定して構築する。
    pub fn new(
        parameters: Arc<dyn ParameterStore>,
        signing_client: Arc<dyn SigningClient>,
        endpoint_parameter: impl Into<String>,
        marker_param: impl Into<String>,
    ) -> Self {
        Self {
            parameters,
            signing_client,
            endpoint_parameter: endpoint_parameter.into(),
            marker_param: marker_param.into(),
        }
    }

    /// 受信リクエストを振り分ける。
    pub async fn dispatch(&self, request: &InboundRequest) -> Result<Dispatch, EdgeError> {
        if request.has_param(&self.marker_param) {
            tracing::debug!(
                path = %request.path(),
                params = request.query().len(),
                "署名済みリクエストのため素通し"
            );
            return Ok(Dispatch::PassThrough);
        }

        let endpoint = self
            .parameters
            .get_parameter(&self.endpoint_parameter)
            .await?;

        let signed_url = self
            .signing_client
            .presign(&endpoint, request.path())
            .await
            .inspect_err(|e| {
                tracing::error!(path = %request.path(), error = %e, "署名付きURLの取得に失敗");
            })?;

        let location = build_location(request.path(), &signed_url)?;
        tracing::info!(path = %request.path(), "署名付きURLへリダイレクト");

        Ok(Dispatch::Redirect { location })
    }
}

/// 署名付きURLの最初の `?` 以降を `path` に付け替える。
///
/// クエリ部分はエンコード済みのまま転記する。
pub fn build_location(path: &str, signed_url: &str) -> Result<String, EdgeError> {
    let (_, query) = signed_url.split_once('?').ok_or_else(|| {
        EdgeError::MalformedUpstreamResponse(format!(
            "署名付きURLにクエリがありません: {signed_url}"
        ))
    })?;

    if query.is_empty() {
        return Err(EdgeError::MalformedUpstreamResponse(format!(
            "署名付きURLのクエリが空です: {signed_url}"
        )));
    }

    Ok(format!("{path}?{query}"))
}
