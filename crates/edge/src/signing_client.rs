//! # 署名サービスクライアント
//!
//! 署名サービスの `GET <endpoint>?uri=<path>` を呼び出し、
//! レスポンスの `presigned_url` を取り出す。
//!
//! ## 再試行
//! 接続失敗とタイムアウトのみ、ランダムなジッタを挟んで再試行する。
//! 署名サービスがHTTPエラーステータスを返した場合は再試行しない。

use std::time::Duration;

use presign_types::{ErrorResponse, PresignResponse, URI_QUERY_PARAM};
use rand::Rng;

use crate::error::EdgeError;

/// 署名サービス呼び出しの抽象インターフェース。
#[async_trait::async_trait]
pub trait SigningClient: Send + Sync {
    /// `endpoint` の署名サービスに `key` の署名付きURLを要求する。
    async fn presign(&self, endpoint: &str, key: &str) -> Result<String, EdgeError>;
}

/// reqwestによる署名サービスクライアント。
pub struct HttpSigningClient {
    http_client: reqwest::Client,
    /// 通信失敗時の追加試行回数
    max_retries: u32,
    /// 再試行前の待機時間の上限
    retry_jitter: Duration,
}

impl HttpSigningClient {
    /// タイムアウトと再試行方針を指定して構築する。
    pub fn new(timeout: Duration, max_retries: u32, retry_jitter: Duration) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            max_retries,
            retry_jitter,
        })
    }

    /// 再試行前の待機時間（0〜`retry_jitter`）。
    fn jitter(&self) -> Duration {
        let max_ms = u64::try_from(self.retry_jitter.as_millis()).unwrap_or(u64::MAX);
        Duration::from_millis(rand::thread_rng().gen_range(0..=max_ms))
    }

    /// 再試行すべき一過性の通信失敗か。
    fn is_transient(e: &reqwest::Error) -> bool {
        e.is_timeout() || e.is_connect()
    }

    async fn send(&self, endpoint: &str, key: &str) -> Result<reqwest::Response, EdgeError> {
        let mut attempt = 0;
        loop {
            let result = self
                .http_client
                .get(endpoint)
                .query(&[(URI_QUERY_PARAM, key)])
                .send()
                .await;

            match result {
                Ok(response) => return Ok(response),
                Err(e) if Self::is_transient(&e) && attempt < self.max_retries => {
                    attempt += 1;
                    let delay = self.jitter();
                    tracing::warn!(
                        endpoint = %endpoint,
                        attempt,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %e,
                        "署名サービス呼び出しに失敗、再試行します"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(unavailable("HTTP送信失敗", &e)),
            }
        }
    }
}

fn unavailable(context: &str, e: &reqwest::Error) -> EdgeError {
    EdgeError::UpstreamUnavailable {
        message: format!("{context}: {e}"),
        timed_out: e.is_timeout(),
    }
}

#[async_trait::async_trait]
impl SigningClient for HttpSigningClient {
    async fn presign(&self, endpoint: &str, key: &str) -> Result<String, EdgeError> {
        let response = self.send(endpoint, key).await?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| unavailable("レスポンス読み取り失敗", &e))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|b| b.error)
                .unwrap_or(body);
            return Err(EdgeError::UpstreamRejected {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str::<PresignResponse>(&body)
            .map(|r| r.presigned_url)
            .map_err(|e| {
                EdgeError::MalformedUpstreamResponse(format!("presigned_urlを取得できません: {e}"))
            })
    }
}
