//! # エッジリダイレクト設定・共有状態
//!
//! 環境変数からの設定読み込みとエッジリダイレクトの共有状態の定義。
//! `SignerConfig`（`crates/signer/src/config.rs`）と同パターン。

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use presign_types::DEFAULT_SIGNED_MARKER;

use crate::dispatcher::RedirectDispatcher;

/// 署名サービスのエンドポイントを保持するデフォルトのパラメータ名
pub const DEFAULT_ENDPOINT_PARAMETER: &str = "cloudfront_api_gateway_presigned_url";

/// エッジリダイレクトの設定。
#[derive(Debug, Clone)]
pub struct EdgeConfig {
    /// 署名サービスのエンドポイントを保持するパラメータ名
    pub endpoint_parameter: String,
    /// 署名サービスのエンドポイントの固定値（ローカル実行用）。
    /// 設定時はパラメータストアを参照しない。
    pub signer_endpoint: Option<String>,
    /// パラメータファイル。Noneの場合は環境変数を参照する。
    pub parameter_store_file: Option<PathBuf>,
    /// 署名済みを示すクエリパラメータ名
    pub marker_param: String,
    /// 署名サービス呼び出しのタイムアウト
    pub signer_timeout: Duration,
    /// 通信失敗時の追加試行回数
    pub signer_max_retries: u32,
    /// 再試行前の待機時間の上限
    pub signer_retry_jitter: Duration,
    /// リッスンアドレス
    pub listen_addr: String,
}

impl EdgeConfig {
    /// 環境変数から構築する。
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            endpoint_parameter: non_empty_var("SIGNER_ENDPOINT_PARAMETER")
                .unwrap_or_else(|| DEFAULT_ENDPOINT_PARAMETER.to_string()),
            signer_endpoint: non_empty_var("SIGNER_ENDPOINT"),
            parameter_store_file: non_empty_var("PARAMETER_STORE_FILE").map(PathBuf::from),
            marker_param: non_empty_var("SIGNED_MARKER_PARAM")
                .unwrap_or_else(|| DEFAULT_SIGNED_MARKER.to_string()),
            signer_timeout: Duration::from_millis(env_or("SIGNER_TIMEOUT_MS", 3000)?),
            signer_max_retries: env_or("SIGNER_MAX_RETRIES", 1)?,
            signer_retry_jitter: Duration::from_millis(env_or("SIGNER_RETRY_JITTER_MS", 200)?),
            listen_addr: non_empty_var("LISTEN_ADDR")
                .unwrap_or_else(|| "0.0.0.0:3001".to_string()),
        })
    }
}

/// エッジリダイレクトの共有状態。
pub struct EdgeState {
    /// リダイレクトディスパッチャ
    pub dispatcher: RedirectDispatcher,
}

/// 空文字列を未設定として扱う環境変数読み込み。
fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// 環境変数をパースする。未設定ならデフォルト値。
fn env_or<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match non_empty_var(name) {
        Some(raw) => raw
            .parse()
            .map_err(|e| anyhow::anyhow!("{name}の値が不正です ({raw}): {e}")),
        None => Ok(default),
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> EdgeConfig {
    EdgeConfig {
        endpoint_parameter: DEFAULT_ENDPOINT_PARAMETER.to_string(),
        signer_endpoint: None,
        parameter_store_file: None,
        marker_param: DEFAULT_SIGNED_MARKER.to_string(),
        signer_timeout: Duration::from_millis(500),
        signer_max_retries: 1,
        signer_retry_jitter: Duration::from_millis(10),
        listen_addr: "127.0.0.1:0".to_string(),
    }
}
