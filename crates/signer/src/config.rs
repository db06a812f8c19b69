//! # 署名サービス設定・共有状態
//!
//! 環境変数からの設定読み込みと署名サービスの共有状態の定義。
//! 設定は起動時に一度だけ読み込み、各コンポーネントに明示的に渡す。

use std::str::FromStr;

use crate::signer::Signer;

/// 署名付きURLのデフォルト有効期限（秒）
pub const DEFAULT_EXPIRY_SECS: u32 = 3600;

/// SigV4署名付きURLの有効期限上限（7日）
pub const MAX_EXPIRY_SECS: u32 = 604_800;

/// キャッシュのデフォルト最大エントリ数
pub const DEFAULT_CACHE_CAPACITY: u64 = 10_000;

/// S3接続設定。
#[derive(Debug, Clone)]
pub struct S3Config {
    /// バケット名
    pub bucket: String,
    /// リージョン
    pub region: String,
    /// カスタムエンドポイント（MinIO等）。Noneの場合はAWSのリージョンエンドポイント。
    pub endpoint: Option<String>,
    /// パス形式アドレッシングを使用するか
    pub path_style: bool,
    /// アクセスキー。Noneの場合はAWS標準の環境変数を使用。
    pub access_key: Option<String>,
    /// シークレットキー
    pub secret_key: Option<String>,
    /// セッショントークン（一時認証情報）
    pub session_token: Option<String>,
}

/// 署名サービスの設定。
#[derive(Debug, Clone)]
pub struct SignerConfig {
    /// S3接続設定
    pub s3: S3Config,
    /// 署名付きURLの有効期限（秒）
    pub expiry_secs: u32,
    /// 署名付きURLキャッシュのTTL（秒）。0で無効。
    pub cache_ttl_secs: u32,
    /// キャッシュの最大エントリ数
    pub cache_capacity: u64,
    /// リッスンアドレス
    pub listen_addr: String,
}

impl SignerConfig {
    /// 環境変数から構築する。
    pub fn from_env() -> anyhow::Result<Self> {
        let bucket = std::env::var("S3_BUCKET")
            .map_err(|_| anyhow::anyhow!("S3_BUCKETが設定されていません"))?;
        let region = std::env::var("S3_REGION")
            .or_else(|_| std::env::var("AWS_REGION"))
            .unwrap_or_else(|_| "us-east-1".to_string());

        let s3 = S3Config {
            bucket,
            region,
            endpoint: non_empty_var("S3_ENDPOINT"),
            path_style: env_or("S3_PATH_STYLE", false)?,
            access_key: non_empty_var("S3_ACCESS_KEY"),
            secret_key: non_empty_var("S3_SECRET_KEY"),
            session_token: non_empty_var("S3_SESSION_TOKEN"),
        };

        let config = Self {
            s3,
            expiry_secs: env_or("PRESIGN_EXPIRY_SECS", DEFAULT_EXPIRY_SECS)?,
            cache_ttl_secs: env_or("PRESIGN_CACHE_TTL_SECS", 0)?,
            cache_capacity: env_or("PRESIGN_CACHE_CAPACITY", DEFAULT_CACHE_CAPACITY)?,
            listen_addr: std::env::var("LISTEN_ADDR")
                .unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
        };
        config.validate()?;
        Ok(config)
    }

    /// 有効期限とキャッシュTTLの整合性を検証する。
    ///
    /// 有効期限はSigV4の上限（7日）以下。
    /// キャッシュから返すURLには常に有効期間が残っていなければならないため、
    /// TTLは有効期限より短くする。
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.expiry_secs == 0 {
            anyhow::bail!("PRESIGN_EXPIRY_SECSは1以上である必要があります");
        }
        if self.expiry_secs > MAX_EXPIRY_SECS {
            anyhow::bail!(
                "PRESIGN_EXPIRY_SECS ({}) は{}秒以下である必要があります",
                self.expiry_secs,
                MAX_EXPIRY_SECS
            );
        }
        if self.cache_ttl_secs >= self.expiry_secs {
            anyhow::bail!(
                "PRESIGN_CACHE_TTL_SECS ({}) はPRESIGN_EXPIRY_SECS ({}) より小さくする必要があります",
                self.cache_ttl_secs,
                self.expiry_secs
            );
        }
        Ok(())
    }
}

/// 署名サービスの共有状態。
pub struct SignerState {
    /// 署名器
    pub signer: Signer,
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
pub(crate) fn test_config(expiry_secs: u32, cache_ttl_secs: u32) -> SignerConfig {
    SignerConfig {
        s3: S3Config {
            bucket: "test-bucket".to_string(),
            region: "us-gov-west-1".to_string(),
            endpoint: None,
            path_style: false,
            access_key: None,
            secret_key: None,
            session_token: None,
        },
        expiry_secs,
        cache_ttl_secs,
        cache_capacity: 16,
        listen_addr: "127.0.0.1:0".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(test_config(DEFAULT_EXPIRY_SECS, 0).validate().is_ok());
        assert!(test_config(3600, 600).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_ttl_not_below_expiry() {
        assert!(test_config(3600, 3600).validate().is_err());
        assert!(test_config(60, 120).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_expiry() {
        assert!(test_config(0, 0).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_expiry_over_one_week() {
        assert!(test_config(MAX_EXPIRY_SECS, 0).validate().is_ok());
        assert!(test_config(MAX_EXPIRY_SECS + 1, 0).validate().is_err());
        assert!(test_config(700_000, 0).validate().is_err());
    }
}
