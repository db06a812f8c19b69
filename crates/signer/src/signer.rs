//! # 署名器
//!
//! オブジェクトキーを正規化し、ObjectStore経由で有効期限付きの署名付きURLを発行する。
//! 有効期限は設定で固定され、呼び出しごとには変更できない。

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use moka::future::Cache;

use crate::config::SignerConfig;
use crate::error::SignerError;
use crate::key::StorageKey;
use crate::storage::ObjectStore;

/// 発行済みの署名付きURL。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedUrl {
    /// 署名付きURL全体
    pub url: String,
    /// 対象オブジェクトキー
    pub key: StorageKey,
    /// 発行時刻（UNIXタイムスタンプ）
    pub issued_at: u64,
    /// 有効期限（UNIXタイムスタンプ）
    pub expires_at: u64,
}

impl SignedUrl {
    /// 最初の `?` 以降の署名クエリ。`?` がなければ空文字列。
    pub fn query(&self) -> &str {
        self.url.split_once('?').map(|(_, q)| q).unwrap_or("")
    }
}

/// 署名器。
pub struct Signer {
    store: Arc<dyn ObjectStore>,
    expiry_secs: u32,
    /// 正規化済みキー単位の署名付きURLキャッシュ。TTLは有効期限未満。
    cache: Option<Cache<StorageKey, SignedUrl>>,
}

impl Signer {
    /// 設定に従って署名器を構築する。
    pub fn new(store: Arc<dyn ObjectStore>, config: &SignerConfig) -> Self {
        let cache = (config.cache_ttl_secs > 0).then(|| {
            tracing::info!(
                ttl_secs = config.cache_ttl_secs,
                capacity = config.cache_capacity,
                "署名付きURLキャッシュを有効化"
            );
            Cache::builder()
                .max_capacity(config.cache_capacity)
                .time_to_live(Duration::from_secs(u64::from(config.cache_ttl_secs)))
                .build()
        });

        Self {
            store,
            expiry_secs: config.expiry_secs,
            cache,
        }
    }

    /// 有効期限（秒）。
    pub fn expiry_secs(&self) -> u32 {
        self.expiry_secs
    }

    /// 生の `uri` に対する署名付きURLを発行する。
    pub async fn sign(&self, raw_key: &str) -> Result<SignedUrl, SignerError> {
        let key = StorageKey::parse(raw_key)?;

        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.get(&key).await {
                tracing::debug!(key = %key, "キャッシュ済みの署名付きURLを返却");
                return Ok(hit);
            }
        }

        let issued_at = unix_now()?;
        let url = self.store.presign_get(&key, self.expiry_secs).await?;

        let signed = SignedUrl {
            url,
            key: key.clone(),
            issued_at,
            expires_at: issued_at + u64::from(self.expiry_secs),
        };

        if signed.query().is_empty() {
            return Err(SignerError::SigningBackend(format!(
                "署名クエリを含まないURLが返されました: {key}"
            )));
        }

        if let Some(cache) = &self.cache {
            cache.insert(key, signed.clone()).await;
        }

        Ok(signed)
    }
}

fn unix_now() -> Result<u64, SignerError> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| SignerError::Internal(format!("時刻取得失敗: {e}")))?
        .as_secs())
}
