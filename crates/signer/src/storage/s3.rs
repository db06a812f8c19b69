//! # S3互換 ObjectStore 実装
//!
//! AWS S3, MinIO, Cloudflare R2 等のS3互換APIを使用する
//! ObjectStore実装。SigV4のクエリ署名で署名付きURLを生成する。

use super::ObjectStore;
use crate::config::S3Config;
use crate::error::SignerError;
use crate::key::StorageKey;

/// S3互換ストレージによるObjectStore実装。
pub struct S3ObjectStore {
    bucket: s3::Bucket,
}

impl S3ObjectStore {
    /// 構築済みバケットからObjectStoreを作る。
    pub fn new(bucket: s3::Bucket) -> Self {
        Self { bucket }
    }

    /// 設定からバケットを初期化する。
    ///
    /// `endpoint` 未指定時は `https://s3.<region>.amazonaws.com` を使用する。
    /// アドレス形式はvirtual-hostがデフォルトで、`path_style` でパス形式に切り替える。
    pub fn from_config(config: &S3Config) -> anyhow::Result<Self> {
        let endpoint = config
            .endpoint
            .clone()
            .unwrap_or_else(|| format!("https://s3.{}.amazonaws.com", config.region));

        let region = s3::Region::Custom {
            region: config.region.clone(),
            endpoint,
        };

        let credentials = match (&config.access_key, &config.secret_key) {
            (Some(access_key), Some(secret_key)) => s3::creds::Credentials::new(
                Some(access_key),
                Some(secret_key),
                None,
                config.session_token.as_deref(),
                None,
            )?,
            _ => {
                tracing::info!("S3_ACCESS_KEY未設定のため、AWS標準の環境変数から認証情報を読み込みます");
                s3::creds::Credentials::from_env()?
            }
        };

        let mut bucket = s3::Bucket::new(&config.bucket, region, credentials)?;
        if config.path_style {
            bucket = bucket.with_path_style();
        }

        tracing::info!(
            bucket = %config.bucket,
            region = %config.region,
            path_style = config.path_style,
            "S3バケットを設定"
        );

        Ok(Self::new(*bucket))
    }
}

#[async_trait::async_trait]
impl ObjectStore for S3ObjectStore {
    async fn presign_get(
        &self,
        key: &StorageKey,
        expiry_secs: u32,
    ) -> Result<String, SignerError> {
        self.bucket
            .presign_get(key.as_str(), expiry_secs, None)
            .await
            .map_err(|e| SignerError::SigningBackend(format!("{key}: {e}")))
    }
}
