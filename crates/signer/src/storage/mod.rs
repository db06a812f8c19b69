//! # オブジェクトストレージ
//!
//! 署名付きURLを発行するストレージの抽象インターフェース。
//! S3互換ストレージ実装は `s3` サブモジュールを参照。

#[cfg(feature = "vendor-aws")]
pub mod s3;

#[cfg(feature = "vendor-aws")]
pub use s3::S3ObjectStore;

use crate::error::SignerError;
use crate::key::StorageKey;

/// オブジェクトストレージの抽象インターフェース。
///
/// 実装は読み取り専用の署名操作のみを提供する。
/// テストではS3に接続しないモック実装に差し替える。
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// `key` のオブジェクトに対する署名付きダウンロードURL（GET）を生成する。
    ///
    /// 失敗時は `SignerError::SigningBackend` を返す。
    async fn presign_get(
        &self,
        key: &StorageKey,
        expiry_secs: u32,
    ) -> Result<String, SignerError>;
}
