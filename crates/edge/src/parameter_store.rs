//! # パラメータストア
//!
//! 署名サービスのエンドポイント等、外部で管理される設定値を名前で引く。
//! このサービスからは読み取り専用。

use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::EdgeError;

/// パラメータストアの抽象インターフェース。
///
/// 値が存在しない、または空文字列の場合は `EdgeError::ConfigNotFound` を返す。
#[async_trait::async_trait]
pub trait ParameterStore: Send + Sync {
    /// `name` の値を取得する。
    async fn get_parameter(&self, name: &str) -> Result<String, EdgeError>;
}

/// 環境変数によるパラメータストア。
///
/// パラメータ名を大文字化し、英数字以外を `_` に置き換えた環境変数を参照する。
/// 例: `cloudfront_api_gateway_presigned_url` → `CLOUDFRONT_API_GATEWAY_PRESIGNED_URL`
#[derive(Debug, Default)]
pub struct EnvParameterStore;

impl EnvParameterStore {
    /// パラメータ名に対応する環境変数名。
    pub fn env_name(name: &str) -> String {
        name.chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl ParameterStore for EnvParameterStore {
    async fn get_parameter(&self, name: &str) -> Result<String, EdgeError> {
        let var = Self::env_name(name);
        std::env::var(&var)
            .ok()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| EdgeError::ConfigNotFound(format!("{name} (環境変数 {var})")))
    }
}

/// JSONファイルによるパラメータストア。
///
/// `{"<name>": "<value>"}` 形式のファイルを参照のたびに読み直すため、
/// 外部での更新は再起動なしで反映される。
#[derive(Debug)]
pub struct FileParameterStore {
    path: PathBuf,
}

impl FileParameterStore {
    /// ファイルパスから構築する。
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl ParameterStore for FileParameterStore {
    async fn get_parameter(&self, name: &str) -> Result<String, EdgeError> {
        let raw = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            EdgeError::ConfigNotFound(format!(
                "{name} (パラメータファイル {} の読み取りに失敗: {e})",
                self.path.display()
            ))
        })?;

        let parameters: HashMap<String, serde_json::Value> = serde_json::from_str(&raw)
            .map_err(|e| {
                EdgeError::ConfigNotFound(format!(
                    "{name} (パラメータファイル {} のパースに失敗: {e})",
                    self.path.display()
                ))
            })?;

        parameters
            .get(name)
            .and_then(|v| v.as_str())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .ok_or_else(|| EdgeError::ConfigNotFound(name.to_string()))
    }
}

/// 固定値のパラメータストア（`SIGNER_ENDPOINT` 指定時・テスト用）。
#[derive(Debug, Default)]
pub struct StaticParameterStore {
    values: HashMap<String, String>,
}

impl StaticParameterStore {
    /// 値を1つ追加する。
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }
}

#[async_trait::async_trait]
impl ParameterStore for StaticParameterStore {
    async fn get_parameter(&self, name: &str) -> Result<String, EdgeError> {
        self.values
            .get(name)
            .filter(|v| !v.is_empty())
            .cloned()
            .ok_or_else(|| EdgeError::ConfigNotFound(name.to_string()))
    }
}
