//! # Presign Gateway 共有型定義
//!
//! 署名サービス（`presign-signer`）とエッジリダイレクト（`presign-edge`）の
//! 間でやり取りされるJSON構造をRust構造体として提供する。
//!
//! ## ワイヤ形式
//! - 署名サービス: `{"presigned_url": "..."}` / `{"error": "..."}`
//! - エッジ: Lambda@Edge形式のviewer-requestイベントとレスポンス記述子

use serde::{Deserialize, Serialize};

/// 署名済みリクエストを示すデフォルトのマーカーパラメータ名。
pub const DEFAULT_SIGNED_MARKER: &str = "X-Amz-Credential";

/// 署名サービスのクエリパラメータ名（オブジェクトキー）。
pub const URI_QUERY_PARAM: &str = "uri";

// ---------------------------------------------------------------------------
// 署名サービス (GET /presigned)
// ---------------------------------------------------------------------------

/// GET /presigned のクエリ。
/// `uri` 欠落時はハンドラ側で400に変換するため `Option` で受ける。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PresignQuery {
    /// オブジェクトキー（先頭スラッシュは任意）
    pub uri: Option<String>,
}

/// GET /presigned レスポンス。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresignResponse {
    /// 署名付きURL
    pub presigned_url: String,
}

/// 全エンドポイント共通のエラーボディ。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// エラーメッセージ
    pub error: String,
}

// ---------------------------------------------------------------------------
// エッジイベント (POST /edge/viewer-request)
// ---------------------------------------------------------------------------

/// Lambda@Edge形式のviewer-requestイベント。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeEvent {
    /// イベントレコード。先頭のみ処理対象。
    #[serde(rename = "Records", default)]
    pub records: Vec<EdgeRecord>,
}

/// イベントレコード。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeRecord {
    /// CDN固有部分
    pub cf: EdgeRecordBody,
}

/// `cf` 配下。リクエスト記述子のみ参照する。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeRecordBody {
    /// リクエスト記述子
    pub request: EdgeRequest,
}

/// エッジのリクエスト記述子。
///
/// 署名済みリクエストは変更せずにそのまま返すため、
/// `uri` と `querystring` 以外のフィールドも `extra` に保持する。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRequest {
    /// リクエストパス（先頭スラッシュ付き）
    pub uri: String,
    /// 生のクエリ文字列（`?` を含まない）。
    /// 欠落していた場合は素通し時にも出力しない。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub querystring: Option<String>,
    /// その他のフィールド（method, headers, clientIp 等）
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// エッジへ返すリダイレクト記述子。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRedirect {
    /// ステータスコード（文字列）
    pub status: String,
    /// ステータス説明
    #[serde(rename = "statusDescription")]
    pub status_description: String,
    /// レスポンスヘッダ
    pub headers: EdgeRedirectHeaders,
}

/// リダイレクト記述子のヘッダ。`Location` のみ。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRedirectHeaders {
    /// `location` ヘッダ（要素は常に1つ）
    pub location: Vec<EdgeHeader>,
}

/// ヘッダのキーと値。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeHeader {
    /// 表示用ヘッダ名
    pub key: String,
    /// ヘッダ値
    pub value: String,
}

impl EdgeRedirect {
    /// 302 Found のリダイレクト記述子を構築する。
    pub fn found(location: impl Into<String>) -> Self {
        Self {
            status: "302".to_string(),
            status_description: "Found".to_string(),
            headers: EdgeRedirectHeaders {
                location: vec![EdgeHeader {
                    key: "Location".to_string(),
                    value: location.into(),
                }],
            },
        }
    }

    /// `Location` ヘッダの値。
    pub fn location(&self) -> Option<&str> {
        self.headers.location.first().map(|h| h.value.as_str())
    }
}

/// エッジへのレスポンス。リダイレクトか、元のリクエストの素通しか。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EdgeResult {
    /// 署名付きURLへのリダイレクト
    Redirect(EdgeRedirect),
    /// 署名済みのためオリジンへそのまま転送
    PassThrough(EdgeRequest),
}
