//! # 受信リクエスト
//!
//! エッジから渡されたパスとクエリ文字列を、判定用の形に変換する。

use presign_types::EdgeRequest;

/// 受信リクエスト（パス + クエリパラメータ）。
///
/// クエリは `application/x-www-form-urlencoded` の規則でデコードし、
/// 出現順と重複キーをそのまま保持する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundRequest {
    path: String,
    query: Vec<(String, String)>,
}

impl InboundRequest {
    /// パスと生のクエリ文字列から構築する。先頭の `?` は任意。
    ///
    /// 不正なパーセントエンコーディングはエラーにせず、デコードできない部分をそのまま残す。
    pub fn new(path: impl Into<String>, raw_query: &str) -> Self {
        let raw_query = raw_query.strip_prefix('?').unwrap_or(raw_query);
        let query = url::form_urlencoded::parse(raw_query.as_bytes())
            .into_owned()
            .collect();

        Self {
            path: path.into(),
            query,
        }
    }

    /// エッジのリクエスト記述子から構築する。
    pub fn from_edge(request: &EdgeRequest) -> Self {
        Self::new(
            request.uri.clone(),
            request.querystring.as_deref().unwrap_or_default(),
        )
    }

    /// リクエストパス。
    pub fn path(&self) -> &str {
        &self.path
    }

    /// デコード済みのクエリパラメータ（出現順）。
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    /// `name` の値を出現順に返す。
    pub fn query_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.query
            .iter()
            .filter(move |(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// `name` のパラメータを含むか。
    pub fn has_param(&self, name: &str) -> bool {
        self.query_values(name).next().is_some()
    }
}
