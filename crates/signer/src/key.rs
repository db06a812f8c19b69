//! # オブジェクトキー
//!
//! リクエストの `uri` からストレージ上のオブジェクトキーを導出する。

use std::fmt;

use crate::error::SignerError;

/// 正規化済みのオブジェクトキー。
///
/// 先頭の `/` は1つだけ取り除かれる。それ以外の書き換えは行わない。
/// 空のキーと `..` セグメントを含むキーは構築できない。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey(String);

impl StorageKey {
    /// 生の `uri` からキーを構築する。
    pub fn parse(raw: &str) -> Result<Self, SignerError> {
        let key = raw.strip_prefix('/').unwrap_or(raw);

        if key.is_empty() {
            return Err(SignerError::InvalidKey(
                "オブジェクトキーが空です".to_string(),
            ));
        }

        if key.split('/').any(|segment| segment == "..") {
            return Err(SignerError::InvalidKey(format!(
                "`..` セグメントを含むキーは受け付けません: {raw}"
            )));
        }

        Ok(Self(key.to_string()))
    }

    /// キー文字列。
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for StorageKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_single_leading_slash() {
        assert_eq!(StorageKey::parse("/foo/bar").unwrap().as_str(), "foo/bar");
        assert_eq!(StorageKey::parse("foo/bar").unwrap().as_str(), "foo/bar");
        // 2つ目以降のスラッシュは残す
        assert_eq!(StorageKey::parse("//foo").unwrap().as_str(), "/foo");
    }

    #[test]
    fn test_empty_key_rejected() {
        assert!(matches!(StorageKey::parse(""), Err(SignerError::InvalidKey(_))));
        assert!(matches!(StorageKey::parse("/"), Err(SignerError::InvalidKey(_))));
    }

    #[test]
    fn test_parent_segment_rejected() {
        assert!(StorageKey::parse("/../secret.txt").is_err());
        assert!(StorageKey::parse("images/../../etc/passwd").is_err());
        assert!(StorageKey::parse("images/..").is_err());
    }

    /// `..` を含むがセグメントではないキーは通す
    #[test]
    fn test_dots_inside_segment_allowed() {
        assert_eq!(
            StorageKey::parse("/archive/v1..2.tar").unwrap().as_str(),
            "archive/v1..2.tar"
        );
        assert_eq!(StorageKey::parse("./a.txt").unwrap().as_str(), "./a.txt");
    }
}
