//! # エッジリダイレクトエンドポイント

pub mod health;
pub mod viewer_request;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use health::handle_health;
pub use viewer_request::handle_viewer_request;
