//! # 署名サービスエンドポイント

pub mod health;
pub mod presigned;

pub use health::handle_health;
pub use presigned::handle_presigned;
