pub mod client;
pub mod error;
pub mod models;
pub mod stream;

pub use client::ApiClient;
pub use error::ApiError;
pub use models::{DiaryContent, DiaryDocument, Token};
