pub mod cache_key;
pub mod download_cache;
pub mod error;
