pub mod download_unit;
pub mod error;
pub mod logical_request;
