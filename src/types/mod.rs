pub mod calendar;
pub mod data_source;
pub mod domain;
