//! Data models: records, gazetteer and configuration.

pub mod config;
pub mod gazetteer;
pub mod record;
