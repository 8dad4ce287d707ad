pub mod config;
pub mod quiz_schema;
