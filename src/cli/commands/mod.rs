pub mod analyze;
pub mod config;
pub mod recommend;
pub mod validate;
