pub mod api;
pub mod config;
pub mod llm;
pub mod matcher;
pub mod services;
pub mod storage;
