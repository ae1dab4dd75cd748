pub mod config;
pub mod constants;
pub mod enrich;
pub mod llm;
pub mod logging;
pub mod metadata;
pub mod tags;
pub mod utils;
