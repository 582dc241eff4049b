//! Configuration and the query-time answer engine.

pub mod config;
pub mod engine;

pub use config::Config;
pub use engine::{Answer, AnswerEngine, EngineError};
