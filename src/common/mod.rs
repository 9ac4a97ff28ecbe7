//! Общие типы и утилиты для rustdb-exec

pub mod config;
pub mod error;
pub mod logger;
pub mod types;

pub use config::ExecutorConfig;
pub use error::{Error, Result};
pub use logger::{init_logging, init_test_logging};
pub use types::Value;
