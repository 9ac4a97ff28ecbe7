//! rustdb-exec - Исполнитель запросов реляционной базы данных на Rust
//!
//! Этот модуль предоставляет дерево операторов реляционной алгебры (сканирование,
//! поиск по индексу, фильтрация, проекция, соединение, сортировка, удаление
//! дубликатов), выполняемое по модели «вытягивания» строк по одной.

pub mod common;
pub mod demo;
pub mod executor;
pub mod storage;

pub use common::error::{Error, Result};
pub use common::types::Value;
pub use executor::{Operator, PlanBuilder, QueryExecutor, QueryResult};
pub use storage::{Index, Row, Table};

/// Версия библиотеки
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
