//! Обработка ошибок для rustdb-exec

use thiserror::Error;

/// Основной тип ошибки для rustdb-exec
#[derive(Error, Debug)]
pub enum Error {
    /// Ошибка I/O операций
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Ошибка сериализации/десериализации
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Номер колонки выходит за ширину исходной строки
    #[error("Invalid column: index {column} is out of range for width {width}")]
    InvalidColumn { column: usize, width: usize },

    /// Количество ключевых колонок соединения слева и справа не совпадает
    #[error("Join key mismatch: {left} left key column(s) vs {right} right key column(s)")]
    JoinKeyMismatch { left: usize, right: usize },

    /// Некорректная граница диапазона сканирования
    #[error("Invalid scan bound: {message}")]
    InvalidBound { message: String },

    /// Строка не соответствует ширине таблицы или индекса
    #[error("Row width mismatch: expected {expected} column(s), got {actual}")]
    RowWidth { expected: usize, actual: usize },

    /// Ошибка построения плана запроса
    #[error("Query planning error: {message}")]
    QueryPlanning { message: String },

    /// Ошибка конфигурации
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Тип результата для rustdb-exec
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Создает ошибку неверного номера колонки
    pub fn invalid_column(column: usize, width: usize) -> Self {
        Self::InvalidColumn { column, width }
    }

    /// Создает ошибку несовпадения ключей соединения
    pub fn join_key_mismatch(left: usize, right: usize) -> Self {
        Self::JoinKeyMismatch { left, right }
    }

    /// Создает ошибку границы диапазона
    pub fn invalid_bound(message: impl Into<String>) -> Self {
        Self::InvalidBound {
            message: message.into(),
        }
    }

    /// Создает ошибку ширины строки
    pub fn row_width(expected: usize, actual: usize) -> Self {
        Self::RowWidth { expected, actual }
    }

    /// Создает ошибку планирования запроса
    pub fn query_planning(message: impl Into<String>) -> Self {
        Self::QueryPlanning {
            message: message.into(),
        }
    }

    /// Создает ошибку конфигурации
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Является ли ошибка нарушением предусловия при построении оператора
    pub fn is_construction_fault(&self) -> bool {
        matches!(
            self,
            Error::InvalidColumn { .. } | Error::JoinKeyMismatch { .. } | Error::InvalidBound { .. }
        )
    }
}
