//! Конфигурация для rustdb-exec
//!
//! Настройки исполнителя запросов: уровень логирования, ограничения
//! на размер результата и порог предупреждения для материализации сортировки

use crate::common::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Конфигурация исполнителя запросов
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Уровень логирования
    pub log_level: String,
    /// Максимальное количество строк результата (0 = без ограничения)
    pub max_result_rows: usize,
    /// Порог материализации сортировки, после которого пишется предупреждение
    pub sort_warn_rows: usize,
    /// Собирать статистику выполнения плана
    pub collect_statistics: bool,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            max_result_rows: 0,
            sort_warn_rows: 1_000_000,
            collect_statistics: true,
        }
    }
}

impl ExecutorConfig {
    /// Загружает конфигурацию из TOML файла
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ExecutorConfig = toml::from_str(&content)
            .map_err(|e| Error::configuration(e.to_string()))?;
        Ok(config)
    }

    /// Сохраняет конфигурацию в TOML файл
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| Error::configuration(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Загружает конфигурацию из переменных окружения
    pub fn from_env() -> Result<Self> {
        Self::default().with_env()
    }

    /// Накладывает переменные окружения `RUSTDB_EXEC_*` поверх текущих значений
    pub fn with_env(self) -> Result<Self> {
        self.with_vars(|name| std::env::var(name).ok())
    }

    fn with_vars(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(level) = lookup("RUSTDB_EXEC_LOG_LEVEL") {
            self.log_level = level;
        }

        if let Some(max_rows) = lookup("RUSTDB_EXEC_MAX_RESULT_ROWS") {
            self.max_result_rows = parse_env("RUSTDB_EXEC_MAX_RESULT_ROWS", &max_rows)?;
        }

        if let Some(warn_rows) = lookup("RUSTDB_EXEC_SORT_WARN_ROWS") {
            self.sort_warn_rows = parse_env("RUSTDB_EXEC_SORT_WARN_ROWS", &warn_rows)?;
        }

        Ok(self)
    }

    /// Валидирует конфигурацию
    pub fn validate(&self) -> Result<()> {
        if self.log_level.parse::<log::LevelFilter>().is_err() {
            return Err(Error::configuration(format!(
                "Unknown log level: {}",
                self.log_level
            )));
        }

        if self.sort_warn_rows == 0 {
            return Err(Error::configuration(
                "Sort warning threshold must be greater than 0",
            ));
        }

        Ok(())
    }
}

fn parse_env(name: &str, value: &str) -> Result<usize> {
    value
        .parse()
        .map_err(|_| Error::configuration(format!("{} must be a number, got {:?}", name, value)))
}
