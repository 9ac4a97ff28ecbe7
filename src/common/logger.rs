//! Инициализация логирования
//!
//! Библиотека пишет через фасад `log`; бинарник и тесты подключают `env_logger`.

use crate::common::config::ExecutorConfig;
use crate::common::error::{Error, Result};
use log::LevelFilter;

/// Инициализирует глобальный логгер по конфигурации.
///
/// `RUST_LOG`, если задана, уточняет уровень из конфигурации.
/// Повторная инициализация не считается ошибкой.
pub fn init_logging(config: &ExecutorConfig) -> Result<()> {
    let level: LevelFilter = config
        .log_level
        .parse()
        .map_err(|_| Error::configuration(format!("Unknown log level: {}", config.log_level)))?;

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level).format_timestamp_millis();
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }

    if builder.try_init().is_err() {
        log::debug!("Логгер уже инициализирован");
    }
    Ok(())
}

/// Логгер для тестов: вывод перехватывается тестовым раннером
pub fn init_test_logging() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(LevelFilter::Trace)
        .try_init();
}
