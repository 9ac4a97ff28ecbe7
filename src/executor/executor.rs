//! Исполнитель планов запросов
//!
//! Проводит корневой оператор через полный цикл `open` → `next`* → `close`
//! и собирает результат.

use crate::common::{ExecutorConfig, Result};
use crate::executor::operators::{Operator, OperatorStatistics};
use crate::storage::Row;

use log::{debug, error, info};
use serde::Serialize;
use std::time::{Duration, Instant};

/// Результат выполнения плана
#[derive(Debug, Clone, Serialize)]
pub struct QueryResult {
    /// Ширина строк результата
    pub n_columns: usize,
    /// Строки результата
    pub rows: Vec<Row>,
    /// Выполнение остановлено по лимиту строк
    pub truncated: bool,
    /// Количество строк, ширина которых не совпала с `n_columns`
    pub width_violations: usize,
    /// Время выполнения
    #[serde(skip)]
    pub elapsed: Duration,
    /// Статистика корневого оператора
    pub statistics: Option<OperatorStatistics>,
}

impl QueryResult {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Строки результата в формате JSON, по одной на строку текста
    pub fn to_json_lines(&self) -> Result<String> {
        let mut out = String::new();
        for row in &self.rows {
            out.push_str(&serde_json::to_string(row)?);
            out.push('\n');
        }
        Ok(out)
    }

    /// Весь результат в формате JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Исполнитель запросов
pub struct QueryExecutor {
    config: ExecutorConfig,
}

impl QueryExecutor {
    pub fn new(config: ExecutorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Выполнить план до конца потока или до лимита строк
    pub fn execute(&self, plan: &mut dyn Operator) -> QueryResult {
        let start_time = Instant::now();
        let n_columns = plan.n_columns();
        let limit = self.config.max_result_rows;

        debug!("Выполнение плана {} ({} колонок)", plan.describe(), n_columns);
        plan.open();

        let mut rows = Vec::new();
        let mut width_violations = 0;
        let mut truncated = false;

        while let Some(row) = plan.next() {
            if row.size() != n_columns {
                width_violations += 1;
                error!(
                    "{} вернул строку ширины {}, ожидалось {}",
                    plan.name(),
                    row.size(),
                    n_columns
                );
            }
            rows.push(row);

            if limit > 0 && rows.len() >= limit {
                truncated = true;
                break;
            }
        }

        plan.close();

        let statistics = self.config.collect_statistics.then(|| plan.statistics());
        let elapsed = start_time.elapsed();
        info!(
            "План выполнен: {} строк за {:?}{}",
            rows.len(),
            elapsed,
            if truncated { " (остановлен по лимиту)" } else { "" }
        );

        QueryResult {
            n_columns,
            rows,
            truncated,
            width_violations,
            elapsed,
            statistics,
        }
    }
}

impl Default for QueryExecutor {
    fn default() -> Self {
        Self::new(ExecutorConfig::default())
    }
}
