//! Тесты для исполнителя планов

use super::TestOperator;
use crate::common::{init_test_logging, ExecutorConfig};
use crate::executor::executor::QueryExecutor;
use crate::executor::operators::{Operator, OperatorStatistics};
use crate::executor::operators::SelectOperator;
use crate::row;
use crate::storage::Row;

/// Оператор, который нарушает заявленную ширину строк
struct WrongWidthOperator {
    emitted: bool,
}

impl Operator for WrongWidthOperator {
    fn n_columns(&self) -> usize {
        2
    }

    fn open(&mut self) {
        self.emitted = false;
    }

    fn next(&mut self) -> Option<Row> {
        if self.emitted {
            return None;
        }
        self.emitted = true;
        Some(row![1])
    }

    fn close(&mut self) {}

    fn name(&self) -> &'static str {
        "WrongWidth"
    }

    fn statistics(&self) -> OperatorStatistics {
        OperatorStatistics::default()
    }
}

#[test]
fn test_execute_drains_plan() {
    init_test_logging();
    let input = TestOperator::boxed(1, vec![row![1], row![6], row![10]]);
    let mut plan = SelectOperator::new(input, |row| row.at(0).as_integer() > Some(5));

    let result = QueryExecutor::default().execute(&mut plan);

    assert_eq!(result.n_columns, 1);
    assert_eq!(result.rows, vec![row![6], row![10]]);
    assert!(!result.truncated);
    assert_eq!(result.width_violations, 0);

    let statistics = result.statistics.unwrap();
    assert_eq!(statistics.rows_returned, 2);
    assert_eq!(statistics.rows_discarded, 1);
}

#[test]
fn test_execute_respects_row_limit() {
    let mut config = ExecutorConfig::default();
    config.max_result_rows = 2;
    let mut plan = TestOperator::new(1, vec![row![1], row![2], row![3]]);

    let result = QueryExecutor::new(config).execute(&mut plan);

    assert_eq!(result.len(), 2);
    assert!(result.truncated);
}

#[test]
fn test_execute_without_statistics() {
    let mut config = ExecutorConfig::default();
    config.collect_statistics = false;
    let mut plan = TestOperator::new(1, vec![row![1]]);

    let result = QueryExecutor::new(config).execute(&mut plan);
    assert!(result.statistics.is_none());
}

#[test]
fn test_execute_counts_width_violations() {
    init_test_logging();
    let mut plan = WrongWidthOperator { emitted: false };

    let result = QueryExecutor::default().execute(&mut plan);
    assert_eq!(result.len(), 1);
    assert_eq!(result.width_violations, 1);
}

#[test]
fn test_execute_twice_reopens_plan() {
    let mut plan = TestOperator::new(1, vec![row![1], row![2]]);
    let executor = QueryExecutor::default();

    let first = executor.execute(&mut plan);
    let second = executor.execute(&mut plan);

    assert_eq!(first.rows, second.rows);
    assert_eq!(plan.opens, 2);
}

#[test]
fn test_result_json_lines() {
    let mut plan = TestOperator::new(2, vec![row![1, "a"], row![2, "b"]]);
    let result = QueryExecutor::default().execute(&mut plan);

    let json = result.to_json_lines().unwrap();
    let lines: Vec<&str> = json.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], r#"[{"Integer":1},{"Text":"a"}]"#);

    let full: serde_json::Value = serde_json::from_str(&result.to_json().unwrap()).unwrap();
    assert_eq!(full["n_columns"], 2);
    assert_eq!(full["rows"].as_array().map(|rows| rows.len()), Some(2));
}
