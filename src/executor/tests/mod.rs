//! Тесты для операторов выполнения

pub mod executor_tests;
pub mod scan_operator_tests;

use crate::executor::operators::{Operator, OperatorStatistics};
use crate::storage::Row;

/// Простой оператор для тестирования, который возвращает фиксированные данные
pub struct TestOperator {
    data: Vec<Row>,
    n_columns: usize,
    current_index: usize,
    /// Сколько раз вызывался `open`
    pub opens: usize,
}

impl TestOperator {
    pub fn new(n_columns: usize, data: Vec<Row>) -> Self {
        Self {
            data,
            n_columns,
            current_index: 0,
            opens: 0,
        }
    }

    pub fn boxed(n_columns: usize, data: Vec<Row>) -> Box<dyn Operator> {
        Box::new(Self::new(n_columns, data))
    }
}

impl Operator for TestOperator {
    fn n_columns(&self) -> usize {
        self.n_columns
    }

    fn open(&mut self) {
        self.current_index = 0;
        self.opens += 1;
    }

    fn next(&mut self) -> Option<Row> {
        let row = self.data.get(self.current_index)?.clone();
        self.current_index += 1;
        Some(row)
    }

    fn close(&mut self) {
        self.current_index = self.data.len();
    }

    fn name(&self) -> &'static str {
        "Test"
    }

    fn statistics(&self) -> OperatorStatistics {
        OperatorStatistics::default()
    }
}

/// Полный цикл open → next* → close с проверкой ширины строк
pub fn drain(operator: &mut dyn Operator) -> Vec<Row> {
    let width = operator.n_columns();
    operator.open();

    let mut rows = Vec::new();
    while let Some(row) = operator.next() {
        assert_eq!(row.size(), width, "ширина строки должна совпадать с n_columns()");
        rows.push(row);
    }

    operator.close();
    assert_eq!(operator.n_columns(), width, "n_columns() не должна меняться");
    rows
}

/// Повторное открытие после close воспроизводит тот же поток строк
pub fn assert_reopen_reproduces(operator: &mut dyn Operator) -> Vec<Row> {
    let first = drain(operator);
    let second = drain(operator);
    assert_eq!(first, second, "повторный проход должен совпадать с первым");
    first
}
