//! Построитель деревьев операторов
//!
//! Цепочка вызовов собирает план снизу вверх; первая ошибка построения
//! сохраняется и возвращается из [`PlanBuilder::build`].

use crate::common::{ExecutorConfig, Result};
use crate::executor::operators::{
    IndexScanOperator, NestedLoopJoinOperator, Operator, ProjectOperator, SelectOperator,
    SortOperator, TableScanOperator, UniqueOperator,
};
use crate::storage::{Index, Row, Table};
use std::sync::Arc;

fn boxed(operator: impl Operator + 'static) -> Box<dyn Operator> {
    Box::new(operator)
}

/// Отложенное построение поддерева; аргумент задает порог предупреждения сортировки
type Stage = Box<dyn FnOnce(usize) -> Result<Box<dyn Operator>>>;

/// Построитель плана запроса.
///
/// Операторы создаются в [`PlanBuilder::build`], поэтому настройки из
/// [`PlanBuilder::with_config`] действуют на весь план, включая правые
/// ветви соединений.
pub struct PlanBuilder {
    /// Цепочка построения плана
    stage: Stage,
    /// Порог предупреждения для операторов сортировки
    sort_warn_rows: usize,
}

impl PlanBuilder {
    /// Начать план с полного сканирования таблицы
    pub fn scan(table: Arc<Table>) -> Self {
        Self::from_operator(boxed(TableScanOperator::new(table)))
    }

    /// Начать план со сканирования индекса в диапазоне `[lo, hi]`
    pub fn index_scan(index: Arc<Index>, lo: Row, hi: Option<Row>) -> Self {
        Self::from_result(IndexScanOperator::new(index, lo, hi).map(boxed))
    }

    /// Начать план с готового оператора
    pub fn from_operator(operator: Box<dyn Operator>) -> Self {
        Self::from_result(Ok(operator))
    }

    fn from_result(plan: Result<Box<dyn Operator>>) -> Self {
        Self {
            stage: Box::new(move |_| plan),
            sort_warn_rows: ExecutorConfig::default().sort_warn_rows,
        }
    }

    /// Применить настройки исполнителя ко всему плану
    pub fn with_config(mut self, config: &ExecutorConfig) -> Self {
        self.sort_warn_rows = config.sort_warn_rows;
        self
    }

    fn map<F>(self, f: F) -> Self
    where
        F: FnOnce(Box<dyn Operator>, usize) -> Result<Box<dyn Operator>> + 'static,
    {
        let stage = self.stage;
        Self {
            stage: Box::new(move |warn_rows| f(stage(warn_rows)?, warn_rows)),
            sort_warn_rows: self.sort_warn_rows,
        }
    }

    /// Фильтрация по предикату
    pub fn select(self, predicate: impl Fn(&Row) -> bool + 'static) -> Self {
        self.map(|input, _| Ok(boxed(SelectOperator::new(input, predicate))))
    }

    /// Проекция на колонки
    pub fn project(self, columns: &[usize]) -> Self {
        let columns = columns.to_vec();
        self.map(move |input, _| Ok(boxed(ProjectOperator::new(input, &columns)?)))
    }

    /// Эквисоединение текущего плана (слева) с планом `right`.
    ///
    /// Правая ветвь строится с настройками левой.
    pub fn join(self, left_columns: &[usize], right: PlanBuilder, right_columns: &[usize]) -> Self {
        let left_columns = left_columns.to_vec();
        let right_columns = right_columns.to_vec();
        self.map(move |left, warn_rows| {
            let right = (right.stage)(warn_rows)?;
            Ok(boxed(NestedLoopJoinOperator::new(
                left,
                &left_columns,
                right,
                &right_columns,
            )?))
        })
    }

    /// Сортировка по колонкам
    pub fn sort(self, columns: &[usize]) -> Self {
        let columns = columns.to_vec();
        self.map(move |input, warn_rows| {
            Ok(boxed(
                SortOperator::new(input, &columns)?.with_warn_threshold(warn_rows),
            ))
        })
    }

    /// Удаление соседних дубликатов
    pub fn unique(self) -> Self {
        self.map(|input, _| Ok(boxed(UniqueOperator::new(input))))
    }

    /// Сортировка по всем колонкам и удаление дубликатов
    pub fn distinct(self) -> Self {
        self.map(|input, warn_rows| {
            let columns: Vec<usize> = (0..input.n_columns()).collect();
            let sorted = SortOperator::new(input, &columns)?.with_warn_threshold(warn_rows);
            Ok(boxed(UniqueOperator::new(boxed(sorted))))
        })
    }

    /// Завершить построение плана
    pub fn build(self) -> Result<Box<dyn Operator>> {
        (self.stage)(self.sort_warn_rows)
    }
}
