//! Операторы выполнения для rustdb-exec
//!
//! Все операторы реализуют протокол `open` → `next`* → `close`. Каждый оператор
//! единолично владеет своими дочерними операторами; строки передаются вызывающему
//! перемещением.

use crate::common::{Error, Result};
use crate::executor::selector::{ColumnSelector, RowComparator};
use crate::storage::{Index, Row, Table};

use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Базовый трейт для всех операторов
pub trait Operator {
    /// Ширина выходной строки; не меняется в пределах цикла open/close
    fn n_columns(&self) -> usize;

    /// Подготовить оператор к выдаче строк с начала потока
    fn open(&mut self);

    /// Получить следующую строку результата; `None` означает конец потока
    fn next(&mut self) -> Option<Row>;

    /// Освободить ресурсы курсора. Дочерние операторы остаются во владении.
    fn close(&mut self);

    /// Сбросить оператор для повторного выполнения
    fn reset(&mut self) {
        self.close();
        self.open();
    }

    /// Имя оператора
    fn name(&self) -> &'static str;

    /// Описание оператора с параметрами для вывода плана
    fn describe(&self) -> String {
        self.name().to_string()
    }

    /// Дочерние операторы
    fn children(&self) -> Vec<&dyn Operator> {
        Vec::new()
    }

    /// Получить статистику выполнения
    fn statistics(&self) -> OperatorStatistics;
}

/// Предикат фильтрации строк
pub type RowPredicate = Box<dyn Fn(&Row) -> bool>;

/// Статистика выполнения оператора
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorStatistics {
    /// Количество обработанных строк
    pub rows_processed: usize,
    /// Количество возвращенных строк
    pub rows_returned: usize,
    /// Количество отброшенных строк
    pub rows_discarded: usize,
    /// Количество повторных проходов по дочернему оператору
    pub rescans: usize,
    /// Количество строк, удерживаемых в памяти
    pub rows_materialized: usize,
}

/// Оператор сканирования таблицы
pub struct TableScanOperator {
    /// Таблица
    table: Arc<Table>,
    /// Текущая позиция курсора
    position: usize,
    /// Статистика
    statistics: OperatorStatistics,
}

impl TableScanOperator {
    /// Создать новый оператор сканирования таблицы
    pub fn new(table: Arc<Table>) -> Self {
        Self {
            table,
            position: 0,
            statistics: OperatorStatistics::default(),
        }
    }
}

impl Operator for TableScanOperator {
    fn n_columns(&self) -> usize {
        self.table.columns()
    }

    fn open(&mut self) {
        self.position = 0;
        self.statistics = OperatorStatistics::default();
    }

    fn next(&mut self) -> Option<Row> {
        let row = self.table.rows().get(self.position)?.clone();
        self.position += 1;
        self.statistics.rows_processed += 1;
        self.statistics.rows_returned += 1;
        Some(row)
    }

    fn close(&mut self) {
        self.position = self.table.len();
    }

    fn name(&self) -> &'static str {
        "TableScan"
    }

    fn describe(&self) -> String {
        format!("TableScan {}", self.table.name())
    }

    fn statistics(&self) -> OperatorStatistics {
        self.statistics.clone()
    }
}

/// Оператор сканирования по индексу.
///
/// Границы проверяются только по первой ключевой колонке, включительно.
/// Скан линейный: записи за верхней границей тоже просматриваются.
pub struct IndexScanOperator {
    /// Индекс для сканирования
    index: Arc<Index>,
    /// Нижняя граница
    lo: Row,
    /// Верхняя граница
    hi: Row,
    /// Текущая позиция в индексе
    position: usize,
    /// Статистика
    statistics: OperatorStatistics,
}

impl IndexScanOperator {
    /// Создать оператор сканирования диапазона `[lo, hi]`, без `hi` выполняется точечный поиск
    pub fn new(index: Arc<Index>, lo: Row, hi: Option<Row>) -> Result<Self> {
        let hi = hi.unwrap_or_else(|| lo.clone());
        if lo.is_empty() || hi.is_empty() {
            return Err(Error::invalid_bound(
                "index scan bounds must have a leading key column",
            ));
        }

        Ok(Self {
            index,
            lo,
            hi,
            position: 0,
            statistics: OperatorStatistics::default(),
        })
    }

    /// Попадает ли ведущая колонка ключа в границы
    fn in_range(&self, key: &Row) -> bool {
        let leading = key.at(0);
        leading >= self.lo.at(0) && leading <= self.hi.at(0)
    }
}

impl Operator for IndexScanOperator {
    fn n_columns(&self) -> usize {
        self.index.n_columns()
    }

    fn open(&mut self) {
        self.position = 0;
        self.statistics = OperatorStatistics::default();
    }

    fn next(&mut self) -> Option<Row> {
        if self.index.is_empty() {
            return None;
        }

        while let Some((key, row)) = self.index.entry(self.position) {
            self.position += 1;
            self.statistics.rows_processed += 1;

            if self.in_range(key) {
                self.statistics.rows_returned += 1;
                return Some(row.clone());
            }
            self.statistics.rows_discarded += 1;
        }

        None
    }

    fn close(&mut self) {
        self.position = self.index.len();
    }

    fn name(&self) -> &'static str {
        "IndexScan"
    }

    fn describe(&self) -> String {
        format!(
            "IndexScan {} [{}, {}]",
            self.index.name(),
            self.lo.at(0),
            self.hi.at(0)
        )
    }

    fn statistics(&self) -> OperatorStatistics {
        self.statistics.clone()
    }
}

/// Оператор фильтрации по предикату
pub struct SelectOperator {
    /// Входной оператор
    input: Box<dyn Operator>,
    /// Предикат
    predicate: RowPredicate,
    /// Статистика
    statistics: OperatorStatistics,
}

impl SelectOperator {
    /// Создать новый оператор фильтрации
    pub fn new(input: Box<dyn Operator>, predicate: impl Fn(&Row) -> bool + 'static) -> Self {
        Self {
            input,
            predicate: Box::new(predicate),
            statistics: OperatorStatistics::default(),
        }
    }
}

impl Operator for SelectOperator {
    fn n_columns(&self) -> usize {
        self.input.n_columns()
    }

    fn open(&mut self) {
        self.input.open();
        self.statistics = OperatorStatistics::default();
    }

    fn next(&mut self) -> Option<Row> {
        while let Some(row) = self.input.next() {
            self.statistics.rows_processed += 1;

            if (self.predicate)(&row) {
                self.statistics.rows_returned += 1;
                return Some(row);
            }
            self.statistics.rows_discarded += 1;
        }
        None
    }

    fn close(&mut self) {
        self.input.close();
    }

    fn name(&self) -> &'static str {
        "Select"
    }

    fn children(&self) -> Vec<&dyn Operator> {
        vec![self.input.as_ref()]
    }

    fn statistics(&self) -> OperatorStatistics {
        self.statistics.clone()
    }
}

/// Оператор проекции
pub struct ProjectOperator {
    /// Входной оператор
    input: Box<dyn Operator>,
    /// Выбранные колонки
    selector: ColumnSelector,
    /// Статистика
    statistics: OperatorStatistics,
}

impl ProjectOperator {
    /// Создать оператор проекции на колонки `columns` входа
    pub fn new(input: Box<dyn Operator>, columns: &[usize]) -> Result<Self> {
        let selector = ColumnSelector::new(input.n_columns(), columns)?;

        Ok(Self {
            input,
            selector,
            statistics: OperatorStatistics::default(),
        })
    }
}

impl Operator for ProjectOperator {
    fn n_columns(&self) -> usize {
        self.selector.n_selected()
    }

    fn open(&mut self) {
        self.input.open();
        self.statistics = OperatorStatistics::default();
    }

    fn next(&mut self) -> Option<Row> {
        let row = self.input.next()?;
        self.statistics.rows_processed += 1;
        self.statistics.rows_returned += 1;
        Some(self.selector.select(&row))
    }

    fn close(&mut self) {
        self.input.close();
    }

    fn name(&self) -> &'static str {
        "Project"
    }

    fn describe(&self) -> String {
        format!("Project {:?}", self.selector.columns())
    }

    fn children(&self) -> Vec<&dyn Operator> {
        vec![self.input.as_ref()]
    }

    fn statistics(&self) -> OperatorStatistics {
        self.statistics.clone()
    }
}

/// Оператор Nested Loop Join (эквисоединение).
///
/// Внешний цикл идет по правому входу, левый вход перечитывается заново
/// (close + open) для каждой следующей правой строки. Равенство проверяется
/// только по первой ключевой колонке каждой стороны.
pub struct NestedLoopJoinOperator {
    /// Левый входной оператор
    left: Box<dyn Operator>,
    /// Правый входной оператор
    right: Box<dyn Operator>,
    /// Ключевые колонки левого входа
    left_keys: ColumnSelector,
    /// Ключевые колонки правого входа
    right_keys: ColumnSelector,
    /// Текущая строка из левого входа
    left_row: Option<Row>,
    /// Текущая строка из правого входа
    right_row: Option<Row>,
    /// Нашлась ли пара для текущей правой строки
    right_matched: bool,
    /// Статистика
    statistics: OperatorStatistics,
}

impl NestedLoopJoinOperator {
    /// Создать новый оператор Nested Loop Join
    pub fn new(
        left: Box<dyn Operator>,
        left_join_columns: &[usize],
        right: Box<dyn Operator>,
        right_join_columns: &[usize],
    ) -> Result<Self> {
        let left_keys = ColumnSelector::new(left.n_columns(), left_join_columns)?;
        let right_keys = ColumnSelector::new(right.n_columns(), right_join_columns)?;

        if left_keys.n_selected() != right_keys.n_selected() {
            return Err(Error::join_key_mismatch(
                left_keys.n_selected(),
                right_keys.n_selected(),
            ));
        }
        if left_keys.n_selected() == 0 {
            return Err(Error::query_planning(
                "join requires at least one key column on each side",
            ));
        }

        Ok(Self {
            left,
            right,
            left_keys,
            right_keys,
            left_row: None,
            right_row: None,
            right_matched: false,
            statistics: OperatorStatistics::default(),
        })
    }

    /// Перечитать левый вход с начала
    fn restart_left(&mut self) {
        self.left.close();
        self.left.open();
        self.left_row = self.left.next();
        self.statistics.rescans += 1;
        trace!("NestedLoopJoin: повторное чтение левого входа #{}", self.statistics.rescans);
    }
}

fn keys_match(left_keys: &ColumnSelector, right_keys: &ColumnSelector, left: &Row, right: &Row) -> bool {
    left.at(left_keys.selected(0)) == right.at(right_keys.selected(0))
}

/// Все колонки левой строки, затем правые колонки без ключевой
fn join_rows(left: &Row, right: &Row, right_key: usize) -> Row {
    let mut joined = Row::with_capacity(left.size() + right.size() - 1);
    joined.extend(left.iter().cloned());
    joined.extend(
        right
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != right_key)
            .map(|(_, value)| value.clone()),
    );
    joined
}

impl Operator for NestedLoopJoinOperator {
    fn n_columns(&self) -> usize {
        self.left_keys.n_columns() + self.right_keys.n_columns() - 1
    }

    fn open(&mut self) {
        self.statistics = OperatorStatistics::default();
        self.left.open();
        self.right.open();

        self.left_row = self.left.next();
        self.right_row = None;
        self.right_matched = false;
    }

    fn next(&mut self) -> Option<Row> {
        loop {
            let right_row = match self.right_row.take() {
                Some(row) => row,
                None => {
                    let row = self.right.next()?;
                    self.statistics.rows_processed += 1;
                    self.right_matched = false;
                    row
                }
            };

            while let Some(left_row) = self.left_row.take() {
                let joined = keys_match(&self.left_keys, &self.right_keys, &left_row, &right_row)
                    .then(|| join_rows(&left_row, &right_row, self.right_keys.selected(0)));
                self.left_row = self.left.next();

                if let Some(row) = joined {
                    self.right_matched = true;
                    self.right_row = Some(right_row);
                    self.statistics.rows_returned += 1;
                    return Some(row);
                }
            }

            // Левый вход исчерпан для текущей правой строки
            if !self.right_matched {
                self.statistics.rows_discarded += 1;
            }
            drop(right_row);

            let next_right = self.right.next()?;
            self.statistics.rows_processed += 1;
            self.right_matched = false;
            self.right_row = Some(next_right);

            self.restart_left();
            if self.left_row.is_none() {
                return None;
            }
        }
    }

    fn close(&mut self) {
        self.left.close();
        self.right.close();
        self.left_row = None;
        self.right_row = None;
        debug!(
            "NestedLoopJoin закрыт: {} строк, {} повторных проходов",
            self.statistics.rows_returned, self.statistics.rescans
        );
    }

    fn name(&self) -> &'static str {
        "NestedLoopJoin"
    }

    fn describe(&self) -> String {
        format!(
            "NestedLoopJoin left{:?} = right{:?}",
            self.left_keys.columns(),
            self.right_keys.columns()
        )
    }

    fn children(&self) -> Vec<&dyn Operator> {
        vec![self.left.as_ref(), self.right.as_ref()]
    }

    fn statistics(&self) -> OperatorStatistics {
        self.statistics.clone()
    }
}

/// Оператор сортировки.
///
/// `open` полностью материализует вход и сортирует его устойчивой сортировкой.
pub struct SortOperator {
    /// Входной оператор
    input: Box<dyn Operator>,
    /// Порядок по колонкам сортировки
    comparator: RowComparator,
    /// Отсортированные строки, еще не выданные вызывающему
    sorted: std::vec::IntoIter<Row>,
    /// Порог материализации для предупреждения в лог
    warn_rows: usize,
    /// Статистика
    statistics: OperatorStatistics,
}

impl SortOperator {
    /// Создать новый оператор сортировки
    pub fn new(input: Box<dyn Operator>, sort_columns: &[usize]) -> Result<Self> {
        let width = input.n_columns();
        if let Some(&column) = sort_columns.iter().find(|&&c| c >= width) {
            return Err(Error::invalid_column(column, width));
        }

        Ok(Self {
            input,
            comparator: RowComparator::new(sort_columns),
            sorted: Vec::new().into_iter(),
            warn_rows: usize::MAX,
            statistics: OperatorStatistics::default(),
        })
    }

    /// Задать порог материализации, после которого пишется предупреждение
    pub fn with_warn_threshold(mut self, rows: usize) -> Self {
        self.warn_rows = rows;
        self
    }

    /// Загрузить и отсортировать все строки
    fn load_and_sort(&mut self) -> Vec<Row> {
        let mut rows = Vec::new();

        while let Some(row) = self.input.next() {
            rows.push(row);
        }

        rows.sort_by(|a, b| self.comparator.compare(a, b));
        rows
    }
}

impl Operator for SortOperator {
    fn n_columns(&self) -> usize {
        self.input.n_columns()
    }

    fn open(&mut self) {
        self.statistics = OperatorStatistics::default();
        self.input.open();

        let rows = self.load_and_sort();
        self.statistics.rows_processed = rows.len();
        self.statistics.rows_materialized = rows.len();

        if rows.len() > self.warn_rows {
            warn!(
                "Sort материализовал {} строк (порог {})",
                rows.len(),
                self.warn_rows
            );
        } else {
            debug!("Sort материализовал {} строк", rows.len());
        }

        self.sorted = rows.into_iter();
    }

    fn next(&mut self) -> Option<Row> {
        let row = self.sorted.next()?;
        self.statistics.rows_returned += 1;
        Some(row)
    }

    fn close(&mut self) {
        self.input.close();
        self.sorted = Vec::new().into_iter();
    }

    fn name(&self) -> &'static str {
        "Sort"
    }

    fn describe(&self) -> String {
        format!("Sort {:?}", self.comparator.columns())
    }

    fn children(&self) -> Vec<&dyn Operator> {
        vec![self.input.as_ref()]
    }

    fn statistics(&self) -> OperatorStatistics {
        self.statistics.clone()
    }
}

/// Оператор удаления соседних дубликатов.
///
/// Вход должен быть упорядочен так, чтобы равные строки шли подряд.
pub struct UniqueOperator {
    /// Входной оператор
    input: Box<dyn Operator>,
    /// Последняя выданная строка
    last_unique: Option<Row>,
    /// Статистика
    statistics: OperatorStatistics,
}

impl UniqueOperator {
    /// Создать новый оператор удаления дубликатов
    pub fn new(input: Box<dyn Operator>) -> Self {
        Self {
            input,
            last_unique: None,
            statistics: OperatorStatistics::default(),
        }
    }
}

fn is_duplicate(last: &Row, row: &Row) -> bool {
    last.size() == row.size() && last.iter().zip(row.iter()).all(|(a, b)| a.compare(b).is_eq())
}

impl Operator for UniqueOperator {
    fn n_columns(&self) -> usize {
        self.input.n_columns()
    }

    fn open(&mut self) {
        self.input.open();
        self.last_unique = None;
        self.statistics = OperatorStatistics::default();
    }

    fn next(&mut self) -> Option<Row> {
        while let Some(row) = self.input.next() {
            self.statistics.rows_processed += 1;

            if matches!(&self.last_unique, Some(last) if is_duplicate(last, &row)) {
                self.statistics.rows_discarded += 1;
                continue;
            }

            self.last_unique = Some(row.clone());
            self.statistics.rows_returned += 1;
            return Some(row);
        }
        None
    }

    fn close(&mut self) {
        self.input.close();
    }

    fn name(&self) -> &'static str {
        "Unique"
    }

    fn children(&self) -> Vec<&dyn Operator> {
        vec![self.input.as_ref()]
    }

    fn statistics(&self) -> OperatorStatistics {
        self.statistics.clone()
    }
}

/// Текстовое представление дерева операторов, по одному оператору на строку
pub fn explain(root: &dyn Operator) -> String {
    fn walk(op: &dyn Operator, depth: usize, out: &mut String) {
        out.push_str(&"  ".repeat(depth));
        out.push_str(&op.describe());
        out.push('\n');
        for child in op.children() {
            walk(child, depth + 1, out);
        }
    }

    let mut out = String::new();
    walk(root, 0, &mut out);
    out
}
