//! Выбор колонок и сравнение строк по ключевым колонкам

use crate::common::{Error, Result};
use crate::storage::row::Row;
use std::cmp::Ordering;

/// Отображение запрошенного набора колонок на строку исходной ширины.
///
/// Повторы допустимы, порядок важен. Все позиции меньше ширины источника.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSelector {
    /// Ширина исходной строки
    n_columns: usize,
    /// Выбранные позиции в запрошенном порядке
    selected: Vec<usize>,
}

impl ColumnSelector {
    /// Создает селектор; позиция за пределами `n_columns` считается ошибкой
    pub fn new(n_columns: usize, columns: &[usize]) -> Result<Self> {
        if let Some(&column) = columns.iter().find(|&&c| c >= n_columns) {
            return Err(Error::invalid_column(column, n_columns));
        }

        Ok(Self {
            n_columns,
            selected: columns.to_vec(),
        })
    }

    /// Ширина исходной строки
    pub fn n_columns(&self) -> usize {
        self.n_columns
    }

    /// Количество выбранных колонок
    pub fn n_selected(&self) -> usize {
        self.selected.len()
    }

    /// Позиция `i`-й выбранной колонки в исходной строке
    ///
    /// # Panics
    ///
    /// Паникует, если `i >= n_selected()`.
    pub fn selected(&self, i: usize) -> usize {
        self.selected[i]
    }

    pub fn columns(&self) -> &[usize] {
        &self.selected
    }

    /// Строит новую строку из выбранных колонок в порядке селектора
    pub fn select(&self, row: &Row) -> Row {
        let mut projected = Row::with_capacity(self.selected.len());
        for &column in &self.selected {
            projected.append(row.at(column).clone());
        }
        projected
    }
}

/// Порядок на строках, заданный списком ключевых колонок.
///
/// Колонки сравниваются по порядку, первая неравная решает. Строки, равные
/// по всем ключам, считаются равными.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowComparator {
    columns: Vec<usize>,
}

impl RowComparator {
    pub fn new(columns: &[usize]) -> Self {
        Self {
            columns: columns.to_vec(),
        }
    }

    pub fn columns(&self) -> &[usize] {
        &self.columns
    }

    pub fn compare(&self, left: &Row, right: &Row) -> Ordering {
        for &column in &self.columns {
            match left.at(column).compare(right.at(column)) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        Ordering::Equal
    }
}
