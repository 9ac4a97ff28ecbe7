//! Таблица в памяти: неупорядоченная коллекция строк и метаданные колонок

use crate::common::{Error, Result};
use crate::storage::row::Row;

/// Таблица в памяти.
///
/// Операторы получают таблицу через `Arc` и только читают ее.
#[derive(Debug, Clone)]
pub struct Table {
    /// Имя таблицы
    name: String,
    /// Имена колонок
    columns: Vec<String>,
    /// Строки в порядке вставки
    rows: Vec<Row>,
}

impl Table {
    /// Создает пустую таблицу
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Создает таблицу и заполняет ее строками
    pub fn with_rows(
        name: impl Into<String>,
        columns: Vec<String>,
        rows: impl IntoIterator<Item = Row>,
    ) -> Result<Self> {
        let mut table = Self::new(name, columns);
        for row in rows {
            table.insert(row)?;
        }
        Ok(table)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Количество колонок
    pub fn columns(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    /// Позиция колонки по имени
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Строки в порядке вставки
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Добавляет строку; ширина строки должна совпадать с числом колонок
    pub fn insert(&mut self, row: Row) -> Result<()> {
        if row.size() != self.columns() {
            return Err(Error::row_width(self.columns(), row.size()));
        }
        self.rows.push(row);
        Ok(())
    }
}
