//! Вторичный индекс: отсортированное отображение ключевой строки в строку данных

use crate::common::{Error, Result};
use crate::storage::row::Row;
use crate::storage::table::Table;

/// Упорядоченный индекс в памяти.
///
/// Записи хранятся отсортированными по ключу, каждый ключ встречается один раз.
/// Обход идет позиционным курсором от `0` (begin) до `len()` (end).
#[derive(Debug, Clone)]
pub struct Index {
    /// Имя индекса
    name: String,
    /// Ширина строк данных
    n_columns: usize,
    /// Пары (ключ, строка данных), отсортированные по ключу
    entries: Vec<(Row, Row)>,
}

impl Index {
    /// Создает пустой индекс для строк ширины `n_columns`
    pub fn new(name: impl Into<String>, n_columns: usize) -> Self {
        Self {
            name: name.into(),
            n_columns,
            entries: Vec::new(),
        }
    }

    /// Строит индекс по колонкам `key_columns` таблицы.
    ///
    /// Ключ дополняется позицией строки в таблице, поэтому строки
    /// с одинаковыми значениями ключевых колонок не вытесняют друг друга.
    pub fn from_table(
        name: impl Into<String>,
        table: &Table,
        key_columns: &[usize],
    ) -> Result<Self> {
        if key_columns.is_empty() {
            return Err(Error::invalid_bound(
                "index requires at least one key column",
            ));
        }
        if let Some(&column) = key_columns.iter().find(|&&c| c >= table.columns()) {
            return Err(Error::invalid_column(column, table.columns()));
        }

        let mut index = Self::new(name, table.columns());
        for (position, row) in table.rows().iter().enumerate() {
            let mut key: Row = key_columns.iter().map(|&c| row.at(c).clone()).collect();
            key.append((position as i64).into());
            index.insert(key, row.clone())?;
        }
        Ok(index)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ширина строк данных
    pub fn n_columns(&self) -> usize {
        self.n_columns
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Вставляет запись; запись с равным ключом заменяется
    pub fn insert(&mut self, key: Row, row: Row) -> Result<()> {
        if key.is_empty() {
            return Err(Error::invalid_bound("index key must not be empty"));
        }
        if row.size() != self.n_columns {
            return Err(Error::row_width(self.n_columns, row.size()));
        }

        match self.entries.binary_search_by(|(k, _)| k.cmp(&key)) {
            Ok(pos) => self.entries[pos].1 = row,
            Err(pos) => self.entries.insert(pos, (key, row)),
        }
        Ok(())
    }

    /// Запись по позиции курсора
    pub fn entry(&self, position: usize) -> Option<(&Row, &Row)> {
        self.entries.get(position).map(|(k, r)| (k, r))
    }

    /// Все записи в порядке ключей
    pub fn entries(&self) -> impl Iterator<Item = (&Row, &Row)> {
        self.entries.iter().map(|(k, r)| (k, r))
    }
}
