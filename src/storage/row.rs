//! Строка результата: упорядоченная последовательность значений колонок

use crate::common::types::Value;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Строка фиксированной ширины.
///
/// Строка всегда имеет одного владельца: операторы передают ее перемещением,
/// освобождение происходит при `Drop`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    values: Vec<Value>,
}

/// Собирает строку из значений, приводимых к [`Value`]
#[macro_export]
macro_rules! row {
    () => {
        $crate::storage::row::Row::new()
    };
    ($($value:expr),+ $(,)?) => {
        $crate::storage::row::Row::from(vec![$($crate::common::types::Value::from($value)),+])
    };
}

impl Row {
    /// Создает пустую строку
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Создает пустую строку с заранее выделенной памятью
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
        }
    }

    /// Количество колонок
    pub fn size(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Значение колонки `i`.
    ///
    /// # Panics
    ///
    /// Паникует, если `i >= size()`.
    pub fn at(&self, i: usize) -> &Value {
        &self.values[i]
    }

    /// Значение колонки `i`, если она существует
    pub fn get(&self, i: usize) -> Option<&Value> {
        self.values.get(i)
    }

    /// Добавляет значение в конец строки
    pub fn append(&mut self, value: Value) {
        self.values.push(value);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.values.iter()
    }

    /// Лексикографическое сравнение по всем колонкам
    pub fn compare(&self, other: &Row) -> Ordering {
        self.values.cmp(&other.values)
    }
}

impl PartialOrd for Row {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Row {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl From<Vec<Value>> for Row {
    fn from(values: Vec<Value>) -> Self {
        Self { values }
    }
}

impl FromIterator<Value> for Row {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl Extend<Value> for Row {
    fn extend<I: IntoIterator<Item = Value>>(&mut self, iter: I) {
        self.values.extend(iter);
    }
}

impl<'a> IntoIterator for &'a Row {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, ")")
    }
}
