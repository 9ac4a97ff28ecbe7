//! Хранилище данных rustdb-exec: строки, таблицы и индексы в памяти

pub mod index;
pub mod row;
pub mod table;

#[cfg(test)]
pub mod tests;

pub use index::Index;
pub use row::Row;
pub use table::Table;
