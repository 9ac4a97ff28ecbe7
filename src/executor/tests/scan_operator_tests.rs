//! Тесты для операторов сканирования

use super::{assert_reopen_reproduces, drain};
use crate::common::Error;
use crate::executor::operators::{IndexScanOperator, Operator, TableScanOperator};
use crate::row;
use crate::storage::{Index, Row, Table};
use std::sync::Arc;

fn users() -> Arc<Table> {
    let rows = vec![
        row![3, "carol", 41],
        row![1, "alice", 29],
        row![2, "bob", 35],
    ];
    let columns = vec!["id".to_string(), "name".to_string(), "age".to_string()];
    Arc::new(Table::with_rows("users", columns, rows).unwrap())
}

fn keyed_index() -> Arc<Index> {
    let mut index = Index::new("idx_k", 2);
    for (k, sub, v) in [(1, 0, "a"), (2, 0, "b"), (2, 1, "c"), (3, 0, "d"), (5, 0, "e")] {
        index.insert(row![k, sub], row![k, v]).unwrap();
    }
    Arc::new(index)
}

#[test]
fn test_table_scan_returns_insertion_order() {
    let mut scan = TableScanOperator::new(users());

    assert_eq!(scan.n_columns(), 3);
    let rows = drain(&mut scan);
    assert_eq!(
        rows,
        vec![
            row![3, "carol", 41],
            row![1, "alice", 29],
            row![2, "bob", 35]
        ]
    );

    let statistics = scan.statistics();
    assert_eq!(statistics.rows_processed, 3);
    assert_eq!(statistics.rows_returned, 3);
}

#[test]
fn test_table_scan_reopen_restarts() {
    let mut scan = TableScanOperator::new(users());
    let rows = assert_reopen_reproduces(&mut scan);
    assert_eq!(rows.len(), 3);
}

#[test]
fn test_table_scan_stays_exhausted() {
    let mut scan = TableScanOperator::new(users());
    scan.open();
    while scan.next().is_some() {}

    assert!(scan.next().is_none());
    assert!(scan.next().is_none());
    scan.close();
}

#[test]
fn test_table_scan_close_moves_to_end() {
    let mut scan = TableScanOperator::new(users());
    scan.open();
    assert!(scan.next().is_some());

    scan.close();
    assert!(scan.next().is_none());

    scan.reset();
    assert_eq!(scan.next(), Some(row![3, "carol", 41]));
}

#[test]
fn test_table_scan_empty_table() {
    let table = Arc::new(Table::new("empty", vec!["a".to_string()]));
    let mut scan = TableScanOperator::new(table);

    assert_eq!(scan.n_columns(), 1);
    assert!(drain(&mut scan).is_empty());
}

#[test]
fn test_index_scan_point_lookup() {
    let mut scan = IndexScanOperator::new(keyed_index(), row![2], None).unwrap();

    assert_eq!(scan.n_columns(), 2);
    assert_eq!(drain(&mut scan), vec![row![2, "b"], row![2, "c"]]);
}

#[test]
fn test_index_scan_inclusive_range() {
    let mut scan = IndexScanOperator::new(keyed_index(), row![2], Some(row![3])).unwrap();
    assert_eq!(
        drain(&mut scan),
        vec![row![2, "b"], row![2, "c"], row![3, "d"]]
    );
}

#[test]
fn test_index_scan_is_linear_filter() {
    let mut scan = IndexScanOperator::new(keyed_index(), row![1], Some(row![2])).unwrap();
    let rows = drain(&mut scan);

    assert_eq!(rows.len(), 3);
    // Записи за верхней границей тоже просматриваются
    let statistics = scan.statistics();
    assert_eq!(statistics.rows_processed, 5);
    assert_eq!(statistics.rows_discarded, 2);
}

#[test]
fn test_index_scan_only_checks_leading_column() {
    // Вторая колонка границ игнорируется
    let mut scan =
        IndexScanOperator::new(keyed_index(), row![2, 100], Some(row![2, -100])).unwrap();
    assert_eq!(drain(&mut scan).len(), 2);
}

#[test]
fn test_index_scan_no_match() {
    let mut scan = IndexScanOperator::new(keyed_index(), row![4], None).unwrap();
    assert!(drain(&mut scan).is_empty());

    let mut inverted = IndexScanOperator::new(keyed_index(), row![3], Some(row![1])).unwrap();
    assert!(drain(&mut inverted).is_empty());
}

#[test]
fn test_index_scan_empty_index() {
    let index = Arc::new(Index::new("empty", 3));
    let mut scan = IndexScanOperator::new(index, row![1], None).unwrap();

    assert_eq!(scan.n_columns(), 3);
    assert!(drain(&mut scan).is_empty());
}

#[test]
fn test_index_scan_reopen_restarts() {
    let mut scan = IndexScanOperator::new(keyed_index(), row![2], Some(row![5])).unwrap();
    let rows = assert_reopen_reproduces(&mut scan);
    assert_eq!(rows.len(), 4);
}

#[test]
fn test_index_scan_requires_leading_bound() {
    let err = IndexScanOperator::new(keyed_index(), Row::new(), None)
        .err()
        .unwrap();
    assert!(matches!(err, Error::InvalidBound { .. }));

    assert!(IndexScanOperator::new(keyed_index(), row![1], Some(Row::new())).is_err());
}

#[test]
fn test_index_scan_over_table_index() {
    let table = users();
    let index = Arc::new(Index::from_table("idx_age", &table, &[2]).unwrap());
    let mut scan = IndexScanOperator::new(index, row![30], Some(row![45])).unwrap();

    assert_eq!(
        drain(&mut scan),
        vec![row![2, "bob", 35], row![3, "carol", 41]]
    );
}
