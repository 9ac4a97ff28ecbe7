//! Исполнитель запросов rustdb-exec

pub mod builder;
pub mod executor;
pub mod operators;
pub mod selector;

#[cfg(test)]
pub mod tests;

pub use builder::PlanBuilder;
pub use executor::{QueryExecutor, QueryResult};
pub use operators::{
    explain, IndexScanOperator, NestedLoopJoinOperator, Operator, OperatorStatistics,
    ProjectOperator, RowPredicate, SelectOperator, SortOperator, TableScanOperator,
    UniqueOperator,
};
pub use selector::{ColumnSelector, RowComparator};
