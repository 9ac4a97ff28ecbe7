//! Интеграционные тесты rustdb-exec
//!
//! Проверяют совместную работу операторов через публичный API

use rustdb_exec::common::ExecutorConfig;
use rustdb_exec::demo::{DemoCatalog, DEMO_QUERIES};
use rustdb_exec::executor::explain;
use rustdb_exec::{row, Index, Operator, PlanBuilder, QueryExecutor, Row, Table, Value};
use std::sync::Arc;

fn orders() -> Arc<Table> {
    let columns = vec!["order_id".to_string(), "customer".to_string(), "amount".to_string()];
    let rows = vec![
        row![100, "acme", 30],
        row![101, "globex", 75],
        row![102, "acme", 12],
        row![103, "initech", 75],
        row![104, "globex", 40],
    ];
    Arc::new(Table::with_rows("orders", columns, rows).unwrap())
}

fn customers() -> Arc<Table> {
    let columns = vec!["name".to_string(), "city".to_string()];
    let rows = vec![row!["acme", "berlin"], row!["globex", "paris"], row!["umbrella", "rome"]];
    Arc::new(Table::with_rows("customers", columns, rows).unwrap())
}

fn run(plan: &mut dyn Operator) -> Vec<Row> {
    QueryExecutor::default().execute(plan).rows
}

/// Тест полного конвейера: соединение, фильтр, проекция, сортировка и DISTINCT
#[test]
fn test_join_filter_project_sort_distinct() {
    let mut plan = PlanBuilder::scan(orders())
        .join(&[1], PlanBuilder::scan(customers()), &[0])
        .select(|row| row.at(2) >= &Value::from(30))
        .project(&[3, 1])
        .distinct()
        .build()
        .unwrap();

    assert_eq!(plan.n_columns(), 2);
    assert_eq!(
        run(plan.as_mut()),
        vec![row!["berlin", "acme"], row!["paris", "globex"]]
    );
}

/// Тест повторного выполнения одного и того же плана
#[test]
fn test_plan_is_reexecutable() {
    let mut plan = PlanBuilder::scan(orders())
        .sort(&[2, 0])
        .project(&[2])
        .unique()
        .build()
        .unwrap();

    let first = run(plan.as_mut());
    let second = run(plan.as_mut());

    assert_eq!(first, vec![row![12], row![30], row![40], row![75]]);
    assert_eq!(first, second);
}

/// Тест поиска по индексу, построенному из таблицы
#[test]
fn test_index_scan_feeds_join() {
    let orders = orders();
    let amount_index = Arc::new(Index::from_table("orders_amount", &orders, &[2]).unwrap());

    let mut plan = PlanBuilder::index_scan(amount_index, row![75], None)
        .join(&[1], PlanBuilder::scan(customers()), &[0])
        .build()
        .unwrap();

    assert_eq!(run(plan.as_mut()), vec![row![101, "globex", 75, "paris"]]);
}

/// Тест сборки плана с некорректными колонками
#[test]
fn test_invalid_plan_fails_fast() {
    let result = PlanBuilder::scan(orders())
        .join(&[1, 2], PlanBuilder::scan(customers()), &[0])
        .build();

    let err = result.err().unwrap();
    assert!(err.is_construction_fault());
}

/// Тест всех демонстрационных планов
#[test]
fn test_demo_queries_run() {
    let catalog = DemoCatalog::new().unwrap();
    let config = ExecutorConfig::default();
    let executor = QueryExecutor::new(config.clone());

    for (name, _) in DEMO_QUERIES {
        let mut plan = catalog.plan(name, &config).unwrap();
        let result = executor.execute(plan.as_mut());
        assert_eq!(result.width_violations, 0, "план {}", name);
        assert!(!result.is_empty(), "план {} ничего не вернул", name);
    }
}

/// Тест результатов демонстрационных планов
#[test]
fn test_demo_query_results() {
    let catalog = DemoCatalog::new().unwrap();
    let config = ExecutorConfig::default();

    let mut join = catalog.plan("join", &config).unwrap();
    assert_eq!(
        run(join.as_mut()),
        vec![
            row!["alice", "engineering"],
            row!["carol", "engineering"],
            row!["bob", "sales"],
            row!["erin", "sales"],
            row!["dave", "support"],
        ]
    );

    let mut distinct = catalog.plan("distinct", &config).unwrap();
    assert_eq!(
        run(distinct.as_mut()),
        vec![row![10], row![20], row![30], row![40]]
    );

    let mut range = catalog.plan("range", &config).unwrap();
    let salaries: Vec<Value> = run(range.as_mut()).iter().map(|r| r.at(3).clone()).collect();
    assert_eq!(
        salaries,
        vec![Value::from(4100), Value::from(4700), Value::from(5200), Value::from(5200)]
    );

    let plan = catalog.plan("join", &config).unwrap();
    assert!(explain(plan.as_ref()).starts_with("Project [1, 4]\n  NestedLoopJoin"));
}
