//! Демонстрационный набор данных и готовые планы запросов

use crate::common::{Error, ExecutorConfig, Result, Value};
use crate::executor::{Operator, PlanBuilder};
use crate::row;
use crate::storage::{Index, Table};
use std::sync::Arc;

/// Имена готовых планов с кратким описанием
pub const DEMO_QUERIES: &[(&str, &str)] = &[
    ("scan", "all employees"),
    ("filter", "employees with salary above 5000"),
    ("project", "employee names and salaries"),
    ("join", "employees joined with their departments"),
    ("sort", "employees ordered by department, then salary"),
    ("distinct", "distinct department ids of employees"),
    ("range", "index range lookup on salary in [4000, 6000]"),
];

/// Таблицы и индексы демонстрационной базы
pub struct DemoCatalog {
    /// employees(id, name, dept_id, salary)
    pub employees: Arc<Table>,
    /// departments(id, title)
    pub departments: Arc<Table>,
    /// Индекс employees по salary
    pub salary_index: Arc<Index>,
}

impl DemoCatalog {
    pub fn new() -> Result<Self> {
        let employees = Table::with_rows(
            "employees",
            columns(&["id", "name", "dept_id", "salary"]),
            vec![
                row![1, "alice", 10, 5200],
                row![2, "bob", 20, 4100],
                row![3, "carol", 10, 6100],
                row![4, "dave", 30, 3900],
                row![5, "erin", 20, 5200],
                row![6, "frank", 40, 4700],
            ],
        )?;
        let departments = Table::with_rows(
            "departments",
            columns(&["id", "title"]),
            vec![
                row![10, "engineering"],
                row![20, "sales"],
                row![30, "support"],
            ],
        )?;
        let salary_index = Index::from_table("employees_salary", &employees, &[3])?;

        Ok(Self {
            employees: Arc::new(employees),
            departments: Arc::new(departments),
            salary_index: Arc::new(salary_index),
        })
    }

    /// Построить готовый план по имени
    pub fn plan(&self, name: &str, config: &ExecutorConfig) -> Result<Box<dyn Operator>> {
        let employees = || PlanBuilder::scan(self.employees.clone()).with_config(config);

        let builder = match name {
            "scan" => employees(),
            "filter" => employees().select(|row| row.at(3) > &Value::from(5000)),
            "project" => employees().project(&[1, 3]),
            "join" => employees()
                .join(&[2], PlanBuilder::scan(self.departments.clone()), &[0])
                .project(&[1, 4]),
            "sort" => employees().sort(&[2, 3]),
            "distinct" => employees().project(&[2]).distinct(),
            "range" => PlanBuilder::index_scan(
                self.salary_index.clone(),
                row![4000],
                Some(row![6000]),
            )
            .with_config(config),
            other => {
                return Err(Error::query_planning(format!(
                    "Unknown demo query: {}",
                    other
                )))
            }
        };

        builder.build()
    }
}

fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_demo_query_builds() {
        let catalog = DemoCatalog::new().unwrap();
        let config = ExecutorConfig::default();

        for (name, _) in DEMO_QUERIES {
            assert!(catalog.plan(name, &config).is_ok(), "план {} не построен", name);
        }
    }

    #[test]
    fn test_unknown_demo_query() {
        let catalog = DemoCatalog::new().unwrap();
        let err = catalog.plan("nope", &ExecutorConfig::default()).err().unwrap();
        assert!(matches!(err, Error::QueryPlanning { .. }));
    }
}
