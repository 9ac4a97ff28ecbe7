//! Главный исполняемый файл rustdb-exec

use anyhow::Context;
use clap::{Parser, Subcommand};
use rustdb_exec::common::{init_logging, ExecutorConfig};
use rustdb_exec::demo::{DemoCatalog, DEMO_QUERIES};
use rustdb_exec::executor::explain;
use rustdb_exec::{QueryExecutor, VERSION};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rustdb-exec")]
#[command(about = "Pull-based query execution over an in-memory sample database")]
#[command(version = VERSION)]
struct Cli {
    /// Конфигурационный файл
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Уровень детализации логирования
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Выполнить готовый план и вывести строки в формате JSON
    Demo {
        /// Имя плана
        name: String,

        /// Максимальное количество строк результата
        #[arg(short, long)]
        limit: Option<usize>,

        /// Вывести статистику корневого оператора
        #[arg(long)]
        stats: bool,
    },
    /// Показать список готовых планов
    List,
    /// Показать дерево операторов плана
    Explain {
        /// Имя плана
        name: String,
    },
}

/// Порядок приоритета: файл, затем переменные окружения, затем флаги
fn load_config(cli: &Cli) -> anyhow::Result<ExecutorConfig> {
    let base = match &cli.config {
        Some(path) => ExecutorConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ExecutorConfig::default(),
    };
    let mut config = base
        .with_env()
        .context("invalid environment configuration")?;

    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }

    config.validate()?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = load_config(&cli)?;
    init_logging(&config)?;

    let catalog = DemoCatalog::new()?;

    match &cli.command {
        Commands::Demo { name, limit, stats } => {
            if let Some(limit) = limit {
                config.max_result_rows = *limit;
            }
            let mut plan = catalog.plan(name, &config)?;
            let result = QueryExecutor::new(config).execute(plan.as_mut());

            print!("{}", result.to_json_lines()?);
            if *stats {
                if let Some(statistics) = &result.statistics {
                    eprintln!("{}", serde_json::to_string_pretty(statistics)?);
                }
            }
            if result.truncated {
                eprintln!("-- output truncated at {} rows", result.len());
            }
        }
        Commands::List => {
            for (name, description) in DEMO_QUERIES {
                println!("{:<10} {}", name, description);
            }
        }
        Commands::Explain { name } => {
            let plan = catalog.plan(name, &config)?;
            print!("{}", explain(plan.as_ref()));
        }
    }

    Ok(())
}
