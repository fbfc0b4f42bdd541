mod bench;

pub use bench::{BenchConfig, BudgetMode, Budgets, ConfigError};
