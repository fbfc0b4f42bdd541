pub(crate) mod config;
pub use config::{BenchConfig, BudgetMode, Budgets, ConfigError};

pub(crate) mod id;
pub use id::{ElemId, ElemIdError};

pub(crate) mod stored;

pub(crate) mod tree;
pub use tree::{HasId, LayerSpec, TreeElem, flatten, generate_tree, node_count};
