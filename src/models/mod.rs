pub mod backend;
pub mod config;

pub use backend::{BackendKind, Workgroup};
pub use config::{BenchConfig, BenchOverrides};
