//! Block-shot puzzle (workspace facade crate).
//!
//! Re-exports the workspace crates as `blockshot::{types,core,runtime,term}` so
//! the binary and the integration tests share one public API while the
//! implementation lives in dedicated crates under `crates/`.

pub use blockshot_core as core;
pub use blockshot_runtime as runtime;
pub use blockshot_term as term;
pub use blockshot_types as types;
