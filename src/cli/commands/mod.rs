//! CLI command implementations.

mod ask;
mod index;
mod serve;

pub use ask::run_ask;
pub use index::run_index;
pub use serve::run_serve;
