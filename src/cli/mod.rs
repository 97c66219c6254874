//! The `srcsrv` command line tool.
//!
//! ```text
//! srcsrv <url>
//! ├── fetch    # script and source map, through the cache (or inline data: URL)
//! ├── locate   # `//# sourceMappingURL=` reference in the script
//! └── extract  # recovered sources written below --output
//! ```

mod cache;
mod config;
mod fetch;

pub mod extract;
pub mod locate;

pub use cache::Cache;
pub use config::Cli;
pub use fetch::Fetcher;
