//! CLI command implementations

pub mod check;
pub mod config;
pub mod destroy;
pub mod list;
pub mod utility;

pub use check::execute as check;
pub use config::execute as config;
pub use destroy::execute as destroy;
pub use destroy::execute_all as destroy_all;
pub use list::execute as list;
pub use utility::{reset, stats, verify_listed};
