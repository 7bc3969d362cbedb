//! Command implementations for the CLI.

pub mod dump;
pub mod models;
pub mod utils;

pub use dump::{execute_dump, execute_export, execute_stats};
pub use models::{DumpArgs, ExportArgs, SourceArgs, StatsArgs};
pub use utils::{check_file, display_version, list_events, open_session, resolve_options};
