// Subcommand handlers. main.rs parses arguments and dispatches here.

pub mod neighbors;
pub mod route;
