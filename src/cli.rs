//! CLI domain: parse, route, help, output, and presentation only.
//! No domain orchestration; single route table dispatches to the repository.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::command_name;
pub use output::{map_error, CommandOutput};
pub use parse::{Cli, Commands, OutputFormat};
pub use presentation::{
    format_checkout_summary, format_init_summary, format_path_map_json, format_path_map_text,
    format_tree_entries_json, format_tree_entries_text,
};
pub use route::RunContext;
