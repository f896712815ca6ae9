//! One module per subcommand, each exposing `execute`.

pub mod add;
pub mod code;
pub mod completions;
pub mod export;
pub mod import_cmd;
pub mod list;
pub mod remove;
pub mod rename;
pub mod watch;
