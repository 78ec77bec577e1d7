pub mod commands;
pub mod diff;
pub mod patch;
pub mod remote;
pub mod types;
pub mod url;

pub use commands::GitCli;
pub use diff::DiffEngine;
