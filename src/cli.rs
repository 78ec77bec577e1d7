use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "stagediff",
    version,
    about = "TUI git client with side-by-side line staging and repository cloning"
)]
pub struct Cli {
    /// Target to diff against (branch, commit, or ref)
    pub target: Option<String>,

    /// Ignore whitespace changes
    #[arg(short = 'w', long = "ignore-ws")]
    pub ignore_whitespace: bool,

    /// Open the clone dialog on startup, optionally prefilled with a URL
    #[arg(long, value_name = "URL", num_args = 0..=1, default_missing_value = "")]
    pub clone: Option<String>,

    /// Color theme
    #[arg(long)]
    pub theme: Option<String>,
}
