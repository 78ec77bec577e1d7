mod action;
mod app;
mod cli;
mod components;
mod config;
mod event;
mod git;
mod highlight;
mod rows;
mod state;
mod theme;
mod tui;
mod workers;

use anyhow::Result;
use clap::Parser;
use std::env;

use crate::app::{parse_target, App};
use crate::cli::Cli;
use crate::state::ViewOptions;
use crate::theme::Theme;

fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Best-effort terminal restore so the user gets their shell back
        let _ = tui::restore();
        default_hook(panic_info);
    }));
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install().ok();
    install_panic_hook();

    let cli = Cli::parse();
    let cwd = env::current_dir()?;

    let repo_path = git2::Repository::discover(&cwd)
        .ok()
        .and_then(|repo| repo.workdir().map(|p| p.to_path_buf()));

    // Without a repository the only useful thing to do is clone one
    if repo_path.is_none() && cli.clone.is_none() {
        eprintln!(
            "stagediff: not a git repository (or any parent up to mount point /)\n\
             Run this from inside a git working tree, or start with --clone <url>."
        );
        std::process::exit(1);
    }

    let target = parse_target(cli.target.as_deref());

    let mut config = config::load_config();
    if let Some(ref theme_name) = cli.theme {
        config.theme = Theme::from_name(theme_name);
    }
    let ignore_ws = cli.ignore_whitespace || config.ignore_whitespace.unwrap_or(false);

    let options = ViewOptions {
        ignore_whitespace: ignore_ws,
    };
    let mut app = App::new(options, target, repo_path, config, cli.clone.clone());

    let mut terminal = tui::init()?;
    let result = app.run(&mut terminal).await;
    tui::restore()?;

    if let Err(ref e) = result {
        eprintln!("stagediff: {e:#}");
    }

    result
}
