//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Opens the repository and loads configuration
//! 2. Calls [`crate::browse::Browser`]
//! 3. Formats and displays output (text, or JSON with `--json`)

mod completion;
mod config_cmd;
mod history;
mod index;

// Re-export command functions for testing and direct invocation
pub use completion::completion;
pub use config_cmd::{get as config_get, list as config_list};
pub use history::history;
pub use index::index;

use anyhow::{Context as _, Result};

use crate::browse::Browser;
use crate::cli::args::{Command, ConfigAction};
use crate::cli::Context;
use crate::core::config::Config;
use crate::format::identity::GravatarResolver;
use crate::store::GitStore;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Index { prefix, flat } => index::index(ctx, &prefix, flat),
        Command::History {
            path,
            start,
            length,
            draw,
        } => history::history(ctx, &path, start, length, draw),
        Command::Config { action } => match action {
            ConfigAction::Get { key } => config_cmd::get(ctx, &key),
            ConfigAction::List => config_cmd::list(ctx),
        },
        Command::Completion { shell } => completion::completion(shell),
    }
}

/// An opened repository with its configuration applied.
struct Session {
    browser: Browser,
    config: Config,
}

/// Open the repository containing the working directory.
fn open_session(ctx: &Context) -> Result<Session> {
    let cwd = ctx.cwd()?;
    let store = GitStore::open(&cwd).context("Failed to open repository")?;
    let config = Config::load(Some(&store.info().work_dir)).context("Failed to load config")?;

    let store = store.with_extension(config.document_extension());
    let resolver = GravatarResolver::new(config.gravatar_settings());
    let browser = Browser::new(Box::new(store), Box::new(resolver), config.feed_settings());

    Ok(Session { browser, config })
}

/// Print a value as pretty JSON on stdout.
fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
