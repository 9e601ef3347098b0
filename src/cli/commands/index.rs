//! index command - List documents as a directory tree

use anyhow::{Context as _, Result};

use super::{open_session, print_json};
use crate::cli::Context;
use crate::index::IndexMode;
use crate::ui::output;

/// List the documents under `prefix`.
pub fn index(ctx: &Context, prefix: &str, flat: bool) -> Result<()> {
    let session = open_session(ctx)?;
    let mode = if flat { IndexMode::Flat } else { IndexMode::Tree };

    let entries = session
        .browser
        .index(prefix, mode)
        .with_context(|| format!("Failed to list documents under '{}'", prefix))?;

    if ctx.json {
        return print_json(&entries);
    }

    if entries.is_empty() {
        output::print("No documents found", ctx.verbosity());
        return Ok(());
    }

    let settings = session.browser.settings();
    for entry in &entries {
        println!("{}", output::format_entry(entry, settings));
    }
    Ok(())
}
