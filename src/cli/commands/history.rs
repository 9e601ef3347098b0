//! history command - Show one page of a document's revisions
//!
//! With `--json` the page is wrapped in the table envelope, so the output
//! can be served directly to a server-side table widget.

use anyhow::{Context as _, Result};

use super::{open_session, print_json};
use crate::cli::Context;
use crate::history::{TableResponse, Window};
use crate::ui::output;

/// Show revisions `start..start + length` of `path`.
pub fn history(
    ctx: &Context,
    path: &str,
    start: usize,
    length: Option<usize>,
    draw: u64,
) -> Result<()> {
    let session = open_session(ctx)?;
    let length = length.unwrap_or_else(|| session.config.page_length());
    let window = Window::new(start, length)?;

    let page = session
        .browser
        .history(path, window)
        .with_context(|| format!("Failed to read history of '{}'", path))?;

    if ctx.json {
        return print_json(&TableResponse::new(draw, page));
    }

    for item in &page.items {
        println!("{}", output::format_history_item(item));
    }
    output::print(output::format_page_footer(&page, start), ctx.verbosity());
    Ok(())
}
