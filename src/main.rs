//! rvb binary entry point.

use revbrowse::ui::output;

fn main() {
    if let Err(err) = revbrowse::cli::run() {
        output::error(format!("{:#}", err));
        std::process::exit(1);
    }
}
