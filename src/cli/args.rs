//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--cwd <path>`: Run as if in that directory
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output
//! - `--json`: Machine-readable output

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// revbrowse - Browse a wiki's documents and their revision history
#[derive(Parser, Debug)]
#[command(name = "rvb")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run as if rvb was started in this directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output; only errors are logged
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List documents as a directory tree
    #[command(
        name = "index",
        long_about = "List the documents of the working copy.\n\n\
            Documents are read from the git index. By default the listing is one \
            directory level deep: files directly under PREFIX are shown as-is and \
            each subdirectory is collapsed into one entry with its total size, \
            earliest creation time and latest modification time.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Top level of the wiki
    rvb index

    # One directory down
    rvb index docs

    # Every document under a directory, without grouping
    rvb index docs --flat

    # Feed a script
    rvb --json index docs"
    )]
    Index {
        /// Directory to list (spaces become '-')
        #[arg(default_value = "")]
        prefix: String,

        /// List every document under the prefix instead of grouping
        #[arg(long)]
        flat: bool,
    },

    /// Show one page of a document's revision history
    #[command(
        name = "history",
        long_about = "Show one page of a document's revision history, newest first.\n\n\
            Only the revisions needed for the page are read from the log. While \
            older revisions may still exist, the reported total is one more than \
            the number counted so far.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Latest revisions of a document
    rvb history home

    # Second page of ten
    rvb history home --start 10 --length 10

    # Table widget envelope (echoes the draw counter)
    rvb --json history home --draw 3"
    )]
    History {
        /// Document name (spaces become '-')
        path: String,

        /// Number of revisions to skip
        #[arg(long, default_value_t = 0)]
        start: usize,

        /// Revisions per page [default: history.page_length, or 10]
        #[arg(long)]
        length: Option<usize>,

        /// Table draw counter echoed in JSON output
        #[arg(long, default_value_t = 1)]
        draw: u64,
    },

    /// Show configuration
    #[command(
        name = "config",
        long_about = "Show the effective configuration.\n\n\
            Values come from built-in defaults, then the global config file, \
            then the repository config file (.git/revbrowse/config.toml)."
    )]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        long_about = "Generate shell completion scripts for tab-completion.\n\n\
            Outputs a completion script for the specified shell. Add the output \
            to your shell's configuration to enable tab-completion for rvb commands.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Bash (add to ~/.bashrc)
    rvb completion bash >> ~/.bashrc

    # Zsh (add to ~/.zshrc)
    rvb completion zsh >> ~/.zshrc

    # Fish
    rvb completion fish > ~/.config/fish/completions/rvb.fish"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Get a configuration value
    Get {
        /// Configuration key, e.g. display.datetime_format
        key: String,
    },
    /// List all configuration values
    List,
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_history_flags() {
        let cli = Cli::try_parse_from([
            "rvb", "--json", "history", "home", "--start", "10", "--length", "5", "--draw", "3",
        ])
        .unwrap();

        assert!(cli.json);
        match cli.command {
            Command::History {
                path,
                start,
                length,
                draw,
            } => {
                assert_eq!(path, "home");
                assert_eq!((start, length, draw), (10, Some(5), 3));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn index_prefix_defaults_to_root() {
        let cli = Cli::try_parse_from(["rvb", "index"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Index { ref prefix, flat: false } if prefix.is_empty()
        ));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["rvb", "index", "docs", "--flat", "-q"]).unwrap();
        assert!(cli.quiet);
    }
}
