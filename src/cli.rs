use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::card::theme::DEFAULT_THEME;
use crate::card::Card;
use crate::github::{API_BASE_URL, DEFAULT_TOKEN_ENV};

#[derive(Parser)]
#[command(name = "snaprepo")]
#[command(about = "SnapRepo - Turn a GitHub repository URL into a shareable social card")]
#[command(version)]
pub struct Cli {
    /// TrueType/OpenType font used for card text (system sans-serif when omitted)
    #[arg(long, env = "SNAPREPO_FONT", global = true)]
    pub font: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the repository info proxy and the card endpoint
    Serve {
        /// Port to listen on
        #[arg(long, env = "PORT", default_value_t = 3000)]
        port: u16,

        /// Environment variable holding the GitHub token, read on every request
        #[arg(long, env = "SNAPREPO_TOKEN_ENV", default_value = DEFAULT_TOKEN_ENV)]
        token_env: String,

        /// GitHub REST API base URL
        #[arg(long, env = "GITHUB_API_URL", default_value = API_BASE_URL)]
        github_api_url: String,
    },

    /// Render a card for a repository URL and save it as PNG
    Snap {
        /// Repository link, e.g. https://github.com/rust-lang/rust
        url: String,

        /// Card theme (dark, light, gradient, cyberpunk)
        #[arg(long, default_value = DEFAULT_THEME)]
        theme: String,

        /// Leave the SnapRepo watermark off
        #[arg(long)]
        no_watermark: bool,

        /// Where to write the PNG
        #[arg(long, short, default_value = Card::FILE_NAME)]
        output: PathBuf,

        /// Fetch through a running proxy instead of calling GitHub directly
        #[arg(long, env = "SNAPREPO_API_URL", conflicts_with = "offline")]
        api_url: Option<String>,

        /// Skip external calls and render the built-in sample repository
        #[arg(long)]
        offline: bool,
    },
}
