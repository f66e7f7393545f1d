use crate::card::DEFAULT_CARD_FILENAME;
use crate::commands::{self, FetchKind, SuggestOptions};
use crate::common::CommonParams;
use crate::log_debug;
use crate::providers::Provider;
use crate::ui;
use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand, crate_version};
use colored::Colorize;
use std::path::PathBuf;

const LOG_FILE: &str = "project-muse-debug.log";

/// CLI structure defining the available commands and global arguments
#[derive(Parser)]
#[command(
    author,
    version = crate_version!(),
    about = "Project Muse: your next project, read from your GitHub",
    long_about = "Project Muse studies a GitHub profile, its repositories, languages and stars, and asks a model to suggest one concrete next project.",
    disable_version_flag = true,
    after_help = get_dynamic_help(),
    styles = get_styles(),
)]
pub struct Cli {
    /// Subcommands available for the CLI
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Log debug messages to a file
    #[arg(
        short = 'l',
        long = "log",
        global = true,
        help = "Log debug messages to a file"
    )]
    pub log: bool,

    /// Specify a custom log file path
    #[arg(
        long = "log-file",
        global = true,
        help = "Specify a custom log file path"
    )]
    pub log_file: Option<String>,

    /// Suppress non-essential output (spinners, streamed text, etc.)
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        help = "Suppress non-essential output"
    )]
    pub quiet: bool,

    /// Display the version
    #[arg(
        short = 'v',
        long = "version",
        global = true,
        help = "Display the version"
    )]
    pub version: bool,
}

/// Enumeration of available subcommands
#[derive(Subcommand)]
#[command(subcommand_negates_reqs = true)]
#[command(subcommand_precedence_over_arg = true)]
pub enum Commands {
    /// Suggest a next project for a GitHub user
    #[command(
        about = "Suggest a next project for a GitHub user",
        long_about = "Look at a GitHub user's profile, recent repositories, languages and stars, then stream a project suggestion and show it as a card.",
        after_help = get_dynamic_help()
    )]
    Suggest {
        /// GitHub username
        username: String,

        #[command(flatten)]
        common: CommonParams,

        /// Save the card as Markdown
        #[arg(
            long,
            num_args = 0..=1,
            default_missing_value = DEFAULT_CARD_FILENAME,
            value_name = "PATH",
            help = "Save the card as Markdown (default: project-suggestion.md)"
        )]
        save: Option<PathBuf>,

        /// Copy the card to the clipboard
        #[arg(long, help = "Copy the card to the clipboard")]
        copy: bool,

        /// Wait for the full suggestion instead of streaming it
        #[arg(long, help = "Wait for the full suggestion instead of streaming it")]
        no_stream: bool,
    },

    /// Serve the callable suggestion endpoint
    #[command(
        about = "Serve the callable suggestion endpoint",
        long_about = "Run an HTTP server exposing the suggestion as a callable function at /githubProjectSuggestFunction, with CORS open to every origin."
    )]
    Serve {
        #[command(flatten)]
        common: CommonParams,

        /// Address to listen on
        #[arg(long, value_name = "ADDR", help = "Address to listen on, e.g. 0.0.0.0:8080")]
        bind: Option<String>,
    },

    /// Print a user's GitHub profile
    #[command(about = "Print a user's GitHub profile as JSON")]
    Profile {
        /// GitHub username
        username: String,
    },

    /// Print a user's recently pushed repositories
    #[command(about = "Print a user's recently pushed repositories as JSON")]
    Repos {
        /// GitHub username
        username: String,
    },

    /// Print a user's language statistics
    #[command(about = "Print a user's language statistics as JSON")]
    Languages {
        /// GitHub username
        username: String,
    },

    /// Print a summary of a user's starred repositories
    #[command(about = "Print a summary of a user's starred repositories as JSON")]
    Starred {
        /// GitHub username
        username: String,
    },

    /// Configure Project Muse settings and providers
    #[command(
        about = "Configure Project Muse settings and providers",
        long_about = "Configure the default provider, model, API keys and GitHub token."
    )]
    Config {
        #[command(flatten)]
        common: CommonParams,

        /// Set API key for the specified provider
        #[arg(long, help = "Set API key for the specified provider")]
        api_key: Option<String>,

        /// Set the GitHub token
        #[arg(long, help = "Set the GitHub personal access token")]
        github_token: Option<String>,

        /// Set sampling temperature for the specified provider
        #[arg(long, help = "Set sampling temperature for the specified provider (0.0 - 2.0)")]
        temperature: Option<f64>,
    },
}

/// Define custom styles for Clap
fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Magenta.on_default().bold())
        .usage(AnsiColor::Cyan.on_default().bold())
        .literal(AnsiColor::Green.on_default().bold())
        .placeholder(AnsiColor::Yellow.on_default())
        .valid(AnsiColor::Blue.on_default().bold())
        .invalid(AnsiColor::Red.on_default().bold())
        .error(AnsiColor::Red.on_default().bold())
}

/// Parse the command-line arguments
pub fn parse_args() -> Cli {
    Cli::parse()
}

/// Generate dynamic help including available LLM providers
fn get_dynamic_help() -> String {
    let mut providers = Provider::all_names();
    providers.sort_unstable();

    let providers_list = providers
        .iter()
        .map(|p| format!("{}", p.bold()))
        .collect::<Vec<_>>()
        .join(" • ");

    format!("\nAvailable LLM Providers: {providers_list}")
}

/// Main function to parse arguments and handle the command
pub async fn main() -> anyhow::Result<()> {
    let cli = parse_args();

    if cli.version {
        ui::print_version(crate_version!());
        return Ok(());
    }

    if cli.log {
        crate::logger::enable_logging();
        let log_file = cli.log_file.as_deref().unwrap_or(LOG_FILE);
        crate::logger::set_log_file(log_file)?;
    } else {
        crate::logger::disable_logging();
    }

    if cli.quiet {
        ui::set_quiet_mode(true);
    }

    if let Some(command) = cli.command {
        handle_command(command).await
    } else {
        let _ = Cli::parse_from(["project-muse", "--help"]);
        Ok(())
    }
}

/// Handle the command based on parsed arguments
pub async fn handle_command(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Suggest {
            username,
            common,
            save,
            copy,
            no_stream,
        } => {
            log_debug!("Handling 'suggest' for {}", username);
            commands::handle_suggest_command(
                &common,
                &username,
                SuggestOptions {
                    save,
                    copy,
                    stream: !no_stream,
                },
            )
            .await
        }
        Commands::Serve { common, bind } => {
            log_debug!("Handling 'serve' with bind: {:?}", bind);
            commands::handle_serve_command(&common, bind).await
        }
        Commands::Profile { username } => {
            commands::handle_fetch_command(FetchKind::Profile, &username).await
        }
        Commands::Repos { username } => {
            commands::handle_fetch_command(FetchKind::Repos, &username).await
        }
        Commands::Languages { username } => {
            commands::handle_fetch_command(FetchKind::Languages, &username).await
        }
        Commands::Starred { username } => {
            commands::handle_fetch_command(FetchKind::Starred, &username).await
        }
        Commands::Config {
            common,
            api_key,
            github_token,
            temperature,
        } => commands::handle_config_command(&common, api_key, github_token, temperature),
    }
}
