use crate::agents::{StreamingCallback, SuggestAgent, SuggestionEngine};
use crate::card::SuggestionCard;
use crate::common::CommonParams;
use crate::config::Config;
use crate::github::GitHubClient;
use crate::providers::Provider;
use crate::ui::{self, rgb};
use crate::{log_debug, server};
use anyhow::{Context, Result};
use async_trait::async_trait;
use colored::Colorize;
use indicatif::ProgressBar;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Columns used for the terminal card
const CARD_WIDTH: usize = 72;

/// Load the personal config file without environment overrides, so secrets
/// coming from the environment are never written back to disk
fn load_personal_config() -> Result<Config> {
    Config::load_from(&Config::get_config_path()?)
}

/// Handle the `config` command
pub fn handle_config_command(
    common: &CommonParams,
    api_key: Option<String>,
    github_token: Option<String>,
    temperature: Option<f64>,
) -> Result<()> {
    log_debug!(
        "Starting 'config' command with common: {:?}, temperature: {:?}",
        common,
        temperature
    );

    let mut config = load_personal_config()?;

    let provider = common
        .provider
        .as_deref()
        .map(str::parse::<Provider>)
        .transpose()?;
    let changes_made = provider.is_some()
        || common.model.is_some()
        || api_key.is_some()
        || github_token.is_some()
        || temperature.is_some();

    if changes_made {
        config.update(
            provider,
            api_key,
            common.model.clone(),
            temperature,
            github_token,
        )?;
        config.save()?;
        ui::print_success("Configuration updated successfully.");
        ui::print_newline();
    }

    print_configuration(&config);
    Ok(())
}

fn print_configuration(config: &Config) {
    let purple = rgb::ELECTRIC_PURPLE;
    let cyan = rgb::NEON_CYAN;
    let coral = rgb::CORAL;
    let yellow = rgb::ELECTRIC_YELLOW;
    let green = rgb::SUCCESS_GREEN;
    let dim = rgb::DIM_WHITE;
    let dim_sep = rgb::DIM_SEPARATOR;

    println!();
    println!(
        "{}  {}  {}",
        "━━━".truecolor(purple.0, purple.1, purple.2),
        "MUSE CONFIGURATION"
            .truecolor(cyan.0, cyan.1, cyan.2)
            .bold(),
        "━━━".truecolor(purple.0, purple.1, purple.2)
    );
    println!();

    print_section_header("GLOBAL");
    print_config_row("Provider", &config.default_provider, cyan, true);
    print_config_row(
        "Temperature",
        &config.suggestion.temperature.to_string(),
        coral,
        false,
    );
    print_config_row(
        "Max Turns",
        &config.suggestion.max_turns.to_string(),
        coral,
        false,
    );

    println!();
    print_section_header("GITHUB");
    let (token_state, token_color) = if config.github.token.is_some() {
        ("set", green)
    } else {
        ("missing", yellow)
    };
    print_config_row("Token", token_state, token_color, false);
    print_config_row("API", &config.github.api_url, dim, false);

    println!();
    print_section_header("SERVER");
    print_config_row("Bind", &config.server.bind, cyan, false);
    print_config_row("Function", &config.server.function_path, dim, false);

    let mut providers: Vec<_> = config.providers.iter().collect();
    providers.sort_by_key(|(name, _)| name.as_str());

    for (provider_name, provider_config) in providers {
        println!();
        let is_active = provider_name == &config.default_provider;
        let header = if is_active {
            format!("{} ✦", provider_name.to_uppercase())
        } else {
            provider_name.to_uppercase()
        };
        print_section_header(&header);

        print_config_row("Model", &provider_config.model, cyan, true);
        let (key_state, key_color) = if provider_config.has_api_key() {
            ("set", green)
        } else {
            ("missing", yellow)
        };
        print_config_row("API Key", key_state, key_color, false);
        if let Some(temperature) = provider_config.temperature {
            print_config_row("Temperature", &temperature.to_string(), coral, false);
        }
        if let Some(url) = provider_config.base_url() {
            print_config_row("Endpoint", url, dim, false);
        }
    }

    println!();
    println!(
        "{}",
        "─".repeat(40).truecolor(dim_sep.0, dim_sep.1, dim_sep.2)
    );
    println!();
}

fn print_section_header(name: &str) {
    let purple = rgb::ELECTRIC_PURPLE;
    let dim_sep = rgb::DIM_SEPARATOR;
    println!(
        "{} {} {}",
        "─".truecolor(purple.0, purple.1, purple.2),
        name.truecolor(purple.0, purple.1, purple.2).bold(),
        "─"
            .repeat(30 - name.len().min(28))
            .truecolor(dim_sep.0, dim_sep.1, dim_sep.2)
    );
}

fn print_config_row(label: &str, value: &str, value_color: (u8, u8, u8), highlight: bool) {
    let dim = rgb::DIM_WHITE;
    let label_styled = format!("{label:>12}").truecolor(dim.0, dim.1, dim.2);

    let value_styled = if highlight {
        value
            .truecolor(value_color.0, value_color.1, value_color.2)
            .bold()
    } else {
        value.truecolor(value_color.0, value_color.1, value_color.2)
    };

    println!("{label_styled}  {value_styled}");
}

/// Which adapter a fetch command runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    Profile,
    Repos,
    Languages,
    Starred,
}

fn to_pretty_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize GitHub data")
}

async fn fetch_json(client: &GitHubClient, kind: FetchKind, username: &str) -> Result<String> {
    match kind {
        FetchKind::Profile => to_pretty_json(&client.fetch_user_profile(username).await?),
        FetchKind::Repos => to_pretty_json(&client.fetch_repos(username).await?),
        FetchKind::Languages => to_pretty_json(&client.fetch_language_stats(username).await?),
        FetchKind::Starred => to_pretty_json(&client.fetch_starred_repos(username).await?),
    }
}

/// Handle `profile`, `repos`, `languages` and `starred`: run one adapter and print its JSON
pub async fn handle_fetch_command(kind: FetchKind, username: &str) -> Result<()> {
    log_debug!("Fetching {:?} for {}", kind, username);

    let config = Config::load()?;
    let client = GitHubClient::new(&config.github)?;

    let spinner = ui::create_spinner(&format!("Asking GitHub about {username}..."));
    let json = fetch_json(&client, kind, username).await;
    spinner.finish_and_clear();

    println!("{}", json?);
    Ok(())
}

/// Options for the `suggest` command
#[derive(Debug, Clone, Default)]
pub struct SuggestOptions {
    pub save: Option<PathBuf>,
    pub copy: bool,
    pub stream: bool,
}

/// Echoes chunks to the terminal, keeping a spinner up until the first one arrives
struct TerminalCallback {
    spinner: ProgressBar,
    started: AtomicBool,
    echo: bool,
}

impl TerminalCallback {
    fn new(spinner: ProgressBar, echo: bool) -> Self {
        Self {
            spinner,
            started: AtomicBool::new(false),
            echo,
        }
    }

    fn finish(&self) {
        if !self.started.swap(true, Ordering::SeqCst) {
            self.spinner.finish_and_clear();
        }
    }
}

#[async_trait]
impl StreamingCallback for TerminalCallback {
    async fn on_chunk(&self, chunk: &str) -> Result<()> {
        if !self.echo {
            return Ok(());
        }
        self.finish();

        let (r, g, b) = rgb::DIM_WHITE;
        let mut stdout = std::io::stdout();
        write!(stdout, "{}", chunk.truecolor(r, g, b))?;
        stdout.flush()?;
        Ok(())
    }

    async fn on_status_update(&self, message: &str) -> Result<()> {
        if !self.started.load(Ordering::SeqCst) {
            self.spinner.set_message(message.to_string());
        }
        Ok(())
    }
}

/// Handle the `suggest` command
pub async fn handle_suggest_command(
    common: &CommonParams,
    username: &str,
    options: SuggestOptions,
) -> Result<()> {
    log_debug!(
        "Starting 'suggest' for {} with common: {:?}, options: {:?}",
        username,
        common,
        options
    );

    let mut config = Config::load()?;
    common.apply_to_config(&mut config)?;
    let agent = SuggestAgent::from_config(&config)?;

    let echo = options.stream && !ui::is_quiet_mode();
    let callback = TerminalCallback::new(
        ui::create_spinner("Consulting the muse..."),
        echo,
    );

    let result = agent.suggest(username, &callback).await;
    callback.finish();
    let suggestion = result?;

    if echo {
        println!();
        println!();
    }

    let card = SuggestionCard::parse(&suggestion);
    println!("{}", card.render_terminal(CARD_WIDTH));

    if let Some(path) = &options.save {
        card.save_markdown(path)?;
        ui::print_success(&format!("Card saved to {}", path.display()));
    }

    if options.copy {
        match card.copy_to_clipboard() {
            Ok(()) => ui::print_success("Card copied to clipboard"),
            Err(e) => ui::print_warning(&format!("Could not copy the card: {e:#}")),
        }
    }

    Ok(())
}

/// Handle the `serve` command
pub async fn handle_serve_command(common: &CommonParams, bind: Option<String>) -> Result<()> {
    let mut config = Config::load()?;
    common.apply_to_config(&mut config)?;
    if let Some(bind) = bind {
        config.server.bind = bind;
    }

    crate::logger::enable_logging();
    crate::logger::set_log_to_stderr(true);

    // Refuse to start without both secrets
    let agent = SuggestAgent::from_config(&config)
        .context("The server needs a GitHub token and a model API key")?;

    ui::print_info(&format!(
        "Serving suggestions with {}/{} on http://{}{}",
        agent.provider(),
        agent.model(),
        config.server.bind,
        config.server.function_path
    ));

    let engine: Arc<dyn SuggestionEngine> = Arc::new(agent);
    server::serve(&config.server, engine).await
}
