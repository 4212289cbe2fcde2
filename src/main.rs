//! The Circle — command-line entry point.
//!
//! `serve` runs the background handler over stdio; the other commands
//! drive the same handler in-process for one call and print JSON.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::io::BufReader;

use the_circle_lib::actions::{ActionDispatcher, MenuSession};
use the_circle_lib::bridge::{stdio, Background, LocalBridge};
use the_circle_lib::config::{ConfigPatch, Configuration, Shortcut, Theme};
use the_circle_lib::desktop::DesktopPage;
use the_circle_lib::llm::provider::{all_providers, save_api_key};

#[derive(Parser)]
#[command(name = "the-circle")]
#[command(about = "Select text, pick an action, get an AI result")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer bridge requests on stdin/stdout (one JSON message per line)
    Serve,

    /// Run one action and print its result
    Run {
        /// Action id, e.g. translate, summarizePage, search
        action: String,

        /// Selected text
        #[arg(long, default_value = "")]
        text: String,

        /// File holding the page text (for summarizePage)
        #[arg(long)]
        page_file: Option<PathBuf>,

        /// Page title (for bookmark)
        #[arg(long, default_value = "")]
        title: String,

        /// Page URL (for bookmark)
        #[arg(long, default_value = "")]
        url: String,
    },

    /// Inspect or change the stored settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Print the menu that would open, in render order
    Menu {
        /// Selected text; the global menu opens without it
        #[arg(long)]
        selection: Option<String>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the current settings (the API key is masked)
    Show,

    /// Change some settings, keep the rest
    Set {
        /// light, dark or auto
        #[arg(long, value_parser = parse_theme)]
        theme: Option<Theme>,

        /// Preferred language tag, e.g. zh-CN or en
        #[arg(long)]
        language: Option<String>,

        /// Shortcut such as Ctrl+Alt+K
        #[arg(long)]
        shortcut: Option<Shortcut>,

        /// API key; an empty value clears it
        #[arg(long)]
        api_key: Option<String>,

        /// Put the API key in the OS keychain instead of the settings file
        #[arg(long, requires = "api_key")]
        keychain: bool,
    },

    /// Restore the default settings (menus are kept)
    Reset,

    /// Send one test request with the current settings
    Test,

    /// List the supported AI providers
    Providers,
}

fn parse_theme(s: &str) -> Result<Theme, String> {
    serde_json::from_value(serde_json::Value::String(s.to_ascii_lowercase()))
        .map_err(|_| format!("unknown theme '{}' (light, dark, auto)", s))
}

#[tokio::main]
async fn main() {
    if let Ok(cwd) = std::env::current_dir() {
        the_circle_lib::load_env(&cwd);
    }
    the_circle_lib::init_logging();

    let cli = Cli::parse();
    if let Err(e) = run(cli.command).await {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

async fn run(command: Commands) -> Result<(), String> {
    let background = the_circle_lib::desktop_background()?;

    match command {
        Commands::Serve => {
            log::info!("[STARTUP] Serving bridge on stdio");
            let reader = BufReader::new(tokio::io::stdin());
            stdio::serve(reader, tokio::io::stdout(), &background)
                .await
                .map_err(|e| format!("stdio bridge failed: {}", e))?;
        }
        Commands::Run {
            action,
            text,
            page_file,
            title,
            url,
        } => {
            let body = match page_file {
                Some(path) => tokio::fs::read_to_string(&path)
                    .await
                    .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?,
                None => String::new(),
            };
            let config = current_config(&background).await?;
            let page = DesktopPage { title, url, body };
            let dispatcher =
                ActionDispatcher::new(Arc::new(LocalBridge::new(background)), Arc::new(page));

            let result = dispatcher.execute(&action, &text, &config).await;
            print_json(&result)?;
        }
        Commands::Config { action } => config_command(&background, action).await?,
        Commands::Menu { selection } => {
            let bridge = LocalBridge::new(background);
            let session = MenuSession::open(&bridge, selection.as_deref().unwrap_or(""))
                .await
                .map_err(|e| e.to_string())?;
            for item in session.items() {
                println!("{:<14} {:<14} {}", item.id, item.action.as_str(), item.label);
            }
        }
    }
    Ok(())
}

async fn config_command(background: &Background, action: ConfigAction) -> Result<(), String> {
    let store = background.store();
    match action {
        ConfigAction::Show => print_json(&masked(current_config(background).await?))?,
        ConfigAction::Set {
            theme,
            language,
            shortcut,
            api_key,
            keychain,
        } => {
            let mut patch = ConfigPatch {
                theme,
                preferred_language: language,
                shortcut,
                ..ConfigPatch::default()
            };
            match api_key {
                Some(key) if keychain => {
                    let provider = current_config(background).await?.api_provider;
                    save_api_key(provider, &key)?;
                }
                other => patch.api_key = other,
            }
            if patch.is_empty() && !keychain {
                return Err("nothing to change".into());
            }
            let config = store.save_config(patch).await.map_err(|e| e.to_string())?;
            print_json(&masked(config))?;
        }
        ConfigAction::Reset => {
            let config = store.reset_config().await.map_err(|e| e.to_string())?;
            print_json(&masked(config))?;
        }
        ConfigAction::Test => {
            let config = current_config(background).await?;
            the_circle_lib::llm::AiClient::default()
                .test_connection(&config)
                .await
                .map_err(|e| e.to_string())?;
            println!("ok");
        }
        ConfigAction::Providers => print_json(&all_providers())?,
    }
    Ok(())
}

async fn current_config(background: &Background) -> Result<Configuration, String> {
    background.store().get_config().await.map_err(|e| e.to_string())
}

fn masked(mut config: Configuration) -> Configuration {
    if let Some(key) = config.api_key.as_mut() {
        *key = format!("<{} chars>", key.chars().count());
    }
    config
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{}", json);
    Ok(())
}
