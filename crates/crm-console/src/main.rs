//! crm-console - CRM console web host and headless navigation tools

mod cli;
mod http;
mod storage;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use crm_core::models::{Credentials, Identity};
use crm_core::{
    Console, ConsoleConfig, HistoryDriver, MemoryHistory, RecordFetcher, Resolution, Session,
    SessionStore,
};
use http::HttpFetcher;
use std::path::PathBuf;
use std::sync::Arc;
use storage::FileStorage;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "crm-console",
    version,
    about = "CRM console web host and navigation tools",
    long_about = "Serves the CRM console web app and resolves console paths from the terminal.\n\
                  \n\
                  Examples:\n\
                    crm-console serve                      # Serve the compiled web app\n\
                    crm-console serve --port 8080 --open   # Custom port, open a browser\n\
                    crm-console login --key K --secret S   # Store API credentials\n\
                    crm-console resolve /deals/D-100       # Resolve a deep link\n\
                    crm-console status                     # Show the stored session\n\
                    crm-console logout                     # Forget the session\n\
                  \n\
                  Environment Variables:\n\
                    CRM_CONSOLE_CONFIG                     # Config file path\n\
                    CRM_API_URL                            # Document store origin\n\
                    CRM_BASE_PREFIX                        # Application base prefix (/crm)\n\
                    CRM_CONSOLE_SESSION                    # Session file path\n\
                    CRM_CONSOLE_NO_COLOR                   # Disable ANSI colors\n\
                    RUST_LOG                               # Log filter"
)]
struct Cli {
    #[command(subcommand)]
    mode: Option<Mode>,

    /// Config file (default: <config dir>/crm-console/config.toml)
    #[arg(long, env = "CRM_CONSOLE_CONFIG")]
    config: Option<PathBuf>,

    /// Document store origin, overrides the config file
    #[arg(long, env = "CRM_API_URL")]
    api_url: Option<String>,

    /// Application base prefix, overrides the config file
    #[arg(long, env = "CRM_BASE_PREFIX")]
    base_prefix: Option<String>,

    /// Session file (default: <config dir>/crm-console/session.json)
    #[arg(long, env = "CRM_CONSOLE_SESSION")]
    session_file: Option<PathBuf>,

    /// Disable ANSI colors (log-friendly)
    #[arg(long, env = "CRM_CONSOLE_NO_COLOR")]
    no_color: bool,
}

#[derive(Subcommand)]
enum Mode {
    /// Serve the compiled web app with deep-link fallback
    Serve {
        /// Port for web server
        #[arg(long, default_value = "3333")]
        port: u16,
        /// Trunk output directory
        #[arg(long, default_value = "crates/crm-web/dist")]
        dist: PathBuf,
        /// Open the app in a browser
        #[arg(long)]
        open: bool,
    },
    /// Resolve a console path the way a cold start would
    Resolve {
        /// Path, e.g. /deals/D-100
        path: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Verify API credentials and store the session
    Login {
        #[arg(long)]
        key: String,
        #[arg(long)]
        secret: String,
        /// Username recorded with the session; replaced by the server's answer unless --offline
        #[arg(long)]
        user: Option<String>,
        /// Company the session is bound to
        #[arg(long, default_value = "")]
        company: String,
        /// Store without asking the document store first
        #[arg(long)]
        offline: bool,
    },
    /// Clear the stored session
    Logout,
    /// Show the stored session
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("crm_console=info,crm_core=info")),
        )
        .with_ansi(!cli.no_color)
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(&cli)?;
    let session_path = cli
        .session_file
        .clone()
        .or_else(FileStorage::default_path)
        .context("Could not determine session file location")?;
    let storage = Arc::new(FileStorage::new(session_path));

    match cli.mode.unwrap_or(Mode::Status { json: false }) {
        Mode::Serve { port, dist, open } => {
            run_serve(config, dist, port, open).await?;
        }
        Mode::Resolve { path, json } => {
            run_resolve(config, storage, path, json, cli.no_color).await?;
        }
        Mode::Login {
            key,
            secret,
            user,
            company,
            offline,
        } => {
            run_login(config, storage, key, secret, user, company, offline).await?;
        }
        Mode::Logout => {
            run_logout(config, storage);
        }
        Mode::Status { json } => {
            let session = SessionStore::new(storage).get();
            println!("{}", cli::format_status(session.as_ref(), json));
        }
    }

    Ok(())
}

/// Config file, then command-line overrides
fn load_config(cli: &Cli) -> Result<ConsoleConfig> {
    let path = cli
        .config
        .clone()
        .or_else(|| dirs::config_dir().map(|d| d.join("crm-console").join("config.toml")));

    let mut config = match path {
        Some(path) => ConsoleConfig::load(&path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ConsoleConfig::default(),
    };

    if let Some(api_url) = &cli.api_url {
        config.api_base_url = api_url.clone();
    }
    if let Some(base_prefix) = &cli.base_prefix {
        config.base_prefix = base_prefix.clone();
    }
    config.validate().context("Invalid configuration")?;

    Ok(config)
}

fn build_console(
    config: ConsoleConfig,
    storage: Arc<FileStorage>,
    path: &str,
) -> (Console, Arc<MemoryHistory>) {
    let history = Arc::new(MemoryHistory::new(path));
    let api_base = config.api_base_url.clone();
    let console = Console::new(
        config,
        history.clone(),
        storage,
        move |interceptor, session| {
            Arc::new(HttpFetcher::new(api_base, interceptor, session)) as Arc<dyn RecordFetcher>
        },
    );
    (console, history)
}

async fn run_serve(config: ConsoleConfig, dist: PathBuf, port: u16, open: bool) -> Result<()> {
    if !dist.join("index.html").exists() {
        println!(
            "💡 {} has no index.html, run 'trunk build' in crates/crm-web",
            dist.display()
        );
    }

    if open {
        let url = format!("http://localhost:{}{}/", port, config.base_prefix);
        if let Err(e) = open::that(&url) {
            tracing::warn!(url = %url, error = %e, "Could not open a browser");
        }
    }

    crm_web::run(crm_web::HostConfig::new(dist, config.base_prefix), port).await
}

async fn run_resolve(
    config: ConsoleConfig,
    storage: Arc<FileStorage>,
    path: String,
    json: bool,
    no_color: bool,
) -> Result<()> {
    let path = crm_core::route::join_base(&config.base_prefix, &path);
    let (console, history) = build_console(config, storage, &path);

    if !console.session.is_valid() {
        tracing::warn!("No stored session, requests go out unauthenticated");
    }

    let mut events = console.events.subscribe();
    let resolution = console.navigator.resolve_current().await;

    // The interceptor raised at most one event; let the coordinator see it
    while let Ok(event) = events.try_recv() {
        console.recovery.handle(&event);
    }

    let state = console.navigator.state();
    println!(
        "{}",
        cli::format_resolution(&resolution, &state, &history.current_path(), json, no_color)
    );

    let modal = console.recovery.modal();
    if modal.is_open {
        eprintln!(
            "Session expired: {}",
            modal.message.as_deref().unwrap_or("log in again")
        );
        eprintln!("Run 'crm-console login' to start a new session.");
    }

    if let Resolution::ListFallback { error, .. } = &resolution {
        if error.is_auth_failure() {
            bail!("authentication failed");
        }
    }

    Ok(())
}

async fn run_login(
    config: ConsoleConfig,
    storage: Arc<FileStorage>,
    key: String,
    secret: String,
    user: Option<String>,
    company: String,
    offline: bool,
) -> Result<()> {
    let credentials = Credentials::ApiKey { key, secret };
    let user = user.unwrap_or_default();
    let identity = Identity {
        username: user.clone(),
        email: user.clone(),
        full_name: user,
    };
    let mut session = Session::new(company, identity, credentials);

    if !offline {
        let user = http::logged_user(&config.api_base_url, &session)
            .await
            .with_context(|| format!("Login against {} failed", config.api_base_url))?;
        session.identity = Identity {
            username: user.clone(),
            email: user.clone(),
            full_name: user,
        };
    }

    SessionStore::new(storage.clone())
        .set(&session)
        .context("Failed to store session")?;
    tracing::info!(user = %session.identity.username, path = %storage.path().display(), "Session stored");
    println!("{}", cli::format_status(Some(&session), false));

    Ok(())
}

fn run_logout(config: ConsoleConfig, storage: Arc<FileStorage>) {
    let (console, _) = build_console(config, storage, "/");
    if console.recovery.on_logout() {
        println!("Logged out.");
    } else {
        println!("Not logged in.");
    }
}
