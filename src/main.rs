//! vaultbank command-line client

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::runtime::Runtime;
use vaultbank_api::ApiError;
use vaultbank_config::{Config, ConfigErrorSeverity, ConfigResult};
use vaultbank_core::{CoreError, ErrorSeverity, FileStore, Session, TransactionType};

#[derive(Parser, Debug)]
#[command(name = "vaultbank")]
#[command(author = "Vaultbank Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Command-line client for the Vault mobile banking backend", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in and store the session token
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
        /// Keep the session across restarts
        #[arg(long)]
        remember_me: bool,
    },
    /// Create an account with a profile picture
    Register {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
        #[arg(long)]
        image: PathBuf,
    },
    /// Forget the stored session
    Logout,
    /// Balance, this month's change and recent activity
    Balance,
    Deposit {
        amount: String,
    },
    Withdraw {
        amount: String,
    },
    /// Send money to another user
    Transfer {
        username: String,
        amount: String,
    },
    /// Transaction history, newest first
    History {
        /// Earliest date, YYYY-MM-DD
        #[arg(long)]
        from: Option<String>,
        /// Latest date (inclusive), YYYY-MM-DD
        #[arg(long)]
        to: Option<String>,
        /// Amount to match within one cent
        #[arg(long)]
        amount: Option<String>,
        /// Transaction types to include; repeatable
        #[arg(long = "type", value_name = "TYPE")]
        types: Vec<TransactionType>,
        /// Load-more steps to apply to the window
        #[arg(long, default_value_t = 0)]
        more: usize,
    },
    /// Browse other users
    Accounts {
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value_t = 0)]
        more: usize,
        /// Scroll-up steps to apply after loading more
        #[arg(long, default_value_t = 0)]
        back: usize,
    },
    /// Show a single user
    Account {
        id: String,
    },
    /// Show your profile, or replace the profile picture
    Profile {
        #[arg(long)]
        image: Option<PathBuf>,
    },
}

/// Warning-level config errors (a missing file) fall back to defaults;
/// anything else is fatal
fn resolve_config(loaded: ConfigResult<Config>) -> anyhow::Result<Config> {
    match loaded {
        Ok(config) => Ok(config),
        Err(e) if e.severity() == ConfigErrorSeverity::Warning => {
            log::warn!("{}, using defaults", e);
            Ok(Config::default())
        }
        Err(e) => {
            for suggestion in &e.to_details().suggestions {
                log::error!("hint: {}", suggestion);
            }
            Err(e.into())
        }
    }
}

fn log_level(severity: ErrorSeverity) -> log::Level {
    match severity {
        ErrorSeverity::Info => log::Level::Info,
        ErrorSeverity::Warning => log::Level::Warn,
        ErrorSeverity::Error => log::Level::Error,
    }
}

/// Surface the code and hints of a client-side error at its severity
fn report_core_error(error: &CoreError) {
    let details = error.to_details();
    log::log!(log_level(error.severity()), "[{}] {}", details.code, details.message);
    for suggestion in &details.suggestions {
        eprintln!("hint: {}", suggestion);
    }
}

fn init_logging(level: &str) {
    // RUST_LOG wins over the configured level
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let loaded = Config::load(&args.config);
    init_logging(loaded.as_ref().map(|c| c.logging.level.as_str()).unwrap_or("info"));
    let config = resolve_config(loaded)?;

    let rt = Runtime::new()?;
    rt.block_on(async {
        let store = FileStore::new(&config.storage.path);
        let mut session = Session::restore(store).await;
        log::debug!(
            "session store: {} (authenticated: {})",
            config.storage.path.display(),
            session.is_authenticated()
        );

        let signing_in = matches!(args.command, Command::Login { .. } | Command::Register { .. });
        let result = commands::run(args.command, &config, &mut session).await;

        // a rejected token is stale; drop it so the next run asks for a login
        let rejected = result
            .as_ref()
            .err()
            .and_then(|e| e.downcast_ref::<ApiError>())
            .is_some_and(ApiError::is_unauthorized);
        if rejected && !signing_in && session.is_authenticated() {
            log::warn!("session token rejected by the server, logging out");
            if let Err(e) = session.end().await {
                log::error!("could not clear session: {}", e);
            }
        }
        if let Some(core) = result.as_ref().err().and_then(|e| e.downcast_ref::<CoreError>()) {
            report_core_error(core);
        }
        result
    })
}
