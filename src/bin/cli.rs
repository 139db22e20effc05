//! Outlet Watch CLI
//!
//! Checks the outlet listing once and mails newly listed bikes. Meant to be
//! run from cron or a systemd timer; overlapping runs are not supported.

use std::path::PathBuf;

use clap::Parser;
use outlet_watch::{
    error::Result,
    models::{Config, MailConfig, Verbosity},
    pipeline::{self, Delivery},
};

/// Outlet Watch - new outlet listing notifier
#[derive(Parser, Debug)]
#[command(
    name = "outlet-watch",
    version,
    about = "Mails newly listed bikes from the Canyon outlet"
)]
struct Cli {
    /// SMTP server address (implicit TLS / SMTPS)
    #[arg(short = 'S', long = "smtp_server", alias = "smtp-server")]
    smtp_server: String,

    /// SMTP server port (SSL only)
    #[arg(short = 'P', long = "port")]
    port: u16,

    /// Sender address, also used as the SMTP login
    #[arg(short = 's', long = "sender_email", alias = "sender-email")]
    sender_email: String,

    /// Sender password
    #[arg(short = 'p', long = "password")]
    password: String,

    /// Notification recipient
    #[arg(short = 'r', long = "receiver_email", alias = "receiver-email")]
    receiver_email: String,

    /// Snapshot file holding the last seen items
    #[arg(short = 'o', long = "output", default_value = "current_bikes.json")]
    output: PathBuf,

    /// Optional TOML config (listing URL, selectors, message text)
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Log the message instead of sending it
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose logging
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn mail_config(&self) -> MailConfig {
        MailConfig {
            smtp_server: self.smtp_server.clone(),
            port: self.port,
            sender_email: self.sender_email.clone(),
            password: self.password.clone(),
            receiver_email: self.receiver_email.clone(),
        }
    }

    fn verbosity(&self, configured: Verbosity) -> Verbosity {
        if self.verbose {
            Verbosity::Verbose
        } else if self.quiet {
            Verbosity::Quiet
        } else {
            configured
        }
    }
}

/// Initialize logging based on verbosity.
fn init_logging(verbosity: Verbosity) {
    let env = env_logger::Env::default().default_filter_or(verbosity.log_filter());
    env_logger::Builder::from_env(env)
        .format_timestamp_secs()
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    match &cli.config {
        Some(path) => Config::load_or_default(path),
        None => Ok(Config::default()),
    }
}

/// Main entry point for the CLI application.
fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            init_logging(cli.verbosity(Verbosity::Normal));
            log::error!("Config load failed: {}", e);
            return Err(e);
        }
    };
    config.verbosity = cli.verbosity(config.verbosity);
    init_logging(config.verbosity);

    if let Err(e) = config.validate() {
        log::error!("Config validation failed: {}", e);
        return Err(e);
    }

    let delivery = if cli.dry_run {
        Delivery::DryRun
    } else {
        Delivery::Smtp(cli.mail_config())
    };

    log::info!("Outlet watch starting, snapshot at {}", cli.output.display());
    match pipeline::run_watcher(&config, &cli.output, delivery) {
        Ok(summary) => {
            log::info!(
                "Done: {} listed, {} new, notified: {}",
                summary.seen,
                summary.new_items.len(),
                summary.notified
            );
            Ok(())
        }
        Err(e) => {
            log::error!("Run aborted: {}", e);
            Err(e)
        }
    }
}
