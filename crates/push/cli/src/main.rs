//! pubnub-push - manage push notification registrations from the command line.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::WrapErr as _;
use pubnub_client::{Config, PubNub, PushEnvironment, PushToken, PushType, Status};

#[derive(Parser)]
#[command(name = "pubnub-push")]
#[command(about = "Manage PubNub push notification registrations", long_about = None)]
struct Cli {
    /// Config file (defaults to the platform config dir)
    #[arg(long, env = "PUBNUB_CONFIG")]
    config: Option<PathBuf>,

    #[arg(long)]
    subscribe_key: Option<String>,

    #[arg(long)]
    publish_key: Option<String>,

    #[arg(long)]
    auth_key: Option<String>,

    /// Service origin host, e.g. ps.pndsn.com or 127.0.0.1:8090
    #[arg(long)]
    origin: Option<String>,

    /// Use plain HTTP
    #[arg(long)]
    insecure: bool,

    /// apns, apns2, gcm or mpns
    #[arg(long)]
    push_type: Option<PushType>,

    /// development or production (apns2 only)
    #[arg(long)]
    environment: Option<PushEnvironment>,

    /// APNs bundle ID (apns2 only)
    #[arg(long)]
    topic: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Enable push notifications on channels
    Add {
        /// Hex device token
        token: String,
        #[arg(required = true)]
        channels: Vec<String>,
    },

    /// Disable push notifications on channels (all channels if none given)
    Remove { token: String, channels: Vec<String> },

    /// Disable push notifications on every channel
    RemoveAll { token: String },

    /// List channels with push notifications enabled
    List { token: String },
}

#[tokio::main]
async fn main() -> color_eyre::eyre::Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = build_config(&cli)?;
    let client = PubNub::new(config).wrap_err("failed to create client")?;

    match cli.command {
        Commands::Add { token, channels } => {
            let status = client
                .add_push_notifications_on_channels(channels, parse_token(&token)?)
                .await;
            report(&status)
        }
        Commands::Remove { token, channels } => {
            let status = client
                .remove_push_notifications_from_channels(channels, parse_token(&token)?)
                .await;
            report(&status)
        }
        Commands::RemoveAll { token } => {
            let status = client
                .remove_all_push_notifications_from_device(parse_token(&token)?)
                .await;
            report(&status)
        }
        Commands::List { token } => {
            match client
                .push_notification_enabled_channels(parse_token(&token)?)
                .await
            {
                Ok(result) => {
                    for channel in &result.channels {
                        println!("{}", channel);
                    }
                    Ok(())
                }
                Err(status) => report(&status),
            }
        }
    }
}

fn build_config(cli: &Cli) -> color_eyre::eyre::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_path(path).wrap_err("failed to load config")?,
        None => match Config::load() {
            Ok(config) => config,
            Err(pubnub_client::ConfigError::NotFound(_)) => {
                let mut config = Config::demo();
                config.apply_env_overrides();
                config
            }
            Err(e) => return Err(e).wrap_err("failed to load config"),
        },
    };

    if let Some(key) = &cli.subscribe_key {
        config.subscribe_key = key.clone();
    }
    if let Some(key) = &cli.publish_key {
        config.publish_key = Some(key.clone());
    }
    if let Some(key) = &cli.auth_key {
        config.auth_key = Some(key.clone());
    }
    if let Some(origin) = &cli.origin {
        config.origin = origin.clone();
    }
    if cli.insecure {
        config.tls = false;
    }
    if let Some(push_type) = cli.push_type {
        config.push.push_type = push_type;
    }
    if let Some(environment) = cli.environment {
        config.push.environment = environment;
    }
    if let Some(topic) = &cli.topic {
        config.push.topic = Some(topic.clone());
    }

    config.validate()?;
    Ok(config)
}

fn parse_token(hex: &str) -> color_eyre::eyre::Result<PushToken> {
    PushToken::from_hex(hex).wrap_err("device token must be hex")
}

fn report(status: &Status) -> color_eyre::eyre::Result<()> {
    if status.is_error() {
        color_eyre::eyre::bail!("{}", status);
    }
    println!("OK ({})", status.operation());
    Ok(())
}
