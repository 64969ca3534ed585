use clap::{Parser, Subcommand};
use std::error::Error;
use tracing_subscriber::EnvFilter;

use jellyfin_client::config::Config;
use jellyfin_client::jellyfin::{KeyManager, KeySelector};

#[derive(Parser)]
#[command(
    name = "jellyfin_client",
    about = "Manage API keys on a Jellyfin server",
    version
)]
struct Cli {
    /// Server URL, e.g. http://localhost:8096 (or JELLYFIN_ENDPOINT)
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Username to authenticate with (or JELLYFIN_USERNAME)
    #[arg(long, global = true)]
    username: Option<String>,

    /// Password to authenticate with (or JELLYFIN_PASSWORD)
    #[arg(long, global = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every API key
    List,
    /// Create an API key and print the created record
    Create { app_name: String },
    /// Delete an API key by access token
    Delete { access_token: String },
    /// Look up a single API key by app name or access token
    Get {
        #[arg(long)]
        app_name: Option<String>,
        #[arg(long)]
        access_token: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let config = Config {
        endpoint: cli.endpoint,
        username: cli.username,
        password: cli.password,
    };
    let client = config.resolve()?.connect().await?;
    let manager = KeyManager::new(client);

    match cli.command {
        Command::List => {
            let result = manager.client().get_keys().await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Create { app_name } => {
            let key = manager.create(&app_name).await?;
            println!("{}", serde_json::to_string_pretty(&key)?);
        }
        Command::Delete { access_token } => {
            manager.delete(&access_token).await?;
        }
        Command::Get {
            app_name,
            access_token,
        } => {
            let selector = match (app_name, access_token) {
                (Some(name), None) => KeySelector::AppName(name),
                (None, Some(token)) => KeySelector::AccessToken(token),
                _ => {
                    return Err("exactly one of --app-name or --access-token must be given".into())
                }
            };
            let key = manager.lookup(&selector).await?;
            println!("{}", serde_json::to_string_pretty(&key)?);
        }
    }

    Ok(())
}
