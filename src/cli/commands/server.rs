use clap::Subcommand;
use serde_json::json;

use crate::cli::client::ApiClient;
use crate::cli::config::{load_environment_config, save_environment_config};
use crate::cli::utils::{field, output_record, output_success};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum ServerCommands {
    #[command(about = "Point the CLI at a server (clears the saved session)")]
    Set {
        #[arg(help = "Server URL, e.g. http://localhost:3000")]
        url: String,
    },

    #[command(about = "Show the configured server and session")]
    Show,

    #[command(about = "Health check the configured server")]
    Ping,
}

pub async fn handle(cmd: ServerCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ServerCommands::Set { url } => {
            let url = url.trim().trim_end_matches('/').to_string();
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                anyhow::bail!("Server URL must start with http:// or https://");
            }

            let mut config = load_environment_config()?;
            if config.server_url.as_deref() != Some(url.as_str()) {
                config.clear_session();
            }
            config.server_url = Some(url.clone());
            save_environment_config(&config)?;

            output_success(
                &output_format,
                &format!("Server set to {}", url),
                Some(json!({ "server_url": url })),
            )
        }
        ServerCommands::Show => {
            let config = load_environment_config()?;
            output_record(
                &output_format,
                &json!({
                    "server_url": config.server_url(),
                    "logged_in": config.token.is_some(),
                    "email": config.email,
                    "logged_in_at": config.logged_in_at,
                }),
            )
        }
        ServerCommands::Ping => {
            let config = load_environment_config()?;
            let client = ApiClient::from_config(&config);
            let body = client.get_public("/health").await?;
            let health = body.get("data").cloned().unwrap_or(body);

            match output_format {
                OutputFormat::Json => output_record(&output_format, &health),
                OutputFormat::Text => {
                    println!(
                        "{} is {} (database: {})",
                        client.base_url(),
                        field(&health, "status"),
                        field(&health, "database")
                    );
                    Ok(())
                }
            }
        }
    }
}
