use clap::Subcommand;
use serde_json::{json, Value};

use crate::cli::client::ApiClient;
use crate::cli::config::{load_environment_config, save_environment_config};
use crate::cli::utils::{field, output_record, output_success, prompt};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Create an account and log in")]
    Signup {
        #[arg(long, help = "Display name")]
        name: String,
        #[arg(long, help = "Email address")]
        email: String,
        #[arg(long, env = "TEAMSPACE_PASSWORD", hide_env_values = true, help = "Password (prompted when omitted)")]
        password: Option<String>,
    },

    #[command(about = "Log in and save the session token")]
    Login {
        #[arg(long, help = "Email address")]
        email: String,
        #[arg(long, env = "TEAMSPACE_PASSWORD", hide_env_values = true, help = "Password (prompted when omitted)")]
        password: Option<String>,
    },

    #[command(about = "Forget the saved session token")]
    Logout,

    #[command(about = "Show the user behind the saved token")]
    Whoami,
}

pub async fn handle(cmd: AuthCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Signup {
            name,
            email,
            password,
        } => {
            let password = password_or_prompt(password)?;
            let body = json!({ "name": name, "email": email, "password": password });
            start_session("/auth/signup", &body, "Account created", output_format).await
        }
        AuthCommands::Login { email, password } => {
            let password = password_or_prompt(password)?;
            let body = json!({ "email": email, "password": password });
            start_session("/auth/login", &body, "Logged in", output_format).await
        }
        AuthCommands::Logout => {
            let mut config = load_environment_config()?;
            config.clear_session();
            save_environment_config(&config)?;
            output_success(&output_format, "Logged out", None)
        }
        AuthCommands::Whoami => {
            let user = super::client()?.get("/api/auth/whoami").await?;
            output_record(&output_format, &user)
        }
    }
}

fn password_or_prompt(password: Option<String>) -> anyhow::Result<String> {
    match password {
        Some(password) => Ok(password),
        None => prompt("Password"),
    }
}

async fn start_session(
    path: &str,
    body: &Value,
    verb: &str,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let mut config = load_environment_config()?;
    let session = ApiClient::from_config(&config).post_public(path, body).await?;

    let token = session
        .get("token")
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow::anyhow!("Server response did not include a token"))?;
    let user = session.get("user").cloned().unwrap_or(Value::Null);
    let email = field(&user, "email").to_string();

    config.set_session(token.to_string(), email.clone());
    save_environment_config(&config)?;

    output_success(
        &output_format,
        &format!("{} as {}", verb, email),
        Some(json!({ "user": user })),
    )
}
