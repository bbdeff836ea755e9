use clap::Subcommand;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::cli::utils::{field, output_collection, output_record, output_success};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum WorkspaceCommands {
    #[command(about = "List workspaces you belong to")]
    List,

    #[command(about = "Create a workspace you own")]
    Create {
        #[arg(help = "Workspace name")]
        name: String,
    },

    #[command(about = "Join a workspace with an invite code")]
    Join {
        #[arg(help = "Invite code shared by the owner")]
        invite_code: String,
    },

    #[command(about = "Show one workspace")]
    Show {
        #[arg(help = "Workspace ID")]
        id: Uuid,
    },

    #[command(about = "Delete a workspace and all of its notes and files (owner only)")]
    Delete {
        #[arg(help = "Workspace ID")]
        id: Uuid,
    },
}

pub async fn handle(cmd: WorkspaceCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = super::client()?;

    match cmd {
        WorkspaceCommands::List => {
            let workspaces = client.get("/api/workspaces").await?;
            output_collection(
                &output_format,
                "workspaces",
                &workspaces,
                "No workspaces yet. Create one or join with an invite code.",
                workspace_line,
            )
        }
        WorkspaceCommands::Create { name } => {
            let workspace = client.post("/api/workspaces", &json!({ "name": name })).await?;
            match output_format {
                OutputFormat::Json => output_record(&output_format, &workspace),
                OutputFormat::Text => {
                    println!("✓ Created workspace {} ({})", field(&workspace, "name"), field(&workspace, "id"));
                    println!("  Invite code: {}", field(&workspace, "invite_code"));
                    Ok(())
                }
            }
        }
        WorkspaceCommands::Join { invite_code } => {
            let outcome = client
                .post("/api/workspaces/join", &json!({ "invite_code": invite_code }))
                .await?;
            let workspace = outcome.get("workspace").cloned().unwrap_or(Value::Null);
            let joined = outcome.get("joined").and_then(Value::as_bool).unwrap_or(false);
            let message = if joined {
                format!("Joined workspace {}", field(&workspace, "name"))
            } else {
                format!("Already a member of {}", field(&workspace, "name"))
            };
            output_success(&output_format, &message, Some(outcome))
        }
        WorkspaceCommands::Show { id } => {
            let workspace = client.get(&format!("/api/workspaces/{}", id)).await?;
            output_record(&output_format, &workspace)
        }
        WorkspaceCommands::Delete { id } => {
            client.delete(&format!("/api/workspaces/{}", id)).await?;
            output_success(
                &output_format,
                &format!("Deleted workspace {}", id),
                Some(json!({ "id": id })),
            )
        }
    }
}

fn workspace_line(workspace: &Value) -> String {
    format!(
        "{}  {:<6}  {}",
        field(workspace, "id"),
        field(workspace, "role"),
        field(workspace, "name")
    )
}
