use clap::Subcommand;
use serde_json::{json, Value};
use std::path::PathBuf;
use uuid::Uuid;

use crate::cli::utils::{field, output_collection, output_record, output_success};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum FileCommands {
    #[command(about = "List files in a workspace")]
    List {
        #[arg(help = "Workspace ID")]
        workspace: Uuid,
    },

    #[command(about = "Upload a local file")]
    Upload {
        #[arg(help = "Workspace ID")]
        workspace: Uuid,
        #[arg(help = "Path of the file to upload")]
        path: PathBuf,
        #[arg(long, help = "Name to store instead of the local file name")]
        name: Option<String>,
    },

    #[command(about = "Download a file")]
    Download {
        #[arg(help = "Workspace ID")]
        workspace: Uuid,
        #[arg(help = "File ID")]
        file: Uuid,
        #[arg(short, long, help = "Where to write the file (defaults to its stored name)")]
        output: Option<PathBuf>,
    },

    #[command(about = "Delete a file")]
    Delete {
        #[arg(help = "Workspace ID")]
        workspace: Uuid,
        #[arg(help = "File ID")]
        file: Uuid,
    },
}

pub async fn handle(cmd: FileCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = super::client()?;

    match cmd {
        FileCommands::List { workspace } => {
            let files = client.get(&files_path(workspace)).await?;
            output_collection(&output_format, "files", &files, "No files yet.", file_line)
        }
        FileCommands::Upload {
            workspace,
            path,
            name,
        } => {
            let file_name = match name {
                Some(name) => name,
                None => path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .map(str::to_string)
                    .ok_or_else(|| anyhow::anyhow!("Cannot determine a file name for {}", path.display()))?,
            };
            let data = tokio::fs::read(&path).await?;
            let file = client.upload(&files_path(workspace), &file_name, data).await?;
            output_record(&output_format, &file)
        }
        FileCommands::Download {
            workspace,
            file,
            output,
        } => {
            let (stored_name, data) = client
                .download(&format!("{}/{}", files_path(workspace), file))
                .await?;
            let target = output
                .or_else(|| stored_name.map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from(file.to_string()));
            tokio::fs::write(&target, &data).await?;

            output_success(
                &output_format,
                &format!("Saved {} bytes to {}", data.len(), target.display()),
                Some(json!({ "path": target, "size_bytes": data.len() })),
            )
        }
        FileCommands::Delete { workspace, file } => {
            client.delete(&format!("{}/{}", files_path(workspace), file)).await?;
            output_success(
                &output_format,
                &format!("Deleted file {}", file),
                Some(json!({ "id": file })),
            )
        }
    }
}

fn files_path(workspace: Uuid) -> String {
    format!("/api/workspaces/{}/files", workspace)
}

fn file_line(file: &Value) -> String {
    let size = file.get("size_bytes").and_then(Value::as_i64).unwrap_or(0);
    format!("{}  {:>10}  {}", field(file, "id"), size, field(file, "file_name"))
}
