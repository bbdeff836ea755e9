use clap::Subcommand;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::cli::utils::{field, output_collection, output_record, output_success};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum NoteCommands {
    #[command(about = "List notes in a workspace")]
    List {
        #[arg(help = "Workspace ID")]
        workspace: Uuid,
    },

    #[command(about = "Add a note to a workspace")]
    Create {
        #[arg(help = "Workspace ID")]
        workspace: Uuid,
        #[arg(long, help = "Note title")]
        title: String,
        #[arg(long, help = "Note content")]
        content: String,
    },

    #[command(about = "Replace the title and content of a note")]
    Update {
        #[arg(help = "Workspace ID")]
        workspace: Uuid,
        #[arg(help = "Note ID")]
        note: Uuid,
        #[arg(long, help = "New title")]
        title: String,
        #[arg(long, help = "New content")]
        content: String,
    },

    #[command(about = "Delete a note")]
    Delete {
        #[arg(help = "Workspace ID")]
        workspace: Uuid,
        #[arg(help = "Note ID")]
        note: Uuid,
    },
}

pub async fn handle(cmd: NoteCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = super::client()?;

    match cmd {
        NoteCommands::List { workspace } => {
            let notes = client.get(&notes_path(workspace)).await?;
            output_collection(&output_format, "notes", &notes, "No notes yet.", note_line)
        }
        NoteCommands::Create {
            workspace,
            title,
            content,
        } => {
            let note = client
                .post(&notes_path(workspace), &json!({ "title": title, "content": content }))
                .await?;
            output_record(&output_format, &note)
        }
        NoteCommands::Update {
            workspace,
            note,
            title,
            content,
        } => {
            let note = client
                .put(
                    &format!("{}/{}", notes_path(workspace), note),
                    &json!({ "title": title, "content": content }),
                )
                .await?;
            output_record(&output_format, &note)
        }
        NoteCommands::Delete { workspace, note } => {
            client.delete(&format!("{}/{}", notes_path(workspace), note)).await?;
            output_success(
                &output_format,
                &format!("Deleted note {}", note),
                Some(json!({ "id": note })),
            )
        }
    }
}

fn notes_path(workspace: Uuid) -> String {
    format!("/api/workspaces/{}/notes", workspace)
}

fn note_line(note: &Value) -> String {
    let marker = if note.get("can_manage").and_then(Value::as_bool).unwrap_or(false) {
        "*"
    } else {
        " "
    };
    format!("{}{}  {}", marker, field(note, "id"), field(note, "title"))
}
