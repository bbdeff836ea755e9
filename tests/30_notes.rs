mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use common::{TestApp, TestUser};

struct Team {
    app: TestApp,
    owner: TestUser,
    author: TestUser,
    bystander: TestUser,
    workspace_id: Uuid,
}

async fn team() -> Result<Team> {
    let app = TestApp::new().await?;
    let owner = app.signup("Owner", "owner@example.com").await?;
    let author = app.signup("Author", "author@example.com").await?;
    let bystander = app.signup("Bystander", "bystander@example.com").await?;
    let (workspace_id, code) = app.create_workspace(&owner, "Team").await?;
    app.join(&author, &code).await?;
    app.join(&bystander, &code).await?;

    Ok(Team {
        app,
        owner,
        author,
        bystander,
        workspace_id,
    })
}

fn note_uri(workspace_id: Uuid, note_id: Uuid) -> String {
    format!("/api/workspaces/{}/notes/{}", workspace_id, note_id)
}

#[tokio::test]
async fn any_member_creates_and_lists_notes() -> Result<()> {
    let t = team().await?;
    let first = t.app.create_note(&t.author, t.workspace_id, "First").await?;
    let second = t.app.create_note(&t.bystander, t.workspace_id, "Second").await?;

    let res = t
        .app
        .get(&format!("/api/workspaces/{}/notes", t.workspace_id), &t.author.token)
        .await?;
    assert_eq!(res.status, StatusCode::OK);

    let notes = res.data().as_array().cloned().unwrap_or_default();
    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0]["id"], second.to_string());
    assert_eq!(notes[0]["can_manage"], false);
    assert_eq!(notes[1]["id"], first.to_string());
    assert_eq!(notes[1]["can_manage"], true);
    Ok(())
}

#[tokio::test]
async fn owner_sees_every_note_as_manageable() -> Result<()> {
    let t = team().await?;
    t.app.create_note(&t.author, t.workspace_id, "Theirs").await?;

    let res = t
        .app
        .get(&format!("/api/workspaces/{}/notes", t.workspace_id), &t.owner.token)
        .await?;
    let notes = res.data().as_array().cloned().unwrap_or_default();
    assert!(notes.iter().all(|n| n["can_manage"] == true));
    Ok(())
}

#[tokio::test]
async fn creator_and_owner_may_edit_other_members_may_not() -> Result<()> {
    let t = team().await?;
    let note_id = t.app.create_note(&t.author, t.workspace_id, "Draft").await?;
    let uri = note_uri(t.workspace_id, note_id);

    let by_author = t
        .app
        .put(&uri, &t.author.token, json!({ "title": "Draft 2", "content": "more" }))
        .await?;
    assert_eq!(by_author.status, StatusCode::OK);
    assert_eq!(by_author.data()["title"], "Draft 2");

    let by_owner = t
        .app
        .put(&uri, &t.owner.token, json!({ "title": "Final", "content": "done" }))
        .await?;
    assert_eq!(by_owner.status, StatusCode::OK);
    // Ownership of the note does not move to the editor
    assert_eq!(by_owner.data()["created_by"], t.author.id.to_string());

    let by_bystander = t
        .app
        .put(&uri, &t.bystander.token, json!({ "title": "Mine now", "content": "x" }))
        .await?;
    assert_eq!(by_bystander.status, StatusCode::FORBIDDEN);
    assert_eq!(by_bystander.code(), "INSUFFICIENT_ROLE");
    assert_eq!(
        by_bystander.json["message"],
        "You do not have permission to edit this note"
    );
    Ok(())
}

#[tokio::test]
async fn delete_follows_the_same_rule() -> Result<()> {
    let t = team().await?;
    let mine = t.app.create_note(&t.author, t.workspace_id, "Mine").await?;
    let other = t.app.create_note(&t.author, t.workspace_id, "Other").await?;

    let denied = t.app.delete(&note_uri(t.workspace_id, mine), &t.bystander.token).await?;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);
    assert_eq!(t.app.store.note_count(t.workspace_id), 2);

    let by_author = t.app.delete(&note_uri(t.workspace_id, mine), &t.author.token).await?;
    assert_eq!(by_author.status, StatusCode::NO_CONTENT);

    let by_owner = t.app.delete(&note_uri(t.workspace_id, other), &t.owner.token).await?;
    assert_eq!(by_owner.status, StatusCode::NO_CONTENT);
    assert_eq!(t.app.store.note_count(t.workspace_id), 0);

    let again = t.app.delete(&note_uri(t.workspace_id, other), &t.owner.token).await?;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn title_and_content_are_required() -> Result<()> {
    let t = team().await?;
    let uri = format!("/api/workspaces/{}/notes", t.workspace_id);

    let no_title = t.app.post(&uri, &t.author.token, json!({ "title": " ", "content": "x" })).await?;
    assert_eq!(no_title.status, StatusCode::BAD_REQUEST);
    assert_eq!(no_title.json["message"], "Note title is required");

    let no_content = t.app.post(&uri, &t.author.token, json!({ "title": "x" })).await?;
    assert_eq!(no_content.status, StatusCode::BAD_REQUEST);
    assert_eq!(no_content.json["message"], "Note content is required");
    Ok(())
}

#[tokio::test]
async fn note_from_another_workspace_is_rejected() -> Result<()> {
    let t = team().await?;
    let (other_ws, _) = t.app.create_workspace(&t.owner, "Other").await?;
    let note_id = t.app.create_note(&t.owner, t.workspace_id, "Here").await?;

    // Owner of both workspaces, addressing the note through the wrong one
    let res = t
        .app
        .put(
            &note_uri(other_ws, note_id),
            &t.owner.token,
            json!({ "title": "Moved?", "content": "no" }),
        )
        .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.code(), "WRONG_WORKSPACE");

    let del = t.app.delete(&note_uri(other_ws, note_id), &t.owner.token).await?;
    assert_eq!(del.status, StatusCode::BAD_REQUEST);
    assert_eq!(t.app.store.note_count(t.workspace_id), 1);
    Ok(())
}

#[tokio::test]
async fn outsiders_cannot_read_or_write_notes() -> Result<()> {
    let t = team().await?;
    let outsider = t.app.signup("Outsider", "outsider@example.com").await?;
    let note_id = t.app.create_note(&t.author, t.workspace_id, "Secret").await?;

    let list = t
        .app
        .get(&format!("/api/workspaces/{}/notes", t.workspace_id), &outsider.token)
        .await?;
    assert_eq!(list.status, StatusCode::FORBIDDEN);
    assert_eq!(list.code(), "NOT_A_MEMBER");

    let create = t
        .app
        .post(
            &format!("/api/workspaces/{}/notes", t.workspace_id),
            &outsider.token,
            json!({ "title": "x", "content": "y" }),
        )
        .await?;
    assert_eq!(create.status, StatusCode::FORBIDDEN);

    let missing = t
        .app
        .delete(&note_uri(t.workspace_id, Uuid::new_v4()), &outsider.token)
        .await?;
    assert_eq!(missing.status, StatusCode::FORBIDDEN);

    let existing = t.app.delete(&note_uri(t.workspace_id, note_id), &outsider.token).await?;
    assert_eq!(existing.status, StatusCode::FORBIDDEN);
    assert_eq!(existing.code(), "NOT_A_MEMBER");
    Ok(())
}

#[tokio::test]
async fn missing_note_is_not_found_for_members() -> Result<()> {
    let t = team().await?;
    let res = t
        .app
        .put(
            &note_uri(t.workspace_id, Uuid::new_v4()),
            &t.author.token,
            json!({ "title": "x", "content": "y" }),
        )
        .await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    Ok(())
}
