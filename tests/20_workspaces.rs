mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn owner_creates_and_sees_invite_code() -> Result<()> {
    let app = TestApp::new().await?;
    let owner = app.signup("Owner", "owner@example.com").await?;

    let (workspace_id, code) = app.create_workspace(&owner, "Design").await?;
    assert_eq!(code.len(), 10);
    assert_eq!(app.store.membership_count(workspace_id), 1);

    let res = app.get(&format!("/api/workspaces/{}", workspace_id), &owner.token).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.data()["role"], "owner");
    assert_eq!(res.data()["invite_code"], code.as_str());
    Ok(())
}

#[tokio::test]
async fn invite_code_collisions_are_retried() -> Result<()> {
    let app = TestApp::new().await?;
    let owner = app.signup("Owner", "owner@example.com").await?;

    app.store.collide_invite_codes(2);
    let (workspace_id, code) = app.create_workspace(&owner, "Retried").await?;
    assert_eq!(code.len(), 10);
    assert_eq!(app.store.membership_count(workspace_id), 1);
    assert_eq!(app.store.workspace_count(), 1);
    Ok(())
}

#[tokio::test]
async fn persistent_invite_code_collisions_fail_the_create() -> Result<()> {
    let app = TestApp::new().await?;
    let owner = app.signup("Owner", "owner@example.com").await?;

    app.store.collide_invite_codes(5);
    let res = app.post("/api/workspaces", &owner.token, json!({ "name": "Unlucky" })).await?;
    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(app.store.workspace_count(), 0);

    // The sixth attempt is a fresh request and goes through.
    app.create_workspace(&owner, "Lucky").await?;
    assert_eq!(app.store.workspace_count(), 1);
    Ok(())
}

#[tokio::test]
async fn workspace_name_is_validated() -> Result<()> {
    let app = TestApp::new().await?;
    let owner = app.signup("Owner", "owner@example.com").await?;

    let blank = app.post("/api/workspaces", &owner.token, json!({ "name": "   " })).await?;
    assert_eq!(blank.status, StatusCode::BAD_REQUEST);

    let long = app
        .post("/api/workspaces", &owner.token, json!({ "name": "x".repeat(101) }))
        .await?;
    assert_eq!(long.status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn join_is_idempotent_and_case_insensitive() -> Result<()> {
    let app = TestApp::new().await?;
    let owner = app.signup("Owner", "owner@example.com").await?;
    let member = app.signup("Member", "member@example.com").await?;
    let (workspace_id, code) = app.create_workspace(&owner, "Design").await?;

    let first = app.join(&member, &format!("  {}  ", code.to_lowercase())).await?;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.data()["joined"], true);
    assert_eq!(first.data()["membership"]["role"], "member");

    let again = app.join(&member, &code).await?;
    assert_eq!(again.status, StatusCode::OK);
    assert_eq!(again.data()["joined"], false);
    assert_eq!(app.store.membership_count(workspace_id), 2);

    // The owner joining their own workspace keeps the owner role
    let owner_join = app.join(&owner, &code).await?;
    assert_eq!(owner_join.data()["membership"]["role"], "owner");
    assert_eq!(owner_join.data()["joined"], false);
    Ok(())
}

#[tokio::test]
async fn unknown_invite_code_is_not_found() -> Result<()> {
    let app = TestApp::new().await?;
    let user = app.signup("User", "user@example.com").await?;

    let res = app.join(&user, "ZZZZZZZZZZ").await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let empty = app.join(&user, "").await?;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn members_do_not_see_the_invite_code() -> Result<()> {
    let app = TestApp::new().await?;
    let owner = app.signup("Owner", "owner@example.com").await?;
    let member = app.signup("Member", "member@example.com").await?;
    let (workspace_id, code) = app.create_workspace(&owner, "Design").await?;
    app.join(&member, &code).await?;

    let show = app.get(&format!("/api/workspaces/{}", workspace_id), &member.token).await?;
    assert_eq!(show.status, StatusCode::OK);
    assert_eq!(show.data()["role"], "member");
    assert!(show.data().get("invite_code").is_none());

    let list = app.get("/api/workspaces", &member.token).await?;
    let items = list.data().as_array().cloned().unwrap_or_default();
    assert_eq!(items.len(), 1);
    assert!(items[0].get("invite_code").is_none());
    assert!(items[0]["joined_at"].is_string());
    Ok(())
}

#[tokio::test]
async fn list_shows_newest_membership_first() -> Result<()> {
    let app = TestApp::new().await?;
    let owner = app.signup("Owner", "owner@example.com").await?;
    app.create_workspace(&owner, "First").await?;
    app.create_workspace(&owner, "Second").await?;

    let list = app.get("/api/workspaces", &owner.token).await?;
    let names: Vec<&str> = list
        .data()
        .as_array()
        .map(|items| items.iter().filter_map(|w| w["name"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(names, vec!["Second", "First"]);
    Ok(())
}

#[tokio::test]
async fn outsiders_are_refused_not_told_it_is_missing() -> Result<()> {
    let app = TestApp::new().await?;
    let owner = app.signup("Owner", "owner@example.com").await?;
    let outsider = app.signup("Outsider", "outsider@example.com").await?;
    let (workspace_id, _) = app.create_workspace(&owner, "Private").await?;

    let res = app.get(&format!("/api/workspaces/{}", workspace_id), &outsider.token).await?;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.code(), "NOT_A_MEMBER");
    Ok(())
}

#[tokio::test]
async fn only_the_owner_deletes_and_everything_goes() -> Result<()> {
    let app = TestApp::new().await?;
    let owner = app.signup("Owner", "owner@example.com").await?;
    let member = app.signup("Member", "member@example.com").await?;
    let (workspace_id, code) = app.create_workspace(&owner, "Doomed").await?;
    app.join(&member, &code).await?;
    app.create_note(&member, workspace_id, "Keep?").await?;
    let upload = app.upload(&member, workspace_id, "a.txt", b"hello").await?;
    assert_eq!(upload.status, StatusCode::CREATED);
    let path = upload.data()["file_path"].as_str().unwrap_or_default().to_string();

    let denied = app.delete(&format!("/api/workspaces/{}", workspace_id), &member.token).await?;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);
    assert_eq!(denied.code(), "INSUFFICIENT_ROLE");

    let res = app.delete(&format!("/api/workspaces/{}", workspace_id), &owner.token).await?;
    assert_eq!(res.status, StatusCode::NO_CONTENT);
    assert!(res.body.is_empty());

    assert_eq!(app.store.membership_count(workspace_id), 0);
    assert_eq!(app.store.note_count(workspace_id), 0);
    assert_eq!(app.store.file_count(workspace_id), 0);
    assert!(!app.objects.exists(&path).await);

    // Former members lose access immediately
    let after = app.get(&format!("/api/workspaces/{}/notes", workspace_id), &member.token).await?;
    assert_eq!(after.status, StatusCode::FORBIDDEN);
    assert_eq!(after.code(), "NOT_A_MEMBER");

    let list = app.get("/api/workspaces", &member.token).await?;
    assert_eq!(list.data().as_array().map(Vec::len), Some(0));
    Ok(())
}
