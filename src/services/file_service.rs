use bytes::Bytes;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::{require, ServiceError, ServiceResult};
use crate::database::models::{NewFile, WorkspaceFile};
use crate::database::WorkspaceStore;
use crate::policy::{can_manage, Action};
use crate::storage::{storage_path, ObjectStore, StorageError};

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// A file row plus whether the viewer may delete it.
#[derive(Debug, Clone, Serialize)]
pub struct FileView {
    #[serde(flatten)]
    pub file: WorkspaceFile,
    pub can_manage: bool,
}

#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

#[derive(Debug, Clone)]
pub struct FileDownload {
    pub file: WorkspaceFile,
    pub data: Bytes,
}

pub struct FileService {
    store: Arc<dyn WorkspaceStore>,
    objects: Arc<dyn ObjectStore>,
    max_upload_bytes: usize,
}

impl FileService {
    pub fn new(
        store: Arc<dyn WorkspaceStore>,
        objects: Arc<dyn ObjectStore>,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            store,
            objects,
            max_upload_bytes,
        }
    }

    pub async fn list(&self, actor: Uuid, workspace_id: Uuid) -> ServiceResult<Vec<FileView>> {
        let role = require(self.store.as_ref(), actor, workspace_id, Action::ViewWorkspace).await?;

        let files = self.store.list_files(workspace_id).await?;
        Ok(files
            .into_iter()
            .map(|file| FileView {
                can_manage: can_manage(actor, role, &file.descriptor()),
                file,
            })
            .collect())
    }

    /// Policy check for an upload, run before the request body is read.
    pub async fn check_upload(&self, actor: Uuid, workspace_id: Uuid) -> ServiceResult<()> {
        require(self.store.as_ref(), actor, workspace_id, Action::CreateFile).await?;
        Ok(())
    }

    /// Store the payload, then record its metadata. If the insert fails the
    /// stored object is removed again before the insert error is returned.
    pub async fn upload(
        &self,
        actor: Uuid,
        workspace_id: Uuid,
        upload: UploadRequest,
    ) -> ServiceResult<WorkspaceFile> {
        require(self.store.as_ref(), actor, workspace_id, Action::CreateFile).await?;

        let size = upload.data.len();
        if size == 0 {
            return Err(ServiceError::validation("File is empty"));
        }
        if size > self.max_upload_bytes {
            warn!(workspace_id = %workspace_id, size, limit = self.max_upload_bytes, "upload rejected: too large");
            return Err(ServiceError::PayloadTooLarge {
                size,
                limit: self.max_upload_bytes,
            });
        }

        let file_name = match upload.file_name.trim() {
            "" => "file".to_string(),
            name => name.to_string(),
        };
        let content_type = upload
            .content_type
            .filter(|ct| !ct.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

        let file_id = Uuid::new_v4();
        let file_path = storage_path(workspace_id, file_id, &file_name);

        self.objects.put(&file_path, upload.data).await?;

        let new_file = NewFile {
            id: file_id,
            workspace_id,
            file_name,
            file_path: file_path.clone(),
            size_bytes: size as i64,
            content_type,
            uploaded_by: actor,
        };

        match self.store.create_file(new_file).await {
            Ok(file) => {
                info!(file_id = %file.id, workspace_id = %workspace_id, size, "file uploaded");
                Ok(file)
            }
            Err(insert_err) => {
                if let Err(cleanup_err) = self.objects.delete(&file_path).await {
                    error!(path = %file_path, error = %cleanup_err, "failed to remove object after metadata insert failed");
                } else {
                    warn!(path = %file_path, "removed object after metadata insert failed");
                }
                Err(insert_err.into())
            }
        }
    }

    pub async fn download(
        &self,
        actor: Uuid,
        workspace_id: Uuid,
        file_id: Uuid,
    ) -> ServiceResult<FileDownload> {
        let file = self.find(actor, workspace_id, file_id).await?;
        require(self.store.as_ref(), actor, workspace_id, Action::DownloadFile(file.descriptor())).await?;

        let data = self.objects.get(&file.file_path).await.map_err(|e| match e {
            StorageError::NotFound(_) => ServiceError::not_found("File content not found"),
            other => other.into(),
        })?;

        Ok(FileDownload { file, data })
    }

    /// Remove the row, then the object. A failed object removal is logged and
    /// leaves an orphan rather than failing the request.
    pub async fn delete(&self, actor: Uuid, workspace_id: Uuid, file_id: Uuid) -> ServiceResult<()> {
        let file = self.find(actor, workspace_id, file_id).await?;
        require(self.store.as_ref(), actor, workspace_id, Action::DeleteFile(file.descriptor())).await?;

        if !self.store.delete_file(file.id).await? {
            return Err(ServiceError::not_found("File not found"));
        }
        info!(file_id = %file.id, workspace_id = %workspace_id, "file deleted");

        if let Err(e) = self.objects.delete(&file.file_path).await {
            warn!(path = %file.file_path, error = %e, "failed to remove stored object; leaving orphan");
        }

        Ok(())
    }

    async fn find(&self, actor: Uuid, workspace_id: Uuid, file_id: Uuid) -> ServiceResult<WorkspaceFile> {
        match self.store.find_file(file_id).await? {
            Some(file) => Ok(file),
            None => {
                require(self.store.as_ref(), actor, workspace_id, Action::ViewWorkspace).await?;
                Err(ServiceError::not_found("File not found"))
            }
        }
    }
}
