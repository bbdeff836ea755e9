//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::WorkspaceStore;
use crate::services::{AuthService, FileService, NoteService, WorkspaceService};
use crate::storage::ObjectStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn WorkspaceStore>,
    pub objects: Arc<dyn ObjectStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn WorkspaceStore>,
        objects: Arc<dyn ObjectStore>,
        config: AppConfig,
    ) -> Self {
        Self {
            store,
            objects,
            config: Arc::new(config),
        }
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(self.store.clone(), self.config.security.clone())
    }

    pub fn workspaces(&self) -> WorkspaceService {
        WorkspaceService::new(self.store.clone(), self.objects.clone())
    }

    pub fn notes(&self) -> NoteService {
        NoteService::new(self.store.clone())
    }

    pub fn files(&self) -> FileService {
        FileService::new(
            self.store.clone(),
            self.objects.clone(),
            self.config.storage.max_upload_bytes,
        )
    }
}
