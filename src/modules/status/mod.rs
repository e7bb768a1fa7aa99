use async_trait::async_trait;
use hearth_db::Database;
use hearth_kernel::{InitCtx, Module};
use once_cell::sync::OnceCell;

/// What the running process can offer, given how initialization went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentStorage {
    Enabled { project_id: String, emulated: bool },
    Degraded { reason: String },
}

impl DocumentStorage {
    pub fn from_database(db: &Database) -> Self {
        match db {
            Database::Ready(handle) => DocumentStorage::Enabled {
                project_id: handle.project_id().to_string(),
                emulated: handle.is_emulated(),
            },
            Database::Unavailable(reason) => DocumentStorage::Degraded {
                reason: reason.to_string(),
            },
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, DocumentStorage::Enabled { .. })
    }
}

/// Records which capabilities are available once the database binding is set.
pub struct StatusModule {
    storage: OnceCell<DocumentStorage>,
}

impl StatusModule {
    pub const fn new() -> Self {
        Self {
            storage: OnceCell::new(),
        }
    }

    /// `None` before the module has been initialized.
    pub fn document_storage(&self) -> Option<&DocumentStorage> {
        self.storage.get()
    }
}

impl Default for StatusModule {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Module for StatusModule {
    fn name(&self) -> &'static str {
        "status"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let storage = self
            .storage
            .get_or_init(|| DocumentStorage::from_database(ctx.db));

        match storage {
            DocumentStorage::Enabled { project_id, .. } => tracing::info!(
                module = self.name(),
                environment = ?ctx.settings.environment,
                project_id = %project_id,
                "document storage enabled"
            ),
            DocumentStorage::Degraded { reason } => tracing::warn!(
                module = self.name(),
                environment = ?ctx.settings.environment,
                reason = %reason,
                "running without document storage; some features may not work"
            ),
        }
        Ok(())
    }
}
